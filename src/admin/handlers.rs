use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::leads::Lead;

const DEFAULT_LEAD_LIMIT: usize = 50;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub uptime_secs: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadStats {
    pub total_leads: usize,
    pub tracked_clients: usize,
    pub rate_limit_window_secs: u64,
    pub rate_limit_max_requests: u32,
}

#[derive(Debug, Deserialize)]
pub struct LeadQuery {
    pub limit: Option<usize>,
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        uptime_secs: state.started_at.elapsed().as_secs(),
    })
}

/// Stored leads, newest first.
pub async fn get_leads(
    State(state): State<AppState>,
    Query(query): Query<LeadQuery>,
) -> Result<Json<Vec<Lead>>, ApiError> {
    let mut leads = state.intake.store().list().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to read leads");
        ApiError::Internal
    })?;

    leads.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    leads.truncate(query.limit.unwrap_or(DEFAULT_LEAD_LIMIT));
    Ok(Json(leads))
}

pub async fn get_stats(State(state): State<AppState>) -> Result<Json<LeadStats>, ApiError> {
    let total_leads = state.intake.store().count().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to count leads");
        ApiError::Internal
    })?;
    let settings = state.limiter.settings();

    Ok(Json(LeadStats {
        total_leads,
        tracked_clients: state.limiter.tracked_clients(),
        rate_limit_window_secs: settings.window_secs,
        rate_limit_max_requests: settings.max_requests,
    }))
}
