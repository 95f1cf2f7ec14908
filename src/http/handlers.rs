//! Public API handlers.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::calculator::{
    self, AffordabilityInput, AffordabilityResult, DownPaymentQuote, MortgageTerms, PaymentSummary,
    YearSummary,
};
use crate::http::request::{PeerAddr, RequestIdExt};
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::leads::{ClientInfo, LeadSubmission};
use crate::security::rate_limit::client_ip;

/// `POST /api/leads`
pub async fn submit_lead(
    State(state): State<AppState>,
    PeerAddr(peer): PeerAddr,
    headers: HeaderMap,
    payload: Result<Json<LeadSubmission>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(submission) = payload.map_err(|rejection| {
        tracing::debug!(
            request_id = headers.request_id(),
            error = %rejection.body_text(),
            "Rejected lead body"
        );
        ApiError::from(rejection)
    })?;

    let trust_forwarded = state.limiter.settings().trust_forwarded_headers;
    let client = ClientInfo {
        ip: client_ip(&headers, peer, trust_forwarded),
        user_agent: headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned),
    };

    let outcome = state.intake.submit(submission, client).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "id": outcome.id() })),
    ))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    #[serde(flatten)]
    pub terms: MortgageTerms,
    #[serde(default)]
    pub include_schedule: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    #[serde(flatten)]
    pub summary: PaymentSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Vec<YearSummary>>,
}

/// `POST /api/calculators/payment`
pub async fn payment(
    payload: Result<Json<PaymentRequest>, JsonRejection>,
) -> Result<Json<PaymentResponse>, ApiError> {
    let Json(request) = payload?;
    let summary = calculator::payment(&request.terms)?;
    let schedule = if request.include_schedule {
        Some(calculator::amortization_schedule(&request.terms)?)
    } else {
        None
    };
    Ok(Json(PaymentResponse { summary, schedule }))
}

/// `POST /api/calculators/affordability`
pub async fn affordability(
    payload: Result<Json<AffordabilityInput>, JsonRejection>,
) -> Result<Json<AffordabilityResult>, ApiError> {
    let Json(input) = payload?;
    Ok(Json(calculator::affordability(&input)?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownPaymentRequest {
    pub purchase_price: f64,
    /// Quote at the minimum when absent.
    pub down_payment: Option<f64>,
}

/// `POST /api/calculators/down-payment`
pub async fn down_payment(
    payload: Result<Json<DownPaymentRequest>, JsonRejection>,
) -> Result<Json<DownPaymentQuote>, ApiError> {
    let Json(request) = payload?;
    let down = match request.down_payment {
        Some(down) => down,
        None => calculator::minimum_down_payment(request.purchase_price)?,
    };
    Ok(Json(calculator::down_payment_quote(request.purchase_price, down)?))
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "uptimeSecs": state.started_at.elapsed().as_secs(),
    }))
}
