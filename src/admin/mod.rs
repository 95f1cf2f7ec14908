pub mod auth;
pub mod handlers;

use axum::{middleware, routing::get, Router};

use self::auth::admin_auth_middleware;
use self::handlers::*;
use crate::http::server::AppState;

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/admin/status", get(get_status))
        .route("/admin/leads", get(get_leads))
        .route("/admin/stats", get(get_stats))
        .route_layer(middleware::from_fn_with_state(state, admin_auth_middleware))
}
