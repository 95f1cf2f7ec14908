use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;

use crate::http::response::ApiError;
use crate::http::server::AppState;

/// Require `Authorization: Bearer <admin.api_key>`.
///
/// The key is read per request so a reloaded key applies immediately.
pub async fn admin_auth_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    let authorized = {
        let config = state.config.load();
        config.admin.enabled && token.is_some_and(|t| key_matches(t, &config.admin.api_key))
    };

    if authorized {
        return next.run(request).await;
    }
    tracing::warn!(path = %request.uri().path(), "Rejected admin request");
    ApiError::Unauthorized.into_response()
}

/// Constant-time over the key bytes; only a length mismatch returns early.
fn key_matches(token: &str, key: &str) -> bool {
    !key.is_empty() && bool::from(token.as_bytes().ct_eq(key.as_bytes()))
}
