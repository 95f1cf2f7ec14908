//! API error responses.
//!
//! Every error leaves as `{ "success": false, "error": ... }` so the site's
//! forms can show one message path.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::calculator::CalcError;
use crate::leads::{FieldError, LeadError};

#[derive(Debug)]
pub enum ApiError {
    Validation(Vec<FieldError>),
    /// Body could not be read or decoded.
    Rejected { status: StatusCode, message: String },
    RateLimited { retry_after_secs: u64 },
    Unauthorized,
    Calculation(CalcError),
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(details) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "success": false, "error": "Validation failed", "details": details })),
            )
                .into_response(),
            ApiError::Rejected { status, message } => {
                (status, Json(json!({ "success": false, "error": message }))).into_response()
            }
            ApiError::RateLimited { retry_after_secs } => (
                StatusCode::TOO_MANY_REQUESTS,
                Json(json!({
                    "success": false,
                    "error": "Too many requests. Please try again later.",
                    "retryAfter": retry_after_secs,
                })),
            )
                .into_response(),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "success": false, "error": "Unauthorized" })),
            )
                .into_response(),
            ApiError::Calculation(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "success": false, "error": e.to_string() })),
            )
                .into_response(),
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": "Internal server error" })),
            )
                .into_response(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<LeadError> for ApiError {
    fn from(e: LeadError) -> Self {
        match e {
            LeadError::Validation(details) => ApiError::Validation(details),
            // Logged where it happened; the client only learns it failed.
            LeadError::Storage(_) => ApiError::Internal,
        }
    }
}

impl From<CalcError> for ApiError {
    fn from(e: CalcError) -> Self {
        ApiError::Calculation(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validation_lists_details() {
        let response = ApiError::Validation(vec![FieldError::new("email", "Invalid email address")]).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["details"][0]["field"], "email");
    }

    #[tokio::test]
    async fn test_internal_hides_cause() {
        let response = ApiError::Internal.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"], "Internal server error");
    }

    #[tokio::test]
    async fn test_rate_limited_reports_retry() {
        let response = ApiError::RateLimited { retry_after_secs: 42 }.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body_json(response).await["retryAfter"], 42);
    }
}
