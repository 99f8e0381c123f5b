//! HTTP mapping for `SalesError`.
//!
//! - load/validation failures: 400 `{detail, code}`
//! - no dataset yet: 200 `{error: "No data uploaded yet"}`
//! - internal: 500 with a generic message (details only in logs)

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use salespulse_core::error::SalesError;

pub const NO_DATA_MESSAGE: &str = "No data uploaded yet";

#[derive(Debug)]
pub struct ApiError(pub SalesError);

impl From<SalesError> for ApiError {
    fn from(err: SalesError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.0.client_code().as_str();
        match self.0 {
            SalesError::NoData => (StatusCode::OK, Json(json!({ "error": NO_DATA_MESSAGE }))).into_response(),
            SalesError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "detail": "internal server error", "code": code })),
                )
                    .into_response()
            }
            other => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "detail": other.to_string(), "code": code })),
            )
                .into_response(),
        }
    }
}
