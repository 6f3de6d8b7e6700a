use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Internal Server Error: {0}")]
    Internal(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    /// A booking that could not be completed, carrying every collected error.
    #[error("Booking failed: {}", .0.join("; "))]
    BookingFailed(Vec<String>),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ExternalService(_) | AppError::BookingFailed(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn body(&self) -> Value {
        match self {
            AppError::Internal(msg)
            | AppError::ValidationError(msg)
            | AppError::ExternalService(msg) => json!({ "error": msg }),
            AppError::BookingFailed(errors) => json!({
                "error": "Failed to book appointment",
                "errors": errors,
            }),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        tracing::error!("Error: {}: {}", status, self);

        (status, Json(self.body())).into_response()
    }
}
