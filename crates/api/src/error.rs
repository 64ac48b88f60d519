use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use infra::store::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("event is not open for booking")]
    NotBookable,

    #[error("event is sold out")]
    SoldOut,

    #[error("booking is already cancelled")]
    AlreadyCancelled,

    #[error("{0}")]
    Validation(String),

    #[error("storage error")]
    Store(#[from] StoreError),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::NotBookable | AppError::SoldOut | AppError::AlreadyCancelled => {
                StatusCode::CONFLICT
            }
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Store(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::NotBookable => "NOT_BOOKABLE",
            AppError::SoldOut => "SOLD_OUT",
            AppError::AlreadyCancelled => "ALREADY_CANCELLED",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Store(_) => "STORAGE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        }
        // Storage internals stay out of the response body.
        let message = match &self {
            AppError::Store(_) => "a storage error occurred".to_string(),
            other => other.to_string(),
        };
        let body = ErrorBody {
            error: message,
            code: self.code(),
        };
        (status, Json(body)).into_response()
    }
}
