use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::buckets::StoreError;
use crate::forecast::CompareError;

#[derive(Debug)]
pub enum ApiError {
    Validation(String),
    Store(StoreError),
    Compare(CompareError),
    Internal(String),
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        ApiError::Store(e)
    }
}

impl From<CompareError> for ApiError {
    fn from(e: CompareError) -> Self {
        ApiError::Compare(e)
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(e: tokio::task::JoinError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl ApiError {
    fn status_and_body(&self) -> (StatusCode, ErrorResponse) {
        match self {
            ApiError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::with_message("validation_failed", msg),
            ),
            ApiError::Store(e @ StoreError::AlreadyPopulated(_)) => (
                StatusCode::CONFLICT,
                ErrorResponse::with_message("hour_already_loaded", &e.to_string()),
            ),
            ApiError::Store(e) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::with_message("invalid_hour", &e.to_string()),
            ),
            ApiError::Compare(e) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::with_message("batch_too_large", &e.to_string()),
            ),
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::with_message("internal_error", msg),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: &str) -> Self {
        ErrorResponse {
            error: error.to_string(),
            message: None,
        }
    }

    pub fn with_message(error: &str, message: &str) -> Self {
        ErrorResponse {
            error: error.to_string(),
            message: Some(message.to_string()),
        }
    }
}
