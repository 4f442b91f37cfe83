use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::store::StoreError;

/// Request-level failure taxonomy. Anything that is not one of the first
/// four buckets surfaces as a generic 500; the details stay in the server
/// log only.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Not authenticated")]
    Unauthorized,

    #[error("Access denied")]
    Forbidden,

    #[error("Not found")]
    NotFound,

    #[error("storage: {0}")]
    Store(#[from] StoreError),

    #[error("{0}")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(message) => (StatusCode::BAD_REQUEST, message.clone()),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::Forbidden => (StatusCode::FORBIDDEN, self.to_string()),
            AppError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::Store(inner) => {
                error!("storage failure: {inner}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred".to_string(),
                )
            }
            AppError::Internal(inner) => {
                error!("internal failure: {inner}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred".to_string(),
                )
            }
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}
