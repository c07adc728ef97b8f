//! Error handling

use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::json;

use crate::inference::InferenceError;
use crate::models::FieldError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Request body did not match the sample schema
    #[error("request validation failed ({} errors)", .0.len())]
    Validation(Vec<FieldError>),

    // Scaling or prediction failed
    #[error("An error occurred: {0}")]
    Inference(#[from] InferenceError),

    // Index page or other file could not be read
    #[error("{0}")]
    Asset(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Validation(errors) => {
                tracing::warn!("Rejected request: {:?}", errors);
                (StatusCode::UNPROCESSABLE_ENTITY, json!({ "detail": errors }))
            }
            AppError::Inference(err) => {
                tracing::error!("Inference error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "detail": self.to_string() }))
            }
            AppError::Asset(msg) => {
                tracing::error!("Asset error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "detail": msg }))
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<Vec<FieldError>> for AppError {
    fn from(errors: Vec<FieldError>) -> Self {
        AppError::Validation(errors)
    }
}
