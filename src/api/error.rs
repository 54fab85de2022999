use crate::model::PipelineError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Only POST allowed")]
    MethodNotAllowed,
    #[error("Query is required")]
    Validation,
    #[error("No matching localities found in dataset")]
    NotFound,
    #[error("Dataset does not have required columns")]
    Configuration(#[from] PipelineError),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Validation => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Configuration(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Configuration(cause) => error!("❌ Dataset misconfigured: {}", cause),
            ApiError::Internal(msg) => error!("❌ Request failed: {}", msg),
            _ => {}
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
