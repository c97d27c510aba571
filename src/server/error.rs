//! JSON error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::analytics::PixelLoadError;
use crate::pipeline::PipelineError;
use crate::store::StoreError;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorBody {
    fn new(error: impl Into<String>, details: Option<String>) -> Self {
        Self {
            error: error.into(),
            details,
        }
    }
}

impl PipelineError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            PipelineError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            PipelineError::Conflict(_) => StatusCode::CONFLICT,
            PipelineError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            PipelineError::Storage { .. }
            | PipelineError::NotConfigured { .. }
            | PipelineError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            PipelineError::InvalidArgument(msg) => ErrorBody::new(msg.clone(), None),
            PipelineError::Conflict(msg) => {
                ErrorBody::new("Onboarding video generation was superseded", Some(msg.clone()))
            }
            other => {
                log::error!("server: request failed: {other}");
                ErrorBody::new("Failed to generate onboarding video", Some(other.to_string()))
            }
        };
        (status, Json(body)).into_response()
    }
}

/// Errors from the read-side and analytics handlers.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Pipeline(PipelineError),
    Analytics(PixelLoadError),
}

impl From<PipelineError> for ApiError {
    fn from(e: PipelineError) -> Self {
        ApiError::Pipeline(e)
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        ApiError::Pipeline(e.into())
    }
}

impl From<PixelLoadError> for ApiError {
    fn from(e: PixelLoadError) -> Self {
        ApiError::Analytics(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(ErrorBody::new(msg, None))).into_response()
            }
            ApiError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, Json(ErrorBody::new(msg, None))).into_response()
            }
            ApiError::Pipeline(e) => e.into_response(),
            ApiError::Analytics(e) => {
                log::warn!("server: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody::new("Analytics configuration unavailable", Some(e.to_string()))),
                )
                    .into_response()
            }
        }
    }
}
