//! API error types.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use vscore_engine::ScoreError;

use crate::config::is_production_environment;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    #[error("Only POST allowed")]
    MethodNotAllowed,

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Scoring error: {0}")]
    Scoring(#[from] ScoreError),
}

impl ApiError {
    pub fn invalid_json(msg: impl Into<String>) -> Self {
        Self::InvalidJson(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidJson(_) => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal(_) | ApiError::Scoring(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable, client-facing error label.
    fn label(&self) -> &'static str {
        match self {
            ApiError::InvalidJson(_) => "Invalid JSON",
            ApiError::MethodNotAllowed => "Only POST allowed",
            ApiError::RateLimited => "Rate limit exceeded",
            ApiError::Internal(_) | ApiError::Scoring(_) => "Server error",
        }
    }

    fn details(&self) -> Option<String> {
        match self {
            ApiError::InvalidJson(msg) => Some(msg.clone()),
            // Don't expose internal error details in production
            ApiError::Internal(_) | ApiError::Scoring(_) if is_production() => None,
            ApiError::Internal(msg) => Some(msg.clone()),
            ApiError::Scoring(e) => Some(e.to_string()),
            ApiError::MethodNotAllowed | ApiError::RateLimited => None,
        }
    }
}

fn is_production() -> bool {
    std::env::var("ENVIRONMENT").is_ok_and(|env| is_production_environment(&env))
}

#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.label(),
            details: self.details(),
        };

        let mut response = (status, Json(body)).into_response();
        if matches!(self, ApiError::RateLimited) {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, header::HeaderValue::from_static("1"));
        }
        response
    }
}
