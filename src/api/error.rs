//! Unified API error handling
//!
//! Every endpoint answers failures with the same JSON body.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::service::{CheckerError, QualityLogError};

/// Standard error response format
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error type/code
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Unique request ID for tracing
    pub request_id: String,
}

/// Unified API error type
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ApiError {
    /// Bad request / validation error (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Knowledge graph unreachable (503)
    #[error("Knowledge graph unavailable: {0}")]
    GraphUnavailable(String),

    /// Verification pass exceeded its deadline (504)
    #[error("{0}")]
    Timeout(String),

    /// Quality log could not be read (500)
    #[error("Quality log error: {0}")]
    QualityLog(String),
}

impl ApiError {
    fn error_type(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::GraphUnavailable(_) => "graph_unavailable",
            ApiError::Timeout(_) => "verification_timeout",
            ApiError::QualityLog(_) => "quality_log_error",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::GraphUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::QualityLog(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let error_type = self.error_type();

        tracing::error!(
            error_type = error_type,
            status = status.as_u16(),
            message = %self,
            "API error"
        );

        HttpResponse::build(status).json(ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
            request_id: Uuid::new_v4().to_string(),
        })
    }
}

impl From<CheckerError> for ApiError {
    fn from(err: CheckerError) -> Self {
        match err {
            CheckerError::DataSourceUnavailable(msg) => ApiError::GraphUnavailable(msg),
            CheckerError::Timeout(_) => ApiError::Timeout(err.to_string()),
        }
    }
}

impl From<QualityLogError> for ApiError {
    fn from(err: QualityLogError) -> Self {
        ApiError::QualityLog(err.to_string())
    }
}
