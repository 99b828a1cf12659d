//! Unified API error handling
//!
//! Provides consistent error responses across all endpoints and maps the
//! analysis failure taxonomy onto HTTP statuses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Fallback message shown when no safer human-readable message exists.
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to analyze project. Please try again.";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// No `{...}` span could be located in the model's raw text.
    #[error("Extraction failed: {0}")]
    Extraction(String),

    /// The extracted span could not be turned into a valid estimate.
    #[error("Normalization failed: {0}")]
    Normalization(String),

    /// The generative model service call itself failed.
    #[error("Upstream service error")]
    Upstream(#[source] anyhow::Error),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Extraction(_) | Self::Normalization(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Extraction(_) => "EXTRACTION_FAILED",
            Self::Normalization(_) => "NORMALIZATION_FAILED",
            Self::Upstream(_) => "UPSTREAM_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Message safe to show to the user. Upstream and internal details are
    /// logged but never leaked.
    pub fn public_message(&self) -> String {
        match self {
            Self::BadRequest(msg) | Self::Extraction(msg) | Self::Normalization(msg) => {
                msg.clone()
            }
            Self::Upstream(_) | Self::Internal(_) => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Upstream(e) => {
                tracing::error!(error = ?e, "Upstream model service error");
            }
            Self::Internal(e) => {
                tracing::error!(error = ?e, "Internal server error");
            }
            _ => {
                tracing::warn!(error = %self, "API error");
            }
        }

        let status = self.status_code();
        let body = ErrorResponse {
            code: self.error_code().to_string(),
            message: self.public_message(),
        };

        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_surface_their_message() {
        let err = ApiError::Extraction("No JSON object found in model response".into());
        assert_eq!(
            err.public_message(),
            "No JSON object found in model response"
        );
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn upstream_errors_fall_back_to_generic_message() {
        let err = ApiError::Upstream(anyhow::anyhow!("connection refused to 10.0.0.1:443"));
        assert_eq!(err.public_message(), GENERIC_FAILURE_MESSAGE);
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }
}
