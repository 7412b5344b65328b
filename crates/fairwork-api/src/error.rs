//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps engine and arbiter errors to HTTP status codes and returns JSON
//! error bodies with a machine-readable code. Internal and upstream error
//! details are never exposed to clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use fairwork_arbiter::ArbiterError;
use fairwork_core::ValidationError;
use fairwork_engine::EngineError;

/// Structured JSON error response body.
///
/// All error responses use this format for consistency across the API
/// surface.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "VALIDATION_ERROR").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Request validation failed (422). The client sent syntactically valid
    /// HTTP but semantically invalid content.
    #[error("validation error: {0}")]
    Validation(String),

    /// Authorization failure, acting address lacks the right (403).
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Conflict with current resource state (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Internal server error (500). Message is logged but not returned.
    #[error("internal error: {0}")]
    Internal(String),

    /// Arbitration providers exhausted or unreachable (502). Per-provider
    /// reasons are logged but not returned.
    #[error("upstream arbitration error: {0}")]
    UpstreamError(String),

    /// Service dependency not configured (503).
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AppError {
    /// The HTTP status code and machine-readable code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            Self::UpstreamError(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            Self::ServiceUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Never expose internal/upstream error messages to clients.
        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            Self::UpstreamError(_) => "Arbitration is temporarily unavailable".to_string(),
            other => other.to_string(),
        };

        match &self {
            Self::Internal(_) => tracing::error!(error = %self, "internal server error"),
            Self::UpstreamError(_) => tracing::error!(error = %self, "arbitration upstream error"),
            Self::ServiceUnavailable(_) => tracing::warn!(error = %self, "service unavailable"),
            _ => {}
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        match &err {
            EngineError::Validation(_) | EngineError::InvalidInput(_) => {
                Self::Validation(err.to_string())
            }
            EngineError::IllegalTransition { .. }
            | EngineError::DisputeAlreadyOpen(_)
            | EngineError::JurorsAlreadyAssigned(_)
            | EngineError::DuplicateVote { .. }
            | EngineError::DisputeAlreadyResolved(_) => Self::Conflict(err.to_string()),
            EngineError::Unauthorized { .. } | EngineError::NotAJuror { .. } => {
                Self::Forbidden(err.to_string())
            }
            EngineError::JobNotFound(_) | EngineError::DisputeNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            EngineError::JurorSelection(_) => Self::ServiceUnavailable(err.to_string()),
        }
    }
}

impl From<ArbiterError> for AppError {
    fn from(err: ArbiterError) -> Self {
        match &err {
            ArbiterError::Unavailable { attempts } => {
                let reasons: Vec<String> = attempts.iter().map(|a| a.to_string()).collect();
                Self::UpstreamError(reasons.join("; "))
            }
            ArbiterError::NotConfigured { .. } => Self::ServiceUnavailable(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fairwork_core::{Address, DisputeId, JobId};
    use http_body_util::BodyExt;

    #[test]
    fn engine_errors_map_to_expected_statuses() {
        let cases: Vec<(EngineError, StatusCode)> = vec![
            (
                EngineError::InvalidInput("bad".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                EngineError::IllegalTransition {
                    action: "approve job",
                    current: "OPEN",
                    required: "SUBMITTED",
                },
                StatusCode::CONFLICT,
            ),
            (
                EngineError::Unauthorized {
                    action: "approve job",
                    actor: Address::new("0xabcdef0123456789abcdef0123456789abcdef01").unwrap(),
                },
                StatusCode::FORBIDDEN,
            ),
            (EngineError::JobNotFound(JobId::new()), StatusCode::NOT_FOUND),
            (
                EngineError::DisputeAlreadyResolved(DisputeId::new()),
                StatusCode::CONFLICT,
            ),
            (
                EngineError::JurorSelection("pool exhausted".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];
        for (err, expected) in cases {
            let (status, _) = AppError::from(err).status_and_code();
            assert_eq!(status, expected);
        }
    }

    #[test]
    fn exhausted_arbiter_is_bad_gateway() {
        let err = ArbiterError::Unavailable {
            attempts: vec![fairwork_arbiter::ProviderFailure {
                provider: "primary".into(),
                reason: "HTTP 503".into(),
            }],
        };
        let (status, code) = AppError::from(err).status_and_code();
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(code, "UPSTREAM_ERROR");
    }

    async fn response_parts(err: AppError) -> (StatusCode, ErrorBody) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        (status, body)
    }

    #[tokio::test]
    async fn upstream_details_do_not_leak() {
        let (status, body) = response_parts(AppError::UpstreamError(
            "primary: HTTP 500 secret-internal-url".into(),
        ))
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(!body.error.message.contains("secret-internal-url"));
        assert_eq!(body.error.message, "Arbitration is temporarily unavailable");
    }

    #[tokio::test]
    async fn internal_details_do_not_leak() {
        let (status, body) =
            response_parts(AppError::Internal("lock poisoned in marketplace".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error.message, "An internal error occurred");
    }

    #[tokio::test]
    async fn conflict_carries_transition_context() {
        let err = AppError::from(EngineError::IllegalTransition {
            action: "cast vote",
            current: "RAISED",
            required: "VOTING",
        });
        let (status, body) = response_parts(err).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body.error.message.contains("RAISED"));
        assert!(body.error.message.contains("VOTING"));
    }
}
