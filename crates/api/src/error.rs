use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use refscope_core::error::CoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce the service's uniform
/// `{ "ok": false, "error": ..., "detail": ... }` envelope, so no endpoint
/// ever surfaces a raw transport-level failure.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `refscope-core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A required query parameter was absent or empty.
    #[error("Missing required query param: {0}")]
    MissingParam(&'static str),

    /// A malformed parameter that has no safe default to clamp to.
    #[error("{message}")]
    BadRequest {
        message: String,
        detail: Option<String>,
    },

    /// The requested entity does not exist (asset, graph, or job).
    #[error("{message}")]
    NotFound {
        message: String,
        detail: Option<String>,
    },

    /// The job exists but has not reached `Done`. Distinct from both success
    /// and hard failure so polling clients can tell "keep waiting" from
    /// "gone"; carries the current status string.
    #[error("Job not ready")]
    JobNotReady { status: String },

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// 404 with contextual detail (usually the path or id that missed).
    pub fn not_found(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            detail: Some(detail.into()),
        }
    }

    /// 400 with contextual detail (usually the offending raw value).
    pub fn bad_request(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
            detail: Some(detail.into()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, detail) = match self {
            AppError::Core(core) => match core {
                CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, msg, None),
                other => {
                    tracing::error!(error = %other, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "An internal error occurred".to_string(),
                        None,
                    )
                }
            },

            AppError::MissingParam(name) => (
                StatusCode::BAD_REQUEST,
                format!("Missing required query param: {name}"),
                None,
            ),
            AppError::BadRequest { message, detail } => (StatusCode::BAD_REQUEST, message, detail),
            AppError::NotFound { message, detail } => (StatusCode::NOT_FOUND, message, detail),
            AppError::JobNotReady { status } => (
                StatusCode::ACCEPTED,
                "Job not ready".to_string(),
                Some(status),
            ),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let mut body = json!({
            "ok": false,
            "error": message,
        });
        if let Some(detail) = detail {
            body["detail"] = json!(detail);
        }

        (status, axum::Json(body)).into_response()
    }
}
