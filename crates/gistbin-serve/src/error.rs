//! API error types and response formatting.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use gistbin_core::StoreError;

/// Errors that end a request before a handler can produce its own response.
///
/// Expected outcomes (validation failures, taken codes, missing gists) are
/// not errors here: handlers render them directly.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The gist store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Internal server error (rendering, serialization, etc.).
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            Self::Store(err) => {
                tracing::error!(error = %err, "store error");
                "The gist store is temporarily unavailable. Please try again later."
            }
            Self::Internal(err) => {
                tracing::error!(error = %err, "internal server error");
                "An internal error occurred."
            }
        };

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            [("content-type", "text/plain; charset=utf-8")],
            message,
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_store() {
        let err = ApiError::Store(StoreError::Unavailable("down".to_string()));
        assert_eq!(err.to_string(), "store error: store unavailable: down");
    }

    #[test]
    fn error_into_response_store() {
        let err = ApiError::Store(StoreError::Unavailable("down".to_string()));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn error_into_response_internal() {
        let err = ApiError::Internal(anyhow::anyhow!("boom"));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
