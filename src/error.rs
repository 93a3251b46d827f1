//! Error types for the lookup service
//!
//! Provides the closed error taxonomy shared by the orchestrator and the HTTP
//! adapter, using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

/// Boxed cause carried by upstream and internal failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

// == Error Kind ==
/// Coarse classification callers switch on instead of matching messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    Upstream,
    Internal,
}

// == Describe Error Enum ==
/// Unified error type for short description lookups.
#[derive(Error, Debug)]
pub enum DescribeError {
    /// Caller supplied empty or malformed input
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Upstream has no such page, or the page has no short description
    #[error("not found: {0}")]
    NotFound(String),

    /// Upstream failed in a way not attributable to this service
    #[error("upstream error: {message}")]
    Upstream {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// This service built a request the upstream rejected
    #[error("internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<BoxError>,
    },
}

impl DescribeError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream {
            message: message.into(),
            source: None,
        }
    }

    pub fn upstream_with(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Upstream {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    pub fn internal_with(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    // == Kind ==
    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DescribeError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            DescribeError::NotFound(_) => ErrorKind::NotFound,
            DescribeError::Upstream { .. } => ErrorKind::Upstream,
            DescribeError::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// HTTP status the adapter answers with for this error.
    pub fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Upstream => StatusCode::BAD_GATEWAY,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for DescribeError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let mut message = self.to_string();
        if let Some(source) = std::error::Error::source(&self) {
            message = format!("{}: {}", message, source);
        }

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the lookup service.
pub type Result<T> = std::result::Result<T, DescribeError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_kind_matches_variant() {
        assert_eq!(
            DescribeError::invalid_argument("x").kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(DescribeError::not_found("x").kind(), ErrorKind::NotFound);
        assert_eq!(DescribeError::upstream("x").kind(), ErrorKind::Upstream);
        assert_eq!(DescribeError::internal("x").kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(
            DescribeError::invalid_argument("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            DescribeError::not_found("x").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            DescribeError::upstream("x").status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            DescribeError::internal("x").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_source_is_preserved() {
        let err = DescribeError::upstream_with(
            "failed to read body",
            io::Error::new(io::ErrorKind::ConnectionReset, "reset"),
        );
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "reset");
        assert_eq!(err.to_string(), "upstream error: failed to read body");
    }

    #[test]
    fn test_into_response_status() {
        let response = DescribeError::not_found("short description").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
