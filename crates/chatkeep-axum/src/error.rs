//! Axum-specific error types and mappings.
//!
//! Maps `ConversationError` to HTTP status codes and a JSON body the
//! frontend can branch on.

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use chatkeep_core::{ConversationError, ErrorKind};
use serde::Serialize;
use thiserror::Error;

/// Axum-specific error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Missing or invalid bearer token.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request (invalid input).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Identity provider or storage down.
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl HttpError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::BadRequest(_) => ErrorKind::InvalidInput,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::ServiceUnavailable(_) => ErrorKind::Upstream,
        }
    }

    fn reason(&self) -> &str {
        match self {
            Self::Unauthorized(msg)
            | Self::BadRequest(msg)
            | Self::NotFound(msg)
            | Self::ServiceUnavailable(msg) => msg,
        }
    }
}

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody<'a> {
    success: bool,
    error: &'a str,
    kind: ErrorKind,
    status: u16,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            Self::Unauthorized(reason) => {
                tracing::warn!(reason = %reason, "Unauthorized API request");
            }
            Self::ServiceUnavailable(reason) => {
                tracing::error!(reason = %reason, "Upstream failure");
            }
            Self::BadRequest(_) | Self::NotFound(_) => {}
        }

        let body = ErrorBody {
            success: false,
            error: self.reason(),
            kind: self.kind(),
            status: status.as_u16(),
        };
        let mut response = (status, axum::Json(body)).into_response();

        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                header::HeaderValue::from_static("Bearer"),
            );
        }
        response
    }
}

impl From<ConversationError> for HttpError {
    fn from(err: ConversationError) -> Self {
        match err {
            ConversationError::Unauthorized(msg) => Self::Unauthorized(msg),
            ConversationError::InvalidInput(msg) => Self::BadRequest(msg),
            ConversationError::NotFound(msg) => Self::NotFound(msg),
            ConversationError::Upstream(msg) => Self::ServiceUnavailable(msg),
        }
    }
}
