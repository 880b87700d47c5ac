//! Caller-facing error type for conversation operations.
//!
//! Adapters map [`ErrorKind`] to their own vocabulary (HTTP status codes,
//! CLI exit codes). The reason string is safe to show to the caller:
//! upstream details are logged here and replaced by a fixed reason.

use serde::Serialize;
use thiserror::Error;

use crate::ports::{ChatHistoryError, IdentityError};

/// Coarse classification of a failed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    /// Missing or invalid bearer token.
    Unauthorized,
    /// Malformed identifier, blank required field or invalid sender.
    InvalidInput,
    /// The chat does not exist from the caller's point of view.
    NotFound,
    /// Identity provider or storage failed. Never retried.
    Upstream,
}

impl ErrorKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "Unauthorized",
            Self::InvalidInput => "InvalidInput",
            Self::NotFound => "NotFound",
            Self::Upstream => "Upstream",
        }
    }
}

/// Error returned by every [`ConversationService`](crate::services::ConversationService)
/// operation.
#[derive(Debug, Error)]
pub enum ConversationError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Upstream(String),
}

impl ConversationError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Upstream(_) => ErrorKind::Upstream,
        }
    }

    /// Human-readable reason.
    #[must_use]
    pub fn reason(&self) -> &str {
        match self {
            Self::Unauthorized(msg)
            | Self::InvalidInput(msg)
            | Self::NotFound(msg)
            | Self::Upstream(msg) => msg,
        }
    }
}

impl From<IdentityError> for ConversationError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::MissingToken => Self::Unauthorized("token missing".to_string()),
            IdentityError::InvalidToken => Self::Unauthorized("invalid token".to_string()),
            IdentityError::Unavailable(detail) => {
                tracing::warn!(error = %detail, "Identity provider unavailable");
                Self::Upstream("identity provider unavailable".to_string())
            }
        }
    }
}

impl From<ChatHistoryError> for ConversationError {
    fn from(err: ChatHistoryError) -> Self {
        match err {
            ChatHistoryError::ChatNotFound(_) => {
                Self::NotFound("chat not found or not permitted".to_string())
            }
            ChatHistoryError::InvalidSender(_) => {
                Self::InvalidInput("invalid sender (only 'user' or 'bot')".to_string())
            }
            ChatHistoryError::EmptyContent => Self::InvalidInput("message missing".to_string()),
            ChatHistoryError::Database(detail) => {
                tracing::error!(error = %detail, "Storage failure");
                Self::Upstream("storage unavailable".to_string())
            }
        }
    }
}
