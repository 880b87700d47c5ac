//! Internal error types for identity lookups.
//!
//! These errors stay inside `chatkeep-identity` except at construction
//! time; lookups are mapped to the core `IdentityError` at the port
//! boundary.

use thiserror::Error;

/// Result type alias for identity client operations.
pub type IdentityResult<T> = Result<T, IdentityClientError>;

/// Errors raised by the identity client.
#[derive(Debug, Error)]
pub enum IdentityClientError {
    /// The provider refused the token.
    #[error("Identity provider rejected the token with status {status}")]
    Rejected {
        /// HTTP status code
        status: u16,
    },

    /// The token contains characters that cannot appear in a bearer token.
    #[error("Malformed bearer token")]
    MalformedToken,

    /// The provider accepted the request but returned no user id.
    #[error("Identity provider response carries no user id")]
    MissingUserId,

    /// The provider answered with an unexpected status.
    #[error("Identity provider request failed with status {status}: {url}")]
    ApiRequestFailed {
        /// HTTP status code
        status: u16,
        /// The URL that was requested
        url: String,
    },

    /// The provider did not answer within the configured timeout.
    #[error("Identity provider timed out: {url}")]
    Timeout {
        /// The URL that was requested
        url: String,
    },

    /// Network or HTTP client error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl IdentityClientError {
    /// Whether the error says something about the token rather than about
    /// the provider.
    pub(crate) const fn is_token_rejection(&self) -> bool {
        matches!(
            self,
            Self::Rejected { .. } | Self::MalformedToken | Self::MissingUserId
        )
    }

    /// Short description without the provider URL or client internals.
    pub(crate) fn summary(&self) -> String {
        match self {
            Self::Rejected { status } | Self::ApiRequestFailed { status, .. } => {
                format!("status {status}")
            }
            Self::MalformedToken => "malformed token".to_string(),
            Self::MissingUserId => "missing user id".to_string(),
            Self::Timeout { .. } => "timeout".to_string(),
            Self::Network(_) => "network error".to_string(),
            Self::InvalidUrl(_) => "invalid provider url".to_string(),
        }
    }
}
