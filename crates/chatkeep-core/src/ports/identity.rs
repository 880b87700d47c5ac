//! Identity provider port definition.
//!
//! The core never authenticates anybody itself. It hands the caller's bearer
//! token to an [`IdentityProvider`] and gets back a stable [`Identity`].

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::Identity;

/// Errors returned while resolving a bearer token.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityError {
    /// No token was presented, or it was blank.
    #[error("Token missing")]
    MissingToken,

    /// The provider does not know the token (expired, revoked, malformed).
    #[error("Invalid token")]
    InvalidToken,

    /// The provider could not be reached or answered with an error.
    #[error("Identity provider unavailable: {0}")]
    Unavailable(String),
}

/// Port for the external identity provider.
///
/// Implementations make exactly one call per resolution. No caching and no
/// retries: expiry and revocation are the provider's business.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve a non-blank bearer token to the identity it was issued for.
    async fn resolve(&self, token: &str) -> Result<Identity, IdentityError>;
}
