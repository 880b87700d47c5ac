//! Port trait implementation for `IdentityClient`.
//!
//! Implements the core-owned `IdentityProvider` trait and maps internal
//! errors to `IdentityError`.

use async_trait::async_trait;
use chatkeep_core::ports::{IdentityError, IdentityProvider};
use chatkeep_core::Identity;

use crate::client::IdentityClient;
use crate::error::IdentityClientError;
use crate::http::HttpBackend;

/// Convert internal `IdentityClientError` to core `IdentityError`.
fn map_error(err: IdentityClientError) -> IdentityError {
    if err.is_token_rejection() {
        tracing::debug!(error = %err, "Token rejected");
        IdentityError::InvalidToken
    } else {
        tracing::warn!(error = %err, "Identity provider unavailable");
        IdentityError::Unavailable(err.summary())
    }
}

#[async_trait]
impl<B: HttpBackend> IdentityProvider for IdentityClient<B> {
    async fn resolve(&self, token: &str) -> Result<Identity, IdentityError> {
        self.lookup(token).await.map_err(map_error)
    }
}
