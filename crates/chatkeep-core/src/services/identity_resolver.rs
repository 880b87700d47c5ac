//! Bearer token resolution in front of the identity provider port.

use std::sync::Arc;

use crate::domain::Identity;
use crate::ports::{IdentityError, IdentityProvider};

/// Turns a raw, possibly absent bearer token into a verified [`Identity`].
///
/// Blank tokens are rejected locally without a provider round trip.
#[derive(Clone)]
pub struct IdentityResolver {
    provider: Arc<dyn IdentityProvider>,
}

impl IdentityResolver {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self { provider }
    }

    /// Resolve `token` to the identity it belongs to.
    pub async fn resolve(&self, token: Option<&str>) -> Result<Identity, IdentityError> {
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(IdentityError::MissingToken)?;

        self.provider.resolve(token).await
    }
}
