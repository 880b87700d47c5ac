//! Identity client: one `GET auth/v1/user` per token.

use chatkeep_core::Identity;
use url::Url;

use crate::config::IdentityClientConfig;
use crate::error::{IdentityClientError, IdentityResult};
use crate::http::{HttpBackend, ReqwestBackend};
use crate::models::ProviderUser;

/// Path of the "who am I" endpoint, relative to the provider root.
const USER_ENDPOINT: &str = "auth/v1/user";

/// Identity provider client using the reqwest HTTP backend.
pub type HttpIdentityProvider = IdentityClient<ReqwestBackend>;

/// Client for a GoTrue-compatible identity provider.
///
/// Generic over the HTTP backend so tests can run without a network. Use
/// [`HttpIdentityProvider`] in production code.
pub struct IdentityClient<B: HttpBackend> {
    backend: B,
    user_url: Url,
}

impl HttpIdentityProvider {
    /// Create a client for the provider described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not absolute or the HTTP client
    /// cannot be built.
    pub fn new(config: &IdentityClientConfig) -> Result<Self, IdentityClientError> {
        let user_url = user_endpoint(&config.base_url)?;
        let backend = ReqwestBackend::new(config)?;
        Ok(Self { backend, user_url })
    }
}

impl<B: HttpBackend> IdentityClient<B> {
    /// Create a client with a custom backend.
    #[cfg(test)]
    pub(crate) fn with_backend(base_url: &str, backend: B) -> Self {
        Self {
            backend,
            user_url: user_endpoint(base_url).unwrap(),
        }
    }

    /// Ask the provider who `token` belongs to.
    pub(crate) async fn lookup(&self, token: &str) -> IdentityResult<Identity> {
        if token.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(IdentityClientError::MalformedToken);
        }

        let response = self.backend.get_json(&self.user_url, token).await?;

        match response.status {
            200..=299 => {}
            400 | 401 | 403 | 404 => {
                return Err(IdentityClientError::Rejected {
                    status: response.status,
                });
            }
            status => {
                return Err(IdentityClientError::ApiRequestFailed {
                    status,
                    url: self.user_url.to_string(),
                });
            }
        }

        ProviderUser::from_body(response.body)
            .id
            .and_then(Identity::new)
            .ok_or(IdentityClientError::MissingUserId)
    }
}

fn user_endpoint(base_url: &str) -> Result<Url, url::ParseError> {
    let base = base_url.trim().trim_end_matches('/');
    Url::parse(&format!("{base}/{USER_ENDPOINT}"))
}
