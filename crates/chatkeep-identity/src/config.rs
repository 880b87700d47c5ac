//! Public configuration for the identity client.

use std::time::Duration;

/// Configuration for the identity client.
///
/// The provider URL and the project's anon key are required; everything
/// else has a default.
///
/// # Example
///
/// ```
/// use chatkeep_identity::IdentityClientConfig;
/// use std::time::Duration;
///
/// let config = IdentityClientConfig::new("https://project.supabase.co", "anon-key")
///     .with_timeout(Duration::from_secs(5))
///     .with_user_agent("my-app/1.0");
/// ```
#[derive(Clone)]
pub struct IdentityClientConfig {
    /// Provider root, without the `auth/v1` suffix
    pub(crate) base_url: String,
    /// Sent as the `apikey` header on every request
    pub(crate) api_key: String,
    /// User agent string for HTTP requests
    pub(crate) user_agent: String,
    /// Request timeout
    pub(crate) timeout: Duration,
}

impl IdentityClientConfig {
    /// Create a configuration for the provider at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            user_agent: concat!("chatkeep-identity/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Set the user agent string for HTTP requests.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the request timeout.
    ///
    /// Defaults to 10 seconds.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

// Keeps the api key out of logs.
impl std::fmt::Debug for IdentityClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("user_agent", &self.user_agent)
            .field("timeout", &self.timeout)
            .finish()
    }
}
