//! Internal response types for the identity provider.

use serde::Deserialize;

/// Narrow view of the provider's user object.
///
/// GoTrue returns email, metadata and more; only the id is read.
#[derive(Debug, Default, Deserialize)]
pub struct ProviderUser {
    #[serde(default)]
    pub id: Option<String>,
}

impl ProviderUser {
    /// Decode a response body. Anything that is not an object with a string
    /// `id` yields a user without an id.
    pub fn from_body(body: Option<serde_json::Value>) -> Self {
        body.and_then(|json| serde_json::from_value(json).ok())
            .unwrap_or_default()
    }
}
