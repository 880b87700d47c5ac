//! Serve command handler.

use std::path::PathBuf;

use anyhow::Result;
use chatkeep_axum::{CorsConfig, ServerConfig, start_server};
use chatkeep_identity::IdentityClientConfig;

/// Build the server configuration from command-line values.
pub fn server_config(
    port: u16,
    database: PathBuf,
    identity_url: String,
    identity_api_key: String,
    cors_origins: Vec<String>,
) -> ServerConfig {
    let identity = IdentityClientConfig::new(identity_url, identity_api_key);
    let config = ServerConfig::new(database, identity).with_port(port);

    let origins: Vec<String> = cors_origins
        .into_iter()
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty())
        .collect();
    if origins.is_empty() {
        config
    } else {
        config.with_allowed_origins(origins)
    }
}

/// Execute the serve command. Runs until the server stops.
pub async fn execute(config: ServerConfig) -> Result<()> {
    if matches!(config.cors, CorsConfig::AllowAll) {
        tracing::warn!("CORS allows all origins; pass --cors-origins in production");
    }
    start_server(config).await
}
