//! Axum server bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the Axum web adapter. All concrete implementations are instantiated here.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use chatkeep_core::ports::IdentityProvider;
use chatkeep_core::services::ConversationService;
use chatkeep_db::{CoreFactory, setup_database};
use chatkeep_identity::{HttpIdentityProvider, IdentityClientConfig};

/// Port the server listens on unless configured otherwise.
pub const DEFAULT_PORT: u16 = 8080;

/// CORS configuration for the web server.
#[derive(Debug, Clone, Default)]
pub enum CorsConfig {
    /// Allow all origins (development mode).
    #[default]
    AllowAll,
    /// Allow specific origins (production mode).
    AllowOrigins(Vec<String>),
}

/// Server configuration for the Axum adapter.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port for the HTTP server.
    pub port: u16,
    /// `SQLite` database file, created if missing.
    pub database_path: PathBuf,
    /// Identity provider the bearer tokens are checked against.
    pub identity: IdentityClientConfig,
    /// CORS configuration.
    pub cors: CorsConfig,
}

impl ServerConfig {
    /// Create config with the default port and permissive CORS.
    pub fn new(database_path: impl Into<PathBuf>, identity: IdentityClientConfig) -> Self {
        Self {
            port: DEFAULT_PORT,
            database_path: database_path.into(),
            identity,
            cors: CorsConfig::default(),
        }
    }

    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set CORS to allow specific origins.
    #[must_use]
    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.cors = CorsConfig::AllowOrigins(origins);
        self
    }
}

/// Application context for the Axum adapter.
pub struct AxumContext {
    /// Authenticated chat operations.
    pub conversations: Arc<ConversationService>,
}

impl AxumContext {
    pub fn new(conversations: ConversationService) -> Self {
        Self {
            conversations: Arc::new(conversations),
        }
    }
}

/// Bootstrap the Axum server with all services.
pub async fn bootstrap(config: &ServerConfig) -> Result<AxumContext> {
    tracing::info!(
        database_path = %config.database_path.display(),
        identity_url = %config.identity.base_url(),
        "Axum bootstrap resolved configuration"
    );

    // 1. Create database pool with full schema setup
    let pool = setup_database(&config.database_path).await?;

    // 2. Identity provider client
    let identity: Arc<dyn IdentityProvider> =
        Arc::new(HttpIdentityProvider::new(&config.identity)?);

    // 3. Assemble the conversation service
    let conversations = CoreFactory::build_conversation_service(pool, identity);

    Ok(AxumContext::new(conversations))
}

/// Start the web server on the configured port.
pub async fn start_server(config: ServerConfig) -> Result<()> {
    use tokio::net::TcpListener;
    use tracing::info;

    let ctx = bootstrap(&config).await?;
    let app = crate::routes::create_router(ctx, &config.cors);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;

    info!("chatkeep API listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
