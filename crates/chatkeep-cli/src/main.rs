//! CLI entry point - the composition root.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use chatkeep_cli::paths::resolve_database_path;
use chatkeep_cli::{Cli, Commands, handlers};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables before clap reads them
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.default_log_filter()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Serve {
            port,
            database,
            identity_url,
            identity_api_key,
            cors_origins,
        } => {
            let database = resolve_database_path(database)?;
            let config = handlers::serve::server_config(
                port,
                database,
                identity_url,
                identity_api_key,
                cors_origins,
            );
            handlers::serve::execute(config).await?;
        }
        Commands::InitDb { database } => {
            let database = resolve_database_path(database)?;
            handlers::init_db::execute(&database).await?;
        }
    }

    Ok(())
}
