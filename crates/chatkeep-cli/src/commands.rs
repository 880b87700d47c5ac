//! Subcommands.
//!
//! Every option can also be set through its `CHATKEEP_*` environment
//! variable; `.env` files are loaded before parsing.

use std::path::PathBuf;

use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "CHATKEEP_PORT", default_value = "8080")]
        port: u16,

        /// SQLite database file (defaults to the user data directory)
        #[arg(long, env = "CHATKEEP_DATABASE")]
        database: Option<PathBuf>,

        /// Base URL of the identity provider, e.g. https://<project>.supabase.co
        #[arg(long, env = "CHATKEEP_IDENTITY_URL")]
        identity_url: String,

        /// API key sent to the identity provider
        #[arg(long, env = "CHATKEEP_IDENTITY_API_KEY", hide_env_values = true)]
        identity_api_key: String,

        /// Allowed CORS origins, comma separated (all origins when empty)
        #[arg(long, env = "CHATKEEP_CORS_ORIGINS", value_delimiter = ',')]
        cors_origins: Vec<String>,
    },

    /// Create the database file and schema, then exit
    InitDb {
        /// SQLite database file (defaults to the user data directory)
        #[arg(long, env = "CHATKEEP_DATABASE")]
        database: Option<PathBuf>,
    },
}
