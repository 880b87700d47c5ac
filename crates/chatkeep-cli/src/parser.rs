//! Main CLI parser and top-level argument handling.

use clap::Parser;

use crate::commands::Commands;

/// Command-line interface for the chat history server.
#[derive(Parser)]
#[command(name = "chatkeep")]
#[command(about = "Authenticated chat history API")]
#[command(version)]
pub struct Cli {
    /// Enable verbose/debug output (ignored when RUST_LOG is set)
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Default log filter when `RUST_LOG` is not set.
    pub const fn default_log_filter(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}
