//! Command-line entry point for chatkeep.
//!
//! The binary in `main.rs` parses arguments and dispatches to [`handlers`].

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Used by main.rs binary
use dotenvy as _;
use tokio as _;
use tracing_subscriber as _;

pub mod commands;
pub mod handlers;
pub mod parser;
pub mod paths;

pub use commands::Commands;
pub use parser::Cli;
