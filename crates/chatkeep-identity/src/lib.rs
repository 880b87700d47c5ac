//! Identity provider client for chatkeep.
//!
//! Resolves bearer tokens against a Supabase/GoTrue style `auth/v1/user`
//! endpoint and implements the `IdentityProvider` port from
//! `chatkeep-core`.
//!
//! ```no_run
//! use chatkeep_identity::{HttpIdentityProvider, IdentityClientConfig};
//!
//! # fn example() -> Result<(), chatkeep_identity::IdentityClientError> {
//! let config = IdentityClientConfig::new("https://project.supabase.co", "anon-key");
//! let _provider = HttpIdentityProvider::new(&config)?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]
// HttpIdentityProvider is meant to be used through the IdentityProvider
// trait, not its internal generic structure
#![allow(private_interfaces)]

mod client;
mod config;
mod error;
mod http;
mod models;
mod port;

pub use client::HttpIdentityProvider;
pub use config::IdentityClientConfig;
pub use error::IdentityClientError;
