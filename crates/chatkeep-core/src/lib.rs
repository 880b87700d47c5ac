//! Core domain types, ports and services for chatkeep.
//!
//! This crate knows nothing about SQL or HTTP. Storage and the identity
//! provider are reached through the traits in [`ports`]; adapters live in
//! `chatkeep-db`, `chatkeep-identity` and `chatkeep-axum`.

#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::{
    ChatId, ChatSummary, CreatedChat, DEFAULT_CHAT_TITLE, Identity, Message, NewMessage, Sender,
};
pub use error::{ConversationError, ErrorKind};
pub use ports::{
    ChatHistoryError, ChatHistoryRepository, IdentityError, IdentityProvider, SEARCH_RESULT_LIMIT,
};
pub use services::{ConversationService, IdentityResolver};

// Used only by tests in this crate
#[cfg(test)]
use serde_json as _;
