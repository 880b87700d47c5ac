//! Core domain types.
//!
//! These types represent the pure domain model, independent of any
//! infrastructure concerns (database, HTTP, etc.).
//!
//! # Structure
//!
//! - `chat` - Chat, summary and message types plus the title rules
//! - `identity` - The verified caller identity

pub mod chat;
mod identity;

pub use chat::{
    AUTO_TITLE_MAX_CHARS, ChatId, ChatSummary, CreatedChat, DEFAULT_CHAT_TITLE, Message,
    NewMessage, Sender, TRUNCATION_MARKER, derive_auto_title, is_default_title, resolve_title,
};
pub use identity::Identity;
