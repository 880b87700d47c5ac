//! Core services - the application's business logic layer.
//!
//! Services here are pure orchestrators between ports; they don't know
//! about concrete implementations.

mod conversation;
mod identity_resolver;

pub use conversation::ConversationService;
pub use identity_resolver::IdentityResolver;
