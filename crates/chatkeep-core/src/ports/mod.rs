//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core domain expects from infrastructure.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No `sqlx` or `reqwest` types in any signature
//! - Repository methods always take the owning [`Identity`](crate::domain::Identity)

pub mod chat_history;
pub mod identity;

pub use chat_history::{
    ChatHistoryError, ChatHistoryRepository, SEARCH_RESULT_LIMIT, validate_content,
    validate_sender,
};
pub use identity::{IdentityError, IdentityProvider};

#[cfg(test)]
pub use identity::MockIdentityProvider;
