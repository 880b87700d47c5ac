//! `SQLite` persistence for chatkeep.
//!
//! Implements the `ChatHistoryRepository` port from `chatkeep-core` on top
//! of `sqlx`. Entry points call [`setup_database`] and hand the pool to
//! [`CoreFactory`].

#![deny(unsafe_code)]

pub mod factory;
pub mod repositories;
pub mod setup;

pub use factory::CoreFactory;
pub use repositories::SqliteChatHistoryRepository;

pub use setup::setup_database;
#[cfg(any(test, feature = "test-utils"))]
pub use setup::setup_test_database;
