//! Composition utilities for building a `ConversationService` with a
//! `SQLite` backend.
//!
//! This module is focused purely on construction and should not contain
//! any domain logic.

use sqlx::SqlitePool;
use std::sync::Arc;

use chatkeep_core::ports::{ChatHistoryRepository, IdentityProvider};
use chatkeep_core::services::ConversationService;

use crate::repositories::SqliteChatHistoryRepository;

/// Factory for creating repository instances with `SQLite` backends.
pub struct CoreFactory;

impl CoreFactory {
    /// Create a chat history repository from a pool.
    pub fn chat_history_repository(pool: SqlitePool) -> Arc<SqliteChatHistoryRepository> {
        Arc::new(SqliteChatHistoryRepository::new(pool))
    }

    /// Build a complete `ConversationService` from a pool and an identity
    /// provider.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use chatkeep_db::{CoreFactory, setup_database};
    ///
    /// let pool = setup_database(&db_path).await?;
    /// let service = CoreFactory::build_conversation_service(pool, identity);
    /// ```
    pub fn build_conversation_service(
        pool: SqlitePool,
        identity: Arc<dyn IdentityProvider>,
    ) -> ConversationService {
        let repo: Arc<dyn ChatHistoryRepository> = Self::chat_history_repository(pool);
        ConversationService::new(identity, repo)
    }
}
