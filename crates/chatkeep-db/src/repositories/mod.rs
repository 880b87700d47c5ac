//! `SQLite` repository implementations.

mod row_mappers;
mod sqlite_chat_history_repository;

pub use sqlite_chat_history_repository::SqliteChatHistoryRepository;
