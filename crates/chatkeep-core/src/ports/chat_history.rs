//! Chat history repository port definition.
//!
//! This port defines the interface for persisting and retrieving chats and
//! their messages. Every method takes the caller's [`Identity`] as an
//! ownership filter; there is no way to address a chat by id alone.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{ChatId, ChatSummary, CreatedChat, Identity, Message, NewMessage, Sender};

/// Upper bound on the number of chats a search returns.
pub const SEARCH_RESULT_LIMIT: usize = 50;

/// Errors that can occur in chat history operations.
#[derive(Debug, Error)]
pub enum ChatHistoryError {
    /// The chat does not exist or belongs to somebody else.
    #[error("Chat not found: {0}")]
    ChatNotFound(ChatId),

    #[error("Invalid sender: {0} (only 'user' or 'bot')")]
    InvalidSender(String),

    #[error("Message content is empty")]
    EmptyContent,

    #[error("Database error: {0}")]
    Database(String),
}

/// Port for chat history persistence operations.
///
/// Implementations must apply the owner predicate inside every statement
/// that reads or writes a chat or its messages.
#[async_trait]
pub trait ChatHistoryRepository: Send + Sync {
    /// Create a chat for `owner`. Blank titles fall back to the default title.
    async fn create_chat(
        &self,
        owner: &Identity,
        title: Option<&str>,
    ) -> Result<CreatedChat, ChatHistoryError>;

    /// List the owner's chats, most recently updated first.
    async fn list_chats(&self, owner: &Identity) -> Result<Vec<ChatSummary>, ChatHistoryError>;

    /// Get all messages of a chat in chronological order.
    ///
    /// A chat the owner does not have yields an empty list.
    async fn get_messages(
        &self,
        owner: &Identity,
        chat_id: ChatId,
    ) -> Result<Vec<Message>, ChatHistoryError>;

    /// Append a message and bump the chat's `updated_at`.
    async fn add_message(
        &self,
        owner: &Identity,
        msg: NewMessage,
    ) -> Result<Message, ChatHistoryError>;

    /// Replace the default title with one derived from `candidate`.
    ///
    /// Returns `Ok(false)` without touching anything when the chat is missing,
    /// already renamed, or the candidate is blank.
    async fn auto_title(
        &self,
        owner: &Identity,
        chat_id: ChatId,
        candidate: &str,
    ) -> Result<bool, ChatHistoryError>;

    /// Delete a chat and all its messages in one transaction.
    ///
    /// Returns `false` if nothing matched.
    async fn delete_chat(&self, owner: &Identity, chat_id: ChatId)
    -> Result<bool, ChatHistoryError>;

    /// Case-insensitive substring search over titles and message contents.
    ///
    /// Blank queries return no results. At most [`SEARCH_RESULT_LIMIT`] chats
    /// are returned, most recently updated first.
    async fn search_chats(
        &self,
        owner: &Identity,
        query: &str,
    ) -> Result<Vec<ChatSummary>, ChatHistoryError>;
}

/// Validate a sender string.
pub fn validate_sender(sender: &str) -> Result<Sender, ChatHistoryError> {
    Sender::parse(sender).ok_or_else(|| ChatHistoryError::InvalidSender(sender.to_string()))
}

/// Trim message content and reject blank text.
pub fn validate_content(content: &str) -> Result<&str, ChatHistoryError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(ChatHistoryError::EmptyContent);
    }
    Ok(trimmed)
}
