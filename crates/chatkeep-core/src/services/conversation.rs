//! Conversation service - authenticated entry point for chat operations.
//!
//! Every operation resolves the caller's token first and then talks to the
//! `ChatHistoryRepository` port with the resolved identity as owner filter.

use std::sync::Arc;

use crate::domain::{ChatId, ChatSummary, CreatedChat, Identity, Message, NewMessage, Sender};
use crate::error::ConversationError;
use crate::ports::{ChatHistoryRepository, IdentityProvider, validate_content, validate_sender};

use super::IdentityResolver;

/// Service for managing a caller's chats.
///
/// Cheap to share behind an `Arc`; holds no per-request state.
pub struct ConversationService {
    identity: IdentityResolver,
    repo: Arc<dyn ChatHistoryRepository>,
}

impl ConversationService {
    /// Create a new conversation service.
    pub fn new(identity: Arc<dyn IdentityProvider>, repo: Arc<dyn ChatHistoryRepository>) -> Self {
        Self {
            identity: IdentityResolver::new(identity),
            repo,
        }
    }

    async fn authenticate(&self, token: Option<&str>) -> Result<Identity, ConversationError> {
        Ok(self.identity.resolve(token).await?)
    }

    /// Create a chat. Absent or blank titles become the default title.
    pub async fn create_chat(
        &self,
        token: Option<&str>,
        title: Option<&str>,
    ) -> Result<CreatedChat, ConversationError> {
        let owner = self.authenticate(token).await?;
        let title = title.map(str::trim).filter(|t| !t.is_empty());

        let created = self.repo.create_chat(&owner, title).await?;
        tracing::debug!(chat_id = %created.id, owner = %owner, "Chat created");
        Ok(created)
    }

    /// List the caller's chats, most recently updated first.
    pub async fn list_chats(
        &self,
        token: Option<&str>,
    ) -> Result<Vec<ChatSummary>, ConversationError> {
        let owner = self.authenticate(token).await?;
        Ok(self.repo.list_chats(&owner).await?)
    }

    /// Get the messages of one of the caller's chats.
    ///
    /// Someone else's chat looks exactly like an empty one.
    pub async fn get_messages(
        &self,
        token: Option<&str>,
        chat_id: &str,
    ) -> Result<Vec<Message>, ConversationError> {
        let owner = self.authenticate(token).await?;
        let chat_id = parse_chat_id(chat_id)?;
        Ok(self.repo.get_messages(&owner, chat_id).await?)
    }

    /// Append a message. `sender` defaults to `user`.
    ///
    /// A user message may rename a chat that still has the default title.
    /// Renaming is best effort and never fails the call.
    pub async fn add_message(
        &self,
        token: Option<&str>,
        chat_id: &str,
        sender: Option<&str>,
        content: &str,
    ) -> Result<Message, ConversationError> {
        let owner = self.authenticate(token).await?;
        let chat_id = parse_chat_id(chat_id)?;
        let content = validate_content(content)?;
        let sender = sender.map_or(Ok(Sender::User), validate_sender)?;

        let message = self
            .repo
            .add_message(
                &owner,
                NewMessage {
                    chat_id,
                    sender,
                    content: content.to_string(),
                },
            )
            .await?;

        if sender == Sender::User {
            match self.repo.auto_title(&owner, chat_id, content).await {
                Ok(true) => tracing::debug!(chat_id = %chat_id, "Chat auto-titled"),
                Ok(false) => {}
                Err(e) => tracing::warn!(chat_id = %chat_id, error = %e, "Auto-title failed"),
            }
        }

        Ok(message)
    }

    /// Delete one of the caller's chats. Returns `false` if nothing matched.
    pub async fn delete_chat(
        &self,
        token: Option<&str>,
        chat_id: &str,
    ) -> Result<bool, ConversationError> {
        let owner = self.authenticate(token).await?;
        let chat_id = parse_chat_id(chat_id)?;

        let deleted = self.repo.delete_chat(&owner, chat_id).await?;
        if deleted {
            tracing::debug!(chat_id = %chat_id, owner = %owner, "Chat deleted");
        }
        Ok(deleted)
    }

    /// Search the caller's chats. A blank query yields no results.
    pub async fn search_chats(
        &self,
        token: Option<&str>,
        query: Option<&str>,
    ) -> Result<Vec<ChatSummary>, ConversationError> {
        let owner = self.authenticate(token).await?;
        let query = query.map(str::trim).unwrap_or_default();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.repo.search_chats(&owner, query).await?)
    }
}

fn parse_chat_id(raw: &str) -> Result<ChatId, ConversationError> {
    ChatId::parse(raw).ok_or_else(|| ConversationError::InvalidInput("invalid chat id".to_string()))
}
