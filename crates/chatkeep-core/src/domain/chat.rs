//! Chat domain types.
//!
//! These types represent chats and messages in the domain model,
//! independent of any infrastructure concerns.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Title every chat starts with until the first user message renames it.
pub const DEFAULT_CHAT_TITLE: &str = "Neuer Chat";

/// Maximum number of characters kept when deriving a title from a message.
pub const AUTO_TITLE_MAX_CHARS: usize = 42;

/// Appended to derived titles that were cut at [`AUTO_TITLE_MAX_CHARS`].
pub const TRUNCATION_MARKER: char = '…';

/// Unique chat identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(Uuid);

impl ChatId {
    /// Generate a fresh random id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a textual id. Returns `None` for anything that is not a UUID.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Uuid::parse_str(s.trim()).ok().map(Self)
    }

    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ChatId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for ChatId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A chat as shown in the sidebar and in search results.
///
/// `last_message` holds the content of the most recent message, or an
/// empty string when the chat has none yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSummary {
    pub id: ChatId,
    pub title: String,
    pub last_message: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A persisted chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub chat_id: ChatId,
    pub sender: Sender,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    /// Parse a sender from its wire form. Surrounding whitespace is ignored,
    /// case is not.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "user" => Some(Self::User),
            "bot" => Some(Self::Bot),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Bot => "bot",
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Data for appending a message to a chat.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub chat_id: ChatId,
    pub sender: Sender,
    pub content: String,
}

/// Result of creating a chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedChat {
    pub id: ChatId,
    pub title: String,
}

/// Resolve the title for a new chat: the trimmed request, or
/// [`DEFAULT_CHAT_TITLE`] when absent or blank.
#[must_use]
pub fn resolve_title(requested: Option<&str>) -> String {
    match requested.map(str::trim) {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => DEFAULT_CHAT_TITLE.to_string(),
    }
}

/// Whether `title` still is the default title (trimmed, case-insensitive).
#[must_use]
pub fn is_default_title(title: &str) -> bool {
    title.trim().to_lowercase() == DEFAULT_CHAT_TITLE.to_lowercase()
}

/// Derive a chat title from the first user message.
///
/// Returns `None` for blank text. Longer text is cut to
/// [`AUTO_TITLE_MAX_CHARS`] characters and marked with [`TRUNCATION_MARKER`].
#[must_use]
pub fn derive_auto_title(text: &str) -> Option<String> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if text.chars().count() <= AUTO_TITLE_MAX_CHARS {
        return Some(text.to_string());
    }

    let mut title: String = text.chars().take(AUTO_TITLE_MAX_CHARS).collect();
    title.push(TRUNCATION_MARKER);
    Some(title)
}
