//! Row mapping helpers for `SQLite` queries.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use chatkeep_core::{ChatHistoryError, ChatId, ChatSummary, Message, Sender};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use uuid::Uuid;

/// Shared SELECT column list for chat summary queries. Expects the chat
/// table to be aliased as `c`.
pub const SUMMARY_SELECT_COLUMNS: &str = "c.id, c.title, c.created_at, c.updated_at, \
     COALESCE((SELECT m.content FROM chat_messages m WHERE m.chat_id = c.id \
     ORDER BY m.created_at DESC, m.rowid DESC LIMIT 1), '') AS last_message";

/// Map any sqlx failure into the port error.
pub fn db_err(e: sqlx::Error) -> ChatHistoryError {
    ChatHistoryError::Database(e.to_string())
}

/// Current time, truncated to the precision stored in the database.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Format a timestamp as fixed-width RFC 3339 (`2024-05-01T12:00:00.000000Z`).
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a timestamp written by [`format_timestamp`].
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, ChatHistoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ChatHistoryError::Database(format!("invalid timestamp '{s}': {e}")))
}

fn parse_chat_id(s: &str) -> Result<ChatId, ChatHistoryError> {
    ChatId::parse(s).ok_or_else(|| ChatHistoryError::Database(format!("invalid chat id '{s}'")))
}

/// Parse a database row into a `ChatSummary`.
pub fn row_to_summary(row: &SqliteRow) -> Result<ChatSummary, ChatHistoryError> {
    let id: String = row.try_get("id").map_err(db_err)?;
    let created_at: String = row.try_get("created_at").map_err(db_err)?;
    let updated_at: String = row.try_get("updated_at").map_err(db_err)?;

    Ok(ChatSummary {
        id: parse_chat_id(&id)?,
        title: row.try_get("title").map_err(db_err)?,
        last_message: row.try_get("last_message").map_err(db_err)?,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}

/// Parse a database row into a `Message`.
pub fn row_to_message(row: &SqliteRow) -> Result<Message, ChatHistoryError> {
    let id: String = row.try_get("id").map_err(db_err)?;
    let chat_id: String = row.try_get("chat_id").map_err(db_err)?;
    let sender: String = row.try_get("sender").map_err(db_err)?;
    let created_at: String = row.try_get("created_at").map_err(db_err)?;

    Ok(Message {
        id: Uuid::parse_str(&id)
            .map_err(|e| ChatHistoryError::Database(format!("invalid message id '{id}': {e}")))?,
        chat_id: parse_chat_id(&chat_id)?,
        sender: Sender::parse(&sender)
            .ok_or_else(|| ChatHistoryError::Database(format!("invalid sender '{sender}'")))?,
        content: row.try_get("content").map_err(db_err)?,
        created_at: parse_timestamp(&created_at)?,
    })
}
