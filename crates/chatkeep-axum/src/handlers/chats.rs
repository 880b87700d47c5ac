//! Chat handlers - create, list, search, read, append and delete.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use chatkeep_core::domain::{ChatId, ChatSummary, Message};

use super::bearer_token;
use crate::error::HttpError;
use crate::state::AppState;

// ─────────────────────────────────────────────────────────────────────────────
// Request DTOs (adapter-local)
// ─────────────────────────────────────────────────────────────────────────────

/// Request body for creating a chat. The body itself is optional.
#[derive(Debug, Default, Deserialize)]
pub struct CreateChatRequest {
    pub title: Option<String>,
}

/// Request body for appending a message.
#[derive(Debug, Default, Deserialize)]
pub struct AddMessageRequest {
    pub sender: Option<String>,
    pub content: Option<String>,
}

/// Query parameters for search.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Response DTOs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChatResponse {
    pub success: bool,
    pub message: String,
    pub chat_id: ChatId,
    pub title: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMessageResponse {
    pub success: bool,
    pub message: String,
    pub message_id: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteChatResponse {
    pub success: bool,
    pub message: String,
}

/// Decode an optional JSON body. An empty body yields the default value.
fn optional_json<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, HttpError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| HttpError::BadRequest(format!("invalid request body: {e}")))
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Create a chat.
/// POST /api/chats
pub async fn create_chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<CreateChatResponse>, HttpError> {
    let req: CreateChatRequest = optional_json(&body)?;
    let created = state
        .conversations
        .create_chat(bearer_token(&headers), req.title.as_deref())
        .await?;

    Ok(Json(CreateChatResponse {
        success: true,
        message: "chat created".to_string(),
        chat_id: created.id,
        title: created.title,
    }))
}

/// List the caller's chats.
/// GET /api/chats
pub async fn list_chats(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<ChatSummary>>, HttpError> {
    let chats = state
        .conversations
        .list_chats(bearer_token(&headers))
        .await?;
    Ok(Json(chats))
}

/// Search the caller's chats by title and message content.
/// GET /api/chats/search?q=
pub async fn search_chats(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<ChatSummary>>, HttpError> {
    let chats = state
        .conversations
        .search_chats(bearer_token(&headers), params.q.as_deref())
        .await?;
    Ok(Json(chats))
}

/// Get all messages of a chat.
/// GET /api/chats/{chat_id}/messages
pub async fn get_messages(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(chat_id): Path<String>,
) -> Result<Json<Vec<Message>>, HttpError> {
    let messages = state
        .conversations
        .get_messages(bearer_token(&headers), &chat_id)
        .await?;
    Ok(Json(messages))
}

/// Append a message to a chat.
/// POST /api/chats/{chat_id}/messages
pub async fn add_message(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(chat_id): Path<String>,
    body: Bytes,
) -> Result<Json<AddMessageResponse>, HttpError> {
    let req: AddMessageRequest = optional_json(&body)?;
    let message = state
        .conversations
        .add_message(
            bearer_token(&headers),
            &chat_id,
            req.sender.as_deref(),
            req.content.as_deref().unwrap_or_default(),
        )
        .await?;

    Ok(Json(AddMessageResponse {
        success: true,
        message: "message saved".to_string(),
        message_id: message.id.to_string(),
    }))
}

/// Delete a chat and its messages.
/// DELETE /api/chats/{chat_id}
pub async fn delete_chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(chat_id): Path<String>,
) -> Result<Json<DeleteChatResponse>, HttpError> {
    let deleted = state
        .conversations
        .delete_chat(bearer_token(&headers), &chat_id)
        .await?;

    if !deleted {
        return Err(HttpError::NotFound(
            "chat not found or not permitted".to_string(),
        ));
    }

    Ok(Json(DeleteChatResponse {
        success: true,
        message: "chat deleted".to_string(),
    }))
}
