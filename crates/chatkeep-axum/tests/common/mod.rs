//! Shared helpers for the router integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

use chatkeep_axum::bootstrap::{AxumContext, CorsConfig};
use chatkeep_axum::routes::create_router;
use chatkeep_core::ports::{IdentityError, IdentityProvider};
use chatkeep_core::Identity;
use chatkeep_db::{CoreFactory, setup_test_database};

pub const ALICE: &str = "alice-token";
pub const BOB: &str = "bob-token";
/// Token that makes the fake provider report an outage.
pub const OUTAGE: &str = "outage-token";

/// Identity provider that knows two fixed tokens.
pub struct StaticIdentity;

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn resolve(&self, token: &str) -> Result<Identity, IdentityError> {
        match token {
            ALICE => Ok(Identity::new("alice").unwrap()),
            BOB => Ok(Identity::new("bob").unwrap()),
            OUTAGE => Err(IdentityError::Unavailable("connection refused".to_string())),
            _ => Err(IdentityError::InvalidToken),
        }
    }
}

/// Router over a fresh in-memory database.
pub async fn test_app() -> Router {
    let pool = setup_test_database().await.unwrap();
    let service = CoreFactory::build_conversation_service(pool, Arc::new(StaticIdentity));
    create_router(AxumContext::new(service), &CorsConfig::AllowAll)
}

pub fn request(method: &str, uri: &str, token: Option<&str>, body: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn send(app: &Router, req: Request<Body>) -> Response<Body> {
    app.clone().oneshot(req).await.unwrap()
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Create a chat and return its id.
pub async fn create_chat(app: &Router, token: &str, title: Option<&str>) -> String {
    let body = title.map(|t| serde_json::json!({ "title": t }).to_string());
    let response = send(app, request("POST", "/api/chats", Some(token), body.as_deref())).await;
    assert!(response.status().is_success());
    json_body(response).await["chatId"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Post a message and return the response status.
pub async fn post_message(
    app: &Router,
    token: &str,
    chat_id: &str,
    body: &serde_json::Value,
) -> axum::http::StatusCode {
    let uri = format!("/api/chats/{chat_id}/messages");
    send(app, request("POST", &uri, Some(token), Some(&body.to_string())))
        .await
        .status()
}
