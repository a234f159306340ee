//! Chat proxy: `{message}` in, an answer and three video-search links out

mod error;
pub mod gateway;
mod session;

use std::{future::Future, pin::Pin, sync::Arc};

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

pub use error::{ChatError, ErrorBody};
pub use gateway::GatewayClient;
pub use session::{ChatMessage, ChatSession, Role};

use crate::state::AppState;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Anything that can answer a chat message
pub trait ChatBackend: Send + Sync {
    fn ask<'a>(&'a self, message: &'a str) -> BoxFuture<'a, Result<Suggestion, ChatError>>;
}

/// What the gateway's tool call carries
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub answer: String,
    pub search_query: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub answer: String,
    pub youtube_links: [String; 3],
    pub search_query: String,
}

impl From<Suggestion> for ChatReply {
    fn from(suggestion: Suggestion) -> Self {
        Self {
            youtube_links: youtube_links(&suggestion.search_query),
            answer: suggestion.answer,
            search_query: suggestion.search_query,
        }
    }
}

const YOUTUBE_SEARCH: &str = "https://www.youtube.com/results?search_query=";
const LINK_SUFFIXES: [&str; 3] = ["", " tutorial", " explained"];

/// Characters left alone by JavaScript's `encodeURIComponent`
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub fn youtube_links(query: &str) -> [String; 3] {
    LINK_SUFFIXES.map(|suffix| {
        let term = format!("{query}{suffix}");
        format!(
            "{YOUTUBE_SEARCH}{}",
            utf8_percent_encode(&term, URI_COMPONENT)
        )
    })
}

pub async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, ChatError> {
    let Json(request) = payload.map_err(|e| ChatError::InvalidRequest(e.body_text()))?;
    let message = request.message.trim();
    if message.is_empty() {
        return Err(ChatError::EmptyMessage);
    }

    info!("Processing chat message ({} chars)", message.chars().count());
    let suggestion = state
        .chat
        .ask(message)
        .await
        .inspect_err(|e| error!("Chat request failed: {e}"))?;

    Ok(Json(ChatReply::from(suggestion)))
}
