//! Client-side conversation state

use serde::Serialize;
use tracing::warn;

use super::{ChatBackend, ChatError, ChatReply};

const GREETING: &str = "Hi there! I'm your study buddy! Ask me anything about your homework, \
projects, or topics you're learning. I'll help explain things clearly and suggest YouTube \
videos to help you learn more!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube_links: Option<[String; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,
}

impl ChatMessage {
    fn user(content: &str) -> Self {
        Self {
            role: Role::User,
            content: content.to_string(),
            youtube_links: None,
            search_query: None,
        }
    }

    fn assistant(reply: ChatReply) -> Self {
        Self {
            role: Role::Assistant,
            content: reply.answer,
            youtube_links: Some(reply.youtube_links),
            search_query: Some(reply.search_query),
        }
    }
}

/// A conversation with one request in flight at most.
///
/// `send` borrows the session mutably for the whole exchange. A failed
/// exchange leaves the history untouched and records a notice instead.
#[derive(Debug, Clone)]
pub struct ChatSession {
    history: Vec<ChatMessage>,
    notice: Option<String>,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            history: vec![ChatMessage {
                role: Role::Assistant,
                content: GREETING.to_string(),
                youtube_links: None,
                search_query: None,
            }],
            notice: None,
        }
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Message of the last failed exchange, cleared by the next `send`
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub async fn send<B>(&mut self, backend: &B, input: &str) -> Result<&ChatMessage, ChatError>
    where
        B: ChatBackend + ?Sized,
    {
        let message = input.trim();
        if message.is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        self.notice = None;

        match backend.ask(message).await {
            Ok(suggestion) => {
                self.history.push(ChatMessage::user(message));
                self.history
                    .push(ChatMessage::assistant(ChatReply::from(suggestion)));
                Ok(&self.history[self.history.len() - 1])
            }
            Err(err) => {
                warn!("Chat exchange failed: {err}");
                self.notice = Some(err.to_string());
                Err(err)
            }
        }
    }
}
