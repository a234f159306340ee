use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Message must not be empty")]
    EmptyMessage,
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,
    #[error("Payment required. Please add credits.")]
    PaymentRequired,
    #[error("{0} is not configured")]
    MissingApiKey(String),
    #[error("AI Gateway error: {0}")]
    Gateway(u16),
    #[error("No tool call in response")]
    NoToolCall,
    #[error("Malformed tool call arguments: {0}")]
    MalformedArguments(String),
    #[error("AI Gateway request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ChatError {
    /// Map a non-success gateway status onto the error the caller sees
    pub fn from_gateway_status(status: StatusCode) -> Self {
        match status {
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimited,
            StatusCode::PAYMENT_REQUIRED => Self::PaymentRequired,
            other => Self::Gateway(other.as_u16()),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::EmptyMessage | Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::PaymentRequired => StatusCode::PAYMENT_REQUIRED,
            Self::MissingApiKey(_)
            | Self::Gateway(_)
            | Self::NoToolCall
            | Self::MalformedArguments(_)
            | Self::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// `{ "error": "..." }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
