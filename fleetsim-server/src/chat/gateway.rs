//! Client for the OpenAI-compatible AI gateway

use std::time::Duration;

use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::{BoxFuture, ChatBackend, ChatError, Suggestion};
use crate::config::ChatConfig;

const SYSTEM_PROMPT: &str = "You are a helpful study assistant for students. \
Provide clear, concise answers to student questions. Always be encouraging and supportive. \
After answering, suggest a relevant YouTube search query that would help the student learn \
more about the topic.";

const TOOL_NAME: &str = "provide_answer_with_youtube";

pub struct GatewayClient {
    client: reqwest::Client,
    url: String,
    model: String,
    api_key_env: String,
    api_key: Option<String>,
}

impl GatewayClient {
    /// Build a client from config, reading the API key from the environment
    pub fn from_config(config: &ChatConfig) -> Result<Self, ChatError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty());
        if api_key.is_none() {
            warn!(
                "{} is not set, chat requests will fail until it is",
                config.api_key_env
            );
        }
        Self::new(config, api_key)
    }

    pub fn new(config: &ChatConfig, api_key: Option<String>) -> Result<Self, ChatError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("fleetsim-server/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            url: config.gateway_url.clone(),
            model: config.model.clone(),
            api_key_env: config.api_key_env.clone(),
            api_key,
        })
    }

    async fn complete(&self, message: &str) -> Result<Suggestion, ChatError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ChatError::MissingApiKey(self.api_key_env.clone()))?;

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(api_key)
            .json(&completion_request(&self.model, message))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!("AI gateway answered {status}");
            return Err(ChatError::from_gateway_status(status));
        }

        let body: CompletionResponse = response.json().await?;
        debug!("AI gateway returned {} choice(s)", body.choices.len());
        parse_completion(body)
    }
}

impl ChatBackend for GatewayClient {
    fn ask<'a>(&'a self, message: &'a str) -> BoxFuture<'a, Result<Suggestion, ChatError>> {
        Box::pin(self.complete(message))
    }
}

/// Request body forcing the answer through the function tool
pub fn completion_request(model: &str, message: &str) -> Value {
    json!({
        "model": model,
        "messages": [
            { "role": "system", "content": SYSTEM_PROMPT },
            { "role": "user", "content": message }
        ],
        "tools": [{
            "type": "function",
            "function": {
                "name": TOOL_NAME,
                "description": "Provide an answer to the student's question along with a YouTube search query",
                "parameters": {
                    "type": "object",
                    "properties": {
                        "answer": {
                            "type": "string",
                            "description": "Clear, student-friendly answer to the question"
                        },
                        "youtubeQuery": {
                            "type": "string",
                            "description": "A search query optimized for finding relevant educational YouTube videos"
                        }
                    },
                    "required": ["answer", "youtubeQuery"]
                }
            }
        }],
        "tool_choice": {
            "type": "function",
            "function": { "name": TOOL_NAME }
        }
    })
}

#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<AssistantMessage>,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    #[serde(default)]
    tool_calls: Vec<ToolCall>,
}

#[derive(Debug, Deserialize)]
struct ToolCall {
    function: FunctionCall,
}

#[derive(Debug, Deserialize)]
struct FunctionCall {
    arguments: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnswerArguments {
    answer: String,
    youtube_query: String,
}

/// First tool call of the first choice; its arguments are a JSON string
pub fn parse_completion(body: CompletionResponse) -> Result<Suggestion, ChatError> {
    let call = body
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.tool_calls.into_iter().next())
        .ok_or(ChatError::NoToolCall)?;

    let args: AnswerArguments = serde_json::from_str(&call.function.arguments)
        .map_err(|e| ChatError::MalformedArguments(e.to_string()))?;

    Ok(Suggestion {
        answer: args.answer,
        search_query: args.youtube_query,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Json, Router,
        http::{HeaderMap, StatusCode, header},
        routing::post,
    };
    use tokio::net::TcpListener;

    use super::*;

    /// Authorization header and parsed body of the last request seen
    type Seen = Arc<Mutex<Option<(String, Value)>>>;

    /// Local stand-in for the AI gateway answering every request the same way
    async fn fake_gateway(status: StatusCode, body: &'static str) -> (GatewayClient, Seen) {
        let seen: Seen = Arc::default();
        let record = Arc::clone(&seen);
        let app = Router::new().route(
            "/v1/chat/completions",
            post(move |headers: HeaderMap, Json(request): Json<Value>| async move {
                let auth = headers
                    .get(header::AUTHORIZATION)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                *record.lock().unwrap() = Some((auth, request));
                (status, [(header::CONTENT_TYPE, "application/json")], body)
            }),
        );

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let config = ChatConfig {
            gateway_url: format!("http://{addr}/v1/chat/completions"),
            model: "test-model".to_string(),
            timeout_secs: 5,
            ..ChatConfig::default()
        };
        let client = GatewayClient::new(&config, Some("test-key".to_string())).unwrap();
        (client, seen)
    }

    const TOOL_REPLY: &str = r#"{
        "choices": [{
            "message": {
                "role": "assistant",
                "tool_calls": [{
                    "type": "function",
                    "function": {
                        "name": "provide_answer_with_youtube",
                        "arguments": "{\"answer\":\"Light becomes sugar.\",\"youtubeQuery\":\"photosynthesis\"}"
                    }
                }]
            }
        }]
    }"#;

    #[tokio::test]
    async fn gateway_round_trip() {
        let (client, seen) = fake_gateway(StatusCode::OK, TOOL_REPLY).await;

        let suggestion = client.ask("What is photosynthesis?").await.unwrap();
        assert_eq!(
            suggestion,
            Suggestion {
                answer: "Light becomes sugar.".to_string(),
                search_query: "photosynthesis".to_string(),
            }
        );

        let (auth, request) = seen.lock().unwrap().take().unwrap();
        assert_eq!(auth, "Bearer test-key");
        assert_eq!(request["model"], "test-model");
        assert_eq!(request["messages"][1]["content"], "What is photosynthesis?");
        assert_eq!(request["tool_choice"]["function"]["name"], TOOL_NAME);
    }

    #[tokio::test]
    async fn gateway_error_statuses() {
        let cases = [
            (StatusCode::TOO_MANY_REQUESTS, StatusCode::TOO_MANY_REQUESTS),
            (StatusCode::PAYMENT_REQUIRED, StatusCode::PAYMENT_REQUIRED),
            (StatusCode::SERVICE_UNAVAILABLE, StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (gateway, expected) in cases {
            let (client, seen) = fake_gateway(gateway, r#"{"error":"nope"}"#).await;
            let err = client.ask("hello").await.unwrap_err();
            assert_eq!(err.status(), expected, "gateway answered {gateway}");
            assert!(seen.lock().unwrap().is_some());

            match gateway {
                StatusCode::TOO_MANY_REQUESTS => {
                    assert!(matches!(err, ChatError::RateLimited));
                    assert_eq!(
                        err.to_string(),
                        "Rate limit exceeded. Please try again later."
                    );
                }
                StatusCode::PAYMENT_REQUIRED => {
                    assert!(matches!(err, ChatError::PaymentRequired));
                }
                _ => assert!(matches!(err, ChatError::Gateway(503))),
            }
        }
    }

    #[tokio::test]
    async fn non_json_success_body_is_a_server_error() {
        let (client, _seen) = fake_gateway(StatusCode::OK, "<html>oops</html>").await;
        let err = client.ask("hello").await.unwrap_err();
        assert!(matches!(err, ChatError::Transport(_)), "{err:?}");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn success_without_tool_call() {
        let (client, _seen) = fake_gateway(
            StatusCode::OK,
            r#"{"choices":[{"message":{"content":"just text"}}]}"#,
        )
        .await;
        let err = client.ask("hello").await.unwrap_err();
        assert!(matches!(err, ChatError::NoToolCall));
    }

    fn body(value: Value) -> CompletionResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn parses_tool_call_arguments() {
        let response = body(json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {
                            "name": TOOL_NAME,
                            "arguments": "{\"answer\":\"Plants make sugar from light.\",\"youtubeQuery\":\"photosynthesis\"}"
                        }
                    }]
                }
            }]
        }));

        let suggestion = parse_completion(response).unwrap();
        assert_eq!(suggestion.answer, "Plants make sugar from light.");
        assert_eq!(suggestion.search_query, "photosynthesis");
    }

    #[test]
    fn missing_tool_call() {
        let cases = [
            json!({}),
            json!({ "choices": [] }),
            json!({ "choices": [{ "message": { "content": "plain text" } }] }),
            json!({ "choices": [{}] }),
        ];
        for case in cases {
            assert!(matches!(
                parse_completion(body(case)),
                Err(ChatError::NoToolCall)
            ));
        }
    }

    #[test]
    fn malformed_arguments() {
        let response = body(json!({
            "choices": [{
                "message": {
                    "tool_calls": [{ "function": { "arguments": "{\"answer\": 3" } }]
                }
            }]
        }));
        assert!(matches!(
            parse_completion(response),
            Err(ChatError::MalformedArguments(_))
        ));
    }

    #[test]
    fn request_forces_the_tool() {
        let request = completion_request("some-model", "What is a cell?");
        assert_eq!(request["model"], "some-model");
        assert_eq!(request["messages"][1]["content"], "What is a cell?");
        assert_eq!(request["tool_choice"]["function"]["name"], TOOL_NAME);
        assert_eq!(request["tools"][0]["function"]["name"], TOOL_NAME);
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        let config = ChatConfig {
            api_key_env: "FLEETSIM_TEST_UNSET_KEY".to_string(),
            ..ChatConfig::default()
        };
        let client = GatewayClient::new(&config, None).unwrap();
        let err = client.ask("hello").await.unwrap_err();
        assert!(matches!(err, ChatError::MissingApiKey(ref name) if name == "FLEETSIM_TEST_UNSET_KEY"));
        assert_eq!(err.status(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    }
}
