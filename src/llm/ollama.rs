//! Ollama `/api/chat` client.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::{ChatRequest, LlmClient, LlmError, ToolSchema};
use crate::message::{Message, ToolCallRequest};

/// HTTP client for a local or remote Ollama server.
///
/// Holds a single reusable connection pool; construct once at startup.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    base_url: String,
    timeout: Duration,
    http_client: reqwest::Client,
}

impl OllamaClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, LlmError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Unavailable(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn map_send_error(&self, e: reqwest::Error) -> LlmError {
        if e.is_timeout() {
            LlmError::Timeout(self.timeout)
        } else {
            LlmError::Unavailable(e.to_string())
        }
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn chat_completion(&self, request: ChatRequest<'_>) -> Result<Message, LlmError> {
        let body = WireRequest {
            model: request.model,
            messages: request.messages.iter().map(WireMessage::from).collect(),
            tools: request.tools,
            stream: false,
            options: WireOptions {
                temperature: request.temperature,
            },
        };

        let url = format!("{}/api/chat", self.base_url);
        tracing::debug!(
            "POST {} ({} messages, {} tools)",
            url,
            request.messages.len(),
            request.tools.len()
        );

        let response = self
            .http_client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| self.map_send_error(e))?;

        if !status.is_success() {
            let detail = error_detail(&text);
            return Err(if status.is_server_error() {
                LlmError::Unavailable(format!("{}: {}", status, detail))
            } else {
                LlmError::Protocol(format!("{}: {}", status, detail))
            });
        }

        parse_chat_response(&text)
    }
}

/// Decode an `/api/chat` response body into an assistant message.
pub(crate) fn parse_chat_response(body: &str) -> Result<Message, LlmError> {
    let response: WireResponse = serde_json::from_str(body)
        .map_err(|e| LlmError::Protocol(format!("invalid response body: {}", e)))?;

    if let Some(error) = response.error {
        return Err(LlmError::Protocol(error));
    }

    let message = response
        .message
        .ok_or_else(|| LlmError::Protocol("response has no message".to_string()))?;

    if message.role != "assistant" {
        return Err(LlmError::Protocol(format!(
            "expected assistant message, got role '{}'",
            message.role
        )));
    }

    let tool_calls = message
        .tool_calls
        .into_iter()
        .map(|call| ToolCallRequest {
            id: call
                .id
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| format!("call_{}", Uuid::new_v4().simple())),
            name: call.function.name,
            arguments: normalize_arguments(call.function.arguments),
        })
        .collect();

    Ok(Message::assistant_with_calls(message.content, tool_calls))
}

/// Arguments arrive as an object, but some models send a JSON-encoded string.
fn normalize_arguments(arguments: Value) -> Value {
    match arguments {
        Value::Null => Value::Object(Default::default()),
        Value::String(s) if s.trim().is_empty() => Value::Object(Default::default()),
        Value::String(s) => serde_json::from_str(&s).unwrap_or(Value::String(s)),
        other => other,
    }
}

/// Ollama reports failures as `{"error": "..."}`.
fn error_detail(body: &str) -> String {
    serde_json::from_str::<WireResponse>(body)
        .ok()
        .and_then(|r| r.error)
        .unwrap_or_else(|| body.trim().to_string())
}

#[derive(Debug, Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "no_tools")]
    tools: &'a [ToolSchema],
    stream: bool,
    options: WireOptions,
}

fn no_tools(tools: &&[ToolSchema]) -> bool {
    tools.is_empty()
}

#[derive(Debug, Serialize)]
struct WireOptions {
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireMessage {
    #[serde(default = "assistant_role")]
    role: String,
    #[serde(default)]
    content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tool_calls: Vec<WireToolCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_name: Option<String>,
}

fn assistant_role() -> String {
    "assistant".to_string()
}

impl From<&Message> for WireMessage {
    fn from(message: &Message) -> Self {
        let (tool_call_id, tool_name) = match message {
            Message::Tool(result) => (Some(result.tool_call_id.clone()), Some(result.name.clone())),
            _ => (None, None),
        };
        Self {
            role: message.role().to_string(),
            content: message.content(),
            tool_calls: message
                .tool_calls()
                .iter()
                .map(|call| WireToolCall {
                    id: Some(call.id.clone()),
                    function: WireFunctionCall {
                        name: call.name.clone(),
                        arguments: call.arguments.clone(),
                    },
                })
                .collect(),
            tool_call_id,
            tool_name,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct WireToolCall {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    function: WireFunctionCall,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireFunctionCall {
    name: String,
    #[serde(default)]
    arguments: Value,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default)]
    message: Option<WireMessage>,
    #[serde(default)]
    error: Option<String>,
}
