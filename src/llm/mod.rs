//! Model backend seam.
//!
//! The agent talks to the model through [`LlmClient`]: one request in, one
//! assistant [`Message`] out. [`OllamaClient`] is the HTTP implementation.

mod ollama;

pub use ollama::OllamaClient;

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::message::Message;

/// Gateway-level failures. Fatal to the current turn; never retried here.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Backend unreachable or returned a server error.
    #[error("Model backend unavailable: {0}")]
    Unavailable(String),

    /// Call did not complete within the configured timeout.
    #[error("Model backend timed out after {0:?}")]
    Timeout(Duration),

    /// Backend answered with something that is not a usable message.
    #[error("Model protocol error: {0}")]
    Protocol(String),
}

impl LlmError {
    /// Whether this is a `ModelUnavailable`-class failure (as opposed to a protocol error).
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Timeout(_))
    }
}

/// Function-tool entry of the catalogue offered to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSchema {
    #[serde(rename = "type")]
    pub kind: String,
    pub function: FunctionSchema,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionSchema {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

impl ToolSchema {
    pub fn function(name: &str, description: &str, parameters: Value) -> Self {
        Self {
            kind: "function".to_string(),
            function: FunctionSchema {
                name: name.to_string(),
                description: description.to_string(),
                parameters,
            },
        }
    }
}

/// One chat completion request.
#[derive(Debug, Clone)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [Message],
    /// Empty when no tools are offered for this call.
    pub tools: &'a [ToolSchema],
    pub temperature: f32,
}

/// Chat completion backend.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send the conversation and return exactly one assistant message.
    async fn chat_completion(&self, request: ChatRequest<'_>) -> Result<Message, LlmError>;
}
