//! Model gateway: the backend client bound to a model, temperature and tool catalogue.

use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::llm::{ChatRequest, LlmClient, LlmError, OllamaClient, ToolSchema};
use crate::message::Message;
use crate::tools::ToolRegistry;

/// Built once at startup and shared by every turn.
#[derive(Clone)]
pub struct ModelGateway {
    client: Arc<dyn LlmClient>,
    model: String,
    temperature: f32,
    tools: Vec<ToolSchema>,
    timeout: Option<Duration>,
}

impl ModelGateway {
    pub fn new(client: Arc<dyn LlmClient>, model: impl Into<String>, temperature: f32, tools: &ToolRegistry) -> Self {
        Self {
            client,
            model: model.into(),
            temperature,
            tools: tools.get_tool_schemas(),
            timeout: None,
        }
    }

    /// Gateway backed by an [`OllamaClient`] built from `config`.
    pub fn from_config(config: &Config, tools: &ToolRegistry) -> Result<Self, LlmError> {
        let client = OllamaClient::new(config.base_url.clone(), config.request_timeout)?;
        Ok(Self::new(Arc::new(client), config.model.clone(), config.temperature, tools)
            .with_timeout(config.request_timeout))
    }

    /// Abort any single call that runs longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn tools(&self) -> &[ToolSchema] {
        &self.tools
    }

    /// Ask the model for the next message.
    ///
    /// The result is an assistant message that either carries tool calls or
    /// has non-empty content.
    pub async fn invoke(&self, messages: &[Message], offer_tools: bool) -> Result<Message, LlmError> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            tools: if offer_tools { &self.tools[..] } else { &[] },
            temperature: self.temperature,
        };

        let call = self.client.chat_completion(request);
        let message = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, call)
                .await
                .map_err(|_| LlmError::Timeout(timeout))??,
            None => call.await?,
        };

        match &message {
            Message::Assistant { content, tool_calls } => {
                if tool_calls.is_empty() && content.trim().is_empty() {
                    return Err(LlmError::Protocol("model returned an empty response".to_string()));
                }
            }
            other => {
                return Err(LlmError::Protocol(format!(
                    "expected assistant message, got {}",
                    other.role()
                )))
            }
        }

        Ok(message)
    }
}
