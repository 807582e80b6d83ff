//! Core agent loop implementation.

use futures::future::join_all;
use thiserror::Error;

use crate::config::{Config, ToolGating, DEFAULT_MAX_ITERATIONS};
use crate::conversation::ConversationStore;
use crate::llm::LlmError;
use crate::message::{Message, ToolCallRequest, ToolOutput, ToolResult};
use crate::tools::ToolRegistry;

use super::gateway::ModelGateway;
use super::policy::{decide, Decision};
use super::prompt::{build_system_prompt, mentions_time};

/// Errors that abort a turn.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Model(#[from] LlmError),

    #[error("Turn exceeded {limit} model calls without a final answer")]
    TurnLimitExceeded { limit: usize },
}

/// Result of a completed turn.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    /// Content of the final assistant message.
    pub answer: String,
    /// Number of model calls made.
    pub iterations: usize,
    /// Number of tool calls executed.
    pub tool_calls: usize,
}

/// The agent: alternates between asking the model and running requested tools.
pub struct Agent {
    gateway: ModelGateway,
    tools: ToolRegistry,
    max_iterations: usize,
    tool_gating: ToolGating,
}

impl Agent {
    pub fn new(gateway: ModelGateway, tools: ToolRegistry) -> Self {
        Self {
            gateway,
            tools,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tool_gating: ToolGating::Prompt,
        }
    }

    /// Agent talking to the Ollama backend described by `config`, with the default tools.
    pub fn from_config(config: &Config) -> Result<Self, LlmError> {
        let tools = ToolRegistry::new();
        let gateway = ModelGateway::from_config(config, &tools)?;
        Ok(Self::new(gateway, tools)
            .with_max_iterations(config.max_iterations)
            .with_tool_gating(config.tool_gating))
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    pub fn with_tool_gating(mut self, tool_gating: ToolGating) -> Self {
        self.tool_gating = tool_gating;
        self
    }

    pub fn gateway(&self) -> &ModelGateway {
        &self.gateway
    }

    /// Run one turn: append `user_text` to `messages` and loop until the model
    /// answers without tool calls.
    ///
    /// Every message produced is appended to `messages`, including on error.
    pub async fn run_turn(
        &self,
        messages: &mut Vec<Message>,
        user_text: &str,
    ) -> Result<TurnOutcome, AgentError> {
        ensure_system_prompt(messages);
        messages.push(Message::user(user_text));

        let offer_tools = match self.tool_gating {
            ToolGating::Prompt => true,
            ToolGating::Keyword => mentions_time(user_text),
        };
        if !offer_tools {
            tracing::debug!("No time trigger in user text; tools withheld");
        }

        let mut tool_calls = 0;
        for iteration in 0..self.max_iterations {
            tracing::debug!("Agent iteration {}", iteration + 1);

            let response = self.gateway.invoke(messages, offer_tools).await?;
            let decision = decide(&response);
            let requested = response.tool_calls().to_vec();
            messages.push(response);

            match decision {
                Decision::Stop => {
                    let answer = messages.last().map(Message::content).unwrap_or_default();
                    tracing::info!(
                        "Turn finished after {} model call(s), {} tool call(s)",
                        iteration + 1,
                        tool_calls
                    );
                    return Ok(TurnOutcome {
                        answer,
                        iterations: iteration + 1,
                        tool_calls,
                    });
                }
                Decision::Continue => {
                    tool_calls += requested.len();
                    let results = self.execute_tool_calls(&requested).await;
                    messages.extend(results);
                }
            }
        }

        tracing::warn!("Turn hit the limit of {} model calls", self.max_iterations);
        Err(AgentError::TurnLimitExceeded {
            limit: self.max_iterations,
        })
    }

    /// Run one turn against a stored conversation.
    ///
    /// The stored history is only updated when the turn succeeds.
    pub async fn chat<S>(&self, store: &S, conversation_id: &str, user_text: &str) -> Result<TurnOutcome, AgentError>
    where
        S: ConversationStore + ?Sized,
    {
        let mut messages = store.load(conversation_id).await;
        let outcome = self.run_turn(&mut messages, user_text).await?;
        store.save(conversation_id, messages).await;
        Ok(outcome)
    }

    /// Execute tool calls concurrently; results come back in request order.
    async fn execute_tool_calls(&self, calls: &[ToolCallRequest]) -> Vec<Message> {
        join_all(calls.iter().map(|call| self.execute_tool_call(call))).await
    }

    async fn execute_tool_call(&self, call: &ToolCallRequest) -> Message {
        let start = tokio::time::Instant::now();
        tracing::info!("Executing tool {} (id: {})", call.name, call.id);

        let output = match self.tools.execute(&call.name, call.arguments.clone()).await {
            Ok(value) => ToolOutput::Success { value },
            Err(e) => {
                tracing::warn!("Tool {} (id: {}) failed: {}", call.name, call.id, e);
                ToolOutput::Error {
                    kind: e.kind().to_string(),
                    message: e.to_string(),
                }
            }
        };
        tracing::debug!("Tool {} finished in {:?}", call.name, start.elapsed());

        Message::Tool(ToolResult {
            tool_call_id: call.id.clone(),
            name: call.name.clone(),
            output,
        })
    }
}

/// Put the system instruction at index 0 unless it is already there.
fn ensure_system_prompt(messages: &mut Vec<Message>) {
    if !messages.first().is_some_and(Message::is_system) {
        messages.insert(0, Message::system(build_system_prompt()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_prompt_is_inserted_once() {
        let mut messages = vec![Message::user("hi"), Message::assistant("hello")];
        ensure_system_prompt(&mut messages);
        ensure_system_prompt(&mut messages);

        assert!(messages[0].is_system());
        assert_eq!(messages.iter().filter(|m| m.is_system()).count(), 1);
        assert_eq!(messages.len(), 3);
    }

    #[test]
    fn existing_system_prompt_is_kept() {
        let mut messages = vec![Message::system("custom")];
        ensure_system_prompt(&mut messages);
        assert_eq!(messages, vec![Message::system("custom")]);
    }
}
