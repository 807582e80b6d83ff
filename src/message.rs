//! Conversation message types.
//!
//! A conversation is an append-only sequence of [`Message`]s. Tool calls are
//! only ever produced by the model backend; tool results are correlated back
//! to them by identifier.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single message in a conversation, tagged by role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Message {
    /// Fixed instruction for the assistant. Only ever at index 0.
    System { content: String },
    /// Text typed by the user.
    User { content: String },
    /// Model output. `content` may be empty when tool calls are present.
    Assistant {
        content: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tool_calls: Vec<ToolCallRequest>,
    },
    /// Outcome of one executed tool call.
    Tool(ToolResult),
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self::System {
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::User {
            content: content.into(),
        }
    }

    /// Assistant message without tool calls (a final answer).
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::Assistant {
            content: content.into(),
            tool_calls: Vec::new(),
        }
    }

    pub fn assistant_with_calls(content: impl Into<String>, tool_calls: Vec<ToolCallRequest>) -> Self {
        Self::Assistant {
            content: content.into(),
            tool_calls,
        }
    }

    pub fn role(&self) -> &'static str {
        match self {
            Self::System { .. } => "system",
            Self::User { .. } => "user",
            Self::Assistant { .. } => "assistant",
            Self::Tool(_) => "tool",
        }
    }

    /// Textual content. Tool results render their payload as JSON.
    pub fn content(&self) -> String {
        match self {
            Self::System { content } | Self::User { content } | Self::Assistant { content, .. } => {
                content.clone()
            }
            Self::Tool(result) => result.output.to_content(),
        }
    }

    /// Tool calls requested by an assistant message; empty for every other role.
    pub fn tool_calls(&self) -> &[ToolCallRequest] {
        match self {
            Self::Assistant { tool_calls, .. } => tool_calls,
            _ => &[],
        }
    }

    pub fn is_system(&self) -> bool {
        matches!(self, Self::System { .. })
    }
}

/// A tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// Correlates the request with its eventual [`ToolResult`].
    pub id: String,
    pub name: String,
    /// Argument object; `{}` for tools that take none.
    #[serde(default)]
    pub arguments: Value,
}

/// Result of executing a [`ToolCallRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub tool_call_id: String,
    pub name: String,
    pub output: ToolOutput,
}

impl ToolResult {
    pub fn is_error(&self) -> bool {
        matches!(self.output, ToolOutput::Error { .. })
    }
}

/// Payload of a tool result: either the tool's structured value or a failure
/// report the model can read and recover from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ToolOutput {
    Success { value: Value },
    Error { kind: String, message: String },
}

impl ToolOutput {
    /// JSON text sent to the model as the tool message content.
    pub fn to_content(&self) -> String {
        match self {
            Self::Success { value } => value.to_string(),
            Self::Error { kind, message } => {
                serde_json::json!({ "error": kind, "message": message }).to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn only_assistant_messages_carry_tool_calls() {
        let call = ToolCallRequest {
            id: "call-1".to_string(),
            name: "get_current_time".to_string(),
            arguments: json!({}),
        };
        let msg = Message::assistant_with_calls("", vec![call.clone()]);
        assert_eq!(msg.tool_calls(), &[call]);
        assert!(Message::user("hi").tool_calls().is_empty());
        assert!(Message::assistant("done").tool_calls().is_empty());
    }

    #[test]
    fn tool_output_content_is_json() {
        let ok = ToolOutput::Success {
            value: json!({ "utc": "2025-05-21T06:42:00Z" }),
        };
        assert_eq!(ok.to_content(), r#"{"utc":"2025-05-21T06:42:00Z"}"#);

        let err = ToolOutput::Error {
            kind: "unknown_tool".to_string(),
            message: "Unknown tool: weather".to_string(),
        };
        let parsed: Value = serde_json::from_str(&err.to_content()).expect("valid json");
        assert_eq!(parsed["error"], "unknown_tool");
    }

    #[test]
    fn messages_serialize_with_role_tag() {
        let value = serde_json::to_value(Message::user("hello")).expect("serialize");
        assert_eq!(value, json!({ "role": "user", "content": "hello" }));
    }
}
