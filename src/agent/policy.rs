//! Decides whether a turn goes on to tool execution or ends.

use crate::message::Message;

/// Outcome of [`decide`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Execute the requested tool calls and ask the model again.
    Continue,
    /// The message is the turn's final answer.
    Stop,
}

/// Continue iff `last` is an assistant message with at least one tool call.
pub fn decide(last: &Message) -> Decision {
    match last {
        Message::Assistant { tool_calls, .. } if !tool_calls.is_empty() => Decision::Continue,
        _ => Decision::Stop,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::ToolCallRequest;
    use serde_json::json;

    #[test]
    fn continues_only_on_tool_calls() {
        let call = ToolCallRequest {
            id: "a".to_string(),
            name: "get_current_time".to_string(),
            arguments: json!({}),
        };
        assert_eq!(decide(&Message::assistant_with_calls("", vec![call])), Decision::Continue);
        assert_eq!(decide(&Message::assistant("It is noon.")), Decision::Stop);
        assert_eq!(decide(&Message::assistant_with_calls("", vec![])), Decision::Stop);
        assert_eq!(decide(&Message::user("what time is it")), Decision::Stop);
        assert_eq!(decide(&Message::system("be nice")), Decision::Stop);
    }
}
