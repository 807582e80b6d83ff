//! Agent module - the conversational tool loop.
//!
//! The agent follows a "tools in a loop" pattern:
//! 1. Prepend the system prompt (once) and append the user's message
//! 2. Call the model with the available tools
//! 3. If the model requests tool calls, execute them and feed the results back
//! 4. Repeat until the model produces a final answer or max iterations reached

mod agent_loop;
mod gateway;
mod policy;
mod prompt;

pub use agent_loop::{Agent, AgentError, TurnOutcome};
pub use gateway::ModelGateway;
pub use policy::{decide, Decision};
pub use prompt::{build_system_prompt, mentions_time, TIME_TRIGGERS};
