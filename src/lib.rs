//! # clockbot
//!
//! A minimal conversational agent that can tell the current UTC time.
//!
//! This library provides:
//! - A tool-based agent loop over an append-only message history
//! - A single tool, `get_current_time`
//! - Integration with Ollama for LLM access
//!
//! ## Architecture
//!
//! The agent follows the "tools in a loop" pattern:
//! 1. Receive a user message for a conversation
//! 2. Call the model with the history and the tool catalogue
//! 3. Execute any requested tool calls and append their results
//! 4. Feed results back to the model, repeat until it answers
//!
//! ## Example
//!
//! ```rust,ignore
//! use clockbot::{agent::Agent, config::Config, conversation::InMemoryConversationStore};
//!
//! let config = Config::from_env()?;
//! let agent = Agent::from_config(&config)?;
//! let store = InMemoryConversationStore::new();
//! let outcome = agent.chat(&store, "console", "What time is it?").await?;
//! println!("{}", outcome.answer);
//! ```

pub mod agent;
pub mod config;
pub mod conversation;
pub mod llm;
pub mod message;
pub mod tools;

pub use config::Config;
