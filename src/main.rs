//! clockbot - interactive console entry point.
//!
//! Reads one line per turn and prints the agent's answer.

use std::io::Write;

use clockbot::agent::Agent;
use clockbot::config::Config;
use clockbot::conversation::{ConversationStore, InMemoryConversationStore};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Inputs that end the session (compared case-insensitively).
const EXIT_COMMANDS: &[&str] = &["quit", "exit", "выход"];

const RESET_COMMAND: &str = "/reset";

fn is_exit_command(input: &str) -> bool {
    let input = input.trim().to_lowercase();
    EXIT_COMMANDS.iter().any(|c| *c == input)
}

fn prompt() -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    write!(stdout, "\nYou: ")?;
    stdout.flush()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they do not interleave with the transcript
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clockbot=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env()?;
    info!(
        "Loaded configuration: model={}, backend={}, gating={:?}",
        config.model, config.base_url, config.tool_gating
    );

    let agent = Agent::from_config(&config)?;
    let store = InMemoryConversationStore::new();

    println!("Bot started, write something to it");
    println!("Try asking: 'What time is it now?' or 'Сколько сейчас времени?'");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt()?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => break,
        };
        let Some(line) = line else { break };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if is_exit_command(input) {
            break;
        }
        if input.eq_ignore_ascii_case(RESET_COMMAND) {
            store.clear(&config.conversation_id).await;
            println!("Conversation cleared.");
            continue;
        }

        let result = tokio::select! {
            result = agent.chat(&store, &config.conversation_id, input) => result,
            _ = tokio::signal::ctrl_c() => break,
        };
        match result {
            Ok(outcome) => println!("Bot: {}", outcome.answer),
            Err(e) => {
                tracing::error!("Turn failed: {:?}", e);
                println!("Error: {}", e);
            }
        }
    }

    println!("Goodbye!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_commands_ignore_case() {
        assert!(is_exit_command("quit"));
        assert!(is_exit_command("EXIT"));
        assert!(is_exit_command("Выход"));
        assert!(is_exit_command("  exit \n"));
        assert!(!is_exit_command("exit now"));
        assert!(!is_exit_command("what time is it"));
    }
}
