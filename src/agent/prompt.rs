//! System prompt and time trigger phrases.

/// Phrases that count as the user asking about the time.
pub const TIME_TRIGGERS: &[&str] = &[
    "время",
    "час",
    "сколько времени",
    "который час",
    "time",
    "utc",
    "what time",
];

/// Build the fixed system instruction placed at the head of every conversation.
pub fn build_system_prompt() -> String {
    let triggers = TIME_TRIGGERS
        .iter()
        .map(|t| format!("\"{}\"", t))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"You are a friendly assistant.
IMPORTANT: Use the get_current_time tool ONLY when the user explicitly asks about time.
Time keywords: {triggers}.
In all other cases, just answer user questions without using tools."#
    )
}

/// Whether `text` contains any time trigger phrase (case-insensitive substring match).
pub fn mentions_time(text: &str) -> bool {
    let text = text.to_lowercase();
    TIME_TRIGGERS.iter().any(|t| text.contains(t))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_lists_every_trigger() {
        let prompt = build_system_prompt();
        for trigger in TIME_TRIGGERS {
            assert!(prompt.contains(&format!("\"{}\"", trigger)), "missing {trigger}");
        }
        assert!(prompt.contains("get_current_time"));
    }

    #[test]
    fn trigger_matching_ignores_case() {
        assert!(mentions_time("What TIME is it now?"));
        assert!(mentions_time("Сколько сейчас времени?"));
        assert!(mentions_time("Который ЧАС?"));
        assert!(mentions_time("convert to UTC please"));
        assert!(!mentions_time("Tell me a joke"));
        assert!(!mentions_time("Привет!"));
    }
}
