//! Configuration management for clockbot.
//!
//! Configuration can be set via environment variables:
//! - `OLLAMA_BASE_URL` - Optional. Model backend location. Defaults to `http://localhost:11434`.
//! - `DEFAULT_MODEL` - Optional. Model name; must support tool calling. Defaults to `llama3.2`.
//! - `TEMPERATURE` - Optional. Sampling temperature. Defaults to `0.2`.
//! - `MAX_ITERATIONS` - Optional. Model calls allowed per turn. Defaults to `8`.
//! - `REQUEST_TIMEOUT_SECS` - Optional. Timeout for one model call. Defaults to `120`.
//! - `TOOL_GATING` - Optional. `prompt` or `keyword`. Defaults to `prompt`.
//! - `CONVERSATION_ID` - Optional. Conversation key used by the console. Defaults to `console`.

use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "llama3.2";
/// Low temperature keeps tool-use decisions stable.
pub const DEFAULT_TEMPERATURE: f32 = 0.2;
pub const DEFAULT_MAX_ITERATIONS: usize = 8;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// When the tool catalogue is offered to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolGating {
    /// Always offer tools; the system prompt tells the model when to use them.
    #[default]
    Prompt,
    /// Offer tools only when the user's text contains a time trigger phrase.
    Keyword,
}

impl FromStr for ToolGating {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "prompt" => Ok(Self::Prompt),
            "keyword" => Ok(Self::Keyword),
            other => Err(format!("expected 'prompt' or 'keyword', got: {}", other)),
        }
    }
}

/// Agent configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Ollama server URL
    pub base_url: String,

    /// Model identifier
    pub model: String,

    /// Sampling temperature bound into every model call
    pub temperature: f32,

    /// Maximum model calls in a single turn
    pub max_iterations: usize,

    /// Timeout for one model call
    pub request_timeout: Duration,

    pub tool_gating: ToolGating,

    /// Conversation key for the console session
    pub conversation_id: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("OLLAMA_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let model = lookup("DEFAULT_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let temperature: f32 = parse_var(&lookup, "TEMPERATURE")?.unwrap_or(DEFAULT_TEMPERATURE);
        if !(0.0..=2.0).contains(&temperature) {
            return Err(ConfigError::InvalidValue(
                "TEMPERATURE".to_string(),
                format!("{} is outside 0.0..=2.0", temperature),
            ));
        }

        let max_iterations: usize =
            parse_var(&lookup, "MAX_ITERATIONS")?.unwrap_or(DEFAULT_MAX_ITERATIONS);
        if max_iterations == 0 {
            return Err(ConfigError::InvalidValue(
                "MAX_ITERATIONS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let request_timeout = Duration::from_secs(
            parse_var(&lookup, "REQUEST_TIMEOUT_SECS")?.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        );

        let tool_gating = parse_var(&lookup, "TOOL_GATING")?.unwrap_or_default();

        let conversation_id = lookup("CONVERSATION_ID")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "console".to_string());

        Ok(Self {
            base_url,
            model,
            temperature,
            max_iterations,
            request_timeout,
            tool_gating,
            conversation_id,
        })
    }

    /// Create a config with custom values (useful for testing).
    pub fn new(base_url: String, model: String) -> Self {
        Self {
            base_url,
            model,
            temperature: DEFAULT_TEMPERATURE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            tool_gating: ToolGating::Prompt,
            conversation_id: "console".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL.to_string(), DEFAULT_MODEL.to_string())
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| {
            v.trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidValue(key.to_string(), format!("{}", e)))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_lookup(lookup_from(&[])).expect("defaults load");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model, "llama3.2");
        assert_eq!(config.temperature, 0.2);
        assert_eq!(config.max_iterations, DEFAULT_MAX_ITERATIONS);
        assert_eq!(config.tool_gating, ToolGating::Prompt);
        assert_eq!(config.conversation_id, "console");
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("OLLAMA_BASE_URL", "http://gpu-box:11434"),
            ("MAX_ITERATIONS", "3"),
            ("REQUEST_TIMEOUT_SECS", "5"),
            ("TOOL_GATING", "Keyword"),
        ]))
        .expect("overrides load");
        assert_eq!(config.base_url, "http://gpu-box:11434");
        assert_eq!(config.max_iterations, 3);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.tool_gating, ToolGating::Keyword);
    }

    #[test]
    fn rejects_invalid_values() {
        for (key, value) in [
            ("MAX_ITERATIONS", "lots"),
            ("MAX_ITERATIONS", "0"),
            ("TEMPERATURE", "5"),
            ("TOOL_GATING", "regex"),
        ] {
            let err = Config::from_lookup(lookup_from(&[(key, value)])).expect_err(key);
            assert!(matches!(err, ConfigError::InvalidValue(ref k, _) if k == key));
        }
    }
}
