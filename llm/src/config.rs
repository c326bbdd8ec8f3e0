//! Configuration for chat-completion providers.

use serde::{Deserialize, Serialize};

use crate::error::{LlmError, Result};

/// Connection and sampling settings for an OpenAI-compatible endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// API base URL, without the `/chat/completions` suffix.
    pub base_url: String,

    /// Model identifier sent with every request.
    pub model: String,

    /// Environment variable holding the API key.
    pub api_key_env: String,

    /// Default sampling temperature.
    pub temperature: f32,

    /// Default completion length limit.
    pub max_tokens: u32,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1".to_string(),
            model: "llama-3.3-70b-versatile".to_string(),
            api_key_env: "GROQ_API_KEY".to_string(),
            temperature: 0.7,
            max_tokens: 500,
            timeout_secs: 60,
        }
    }
}

impl LlmConfig {
    /// Read the API key from the configured environment variable.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(LlmError::Config("base_url must not be empty".to_string()));
        }
        if self.model.trim().is_empty() {
            return Err(LlmError::Config("model must not be empty".to_string()));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(LlmError::Config(format!(
                "temperature must be within 0.0..=2.0, got {}",
                self.temperature
            )));
        }
        if self.max_tokens == 0 {
            return Err(LlmError::Config("max_tokens must be positive".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(LlmError::Config("timeout_secs must be positive".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = LlmConfig::default();
        assert_eq!(config.model, "llama-3.3-70b-versatile");
        assert_eq!(config.max_tokens, 500);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = LlmConfig {
            temperature: 3.5,
            ..LlmConfig::default()
        };
        assert!(matches!(config.validate(), Err(LlmError::Config(_))));

        let config = LlmConfig {
            max_tokens: 0,
            ..LlmConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_key_env() {
        let config = LlmConfig {
            api_key_env: "DOCQA_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..LlmConfig::default()
        };
        assert_eq!(config.api_key(), None);
    }
}
