//! Assistant configuration, loadable from TOML.

use std::path::Path;

use docqa_llm::{LlmConfig, SpeechConfig};
use docqa_retrieval::RetrievalConfig;
use serde::{Deserialize, Serialize};

use crate::error::{AssistantError, Result};

/// Top-level configuration. Every field is optional in the TOML file.
///
/// ```toml
/// max_context_chars = 8000
///
/// [retrieval]
/// top_k = 5
///
/// [retrieval.chunking]
/// strategy = "sentences"
/// sentences_per_chunk = 4
/// overlap_sentences = 1
///
/// [llm]
/// model = "llama-3.1-8b-instant"
///
/// [speech]
/// voice = "en-GB-Neural2-A"
/// language_code = "en-GB"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Chunking and ranking.
    pub retrieval: RetrievalConfig,

    /// Chat-completion endpoint.
    pub llm: LlmConfig,

    /// Text-to-speech for audio overviews.
    pub speech: SpeechConfig,

    /// Upper bound on the context text placed in a single prompt.
    pub max_context_chars: usize,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            retrieval: RetrievalConfig::default(),
            llm: LlmConfig::default(),
            speech: SpeechConfig::default(),
            max_context_chars: 12_000,
        }
    }
}

impl AssistantConfig {
    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AssistantError::Config(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse config from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| AssistantError::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.retrieval.validate()?;
        self.llm.validate()?;
        self.speech.validate()?;
        if self.max_context_chars == 0 {
            return Err(AssistantError::Config(
                "max_context_chars must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docqa_retrieval::{ChunkingStrategy, ScoringWeights};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = AssistantConfig::from_toml_str("").unwrap();
        assert_eq!(config, AssistantConfig::default());
    }

    #[test]
    fn test_partial_toml() {
        let config = AssistantConfig::from_toml_str(
            r#"
max_context_chars = 8000

[retrieval]
top_k = 5

[retrieval.weights]
jaccard = 0.5
tfidf = 0.5

[retrieval.chunking]
strategy = "sentences"
sentences_per_chunk = 4
overlap_sentences = 1

[llm]
model = "llama-3.1-8b-instant"

[speech]
voice = "en-GB-Neural2-A"
"#,
        )
        .unwrap();

        assert_eq!(config.max_context_chars, 8000);
        assert_eq!(config.retrieval.top_k, 5);
        assert_eq!(config.retrieval.weights, ScoringWeights::new(0.5, 0.5));
        assert_eq!(
            config.retrieval.chunking,
            ChunkingStrategy::Sentences {
                sentences_per_chunk: 4,
                overlap_sentences: 1
            }
        );
        assert_eq!(config.llm.model, "llama-3.1-8b-instant");
        assert_eq!(config.llm.api_key_env, "GROQ_API_KEY");
        assert_eq!(config.speech.voice, "en-GB-Neural2-A");
        assert_eq!(config.speech.api_key_env, "GOOGLE_API_KEY");
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = AssistantConfig::from_toml_str(
            r#"
[retrieval.chunking]
strategy = "fixed_size"
chunk_size = 100
overlap = 100
"#,
        )
        .unwrap_err();
        assert!(matches!(err, AssistantError::Retrieval(_)));

        assert!(matches!(
            AssistantConfig::from_toml_str("max_context_chars = 0"),
            Err(AssistantError::Config(_))
        ));
        assert!(matches!(
            AssistantConfig::from_toml_str("max_context_chars = \"many\""),
            Err(AssistantError::Config(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docqa.toml");
        std::fs::write(&path, "[retrieval]\ntop_k = 7\n").unwrap();
        assert_eq!(AssistantConfig::load_from(&path).unwrap().retrieval.top_k, 7);

        assert!(AssistantConfig::load_from(&dir.path().join("missing.toml")).is_err());
    }
}
