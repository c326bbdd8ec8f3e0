//! Text-to-speech for generated audio scripts.
//!
//! [`GoogleTtsProvider`] speaks the Google Cloud `text:synthesize` REST
//! protocol and returns the decoded audio bytes.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{LlmError, Result};

/// Google Cloud limit on the input of a single synthesis request, in bytes.
pub const MAX_SPEECH_INPUT_BYTES: usize = 5000;

/// Voice and endpoint settings for speech synthesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// API base URL, without the `/text:synthesize` suffix.
    pub base_url: String,

    /// Environment variable holding the API key.
    pub api_key_env: String,

    /// BCP-47 language code of the voice.
    pub language_code: String,

    /// Voice name.
    pub voice: String,

    /// Output encoding, e.g. `MP3` or `OGG_OPUS`.
    pub audio_encoding: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            base_url: "https://texttospeech.googleapis.com/v1".to_string(),
            api_key_env: "GOOGLE_API_KEY".to_string(),
            language_code: "en-US".to_string(),
            voice: "en-US-Neural2-F".to_string(),
            audio_encoding: "MP3".to_string(),
            timeout_secs: 60,
        }
    }
}

impl SpeechConfig {
    /// Read the API key from the configured environment variable.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("speech base_url", &self.base_url),
            ("speech language_code", &self.language_code),
            ("speech voice", &self.voice),
            ("speech audio_encoding", &self.audio_encoding),
        ] {
            if value.trim().is_empty() {
                return Err(LlmError::Config(format!("{name} must not be empty")));
            }
        }
        if self.timeout_secs == 0 {
            return Err(LlmError::Config(
                "speech timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Trait for text-to-speech providers.
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    /// Get the name of this provider.
    fn name(&self) -> &str;

    /// Check if the provider is available (API key set, etc.).
    fn is_available(&self) -> bool;

    /// Synthesize `text` into encoded audio.
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>>;
}

/// Speech provider for the Google Cloud Text-to-Speech REST API.
pub struct GoogleTtsProvider {
    api_key: Option<String>,
    base_url: String,
    client: reqwest::Client,
    language_code: String,
    voice: String,
    audio_encoding: String,
}

impl GoogleTtsProvider {
    /// Create a provider from configuration, reading the API key from the
    /// configured environment variable.
    pub fn from_config(config: &SpeechConfig) -> Result<Self> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            api_key: config.api_key(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
            language_code: config.language_code.clone(),
            voice: config.voice.clone(),
            audio_encoding: config.audio_encoding.clone(),
        })
    }

    /// Set the API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl SpeechProvider for GoogleTtsProvider {
    fn name(&self) -> &str {
        "google-tts"
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        let api_key = self.api_key.as_ref().ok_or_else(|| {
            LlmError::ProviderNotConfigured(format!("no API key for {}", self.base_url))
        })?;
        if text.trim().is_empty() {
            return Err(LlmError::ApiRequest("nothing to synthesize".to_string()));
        }
        if text.len() > MAX_SPEECH_INPUT_BYTES {
            return Err(LlmError::ApiRequest(format!(
                "speech input is {} bytes, limit is {MAX_SPEECH_INPUT_BYTES}",
                text.len()
            )));
        }

        debug!("Synthesizing {} chars with voice {}", text.chars().count(), self.voice);

        let body = serde_json::json!({
            "input": { "text": text },
            "voice": { "languageCode": self.language_code, "name": self.voice },
            "audioConfig": { "audioEncoding": self.audio_encoding },
        });

        let response = self
            .client
            .post(format!("{}/text:synthesize", self.base_url))
            .header("X-Goog-Api-Key", api_key)
            .json(&body)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(60);

            return Err(LlmError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiRequest(format!("{status}: {error_text}")));
        }

        let result: SynthesizeResponse = response.json().await?;
        let encoded = result
            .audio_content
            .filter(|content| !content.is_empty())
            .ok_or_else(|| LlmError::InvalidResponse("No audio content in response".to_string()))?;
        let audio = STANDARD
            .decode(encoded)
            .map_err(|e| LlmError::InvalidResponse(format!("audio content is not base64: {e}")))?;

        info!("Received {} bytes of {} audio", audio.len(), self.audio_encoding);
        Ok(audio)
    }
}

/// `text:synthesize` response format.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    audio_content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config_without_key() -> SpeechConfig {
        SpeechConfig {
            api_key_env: "DOCQA_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..SpeechConfig::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = SpeechConfig::default();
        assert_eq!(config.voice, "en-US-Neural2-F");
        assert_eq!(config.audio_encoding, "MP3");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_voice() {
        let config = SpeechConfig {
            voice: " ".to_string(),
            ..SpeechConfig::default()
        };
        assert!(matches!(config.validate(), Err(LlmError::Config(_))));
    }

    #[test]
    fn test_availability_follows_key() {
        let provider = GoogleTtsProvider::from_config(&config_without_key()).unwrap();
        assert!(!provider.is_available());
        assert!(provider.with_api_key("g-test").is_available());
    }

    #[tokio::test]
    async fn test_missing_key_is_not_configured() {
        let provider = GoogleTtsProvider::from_config(&config_without_key()).unwrap();
        assert!(matches!(
            provider.synthesize("hello").await,
            Err(LlmError::ProviderNotConfigured(_))
        ));
    }

    #[tokio::test]
    async fn test_oversized_input_rejected_before_request() {
        let provider = GoogleTtsProvider::from_config(&config_without_key())
            .unwrap()
            .with_api_key("g-test")
            .with_base_url("http://127.0.0.1:9");
        let text = "a".repeat(MAX_SPEECH_INPUT_BYTES + 1);
        assert!(matches!(
            provider.synthesize(&text).await,
            Err(LlmError::ApiRequest(_))
        ));
    }
}
