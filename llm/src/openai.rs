//! OpenAI-compatible chat-completions client (Groq, OpenAI, local servers).

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::LlmConfig;
use crate::error::{LlmError, Result};
use crate::provider::{ChatProvider, ChatRequest, ChatResponse};

/// Chat provider speaking the `/chat/completions` protocol.
pub struct OpenAiCompatProvider {
    /// API key.
    api_key: Option<String>,

    /// API base URL.
    base_url: String,

    /// HTTP client.
    client: reqwest::Client,

    /// Model sent with every request.
    model: String,

    /// Defaults for requests that leave them unset.
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiCompatProvider {
    /// Create a provider from configuration, reading the API key from the
    /// configured environment variable.
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            api_key: config.api_key(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
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

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// The model sent with every request.
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ChatProvider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        "openai-compatible"
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse> {
        let api_key = self.api_key.as_ref().ok_or_else(|| {
            LlmError::ProviderNotConfigured(format!("no API key for {}", self.base_url))
        })?;

        let prompt_chars = request.prompt_chars();
        debug!(
            "Requesting completion from {} with {} messages ({prompt_chars} chars)",
            self.model,
            request.messages.len()
        );

        let body = serde_json::json!({
            "model": self.model,
            "messages": request.messages,
            "temperature": request.temperature.unwrap_or(self.temperature),
            "max_tokens": request.max_tokens.unwrap_or(self.max_tokens),
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {api_key}"))
            .header("Content-Type", "application/json")
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

        let result: CompletionResponse = response.json().await?;

        let content = result
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LlmError::InvalidResponse("No choices in response".to_string()))?;

        let tokens_used = result.usage.map(|u| u.total_tokens);
        info!(
            "Received {} chars from {}",
            content.chars().count(),
            result.model
        );

        Ok(ChatResponse {
            content,
            model: result.model,
            tokens_used,
        })
    }
}

/// Chat-completions API response format.
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
    #[serde(default)]
    model: String,
    usage: Option<CompletionUsage>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CompletionUsage {
    total_tokens: u64,
}
