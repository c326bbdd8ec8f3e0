//! Error types for LLM providers.

use thiserror::Error;

/// Result type alias for LLM operations.
pub type Result<T> = std::result::Result<T, LlmError>;

/// Errors that can occur while talking to a chat-completion provider.
#[derive(Error, Debug)]
pub enum LlmError {
    /// Provider not configured (usually a missing API key).
    #[error("LLM provider not configured: {0}")]
    ProviderNotConfigured(String),

    /// API request failed.
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// Invalid response from provider.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded.
    #[error("rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}
