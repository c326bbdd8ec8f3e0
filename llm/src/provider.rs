//! The chat-completion provider abstraction.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Speaker of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One message of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    /// A system instruction.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// A user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// A model turn.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Request for a chat completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Conversation so far.
    pub messages: Vec<ChatMessage>,

    /// Sampling temperature (provider default if unset).
    pub temperature: Option<f32>,

    /// Completion length limit (provider default if unset).
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    /// Create a request from a list of messages.
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            temperature: None,
            max_tokens: None,
        }
    }

    /// A single user prompt.
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self::new(vec![ChatMessage::user(prompt)])
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the completion length limit.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Total characters across all messages.
    pub fn prompt_chars(&self) -> usize {
        self.messages.iter().map(|m| m.content.chars().count()).sum()
    }
}

/// Response from a chat completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Generated text.
    pub content: String,

    /// Model that produced the text.
    pub model: String,

    /// Token usage (if reported).
    pub tokens_used: Option<u64>,
}

/// Trait for chat-completion providers.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Get the name of this provider.
    fn name(&self) -> &str;

    /// Check if the provider is available (API key set, etc.).
    fn is_available(&self) -> bool;

    /// Generate a completion for the given conversation.
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse>;
}

#[async_trait]
impl<P: ChatProvider + ?Sized> ChatProvider for std::sync::Arc<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse> {
        (**self).complete(request).await
    }
}
