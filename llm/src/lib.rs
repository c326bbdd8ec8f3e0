//! # LLM
//!
//! The external language model, seen from the rest of the workspace as an
//! opaque collaborator: a prompt goes in, generated text comes out.
//!
//! - [`ChatProvider`]: the async trait callers program against
//! - [`OpenAiCompatProvider`]: `/chat/completions` over HTTP, defaulting
//!   to Groq's OpenAI-compatible endpoint
//! - [`SpeechProvider`] / [`GoogleTtsProvider`]: optional text-to-speech
//!   for audio scripts
//!
//! Retries and backoff are left to callers; a rate limit surfaces as
//! [`LlmError::RateLimited`] carrying the server's retry hint.

pub mod config;
pub mod error;
pub mod openai;
pub mod provider;
pub mod speech;

pub use config::LlmConfig;
pub use error::{LlmError, Result};
pub use openai::OpenAiCompatProvider;
pub use provider::{ChatMessage, ChatProvider, ChatRequest, ChatResponse, Role};
pub use speech::{GoogleTtsProvider, MAX_SPEECH_INPUT_BYTES, SpeechConfig, SpeechProvider};
