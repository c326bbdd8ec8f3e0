//! Error types for the assistant.

use docqa_documents::DocumentError;
use docqa_llm::LlmError;
use docqa_retrieval::RetrievalError;
use thiserror::Error;

/// Result type alias for assistant operations.
pub type Result<T> = std::result::Result<T, AssistantError>;

/// Errors that can occur while answering or generating study material.
#[derive(Error, Debug)]
pub enum AssistantError {
    /// A study tool was invoked before any document was loaded.
    #[error("no documents loaded")]
    NoDocuments,

    /// The model answered, but not in the requested format.
    #[error("malformed model output: {0}")]
    MalformedOutput(String),

    /// Invalid argument.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Retrieval error.
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    /// Document loading error.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// LLM provider error.
    #[error(transparent)]
    Llm(#[from] LlmError),
}
