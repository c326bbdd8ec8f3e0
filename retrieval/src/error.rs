//! Error types for the retrieval engine.

use docqa_documents::DocumentError;
use thiserror::Error;

/// Result type alias for retrieval operations.
pub type Result<T> = std::result::Result<T, RetrievalError>;

/// Errors that can occur in the retrieval engine.
///
/// An empty result is not an error: a pool with no matching segments
/// yields `Ok(vec![])`.
#[derive(Error, Debug)]
pub enum RetrievalError {
    /// The caller broke the input contract (empty query, zero `top_k`,
    /// impossible chunk window, ...).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Document processing error.
    #[error("document error: {0}")]
    Document(DocumentError),
}

impl From<DocumentError> for RetrievalError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::InvalidInput(reason) => Self::InvalidInput(reason),
            other => Self::Document(other),
        }
    }
}
