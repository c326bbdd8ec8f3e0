//! Error types for document processing.

use thiserror::Error;

/// Result type alias for document operations.
pub type Result<T> = std::result::Result<T, DocumentError>;

/// Errors that can occur while loading or chunking documents.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// Chunking parameters or input violated the caller contract.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// File extension is not one we can extract text from.
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// The document contained no text after extraction.
    #[error("document is empty or could not be read: {0}")]
    EmptyDocument(String),

    /// PDF structure or content stream error.
    #[error("pdf error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// ZIP container error (DOCX files).
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
