//! # Documents
//!
//! Everything that happens to a document before it reaches the retrieval
//! pool:
//!
//! - **Loading**: extract raw text from `.txt`, `.md` and `.docx` files
//! - **Cleaning**: collapse whitespace and strip control characters
//! - **Chunking**: split cleaned text into overlapping segments, either by
//!   character count or by whole sentences
//!
//! ```text
//! file ──► load_document ──► clean_text ──► ChunkingStrategy::chunk ──► Vec<Chunk>
//! ```

pub mod chunker;
pub mod cleaner;
pub mod error;
pub mod loader;
pub mod sentence;

pub use chunker::{Chunk, ChunkingStrategy, chunk_by_sentences, chunk_fixed_size};
pub use cleaner::{char_len, clean_text};
pub use error::{DocumentError, Result};
pub use loader::{DocumentFormat, LoadedDocument, load_document};
pub use sentence::{Sentence, Sentences, sentences};
