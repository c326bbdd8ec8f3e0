//! Document chunking for lexical retrieval.
//!
//! Two strategies are available:
//!
//! - [`chunk_fixed_size`]: sliding window over characters. Cheap and fully
//!   predictable, but may cut a sentence in half.
//! - [`chunk_by_sentences`]: sliding window over sentences, so a chunk
//!   never starts or ends mid-sentence.
//!
//! Both are pure functions of their input. Offsets are char offsets into
//! the text that was passed in (normally the output of
//! [`clean_text`](crate::cleaner::clean_text)).

use serde::{Deserialize, Serialize};

use crate::error::{DocumentError, Result};
use crate::sentence::{Sentence, sentences};

/// A contiguous span of a document's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// The actual text content.
    pub content: String,

    /// Char offset of the first character in the source text.
    pub start_offset: usize,

    /// Char offset one past the last character in the source text.
    pub end_offset: usize,
}

impl Chunk {
    /// Create a new chunk.
    pub fn new(content: impl Into<String>, start_offset: usize, end_offset: usize) -> Self {
        Self {
            content: content.into(),
            start_offset,
            end_offset,
        }
    }

    /// Length of the chunk in characters.
    pub fn char_len(&self) -> usize {
        self.end_offset - self.start_offset
    }
}

/// How a document is split into chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum ChunkingStrategy {
    /// Fixed character windows.
    FixedSize {
        /// Window size in characters.
        chunk_size: usize,
        /// Characters shared by consecutive windows.
        overlap: usize,
    },
    /// Sentence windows.
    Sentences {
        /// Sentences per chunk.
        sentences_per_chunk: usize,
        /// Sentences repeated at the start of the next chunk.
        overlap_sentences: usize,
    },
}

impl Default for ChunkingStrategy {
    fn default() -> Self {
        Self::FixedSize {
            chunk_size: 1000,
            overlap: 200,
        }
    }
}

impl ChunkingStrategy {
    /// Check the window parameters without chunking anything.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::FixedSize {
                chunk_size,
                overlap,
            } => validate_window(chunk_size, overlap, "chunk_size", "overlap"),
            Self::Sentences {
                sentences_per_chunk,
                overlap_sentences,
            } => validate_window(
                sentences_per_chunk,
                overlap_sentences,
                "sentences_per_chunk",
                "overlap_sentences",
            ),
        }
    }

    /// Chunk `text` with this strategy.
    pub fn chunk(&self, text: &str) -> Result<Vec<Chunk>> {
        match *self {
            Self::FixedSize {
                chunk_size,
                overlap,
            } => chunk_fixed_size(text, chunk_size, overlap),
            Self::Sentences {
                sentences_per_chunk,
                overlap_sentences,
            } => chunk_by_sentences(text, sentences_per_chunk, overlap_sentences),
        }
    }
}

fn validate_window(size: usize, overlap: usize, size_name: &str, overlap_name: &str) -> Result<()> {
    if size == 0 {
        return Err(DocumentError::InvalidInput(format!(
            "{size_name} must be positive"
        )));
    }
    if overlap >= size {
        return Err(DocumentError::InvalidInput(format!(
            "{overlap_name} ({overlap}) must be smaller than {size_name} ({size})"
        )));
    }
    Ok(())
}

/// Split `text` into windows of `chunk_size` characters, each starting
/// `chunk_size - overlap` characters after the previous one.
///
/// The last window is the first one that reaches the end of the text and
/// may be shorter than `chunk_size`. Empty text yields no chunks.
pub fn chunk_fixed_size(text: &str, chunk_size: usize, overlap: usize) -> Result<Vec<Chunk>> {
    validate_window(chunk_size, overlap, "chunk_size", "overlap")?;

    // Byte offset of every char boundary, including the end of the text.
    let boundaries: Vec<usize> = text
        .char_indices()
        .map(|(idx, _)| idx)
        .chain(std::iter::once(text.len()))
        .collect();
    let len = boundaries.len() - 1;
    let step = chunk_size - overlap;

    let mut chunks = Vec::with_capacity(len.div_ceil(step));
    let mut pos = 0;
    while pos < len {
        let end = (pos + chunk_size).min(len);
        chunks.push(Chunk::new(
            &text[boundaries[pos]..boundaries[end]],
            pos,
            end,
        ));
        if end == len {
            break;
        }
        pos += step;
    }

    Ok(chunks)
}

/// Group the sentences of `text` into chunks of `sentences_per_chunk`,
/// repeating `overlap_sentences` sentences at the start of each following
/// chunk.
///
/// Each chunk is the exact slice of `text` from its first sentence's start
/// to its last sentence's end. See [`crate::sentence`] for the boundary
/// heuristic.
pub fn chunk_by_sentences(
    text: &str,
    sentences_per_chunk: usize,
    overlap_sentences: usize,
) -> Result<Vec<Chunk>> {
    validate_window(
        sentences_per_chunk,
        overlap_sentences,
        "sentences_per_chunk",
        "overlap_sentences",
    )?;

    let spans: Vec<Sentence<'_>> = sentences(text).collect();
    let step = sentences_per_chunk - overlap_sentences;

    let mut chunks = Vec::new();
    let mut pos = 0;
    while pos < spans.len() {
        let end = (pos + sentences_per_chunk).min(spans.len());
        let first = &spans[pos];
        let last = &spans[end - 1];
        chunks.push(Chunk::new(
            &text[first.byte_start..last.byte_end],
            first.start,
            last.end,
        ));
        if end == spans.len() {
            break;
        }
        pos += step;
    }

    Ok(chunks)
}
