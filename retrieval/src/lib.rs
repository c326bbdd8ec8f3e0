//! # Retrieval Engine
//!
//! Hybrid lexical retrieval over a pool of document segments:
//!
//! - **Tokenizer**: lowercase alphanumeric runs, optional stop-word filter
//! - **Jaccard**: token-set overlap between query and segment
//! - **TF-IDF**: cosine similarity of term-weight vectors, with document
//!   frequencies taken over the whole pool
//! - **Session**: the pool behind a read-write lock, with atomic add/clear
//!
//! ## Architecture
//!
//! ```text
//!  text ──► clean ──► chunk ──► ┌──────────────┐
//!                               │ SegmentPool  │  segments + term stats
//!                               └──────┬───────┘
//!                                      │
//!  query ─────────────────────► ┌──────▼───────┐
//!                               │HybridRetriever│ 0.6 jaccard + 0.4 tfidf
//!                               └──────┬───────┘
//!                                      ▼
//!                          top-K (segment, score)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use docqa_retrieval::{RetrievalConfig, RetrievalSession};
//!
//! let session = RetrievalSession::new(RetrievalConfig::default())?;
//! session.add_document(&text, "report.txt").await?;
//!
//! for hit in session.retrieve("quarterly revenue", 3).await? {
//!     println!("{:.3} {}", hit.score, hit.segment.text);
//! }
//! ```

pub mod config;
pub mod error;
pub mod pool;
pub mod ranker;
pub mod session;
pub mod similarity;
pub mod tfidf;
pub mod tokenize;

pub use config::{RetrievalConfig, ScoringWeights, TokenizerConfig};
pub use error::{Result, RetrievalError};
pub use pool::{DocumentRecord, DocumentStats, PoolStats, Segment, SegmentPool};
pub use ranker::{HybridRetriever, ScoredSegment};
pub use session::RetrievalSession;
pub use similarity::{SparseVector, cosine_similarity, jaccard_similarity};
pub use tfidf::{TermCounts, TermStatistics};
pub use tokenize::{Tokenizer, key_terms};

// Re-export the chunking types so callers configure everything from one crate.
pub use docqa_documents::{Chunk, ChunkingStrategy};
