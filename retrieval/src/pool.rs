//! The segment pool: every segment of every loaded document, in insertion
//! order, plus per-document bookkeeping.

use chrono::{DateTime, Utc};
use docqa_documents::Chunk;
use serde::{Deserialize, Serialize};

use crate::tfidf::TermStatistics;
use crate::tokenize::{Tokenizer, key_terms};

/// Number of key terms recorded per document.
pub const KEY_TERMS_PER_DOCUMENT: usize = 10;

/// A unit of retrievable text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Position in the pool. Assigned on insertion, never reused.
    pub index: usize,

    /// Name of the originating document.
    pub source_document: String,

    /// Segment content.
    pub text: String,

    /// Start char offset in the cleaned document text (inclusive).
    pub start_offset: usize,

    /// End char offset in the cleaned document text (exclusive).
    pub end_offset: usize,
}

/// Bookkeeping for one added document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Document name as given by the caller.
    pub name: String,

    /// Character count of the raw (uncleaned) text.
    pub char_count: usize,

    /// Pool indices of the segments this document contributed.
    pub segment_indices: Vec<usize>,

    /// Most frequent content words.
    pub key_terms: Vec<String>,

    /// When the document was added.
    pub added_at: DateTime<Utc>,
}

/// Per-document summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStats {
    pub name: String,
    pub segments: usize,
    pub characters: usize,
}

/// Summary of the whole pool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStats {
    pub total_documents: usize,
    pub total_segments: usize,
    pub total_characters: usize,
    pub documents: Vec<DocumentStats>,
}

/// Append-only store of segments and document records.
///
/// Term statistics for TF-IDF are kept in step with the segments, so the
/// pool can be ranked without re-tokenizing it.
#[derive(Debug, Clone, Default)]
pub struct SegmentPool {
    segments: Vec<Segment>,
    documents: Vec<DocumentRecord>,
    term_stats: TermStatistics,
    tokenizer: Tokenizer,
}

impl SegmentPool {
    /// Create an empty pool tokenizing segments with `tokenizer`.
    pub fn new(tokenizer: Tokenizer) -> Self {
        Self {
            tokenizer,
            ..Self::default()
        }
    }

    /// Append the chunks of one document and record it.
    ///
    /// Returns the number of segments added. An empty chunk list adds
    /// nothing and creates no record.
    pub fn add_document(&mut self, name: &str, raw_text: &str, chunks: Vec<Chunk>) -> usize {
        if chunks.is_empty() {
            return 0;
        }

        let first = self.segments.len();
        for chunk in chunks {
            let segment = Segment {
                index: self.segments.len(),
                source_document: name.to_string(),
                text: chunk.content,
                start_offset: chunk.start_offset,
                end_offset: chunk.end_offset,
            };
            self.term_stats.push(self.tokenizer.term_counts(&segment.text));
            self.segments.push(segment);
        }
        let segment_indices: Vec<usize> = (first..self.segments.len()).collect();
        let added = segment_indices.len();

        self.documents.push(DocumentRecord {
            name: name.to_string(),
            char_count: raw_text.chars().count(),
            segment_indices,
            key_terms: key_terms(raw_text, KEY_TERMS_PER_DOCUMENT),
            added_at: Utc::now(),
        });

        added
    }

    /// Remove every segment and document record.
    pub fn clear(&mut self) {
        self.segments.clear();
        self.documents.clear();
        self.term_stats.clear();
    }

    /// All segments in index order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// All document records in insertion order.
    pub fn documents(&self) -> &[DocumentRecord] {
        &self.documents
    }

    /// Term statistics aligned with [`Self::segments`].
    pub fn term_statistics(&self) -> &TermStatistics {
        &self.term_stats
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the pool holds no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Summary counts per document and in total.
    pub fn stats(&self) -> PoolStats {
        let documents: Vec<DocumentStats> = self
            .documents
            .iter()
            .map(|doc| DocumentStats {
                name: doc.name.clone(),
                segments: doc.segment_indices.len(),
                characters: doc.char_count,
            })
            .collect();

        PoolStats {
            total_documents: documents.len(),
            total_segments: self.segments.len(),
            total_characters: documents.iter().map(|d| d.characters).sum(),
            documents,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn chunks(texts: &[&str]) -> Vec<Chunk> {
        let mut offset = 0;
        texts
            .iter()
            .map(|text| {
                let len = text.chars().count();
                let chunk = Chunk::new(*text, offset, offset + len);
                offset += len;
                chunk
            })
            .collect()
    }

    #[test]
    fn test_indices_continue_across_documents() {
        let mut pool = SegmentPool::default();
        assert_eq!(pool.add_document("a.txt", "alpha beta", chunks(&["alpha", " beta"])), 2);
        assert_eq!(pool.add_document("b.txt", "gamma", chunks(&["gamma"])), 1);

        let indices: Vec<usize> = pool.segments().iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(pool.documents()[1].segment_indices, vec![2]);
        assert_eq!(pool.segments()[2].source_document, "b.txt");
        assert_eq!(pool.term_statistics().len(), 3);
    }

    #[test]
    fn test_empty_document_is_noop() {
        let mut pool = SegmentPool::default();
        assert_eq!(pool.add_document("empty.txt", "", Vec::new()), 0);
        assert!(pool.is_empty());
        assert!(pool.documents().is_empty());
    }

    #[test]
    fn test_same_name_twice_creates_two_records() {
        let mut pool = SegmentPool::default();
        pool.add_document("notes.md", "one", chunks(&["one"]));
        pool.add_document("notes.md", "two", chunks(&["two"]));
        assert_eq!(pool.documents().len(), 2);
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_stats() {
        let mut pool = SegmentPool::default();
        pool.add_document("a.txt", "alpha  beta", chunks(&["alpha", " beta"]));
        pool.add_document("b.txt", "gamma", chunks(&["gamma"]));

        let stats = pool.stats();
        assert_eq!(stats.total_documents, 2);
        assert_eq!(stats.total_segments, 3);
        assert_eq!(stats.total_characters, 16);
        assert_eq!(
            stats.documents[0],
            DocumentStats {
                name: "a.txt".to_string(),
                segments: 2,
                characters: 11,
            }
        );
    }

    #[test]
    fn test_key_terms_recorded() {
        let mut pool = SegmentPool::default();
        let text = "Ownership rules. Ownership and borrowing.";
        pool.add_document("rust.md", text, chunks(&[text]));
        assert_eq!(pool.documents()[0].key_terms[0], "ownership");
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut pool = SegmentPool::default();
        pool.add_document("a.txt", "alpha", chunks(&["alpha"]));
        pool.clear();
        assert!(pool.is_empty());
        assert!(pool.documents().is_empty());
        assert!(pool.term_statistics().is_empty());
        assert_eq!(pool.stats(), PoolStats::default());
    }
}
