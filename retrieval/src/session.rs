//! A retrieval session: one segment pool shared between readers and
//! writers.

use std::sync::Arc;

use docqa_documents::clean_text;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::config::RetrievalConfig;
use crate::error::Result;
use crate::pool::{DocumentRecord, PoolStats, Segment, SegmentPool};
use crate::ranker::{HybridRetriever, ScoredSegment};
use crate::tokenize::Tokenizer;

/// Owns a segment pool and answers queries against it.
///
/// Adds and clears take the write lock for their whole mutation, so a
/// concurrent `retrieve` sees the pool either before or after them.
/// Cloning a session shares the same pool.
#[derive(Debug, Clone)]
pub struct RetrievalSession {
    config: RetrievalConfig,
    retriever: HybridRetriever,
    pool: Arc<RwLock<SegmentPool>>,
}

impl RetrievalSession {
    /// Create a session with an empty pool.
    pub fn new(config: RetrievalConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    /// Create a session with default configuration.
    pub fn with_defaults() -> Self {
        Self::with_valid_config(RetrievalConfig::default())
    }

    fn with_valid_config(config: RetrievalConfig) -> Self {
        let pool = SegmentPool::new(Tokenizer::new(config.tokenizer));
        Self {
            retriever: HybridRetriever::from_config(&config),
            config,
            pool: Arc::new(RwLock::new(pool)),
        }
    }

    /// The session configuration.
    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// Clean, chunk and append a document. Returns the number of segments
    /// added; a document that cleans to nothing adds zero and leaves no
    /// record.
    pub async fn add_document(&self, text: &str, name: &str) -> Result<usize> {
        let cleaned = clean_text(text);
        let chunks = self.config.chunking.chunk(&cleaned)?;
        if chunks.is_empty() {
            debug!("Document {name} produced no segments");
            return Ok(0);
        }

        let added = self.pool.write().await.add_document(name, text, chunks);
        info!("Added document {name}: {added} segments");
        Ok(added)
    }

    /// Rank the pool against `query` and return at most `top_k` segments.
    pub async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<ScoredSegment>> {
        let pool = self.pool.read().await;
        let results =
            self.retriever
                .rank(query, pool.segments(), pool.term_statistics(), top_k)?;
        debug!(
            "Retrieved {} of {} segments for query",
            results.len(),
            pool.len()
        );
        Ok(results)
    }

    /// [`Self::retrieve`] with the configured `top_k`.
    pub async fn search(&self, query: &str) -> Result<Vec<ScoredSegment>> {
        self.retrieve(query, self.config.top_k).await
    }

    /// Drop every document and segment.
    pub async fn clear(&self) {
        self.pool.write().await.clear();
        info!("Cleared retrieval session");
    }

    /// Pool summary.
    pub async fn stats(&self) -> PoolStats {
        self.pool.read().await.stats()
    }

    /// Document records in insertion order.
    pub async fn documents(&self) -> Vec<DocumentRecord> {
        self.pool.read().await.documents().to_vec()
    }

    /// The first `n` segments of the pool.
    pub async fn leading_segments(&self, n: usize) -> Vec<Segment> {
        self.pool
            .read()
            .await
            .segments()
            .iter()
            .take(n)
            .cloned()
            .collect()
    }

    /// Number of segments in the pool.
    pub async fn segment_count(&self) -> usize {
        self.pool.read().await.len()
    }

    /// Whether the pool holds no segments.
    pub async fn is_empty(&self) -> bool {
        self.pool.read().await.is_empty()
    }
}

impl Default for RetrievalSession {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RetrievalError;
    use docqa_documents::ChunkingStrategy;
    use pretty_assertions::assert_eq;

    fn small_chunks() -> RetrievalConfig {
        RetrievalConfig::default().with_chunking(ChunkingStrategy::FixedSize {
            chunk_size: 20,
            overlap: 5,
        })
    }

    #[tokio::test]
    async fn test_clear_then_add_restarts_indices() {
        let session = RetrievalSession::new(small_chunks()).unwrap();
        let first = session
            .add_document("alpha beta gamma delta epsilon zeta eta", "one.txt")
            .await
            .unwrap();
        let second = session
            .add_document("epsilon zeta eta theta iota kappa", "two.txt")
            .await
            .unwrap();
        assert_eq!((first, second), (3, 2));
        assert_eq!(session.stats().await.total_documents, 2);

        session.clear().await;
        assert!(session.is_empty().await);

        assert_eq!(session.add_document("short text", "three.txt").await.unwrap(), 1);
        let segments = session.leading_segments(10).await;
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].index, 0);
        assert_eq!(segments[0].source_document, "three.txt");
    }

    #[tokio::test]
    async fn test_indices_strictly_increase() {
        let session = RetrievalSession::new(small_chunks()).unwrap();
        for name in ["a", "b", "c"] {
            session
                .add_document("lorem ipsum dolor sit amet consectetur adipiscing", name)
                .await
                .unwrap();
        }
        let indices: Vec<usize> = session
            .leading_segments(usize::MAX)
            .await
            .iter()
            .map(|s| s.index)
            .collect();
        let expected: Vec<usize> = (0..indices.len()).collect();
        assert_eq!(indices, expected);
    }

    #[tokio::test]
    async fn test_blank_document_is_noop() {
        let session = RetrievalSession::with_defaults();
        assert_eq!(session.add_document(" \n\t ", "blank.txt").await.unwrap(), 0);
        assert!(session.documents().await.is_empty());
    }

    #[tokio::test]
    async fn test_offsets_refer_to_cleaned_text() {
        let session = RetrievalSession::with_defaults();
        session
            .add_document("  Hello\n\n   world  ", "greeting.txt")
            .await
            .unwrap();
        let segments = session.leading_segments(1).await;
        assert_eq!(segments[0].text, "Hello world");
        assert_eq!((segments[0].start_offset, segments[0].end_offset), (0, 11));
        assert_eq!(session.documents().await[0].char_count, 19);
    }

    #[tokio::test]
    async fn test_search_uses_configured_top_k() {
        let config = small_chunks().with_top_k(1);
        let session = RetrievalSession::new(config).unwrap();
        session
            .add_document("rust ownership. rust borrowing. rust lifetimes.", "rust.md")
            .await
            .unwrap();
        let results = session.search("rust").await.unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_query_is_invalid() {
        let session = RetrievalSession::with_defaults();
        assert!(matches!(
            session.retrieve("", 3).await,
            Err(RetrievalError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_with_defaults_matches_new() {
        let defaults = RetrievalSession::with_defaults();
        let built = RetrievalSession::new(RetrievalConfig::default()).unwrap();
        assert_eq!(defaults.config(), built.config());

        let text = "Tokio schedules tasks. Rayon splits data.";
        defaults.add_document(text, "notes.txt").await.unwrap();
        built.add_document(text, "notes.txt").await.unwrap();
        assert_eq!(
            defaults.retrieve("tokio tasks", 3).await.unwrap(),
            built.retrieve("tokio tasks", 3).await.unwrap()
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(RetrievalSession::new(RetrievalConfig::default().with_top_k(0)).is_err());
    }

    #[test]
    fn test_blocking_use() {
        let session = RetrievalSession::with_defaults();
        tokio_test::block_on(async {
            session
                .add_document("The borrow checker enforces aliasing rules.", "notes.txt")
                .await
                .unwrap();
            let results = session.retrieve("borrow checker", 3).await.unwrap();
            assert_eq!(results.len(), 1);
        });
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_readers_see_whole_documents() {
        let session = RetrievalSession::new(small_chunks()).unwrap();
        let text = "needle haystack ".repeat(10);
        let per_document = session.add_document(&text, "seed.txt").await.unwrap();
        let matches_per_document = session.retrieve("needle", usize::MAX).await.unwrap().len();
        assert!(matches_per_document > 0);

        let writer = {
            let session = session.clone();
            tokio::spawn(async move {
                for i in 0..20 {
                    session
                        .add_document(&text, &format!("doc-{i}.txt"))
                        .await
                        .unwrap();
                }
            })
        };

        let mut readers = Vec::new();
        for _ in 0..4 {
            let session = session.clone();
            readers.push(tokio::spawn(async move {
                for _ in 0..20 {
                    let count = session.retrieve("needle", usize::MAX).await.unwrap().len();
                    assert_eq!(count % matches_per_document, 0);
                }
            }));
        }

        writer.await.unwrap();
        for reader in readers {
            reader.await.unwrap();
        }
        assert_eq!(session.segment_count().await, per_document * 21);
    }
}
