//! Hybrid lexical ranking: Jaccard token overlap blended with TF-IDF cosine.

use ordered_float::OrderedFloat;
use serde::Serialize;

use crate::config::{RetrievalConfig, ScoringWeights};
use crate::error::{Result, RetrievalError};
use crate::pool::Segment;
use crate::similarity::{cosine_similarity, jaccard_similarity};
use crate::tfidf::TermStatistics;
use crate::tokenize::Tokenizer;

/// A segment together with its relevance to a query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredSegment {
    pub segment: Segment,

    /// Combined score in `[0, 1]`.
    pub score: f32,

    /// Token-set overlap component.
    pub jaccard: f32,

    /// TF-IDF cosine component.
    pub tfidf: f32,
}

/// Ranks segments against a query.
///
/// Ranking is a pure function of the query, the segments and the weights:
/// segments scoring exactly zero are dropped, the rest are ordered by
/// descending score with ties going to the lower index.
#[derive(Debug, Clone, Copy, Default)]
pub struct HybridRetriever {
    weights: ScoringWeights,
    tokenizer: Tokenizer,
}

impl HybridRetriever {
    /// Create a retriever.
    pub fn new(weights: ScoringWeights, tokenizer: Tokenizer) -> Self {
        Self { weights, tokenizer }
    }

    /// Create a retriever from the weights and tokenizer of `config`.
    pub fn from_config(config: &RetrievalConfig) -> Self {
        Self::new(config.weights, Tokenizer::new(config.tokenizer))
    }

    /// Rank `segments` against `query`, building term statistics on the fly.
    pub fn retrieve(
        &self,
        query: &str,
        segments: &[Segment],
        top_k: usize,
    ) -> Result<Vec<ScoredSegment>> {
        let stats = TermStatistics::from_counts(
            segments
                .iter()
                .map(|segment| self.tokenizer.term_counts(&segment.text)),
        );
        self.rank(query, segments, &stats, top_k)
    }

    /// Rank `segments` against `query` using precomputed statistics.
    ///
    /// `stats` must describe exactly `segments`, in the same order.
    pub fn rank(
        &self,
        query: &str,
        segments: &[Segment],
        stats: &TermStatistics,
        top_k: usize,
    ) -> Result<Vec<ScoredSegment>> {
        if query.trim().is_empty() {
            return Err(RetrievalError::InvalidInput(
                "query must not be empty".to_string(),
            ));
        }
        if top_k == 0 {
            return Err(RetrievalError::InvalidInput(
                "top_k must be positive".to_string(),
            ));
        }
        if stats.len() != segments.len() {
            return Err(RetrievalError::InvalidInput(format!(
                "term statistics cover {} segments, pool has {}",
                stats.len(),
                segments.len()
            )));
        }

        let query_counts = self.tokenizer.term_counts(query);
        let query_vector = stats.weigh(&query_counts);

        let mut candidates: Vec<(OrderedFloat<f32>, usize, f32, f32)> = Vec::new();
        for position in 0..segments.len() {
            let Some(counts) = stats.counts(position) else {
                continue;
            };
            let jaccard = jaccard_similarity(&query_counts, counts);
            let tfidf = cosine_similarity(&query_vector, &stats.segment_vector(position));
            let score = self.weights.combine(jaccard, tfidf);
            if score > 0.0 {
                candidates.push((OrderedFloat(score), position, jaccard, tfidf));
            }
        }

        // Descending score, ascending index on ties.
        candidates.sort_by(|a, b| {
            b.0.cmp(&a.0)
                .then(segments[a.1].index.cmp(&segments[b.1].index))
        });
        candidates.truncate(top_k);

        Ok(candidates
            .into_iter()
            .map(|(score, position, jaccard, tfidf)| ScoredSegment {
                segment: segments[position].clone(),
                score: score.0,
                jaccard,
                tfidf,
            })
            .collect())
    }
}
