//! Configuration for the retrieval engine.

use docqa_documents::ChunkingStrategy;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RetrievalError};

/// Configuration for chunking, tokenization and ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// How documents are split into segments.
    pub chunking: ChunkingStrategy,

    /// Weights used to combine the two similarity measures.
    pub weights: ScoringWeights,

    /// Tokenizer settings, shared by queries and segments.
    pub tokenizer: TokenizerConfig,

    /// Number of segments returned when the caller does not specify one.
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            chunking: ChunkingStrategy::default(),
            weights: ScoringWeights::default(),
            tokenizer: TokenizerConfig::default(),
            top_k: 3,
        }
    }
}

impl RetrievalConfig {
    /// Set the chunking strategy.
    pub fn with_chunking(mut self, chunking: ChunkingStrategy) -> Self {
        self.chunking = chunking;
        self
    }

    /// Set the scoring weights.
    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Set the default number of results.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Reject configurations that would make chunking or ranking ill-defined.
    pub fn validate(&self) -> Result<()> {
        self.chunking.validate()?;
        self.weights.validate()?;
        if self.top_k == 0 {
            return Err(RetrievalError::Config("top_k must be positive".to_string()));
        }
        Ok(())
    }
}

/// Relative weights of the Jaccard and TF-IDF scores.
///
/// The combined score is `(jaccard * j + tfidf * t) / (jaccard + tfidf)`,
/// which keeps it in `[0, 1]` for any valid weights and equals the plain
/// weighted sum for the default `0.6 / 0.4`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// Weight of the token-set overlap score.
    pub jaccard: f32,

    /// Weight of the TF-IDF cosine score.
    pub tfidf: f32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            jaccard: 0.6,
            tfidf: 0.4,
        }
    }
}

impl ScoringWeights {
    /// Create weights from the two components.
    pub fn new(jaccard: f32, tfidf: f32) -> Self {
        Self { jaccard, tfidf }
    }

    /// Weights must be finite, non-negative and not both zero.
    pub fn validate(self) -> Result<()> {
        for (name, weight) in [("jaccard", self.jaccard), ("tfidf", self.tfidf)] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(RetrievalError::Config(format!(
                    "{name} weight must be a non-negative number, got {weight}"
                )));
            }
        }
        if self.jaccard + self.tfidf <= 0.0 {
            return Err(RetrievalError::Config(
                "at least one scoring weight must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Combine the two component scores.
    pub fn combine(self, jaccard: f32, tfidf: f32) -> f32 {
        let total = self.jaccard + self.tfidf;
        if total <= 0.0 {
            return 0.0;
        }
        ((self.jaccard * jaccard + self.tfidf * tfidf) / total).clamp(0.0, 1.0)
    }
}

/// Tokenizer settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerConfig {
    /// Drop common English function words.
    pub remove_stop_words: bool,

    /// Tokens shorter than this many characters are dropped.
    pub min_token_len: usize,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            remove_stop_words: true,
            min_token_len: 1,
        }
    }
}
