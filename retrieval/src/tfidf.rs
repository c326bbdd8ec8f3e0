//! Term statistics and TF-IDF weighting over a segment pool.
//!
//! Every segment is one "document" for IDF purposes:
//! `idf(t) = ln(N / df(t))`, where `N` is the number of segments and
//! `df(t)` the number of segments containing `t`. Terms that appear in no
//! segment get weight zero. Term frequency is the raw count.

use std::collections::BTreeMap;

use crate::similarity::SparseVector;

/// Raw term counts of one piece of text.
pub type TermCounts = BTreeMap<String, u32>;

/// Per-segment term counts plus corpus document frequencies.
///
/// Statistics are appended as segments join the pool; IDF values are
/// derived on demand, so adding a segment never invalidates anything.
#[derive(Debug, Clone, Default)]
pub struct TermStatistics {
    counts: Vec<TermCounts>,
    doc_freq: BTreeMap<String, usize>,
}

impl TermStatistics {
    /// Create empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build statistics for an ordered sequence of segment term counts.
    pub fn from_counts(counts: impl IntoIterator<Item = TermCounts>) -> Self {
        let mut stats = Self::new();
        for c in counts {
            stats.push(c);
        }
        stats
    }

    /// Append the term counts of the next segment.
    pub fn push(&mut self, counts: TermCounts) {
        for term in counts.keys() {
            *self.doc_freq.entry(term.clone()).or_insert(0) += 1;
        }
        self.counts.push(counts);
    }

    /// Drop all statistics.
    pub fn clear(&mut self) {
        self.counts.clear();
        self.doc_freq.clear();
    }

    /// Number of segments covered.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether no segment has been added.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Term counts of the segment at `position`.
    pub fn counts(&self, position: usize) -> Option<&TermCounts> {
        self.counts.get(position)
    }

    /// Number of segments containing `term`.
    pub fn document_frequency(&self, term: &str) -> usize {
        self.doc_freq.get(term).copied().unwrap_or(0)
    }

    /// Inverse document frequency of `term`; zero for unseen terms.
    pub fn idf(&self, term: &str) -> f32 {
        let df = self.document_frequency(term);
        if df == 0 {
            return 0.0;
        }
        (self.len() as f32 / df as f32).ln()
    }

    /// TF-IDF vector for arbitrary term counts (e.g. a query) against this
    /// corpus. Zero-weight terms are omitted.
    pub fn weigh(&self, counts: &TermCounts) -> SparseVector {
        counts
            .iter()
            .filter_map(|(term, tf)| {
                let weight = *tf as f32 * self.idf(term);
                (weight > 0.0).then(|| (term.clone(), weight))
            })
            .collect()
    }

    /// TF-IDF vector of the segment at `position`.
    pub fn segment_vector(&self, position: usize) -> SparseVector {
        self.counts
            .get(position)
            .map(|counts| self.weigh(counts))
            .unwrap_or_default()
    }
}
