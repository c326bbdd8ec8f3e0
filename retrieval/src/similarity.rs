//! Similarity measures over sparse term maps.
//!
//! All functions return values in `[0, 1]` for non-negative inputs and
//! resolve `0/0` to `0.0`, so callers never see `NaN`.

use std::collections::BTreeMap;

/// A sparse term-weight vector. Ordered so that floating point sums are
/// accumulated in the same order on every call.
pub type SparseVector = BTreeMap<String, f32>;

/// Jaccard index of the key sets of two maps: `|A ∩ B| / |A ∪ B|`.
///
/// Values are ignored, so term-count maps can be compared directly as
/// token sets.
pub fn jaccard_similarity<A, B>(a: &BTreeMap<String, A>, b: &BTreeMap<String, B>) -> f32 {
    let intersection = if a.len() <= b.len() {
        a.keys().filter(|k| b.contains_key(*k)).count()
    } else {
        b.keys().filter(|k| a.contains_key(*k)).count()
    };
    let union = a.len() + b.len() - intersection;

    if union == 0 {
        return 0.0;
    }

    intersection as f32 / union as f32
}

/// Euclidean norm of a sparse vector.
pub fn magnitude(v: &SparseVector) -> f32 {
    v.values().map(|x| x * x).sum::<f32>().sqrt()
}

/// Dot product of two sparse vectors.
pub fn dot_product(a: &SparseVector, b: &SparseVector) -> f32 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small
        .iter()
        .filter_map(|(term, x)| large.get(term).map(|y| x * y))
        .sum()
}

/// Cosine similarity of two non-negative sparse vectors.
///
/// Returns `0.0` when either vector has zero magnitude.
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f32 {
    let magnitude_a = magnitude(a);
    let magnitude_b = magnitude(b);

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }

    (dot_product(a, b) / (magnitude_a * magnitude_b)).clamp(0.0, 1.0)
}
