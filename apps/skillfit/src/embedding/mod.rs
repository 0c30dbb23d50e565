//! Semantic similarity: the oracle contract the deduplicator consumes, plus the
//! implementations the binary wires in.
//!
//! The core never embeds text itself. It asks a `SimilarityOracle` for a cosine
//! similarity between two strings. Oracles must be deterministic for equal inputs
//! and symmetric, which is what makes `CachedSimilarity` sound.

pub mod client;
pub mod table;

pub use client::{EmbeddingProvider, HttpEmbeddingProvider};
pub use table::EmbeddingTable;

use std::collections::BTreeMap;

use dashmap::DashMap;
use thiserror::Error;

/// Slack allowed above |1.0| for floating-point cosine results.
const SIMILARITY_EPSILON: f32 = 1e-4;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("Embedding service returned {got} vectors for {expected} inputs")]
    EmptyResponse { expected: usize, got: usize },

    #[error("No embedding vector for '{0}'")]
    MissingVector(String),

    #[error("Vector dimensions differ: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    #[error("Similarity {0} is outside [-1, 1]")]
    OutOfRange(f32),
}

/// Cosine-similarity oracle over sentence embeddings.
pub trait SimilarityOracle: Send + Sync {
    fn similarity(&self, a: &str, b: &str) -> Result<f32, EmbeddingError>;
}

/// Plain functions and closures can be injected directly (handy for stubs).
impl<F> SimilarityOracle for F
where
    F: Fn(&str, &str) -> Result<f32, EmbeddingError> + Send + Sync,
{
    fn similarity(&self, a: &str, b: &str) -> Result<f32, EmbeddingError> {
        self(a, b)
    }
}

/// Rejects NaN and values outside [-1, 1]; clamps float noise just past the bounds.
pub fn checked_similarity(value: f32) -> Result<f32, EmbeddingError> {
    if value.is_nan() || value.abs() > 1.0 + SIMILARITY_EPSILON {
        return Err(EmbeddingError::OutOfRange(value));
    }
    Ok(value.clamp(-1.0, 1.0))
}

/// Cosine similarity of two vectors. Zero vectors have similarity 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32, EmbeddingError> {
    if a.len() != b.len() {
        return Err(EmbeddingError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }
    checked_similarity(dot / (norm_a * norm_b))
}

// ────────────────────────────────────────────────────────────────────────────
// CachedSimilarity
// ────────────────────────────────────────────────────────────────────────────

/// Memoizes an oracle by unordered pair. Only successful lookups are cached.
pub struct CachedSimilarity<O> {
    inner: O,
    cache: DashMap<(String, String), f32>,
}

impl<O: SimilarityOracle> CachedSimilarity<O> {
    pub fn new(inner: O) -> Self {
        Self {
            inner,
            cache: DashMap::new(),
        }
    }

    /// Number of memoized pairs.
    pub fn cached_pairs(&self) -> usize {
        self.cache.len()
    }
}

impl<O: SimilarityOracle> SimilarityOracle for CachedSimilarity<O> {
    fn similarity(&self, a: &str, b: &str) -> Result<f32, EmbeddingError> {
        let key = if a <= b {
            (a.to_string(), b.to_string())
        } else {
            (b.to_string(), a.to_string())
        };
        if let Some(hit) = self.cache.get(&key) {
            return Ok(*hit);
        }
        let value = self.inner.similarity(&key.0, &key.1)?;
        self.cache.insert(key, value);
        Ok(value)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// LexicalSimilarity
// ────────────────────────────────────────────────────────────────────────────

/// Cosine over lowercase word-count vectors. Used when no embedding service is
/// configured. Blind to paraphrase.
///
/// Counts live in ordered maps so the floating-point sums are bit-identical for
/// equal inputs in either argument order.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalSimilarity;

impl LexicalSimilarity {
    fn word_counts(text: &str) -> BTreeMap<String, f32> {
        let mut counts = BTreeMap::new();
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            *counts.entry(word.to_lowercase()).or_insert(0.0) += 1.0;
        }
        counts
    }
}

impl SimilarityOracle for LexicalSimilarity {
    fn similarity(&self, a: &str, b: &str) -> Result<f32, EmbeddingError> {
        let left = Self::word_counts(a);
        let right = Self::word_counts(b);
        if left.is_empty() || right.is_empty() {
            return Ok(0.0);
        }

        let dot: f32 = left
            .iter()
            .filter_map(|(word, count)| right.get(word).map(|other| count * other))
            .sum();
        let norm_left = left.values().map(|c| c * c).sum::<f32>().sqrt();
        let norm_right = right.values().map(|c| c * c).sum::<f32>().sqrt();

        checked_similarity(dot / (norm_left * norm_right))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_cosine_identical_is_one() {
        let v = [0.3, -0.2, 0.9];
        assert!((cosine_similarity(&v, &v).unwrap() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_orthogonal_is_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_cosine_opposite_is_minus_one() {
        let sim = cosine_similarity(&[1.0, 2.0], &[-1.0, -2.0]).unwrap();
        assert!((sim + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_zero_vector() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_cosine_dimension_mismatch() {
        let err = cosine_similarity(&[1.0], &[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, EmbeddingError::DimensionMismatch { left: 1, right: 2 }));
    }

    #[test]
    fn test_checked_similarity_bounds() {
        assert!(checked_similarity(f32::NAN).is_err());
        assert!(checked_similarity(1.5).is_err());
        assert!(checked_similarity(-1.01).is_err());
        assert_eq!(checked_similarity(1.00001).unwrap(), 1.0);
        assert_eq!(checked_similarity(0.42).unwrap(), 0.42);
    }

    #[test]
    fn test_lexical_similarity_is_symmetric() {
        let oracle = LexicalSimilarity;
        let a = "Built a chatbot using NLP";
        let b = "Built a chat bot with NLP techniques";
        assert_eq!(
            oracle.similarity(a, b).unwrap(),
            oracle.similarity(b, a).unwrap()
        );
    }

    #[test]
    fn test_lexical_similarity_identical_and_disjoint() {
        let oracle = LexicalSimilarity;
        let same = oracle.similarity("Deployed Flask API", "deployed flask api").unwrap();
        assert!((same - 1.0).abs() < 1e-6);
        assert_eq!(oracle.similarity("alpha beta", "gamma delta").unwrap(), 0.0);
        assert_eq!(oracle.similarity("", "gamma").unwrap(), 0.0);
    }

    #[test]
    fn test_closure_is_an_oracle() {
        let oracle = |_: &str, _: &str| -> Result<f32, EmbeddingError> { Ok(0.5) };
        assert_eq!(oracle.similarity("a", "b").unwrap(), 0.5);
    }

    #[test]
    fn test_cache_hits_for_either_argument_order() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let cached = CachedSimilarity::new(move |_: &str, _: &str| -> Result<f32, EmbeddingError> {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(0.25)
        });

        assert_eq!(cached.similarity("x", "y").unwrap(), 0.25);
        assert_eq!(cached.similarity("y", "x").unwrap(), 0.25);
        assert_eq!(cached.similarity("x", "y").unwrap(), 0.25);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cached.cached_pairs(), 1);
    }

    #[test]
    fn test_cache_does_not_store_errors() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let cached = CachedSimilarity::new(move |a: &str, _: &str| -> Result<f32, EmbeddingError> {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(EmbeddingError::MissingVector(a.to_string()))
        });

        assert!(cached.similarity("x", "y").is_err());
        assert!(cached.similarity("x", "y").is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cached.cached_pairs(), 0);
    }
}
