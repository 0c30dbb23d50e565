use std::collections::HashMap;

use tracing::debug;

use crate::embedding::{cosine_similarity, EmbeddingError, EmbeddingProvider, SimilarityOracle};

/// Maximum texts sent in one embedding request.
const BATCH_SIZE: usize = 64;

/// Precomputed embedding vectors keyed by exact text.
///
/// Built asynchronously before the synchronous pipeline runs, then queried as a
/// `SimilarityOracle`. Lookups for text that was never embedded fail with
/// `MissingVector`, which pushes deduplication into its exact-name fallback.
#[derive(Debug, Clone, Default)]
pub struct EmbeddingTable {
    vectors: HashMap<String, Vec<f32>>,
}

impl EmbeddingTable {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_vectors(vectors: HashMap<String, Vec<f32>>) -> Self {
        Self { vectors }
    }

    /// Embeds every distinct text through `provider`, in batches.
    pub async fn build(
        provider: &dyn EmbeddingProvider,
        texts: &[String],
    ) -> Result<Self, EmbeddingError> {
        let mut distinct: Vec<String> = Vec::new();
        for text in texts {
            if !distinct.contains(text) {
                distinct.push(text.clone());
            }
        }

        let mut vectors = HashMap::with_capacity(distinct.len());
        for chunk in distinct.chunks(BATCH_SIZE) {
            let embedded = provider.embed_batch(chunk).await?;
            if embedded.len() != chunk.len() {
                return Err(EmbeddingError::EmptyResponse {
                    expected: chunk.len(),
                    got: embedded.len(),
                });
            }
            vectors.extend(chunk.iter().cloned().zip(embedded));
        }

        debug!(
            "Embedding table built with {} ({} vectors)",
            provider.model_name(),
            vectors.len()
        );
        Ok(Self { vectors })
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

impl SimilarityOracle for EmbeddingTable {
    fn similarity(&self, a: &str, b: &str) -> Result<f32, EmbeddingError> {
        let left = self
            .vectors
            .get(a)
            .ok_or_else(|| EmbeddingError::MissingVector(a.to_string()))?;
        let right = self
            .vectors
            .get(b)
            .ok_or_else(|| EmbeddingError::MissingVector(b.to_string()))?;
        cosine_similarity(left, right)
    }
}
