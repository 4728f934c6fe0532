/// Embedding provider trait and the deterministic mock implementation
use crate::error::{FaqError, Result};
use async_trait::async_trait;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Trait for embedding providers
///
/// Implementations map text to a vector of exactly `dimension()` floats.
/// Re-embedding the same text must yield a vector that is meaningful to
/// compare against earlier ones; bit-exact reproducibility is not required.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate embedding for a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Get the embedding dimension
    fn dimension(&self) -> usize;

    /// Get the model name
    fn model_name(&self) -> &str;
}

/// Offline provider producing deterministic unit vectors from a text hash
///
/// Distinct texts land on distinct vectors, identical texts on identical ones.
/// There is no semantic signal: use it for tests and offline demos only.
pub struct MockEmbeddingProvider {
    dimension: usize,
}

impl MockEmbeddingProvider {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn deterministic_embedding(&self, text: &str) -> Vec<f32> {
        let mut embedding: Vec<f32> = (0..self.dimension)
            .map(|i| {
                let mut hasher = DefaultHasher::new();
                text.hash(&mut hasher);
                i.hash(&mut hasher);
                let bits = hasher.finish();
                // map to [-1, 1]
                ((bits >> 11) as f64 / (1u64 << 53) as f64 * 2.0 - 1.0) as f32
            })
            .collect();

        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in embedding.iter_mut() {
                *value /= norm;
            }
        }
        embedding
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if text.trim().is_empty() {
            return Err(FaqError::InvalidInput("Empty text".to_string()));
        }
        Ok(self.deterministic_embedding(text))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::codec::l2_distance;

    #[tokio::test]
    async fn test_mock_dimension_and_norm() {
        let provider = MockEmbeddingProvider::new(384);
        let embedding = provider.embed("How do I book a flight?").await.unwrap();

        assert_eq!(embedding.len(), 384);
        let magnitude: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((magnitude - 1.0).abs() < 1e-3);
    }

    #[tokio::test]
    async fn test_mock_is_deterministic() {
        let provider = MockEmbeddingProvider::new(32);
        let first = provider.embed("same text").await.unwrap();
        let second = provider.embed("same text").await.unwrap();
        let other = provider.embed("other text").await.unwrap();

        assert_eq!(first, second);
        assert!(l2_distance(&first, &other) > 0.0);
    }

    #[tokio::test]
    async fn test_mock_rejects_empty_text() {
        let provider = MockEmbeddingProvider::new(8);
        assert!(matches!(
            provider.embed("   ").await,
            Err(FaqError::InvalidInput(_))
        ));
    }
}
