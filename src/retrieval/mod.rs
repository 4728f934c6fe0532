//! Read path: embed a question and look up its nearest stored questions

use crate::embedding::EmbeddingProvider;
use crate::error::{FaqError, Result};
use crate::storage::{Neighbor, VectorStore, DEFAULT_TOP_K};
use serde::Serialize;
use std::sync::Arc;

/// Ranked `(title, distance)` pairs, ascending by distance
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RankedResult {
    pub hits: Vec<Neighbor>,
}

impl RankedResult {
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Neighbor> {
        self.hits.iter()
    }
}

/// Answers "which stored questions are closest to this text?"
pub struct Retriever {
    provider: Arc<dyn EmbeddingProvider>,
    store: Arc<VectorStore>,
    top_k: usize,
}

impl Retriever {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, store: Arc<VectorStore>) -> Self {
        Self {
            provider,
            store,
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Shrink the result-set size; values are clamped to `1..=DEFAULT_TOP_K`
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.clamp(1, DEFAULT_TOP_K);
        self
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    pub fn store(&self) -> &Arc<VectorStore> {
        &self.store
    }

    /// Search for the stored documents most similar to `query_text`
    ///
    /// Empty text and any provider failure yield `EmbeddingUnavailable`;
    /// store failures propagate unchanged. A successful empty result only
    /// ever means the store holds no documents.
    pub async fn search(&self, query_text: &str) -> Result<RankedResult> {
        if query_text.trim().is_empty() {
            return Err(FaqError::EmbeddingUnavailable(
                "query text is empty".to_string(),
            ));
        }

        let query = self
            .provider
            .embed(query_text)
            .await
            .map_err(|e| FaqError::EmbeddingUnavailable(e.to_string()))?;

        let hits = self.store.nearest_neighbors(&query, self.top_k).await?;
        tracing::debug!("Search {:?} returned {} hits", query_text, hits.len());

        Ok(RankedResult { hits })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::MockEmbeddingProvider;
    use crate::storage::{Database, StoreOptions};
    use async_trait::async_trait;
    use tempfile::TempDir;

    struct DownProvider;

    #[async_trait]
    impl EmbeddingProvider for DownProvider {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Err(FaqError::ProviderUnavailable("connection refused".to_string()))
        }

        fn dimension(&self) -> usize {
            16
        }

        fn model_name(&self) -> &str {
            "down"
        }
    }

    fn create_store(temp: &TempDir) -> Arc<VectorStore> {
        let db = Database::new(&temp.path().join("faq.sqlite"), 4).unwrap();
        Arc::new(VectorStore::open(&db, 16, StoreOptions::default()).unwrap())
    }

    #[tokio::test]
    async fn test_search_returns_exact_match_first() {
        let temp = TempDir::new().unwrap();
        let store = create_store(&temp);
        let provider = Arc::new(MockEmbeddingProvider::new(16));

        let questions = [
            "How do I book a flight?",
            "What is the cancellation policy?",
            "Do you offer travel insurance?",
            "What travel documents do I need?",
            "How do I make a payment?",
            "Can I change my travel dates?",
            "Do you provide airport transfers?",
        ];
        for question in questions {
            let embedding = provider.embed(question).await.unwrap();
            store.insert(question, &embedding).await.unwrap();
        }

        let retriever = Retriever::new(provider, store);
        let result = retriever.search("Do you offer travel insurance?").await.unwrap();

        assert_eq!(result.len(), DEFAULT_TOP_K);
        assert_eq!(result.hits[0].title, "Do you offer travel insurance?");
        assert!(result.hits[0].distance.abs() < 1e-6);
        for pair in result.hits.windows(2) {
            assert!(pair[0].distance <= pair[1].distance);
        }
    }

    #[tokio::test]
    async fn test_empty_query_is_embedding_unavailable() {
        let temp = TempDir::new().unwrap();
        let provider = Arc::new(MockEmbeddingProvider::new(16));
        let retriever = Retriever::new(provider, create_store(&temp));

        assert!(matches!(
            retriever.search("   ").await,
            Err(FaqError::EmbeddingUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_provider_failure_is_not_an_empty_success() {
        let temp = TempDir::new().unwrap();
        let retriever = Retriever::new(Arc::new(DownProvider), create_store(&temp));

        match retriever.search("How do I book a flight?").await {
            Err(FaqError::EmbeddingUnavailable(message)) => {
                assert!(message.contains("connection refused"));
            }
            other => panic!("expected EmbeddingUnavailable, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_store_is_empty_success() {
        let temp = TempDir::new().unwrap();
        let provider = Arc::new(MockEmbeddingProvider::new(16));
        let retriever = Retriever::new(provider, create_store(&temp));

        let result = retriever.search("Anything?").await.unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_custom_top_k() {
        let temp = TempDir::new().unwrap();
        let store = create_store(&temp);
        let provider = Arc::new(MockEmbeddingProvider::new(16));
        for i in 0..4 {
            let text = format!("question {}", i);
            let embedding = provider.embed(&text).await.unwrap();
            store.insert(&text, &embedding).await.unwrap();
        }

        let retriever = Retriever::new(provider, store).with_top_k(2);
        assert_eq!(retriever.search("question 1").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_top_k_never_exceeds_default() {
        let temp = TempDir::new().unwrap();
        let store = create_store(&temp);
        let provider = Arc::new(MockEmbeddingProvider::new(16));
        for i in 0..10 {
            let text = format!("question {}", i);
            let embedding = provider.embed(&text).await.unwrap();
            store.insert(&text, &embedding).await.unwrap();
        }

        let retriever = Retriever::new(provider, store).with_top_k(7);
        assert_eq!(retriever.top_k(), DEFAULT_TOP_K);
        assert_eq!(retriever.search("question 3").await.unwrap().len(), DEFAULT_TOP_K);
    }
}
