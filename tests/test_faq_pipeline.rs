//! End-to-end write and read paths over the built-in travel FAQ
//!
//! Uses the mock provider so the tests run offline.

use async_trait::async_trait;
use faqsense::embedding::{EmbeddingProvider, MockEmbeddingProvider};
use faqsense::error::{FaqError, Result};
use faqsense::indexing::Indexer;
use faqsense::retrieval::Retriever;
use faqsense::seed::TRAVEL_FAQ;
use faqsense::storage::{Database, StoreOptions, VectorStore};
use std::sync::Arc;
use tempfile::TempDir;

const DIM: usize = 384;

/// Fails whenever asked to embed `fail_on`
struct FlakyProvider {
    inner: MockEmbeddingProvider,
    fail_on: String,
}

#[async_trait]
impl EmbeddingProvider for FlakyProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if text == self.fail_on {
            return Err(FaqError::ProviderUnavailable(
                "HTTP 500 from provider".to_string(),
            ));
        }
        self.inner.embed(text).await
    }

    fn dimension(&self) -> usize {
        DIM
    }

    fn model_name(&self) -> &str {
        "flaky"
    }
}

fn create_store(temp: &TempDir) -> Arc<VectorStore> {
    let db = Database::new(&temp.path().join("faq.sqlite"), 8).unwrap();
    Arc::new(VectorStore::open(&db, DIM, StoreOptions::default()).unwrap())
}

#[tokio::test]
async fn test_seed_then_search_travel_faq() {
    let temp = TempDir::new().unwrap();
    let store = create_store(&temp);
    let provider: Arc<dyn EmbeddingProvider> = Arc::new(MockEmbeddingProvider::new(DIM));

    let indexer = Indexer::new(provider.clone(), store.clone(), 4).unwrap();
    let results = indexer.index(TRAVEL_FAQ).await;

    assert_eq!(results.len(), TRAVEL_FAQ.len());
    assert!(results.iter().all(|r| r.is_ok()));
    assert_eq!(store.count().await.unwrap(), TRAVEL_FAQ.len());
    println!("✓ Seeded {} questions", TRAVEL_FAQ.len());

    let retriever = Retriever::new(provider, store);
    for question in [
        "How do I book a flight?",
        "What is the cancellation policy?",
        "Do you offer travel insurance?",
    ] {
        let result = retriever.search(question).await.unwrap();

        assert_eq!(result.len(), 5);
        assert_eq!(result.hits[0].title, question);
        assert!(result.hits[0].distance.abs() < 1e-6);
        for pair in result.hits.windows(2) {
            assert!(pair[0].distance <= pair[1].distance);
        }
        println!("✓ {:?} found itself first", question);
    }
}

#[tokio::test]
async fn test_batch_failure_reported_at_its_position() {
    let temp = TempDir::new().unwrap();
    let store = create_store(&temp);

    let texts: Vec<&str> = TRAVEL_FAQ.iter().take(10).copied().collect();
    let fail_at = 6;
    let provider = Arc::new(FlakyProvider {
        inner: MockEmbeddingProvider::new(DIM),
        fail_on: texts[fail_at].to_string(),
    });

    let indexer = Indexer::new(provider, store.clone(), 3).unwrap();
    let results = indexer.index(&texts).await;

    assert_eq!(results.len(), texts.len());
    for (position, result) in results.iter().enumerate() {
        assert_eq!(result.is_err(), position == fail_at, "position {}", position);
    }
    assert_eq!(store.count().await.unwrap(), texts.len() - 1);
}

#[tokio::test]
async fn test_two_document_scenario() {
    let temp = TempDir::new().unwrap();
    let store = create_store(&temp);

    let mut v1 = vec![0.0f32; DIM];
    v1[0] = 1.0;
    let mut v2 = vec![0.0f32; DIM];
    v2[1] = 1.0;

    store.insert("How do I book a flight?", &v1).await.unwrap();
    store
        .insert("What is the cancellation policy?", &v2)
        .await
        .unwrap();

    let hits = store.nearest_neighbors(&v1, 5).await.unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].title, "How do I book a flight?");
    assert_eq!(hits[0].distance, 0.0);
    assert_eq!(hits[1].title, "What is the cancellation policy?");
    assert!((hits[1].distance - 2f64.sqrt()).abs() < 1e-9);
}

#[tokio::test]
async fn test_short_vector_rejected() {
    let temp = TempDir::new().unwrap();
    let store = create_store(&temp);

    let result = store.insert("Too short", &vec![0.5f32; 300]).await;
    assert!(matches!(
        result,
        Err(FaqError::DimensionMismatch {
            expected: 384,
            actual: 300
        })
    ));
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_search_on_empty_store() {
    let temp = TempDir::new().unwrap();
    let provider = Arc::new(MockEmbeddingProvider::new(DIM));
    let retriever = Retriever::new(provider, create_store(&temp));

    let result = retriever.search("Are flights refundable?").await.unwrap();
    assert!(result.is_empty());
}

#[tokio::test]
async fn test_concurrent_writes_and_reads() {
    let temp = TempDir::new().unwrap();
    let store = create_store(&temp);
    let provider: Arc<dyn EmbeddingProvider> = Arc::new(MockEmbeddingProvider::new(DIM));
    let retriever = Arc::new(Retriever::new(provider.clone(), store.clone()));

    let mut handles = Vec::new();
    for question in TRAVEL_FAQ.iter().take(20) {
        let store = store.clone();
        let provider = provider.clone();
        handles.push(tokio::spawn(async move {
            let embedding = provider.embed(question).await?;
            store.insert(question, &embedding).await?;
            Ok::<(), FaqError>(())
        }));
    }
    for _ in 0..10 {
        let retriever = retriever.clone();
        handles.push(tokio::spawn(async move {
            let result = retriever.search("How do I book a flight?").await?;
            assert!(result.len() <= 5);
            Ok::<(), FaqError>(())
        }));
    }

    for handle in handles {
        handle.await.unwrap().unwrap();
    }
    assert_eq!(store.count().await.unwrap(), 20);
}
