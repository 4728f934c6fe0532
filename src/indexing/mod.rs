//! Write path: embed texts and persist them as documents
//!
//! Every item is processed independently. A failed embedding or insert is
//! reported in that item's slot and never stops the rest of the batch.

use crate::embedding::EmbeddingProvider;
use crate::error::{FaqError, Result};
use crate::storage::{DocumentId, VectorStore};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Summary of a finished batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSummary {
    pub processed: usize,
    pub failed: usize,
    pub duration_ms: u64,
}

impl IndexSummary {
    pub fn from_results(results: &[Result<DocumentId>], duration_ms: u64) -> Self {
        let failed = results.iter().filter(|r| r.is_err()).count();
        Self {
            processed: results.len() - failed,
            failed,
            duration_ms,
        }
    }
}

/// Embeds texts through the provider and inserts them into the store
pub struct Indexer {
    provider: Arc<dyn EmbeddingProvider>,
    store: Arc<VectorStore>,
    max_concurrent: usize,
}

impl Indexer {
    /// Create a new indexer
    ///
    /// * `max_concurrent` - items embedded/inserted at the same time (min 1)
    ///
    /// Fails when the provider and the store disagree on dimensionality.
    pub fn new(
        provider: Arc<dyn EmbeddingProvider>,
        store: Arc<VectorStore>,
        max_concurrent: usize,
    ) -> Result<Self> {
        if provider.dimension() != store.dimension() {
            return Err(FaqError::DimensionMismatch {
                expected: store.dimension(),
                actual: provider.dimension(),
            });
        }

        Ok(Self {
            provider,
            store,
            max_concurrent: max_concurrent.max(1),
        })
    }

    /// Embed and store a single text
    pub async fn index_one(&self, text: &str) -> Result<DocumentId> {
        let embedding = self.provider.embed(text).await?;
        self.store.insert(text, &embedding).await
    }

    /// Index a batch, returning one result per input in input order
    ///
    /// Identical texts are not deduplicated: each becomes a new document.
    pub async fn index<S>(&self, texts: &[S]) -> Vec<Result<DocumentId>>
    where
        S: AsRef<str> + Sync,
    {
        self.index_with_summary(texts).await.0
    }

    /// Same as [`Indexer::index`], also returning the logged summary
    pub async fn index_with_summary<S>(
        &self,
        texts: &[S],
    ) -> (Vec<Result<DocumentId>>, IndexSummary)
    where
        S: AsRef<str> + Sync,
    {
        let start = Instant::now();
        info!("Starting batch indexing of {} items", texts.len());

        let results: Vec<Result<DocumentId>> = stream::iter(texts.iter().enumerate())
            .map(|(position, text)| async move {
                let text = text.as_ref();
                let result = self.index_one(text).await;
                match &result {
                    Ok(id) => debug!("Indexed item {} as document {}", position, id),
                    Err(e) => warn!("Failed to index item {} ({:?}): {}", position, text, e),
                }
                result
            })
            .buffered(self.max_concurrent)
            .collect()
            .await;

        let summary = IndexSummary::from_results(&results, start.elapsed().as_millis() as u64);
        info!(
            "Batch indexing complete: {} processed, {} failed, {}ms",
            summary.processed, summary.failed, summary.duration_ms
        );

        (results, summary)
    }
}
