//! Embedding generation and vector encodings
//!
//! - `EmbeddingProvider` trait over the external text-to-vector service
//! - `HttpEmbeddingProvider` for a hosted feature-extraction endpoint
//! - `MockEmbeddingProvider` for offline runs and tests
//! - `AnnIndex` (HNSW) for optional candidate shortlisting
//! - `codec` for the persisted, wire and literal vector forms
mod ann_index;
pub mod codec;
mod http;
mod provider;

pub use ann_index::{AnnIndex, Candidate};
pub use http::HttpEmbeddingProvider;
pub use provider::{EmbeddingProvider, MockEmbeddingProvider};

use crate::config::EmbeddingConfig;
use crate::error::{FaqError, Result};
use std::sync::Arc;

/// Construct the provider selected by `embedding.provider`
pub fn build_provider(config: &EmbeddingConfig) -> Result<Arc<dyn EmbeddingProvider>> {
    match config.provider.as_str() {
        "http" => {
            tracing::info!(
                "Using hosted embedding model {} ({}D, wait_for_model={})",
                config.model,
                config.dimension,
                config.wait_for_model
            );
            Ok(Arc::new(HttpEmbeddingProvider::from_config(config)?))
        }
        "mock" => {
            tracing::warn!("Using mock embeddings: results carry no semantic meaning");
            Ok(Arc::new(MockEmbeddingProvider::new(config.dimension)))
        }
        other => Err(FaqError::InvalidConfigValue {
            path: "embedding.provider".to_string(),
            message: format!("Unsupported provider: {}", other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_build_mock_provider() {
        let mut config = Config::default().embedding;
        config.provider = "mock".to_string();

        let provider = build_provider(&config).unwrap();
        assert_eq!(provider.dimension(), 384);
        assert_eq!(provider.model_name(), "mock");
    }

    #[test]
    fn test_build_http_provider() {
        let config = Config::default().embedding;
        let provider = build_provider(&config).unwrap();
        assert_eq!(provider.model_name(), "sentence-transformers/all-MiniLM-L6-v2");
    }

    #[test]
    fn test_unknown_provider() {
        let mut config = Config::default().embedding;
        config.provider = "telepathy".to_string();
        assert!(build_provider(&config).is_err());
    }
}
