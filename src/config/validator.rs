use crate::config::Config;
use crate::error::{FaqError, Result, ValidationError};
use crate::storage::DEFAULT_TOP_K;
use std::net::SocketAddr;

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration
    pub fn validate(config: &Config) -> Result<()> {
        let mut errors = Vec::new();

        Self::validate_schema_version(config, &mut errors);
        Self::validate_server(config, &mut errors);
        Self::validate_storage(config, &mut errors);
        Self::validate_embedding(config, &mut errors);
        Self::validate_index(config, &mut errors);
        Self::validate_retrieval(config, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(FaqError::ConfigValidation { errors })
        }
    }

    fn validate_schema_version(config: &Config, errors: &mut Vec<ValidationError>) {
        let version = &config.meta.schema_version;
        if version != "1.0.0" {
            errors.push(ValidationError::new(
                "_meta.schema_version",
                format!("Unsupported schema version: {}", version),
            ));
        }
    }

    fn validate_server(config: &Config, errors: &mut Vec<ValidationError>) {
        if config.server.bind.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::new(
                "server.bind",
                format!("Invalid socket address: {}", config.server.bind),
            ));
        }
    }

    fn validate_storage(config: &Config, errors: &mut Vec<ValidationError>) {
        if config.storage.data_dir.as_os_str().is_empty() {
            errors.push(ValidationError::new(
                "storage.data_dir",
                "Data directory cannot be empty",
            ));
        }

        if config.storage.database_file.is_empty() {
            errors.push(ValidationError::new(
                "storage.database_file",
                "Database file name cannot be empty",
            ));
        }

        if config.storage.pool_size == 0 {
            errors.push(ValidationError::new(
                "storage.pool_size",
                "Pool size must be greater than 0",
            ));
        }
    }

    fn validate_embedding(config: &Config, errors: &mut Vec<ValidationError>) {
        let provider = &config.embedding.provider;
        let valid_providers = ["http", "mock"];
        if !valid_providers.contains(&provider.as_str()) {
            errors.push(ValidationError::new(
                "embedding.provider",
                format!(
                    "Provider must be one of {:?}, got '{}'",
                    valid_providers, provider
                ),
            ));
        }

        if provider == "http" {
            let endpoint = &config.embedding.endpoint;
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                errors.push(ValidationError::new(
                    "embedding.endpoint",
                    format!("Endpoint must be an http(s) URL, got '{}'", endpoint),
                ));
            }
        }

        if config.embedding.dimension == 0 {
            errors.push(ValidationError::new(
                "embedding.dimension",
                "Embedding dimension must be greater than 0",
            ));
        }

        if config.embedding.token_env.is_empty() {
            errors.push(ValidationError::new(
                "embedding.token_env",
                "Token environment variable name cannot be empty",
            ));
        }

        if config.embedding.timeout_secs == Some(0) {
            errors.push(ValidationError::new(
                "embedding.timeout_secs",
                "Timeout must be greater than 0 when set",
            ));
        }
    }

    fn validate_index(config: &Config, errors: &mut Vec<ValidationError>) {
        let strategy = &config.index.strategy;
        if strategy != "exact" && strategy != "hnsw" {
            errors.push(ValidationError::new(
                "index.strategy",
                format!("Strategy must be 'exact' or 'hnsw', got '{}'", strategy),
            ));
        }

        if config.index.hnsw_m == 0 {
            errors.push(ValidationError::new(
                "index.hnsw_m",
                "HNSW M must be greater than 0",
            ));
        }

        if config.index.hnsw_ef_construction == 0 {
            errors.push(ValidationError::new(
                "index.hnsw_ef_construction",
                "HNSW ef_construction must be greater than 0",
            ));
        }

        if config.index.hnsw_ef_search == 0 {
            errors.push(ValidationError::new(
                "index.hnsw_ef_search",
                "HNSW ef_search must be greater than 0",
            ));
        }

        if config.index.max_elements == 0 {
            errors.push(ValidationError::new(
                "index.max_elements",
                "Max elements must be greater than 0",
            ));
        }
    }

    fn validate_retrieval(config: &Config, errors: &mut Vec<ValidationError>) {
        let top_k = config.retrieval.top_k;
        if top_k == 0 || top_k > DEFAULT_TOP_K {
            errors.push(ValidationError::new(
                "retrieval.top_k",
                format!("top_k must be between 1 and {}, got {}", DEFAULT_TOP_K, top_k),
            ));
        }

        if config.indexing.max_concurrent == 0 {
            errors.push(ValidationError::new(
                "indexing.max_concurrent",
                "max_concurrent must be greater than 0",
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        let config = Config::default();
        assert!(ConfigValidator::validate(&config).is_ok());
    }

    #[test]
    fn test_top_k_bounds() {
        let mut config = Config::default();
        config.retrieval.top_k = 3;
        assert!(ConfigValidator::validate(&config).is_ok());

        for top_k in [0, 6, 50] {
            config.retrieval.top_k = top_k;
            assert!(ConfigValidator::validate(&config).is_err(), "top_k {}", top_k);
        }
    }

    #[test]
    fn test_invalid_bind() {
        let mut config = Config::default();
        config.server.bind = "localhost-ish".to_string();
        assert!(ConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn test_invalid_provider_and_strategy_collected() {
        let mut config = Config::default();
        config.embedding.provider = "carrier-pigeon".to_string();
        config.index.strategy = "guess".to_string();

        match ConfigValidator::validate(&config) {
            Err(FaqError::ConfigValidation { errors }) => {
                let paths: Vec<&str> = errors.iter().map(|e| e.path.as_str()).collect();
                assert!(paths.contains(&"embedding.provider"));
                assert!(paths.contains(&"index.strategy"));
            }
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn test_mock_provider_ignores_endpoint() {
        let mut config = Config::default();
        config.embedding.provider = "mock".to_string();
        config.embedding.endpoint = String::new();
        assert!(ConfigValidator::validate(&config).is_ok());
    }

    #[test]
    fn test_zero_values_rejected() {
        let mut config = Config::default();
        config.embedding.dimension = 0;
        config.retrieval.top_k = 0;
        config.storage.pool_size = 0;
        assert!(ConfigValidator::validate(&config).is_err());
    }
}
