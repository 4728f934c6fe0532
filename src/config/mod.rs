//! Configuration management for faqsense
//!
//! Loads the TOML config file, applies profile and environment overrides and
//! validates the result before any component is constructed.

use crate::error::{FaqError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

mod validator;

pub use validator::ConfigValidator;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "_meta")]
    pub meta: MetaConfig,
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub embedding: EmbeddingConfig,
    pub index: IndexConfig,
    pub retrieval: RetrievalConfig,
    pub indexing: IndexingConfig,
    #[serde(default)]
    pub profiles: HashMap<String, ProfileOverrides>,
}

/// Metadata about the configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaConfig {
    pub schema_version: String,
    #[serde(default = "current_timestamp")]
    pub created_at: String,
    #[serde(default = "current_timestamp")]
    pub last_modified: String,
}

fn current_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind: String,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub database_file: String,
    pub pool_size: u32,
}

impl StorageConfig {
    /// Full path of the SQLite database, with `~/` expanded
    pub fn database_path(&self) -> Result<PathBuf> {
        Ok(expand_path(&self.data_dir)?.join(&self.database_file))
    }
}

/// Embedding provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// "http" or "mock"
    pub provider: String,
    pub endpoint: String,
    pub model: String,
    /// Name of the environment variable holding the bearer token
    pub token_env: String,
    pub dimension: usize,
    pub wait_for_model: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl EmbeddingConfig {
    /// Read the provider credential from the configured environment variable
    pub fn token(&self) -> Option<String> {
        std::env::var(&self.token_env)
            .ok()
            .filter(|token| !token.trim().is_empty())
    }
}

/// Vector index configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// "exact" or "hnsw"
    pub strategy: String,
    /// Below this many documents the exact scan is used even with hnsw enabled
    pub exact_threshold: usize,
    pub hnsw_m: usize,
    pub hnsw_ef_construction: usize,
    pub hnsw_ef_search: usize,
    pub max_elements: usize,
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    pub top_k: usize,
}

/// Batch indexing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexingConfig {
    pub max_concurrent: usize,
}

/// Profile-specific configuration overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding_provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding_endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_strategy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<usize>,
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        Self::read_file(path)?.finish(None, std::env::vars())
    }

    /// Load the file when present, otherwise start from defaults
    ///
    /// Overrides apply in order: file or defaults, then the profile, then the
    /// environment. The result is validated either way.
    pub fn load_or_default(path: &Path, profile: Option<&str>) -> Result<Self> {
        Self::resolve(path, profile, std::env::vars())
    }

    fn resolve<I>(path: &Path, profile: Option<&str>, vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = if path.exists() {
            Self::read_file(path)?
        } else {
            tracing::warn!(
                "Config file not found, using defaults. Run 'faqsense config init' to create one."
            );
            Self::default()
        };
        config.finish(profile, vars)
    }

    fn read_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(FaqError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| FaqError::Io {
            source: e,
            context: format!("Failed to read config file: {:?}", path),
        })?;
        Ok(toml::from_str(&content)?)
    }

    fn finish<I>(mut self, profile: Option<&str>, vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        if let Some(profile) = profile {
            self.apply_profile(profile)?;
        }
        self.apply_overrides_from(vars);
        ConfigValidator::validate(&self)?;
        Ok(self)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| FaqError::Io {
            source: e,
            context: format!("Failed to write config file: {:?}", path),
        })?;
        Ok(())
    }

    /// Apply a profile's overrides to the configuration
    pub fn apply_profile(&mut self, profile: &str) -> Result<()> {
        let overrides = self
            .profiles
            .get(profile)
            .cloned()
            .ok_or_else(|| FaqError::Config(format!("Unknown profile: {}", profile)))?;

        if let Some(provider) = overrides.embedding_provider {
            self.embedding.provider = provider;
        }
        if let Some(endpoint) = overrides.embedding_endpoint {
            self.embedding.endpoint = endpoint;
        }
        if let Some(strategy) = overrides.index_strategy {
            self.index.strategy = strategy;
        }
        if let Some(top_k) = overrides.top_k {
            self.retrieval.top_k = top_k;
        }
        Ok(())
    }

    /// Environment overrides in the form `FAQSENSE_SECTION__KEY=value`, plus `PORT`.
    /// `PORT` is applied first so an explicit `FAQSENSE_SERVER__BIND` wins
    fn apply_overrides_from<I>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars: Vec<(String, String)> = vars.into_iter().collect();

        if let Some((_, port)) = vars.iter().find(|(key, _)| key == "PORT") {
            if let Err(e) = self.set_port(port) {
                tracing::warn!("Ignoring PORT: {}", e);
            }
        }

        for (key, value) in &vars {
            if let Some(config_key) = key.strip_prefix("FAQSENSE_") {
                if let Err(e) = self.set_value_from_env(config_key, value) {
                    tracing::warn!("Failed to apply env override {}: {}", key, e);
                }
            }
        }
    }

    /// Replace the port of `server.bind`, keeping its host
    fn set_port(&mut self, value: &str) -> Result<()> {
        let port: u16 = value.trim().parse().map_err(|_| FaqError::InvalidConfigValue {
            path: "PORT".to_string(),
            message: format!("Cannot parse '{}' as a port", value),
        })?;

        let host = self
            .server
            .bind
            .rsplit_once(':')
            .map(|(host, _)| host)
            .unwrap_or("127.0.0.1");
        self.server.bind = format!("{}:{}", host, port);
        Ok(())
    }

    fn set_value_from_env(&mut self, path: &str, value: &str) -> Result<()> {
        match path {
            "SERVER__BIND" => self.server.bind = value.to_string(),
            "STORAGE__DATA_DIR" => self.storage.data_dir = PathBuf::from(value),
            "EMBEDDING__PROVIDER" => self.embedding.provider = value.to_string(),
            "EMBEDDING__ENDPOINT" => self.embedding.endpoint = value.to_string(),
            "EMBEDDING__MODEL" => self.embedding.model = value.to_string(),
            "EMBEDDING__WAIT_FOR_MODEL" => {
                self.embedding.wait_for_model =
                    value.parse().map_err(|_| FaqError::InvalidConfigValue {
                        path: path.to_string(),
                        message: format!("Cannot parse '{}' as boolean", value),
                    })?;
            }
            "INDEX__STRATEGY" => self.index.strategy = value.to_string(),
            "RETRIEVAL__TOP_K" => {
                self.retrieval.top_k = value.parse().map_err(|_| FaqError::InvalidConfigValue {
                    path: path.to_string(),
                    message: format!("Cannot parse '{}' as integer", value),
                })?;
            }
            _ => {
                tracing::debug!("Unknown env config key: {}", path);
            }
        }
        Ok(())
    }

    /// Get the default configuration file path
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| FaqError::Config("Cannot determine config directory".to_string()))?;

        Ok(config_dir.join("faqsense").join("config.toml"))
    }
}

impl Default for Config {
    fn default() -> Self {
        let mut profiles = HashMap::new();
        profiles.insert(
            "offline".to_string(),
            ProfileOverrides {
                embedding_provider: Some("mock".to_string()),
                ..ProfileOverrides::default()
            },
        );

        Self {
            meta: MetaConfig {
                schema_version: "1.0.0".to_string(),
                created_at: current_timestamp(),
                last_modified: current_timestamp(),
            },
            server: ServerConfig {
                bind: "127.0.0.1:4000".to_string(),
            },
            storage: StorageConfig {
                data_dir: PathBuf::from("~/.faqsense"),
                database_file: "faq.sqlite".to_string(),
                pool_size: 16,
            },
            embedding: EmbeddingConfig {
                provider: "http".to_string(),
                endpoint: "https://api-inference.huggingface.co/pipeline/feature-extraction/sentence-transformers/all-MiniLM-L6-v2".to_string(),
                model: "sentence-transformers/all-MiniLM-L6-v2".to_string(),
                token_env: "HF_TOKEN".to_string(),
                dimension: 384,
                wait_for_model: true,
                timeout_secs: None,
            },
            index: IndexConfig {
                strategy: "exact".to_string(),
                exact_threshold: 2000,
                hnsw_m: 16,
                hnsw_ef_construction: 200,
                hnsw_ef_search: 64,
                max_elements: 100_000,
            },
            retrieval: RetrievalConfig { top_k: 5 },
            indexing: IndexingConfig { max_concurrent: 4 },
            profiles,
        }
    }
}

/// Expand a leading `~/` to the home directory
pub fn expand_path(path: &Path) -> Result<PathBuf> {
    let path_str = path
        .to_str()
        .ok_or_else(|| FaqError::Config("Invalid path encoding".to_string()))?;

    if let Some(stripped) = path_str.strip_prefix("~/") {
        let home = dirs::home_dir()
            .ok_or_else(|| FaqError::Config("Cannot determine home directory".to_string()))?;
        Ok(home.join(stripped))
    } else {
        Ok(path.to_path_buf())
    }
}
