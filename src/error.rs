use std::path::PathBuf;
use thiserror::Error;

/// Main error type for faqsense
#[derive(Error, Debug)]
pub enum FaqError {
    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration validation errors
    #[error("Configuration validation failed: {errors:?}")]
    ConfigValidation { errors: Vec<ValidationError> },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Invalid configuration value
    #[error("Invalid configuration value at {path}: {message}")]
    InvalidConfigValue { path: String, message: String },

    /// IO errors
    #[error("IO error: {context}: {source}")]
    Io {
        source: std::io::Error,
        context: String,
    },

    /// TOML deserialization errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization errors
    #[error("TOML serialization error: {0}")]
    TomlSerialization(#[from] toml::ser::Error),

    /// JSON errors
    #[error("JSON error: {context}: {source}")]
    Json {
        source: serde_json::Error,
        context: String,
    },

    /// Input rejected before any work was done (empty text, unparsable vector)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Embedding contains values that cannot be stored or compared
    #[error("Invalid embedding: {0}")]
    InvalidEmbedding(String),

    /// Embedding length differs from the store dimensionality
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Embedding provider call failed (network, auth, status, model never ready)
    #[error("Embedding provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Vector store connection or query failure
    #[error("Vector store unavailable: {0}")]
    StoreUnavailable(String),

    /// Search could not embed its query
    #[error("Embedding unavailable for search: {0}")]
    EmbeddingUnavailable(String),

    /// Generic errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<rusqlite::Error> for FaqError {
    fn from(err: rusqlite::Error) -> Self {
        FaqError::StoreUnavailable(err.to_string())
    }
}

impl From<r2d2::Error> for FaqError {
    fn from(err: r2d2::Error) -> Self {
        FaqError::StoreUnavailable(format!("connection pool: {}", err))
    }
}

impl From<tokio::task::JoinError> for FaqError {
    fn from(err: tokio::task::JoinError) -> Self {
        FaqError::StoreUnavailable(format!("store task failed: {}", err))
    }
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Path to the configuration key that failed validation
    pub path: String,
    /// Error message describing the validation failure
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result type for faqsense operations
pub type Result<T> = std::result::Result<T, FaqError>;
