//! Storage layer for faqsense
//!
//! Pooled SQLite database plus the vector store built on top of it

pub mod database;
pub mod vector_store;

use crate::config::Config;
use crate::error::Result;

pub use database::{Database, DbPool, DbStats};
pub use vector_store::{
    Document, DocumentId, Neighbor, SearchStrategy, StoreOptions, VectorStore, DEFAULT_TOP_K,
};

/// Open the database and vector store described by the config
///
/// Creates the data directory and schema when missing; safe to call on an
/// existing store.
pub fn open_store(config: &Config) -> Result<(Database, VectorStore)> {
    let db_path = config.storage.database_path()?;
    tracing::info!("Opening store at {}", db_path.display());

    let database = Database::new(&db_path, config.storage.pool_size)?;
    let options = StoreOptions::from_config(&config.index)?;
    let store = VectorStore::open(&database, config.embedding.dimension, options)?;

    Ok((database, store))
}
