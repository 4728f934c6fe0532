//! faqsense - Semantic FAQ Search
//!
//! Stores FAQ questions alongside their embeddings and returns the stored
//! questions closest to a new question by Euclidean distance. Embeddings come
//! from an external provider; documents live in a pooled SQLite store.

pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod indexing;
pub mod retrieval;
pub mod seed;
pub mod server;
pub mod storage;

pub use error::{FaqError, Result};
