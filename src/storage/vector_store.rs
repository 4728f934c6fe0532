//! Durable document store with L2 nearest-neighbour queries
//!
//! Documents live in the `documents` table with their embedding encoded as a
//! fixed-width little-endian f32 blob. Queries either scan every row (exact)
//! or shortlist candidates through an in-memory HNSW graph and re-rank them
//! with exact distances.

use super::database::{Database, DbPool};
use crate::config::IndexConfig;
use crate::embedding::codec::{self, l2_distance};
use crate::embedding::AnnIndex;
use crate::error::{FaqError, Result};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use serde::Serialize;
use std::sync::{Arc, Mutex};

/// Default result-set size for nearest-neighbour queries
pub const DEFAULT_TOP_K: usize = 5;

/// Store-assigned document identifier
pub type DocumentId = i64;

/// One indexed unit
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: DocumentId,
    pub title: String,
    pub embedding: Vec<f32>,
}

/// One entry of a ranked result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Neighbor {
    pub id: DocumentId,
    pub title: String,
    /// L2 distance to the query; smaller is more similar
    pub distance: f64,
}

/// How nearest-neighbour queries are answered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStrategy {
    /// Scan and score every document
    Exact,
    /// HNSW shortlist followed by exact re-ranking
    Hnsw,
}

impl SearchStrategy {
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "exact" => Ok(SearchStrategy::Exact),
            "hnsw" => Ok(SearchStrategy::Hnsw),
            other => Err(FaqError::InvalidConfigValue {
                path: "index.strategy".to_string(),
                message: format!("Unknown strategy: {}", other),
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchStrategy::Exact => "exact",
            SearchStrategy::Hnsw => "hnsw",
        }
    }
}

/// Tuning for the approximate path
#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub strategy: SearchStrategy,
    pub exact_threshold: usize,
    pub hnsw_m: usize,
    pub hnsw_ef_construction: usize,
    pub hnsw_ef_search: usize,
    pub max_elements: usize,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            strategy: SearchStrategy::Exact,
            exact_threshold: 2000,
            hnsw_m: 16,
            hnsw_ef_construction: 200,
            hnsw_ef_search: 64,
            max_elements: 100_000,
        }
    }
}

impl StoreOptions {
    pub fn from_config(config: &IndexConfig) -> Result<Self> {
        Ok(Self {
            strategy: SearchStrategy::parse(&config.strategy)?,
            exact_threshold: config.exact_threshold,
            hnsw_m: config.hnsw_m,
            hnsw_ef_construction: config.hnsw_ef_construction,
            hnsw_ef_search: config.hnsw_ef_search,
            max_elements: config.max_elements,
        })
    }
}

/// Vector store over a pooled SQLite database
///
/// Safe to share behind an `Arc` across concurrent requests: each call
/// checks a connection out of the pool for the duration of one statement
/// batch and runs it on the blocking thread pool.
pub struct VectorStore {
    pool: DbPool,
    dimension: usize,
    options: StoreOptions,
    shortlist: Option<Arc<Shortlist>>,
}

/// HNSW graph plus the highest document id it already holds
///
/// Other handles and processes may write to the same database, so the graph
/// is brought up to date from the table before every use.
struct Shortlist {
    ann: AnnIndex,
    synced_through: Mutex<DocumentId>,
}

impl Shortlist {
    fn new(dimension: usize, options: &StoreOptions) -> Self {
        Self {
            ann: AnnIndex::new(
                dimension,
                options.hnsw_m,
                options.hnsw_ef_construction,
                options.hnsw_ef_search,
                options.max_elements,
            ),
            synced_through: Mutex::new(0),
        }
    }

    /// Add every row newer than the last synced id; returns how many were added
    fn sync(&self, conn: &Connection, dimension: usize) -> Result<usize> {
        let mut synced_through = self
            .synced_through
            .lock()
            .map_err(|_| FaqError::StoreUnavailable("HNSW index lock poisoned".to_string()))?;

        let mut stmt =
            conn.prepare_cached("SELECT id, embedding FROM documents WHERE id > ?1 ORDER BY id")?;
        let rows = stmt.query_map(params![*synced_through], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, Vec<u8>>(1)?))
        })?;

        let mut added = 0;
        for row in rows {
            let (id, blob) = row?;
            let vector = codec::decode_blob(&blob, dimension)?;
            self.ann.insert(id, &vector);
            *synced_through = id;
            added += 1;
        }
        Ok(added)
    }
}

const DIMENSION_KEY: &str = "dimension";

impl VectorStore {
    /// Open the store, fixing its dimensionality on first use
    ///
    /// Reopening an existing store with a different dimension fails with
    /// `DimensionMismatch` (expected = stored dimension).
    pub fn open(database: &Database, dimension: usize, options: StoreOptions) -> Result<Self> {
        if dimension == 0 {
            return Err(FaqError::InvalidConfigValue {
                path: "embedding.dimension".to_string(),
                message: "Dimension must be greater than 0".to_string(),
            });
        }

        let pool = database.pool();
        let conn = pool.get()?;
        ensure_dimension(&conn, dimension)?;

        let shortlist = match options.strategy {
            SearchStrategy::Exact => None,
            SearchStrategy::Hnsw => {
                let shortlist = Shortlist::new(dimension, &options);
                let added = shortlist.sync(&conn, dimension)?;
                tracing::info!("Rebuilt HNSW index with {} documents", added);
                Some(Arc::new(shortlist))
            }
        };
        drop(conn);

        tracing::info!(
            "Vector store ready ({}D, strategy={})",
            dimension,
            options.strategy.as_str()
        );

        Ok(Self {
            pool,
            dimension,
            options,
            shortlist,
        })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn strategy(&self) -> SearchStrategy {
        self.options.strategy
    }

    /// Persist a document and return its id
    ///
    /// The embedding is validated before anything is written, so a rejected
    /// insert leaves the store untouched.
    pub async fn insert(&self, title: &str, embedding: &[f32]) -> Result<DocumentId> {
        codec::validate(embedding, self.dimension)?;

        let pool = self.pool.clone();
        let shortlist = self.shortlist.clone();
        let dimension = self.dimension;
        let title = title.to_string();
        let embedding = embedding.to_vec();

        tokio::task::spawn_blocking(move || -> Result<DocumentId> {
            let conn = pool.get()?;
            conn.execute(
                "INSERT INTO documents (title, embedding) VALUES (?1, ?2)",
                params![title, codec::encode_blob(&embedding)],
            )?;
            let id = conn.last_insert_rowid();

            if let Some(shortlist) = shortlist {
                shortlist.sync(&conn, dimension)?;
            }

            tracing::debug!("Inserted document {}: {}", id, title);
            Ok(id)
        })
        .await?
    }

    /// Up to `k` documents closest to `query`, ascending by L2 distance
    ///
    /// Ties are broken by ascending document id. An empty store yields an
    /// empty result.
    pub async fn nearest_neighbors(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        if query.len() != self.dimension {
            return Err(FaqError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }
        if k == 0 {
            return Ok(Vec::new());
        }

        let pool = self.pool.clone();
        let dimension = self.dimension;
        let query = query.to_vec();
        let shortlist = self.shortlist.clone();
        let exact_threshold = self.options.exact_threshold;

        tokio::task::spawn_blocking(move || -> Result<Vec<Neighbor>> {
            let conn = pool.get()?;
            if let Some(shortlist) = shortlist {
                let added = shortlist.sync(&conn, dimension)?;
                if added > 0 {
                    tracing::debug!("Caught HNSW index up with {} new documents", added);
                }
                if shortlist.ann.len() > exact_threshold {
                    return approximate_search(&conn, &shortlist.ann, &query, k, dimension);
                }
            }
            exact_search(&conn, &query, k, dimension)
        })
        .await?
    }

    /// Fetch a single document
    pub async fn get(&self, id: DocumentId) -> Result<Option<Document>> {
        let pool = self.pool.clone();
        let dimension = self.dimension;

        tokio::task::spawn_blocking(move || -> Result<Option<Document>> {
            let conn = pool.get()?;
            let row = conn
                .query_row(
                    "SELECT id, title, embedding FROM documents WHERE id = ?1",
                    params![id],
                    |row| {
                        Ok((
                            row.get::<_, i64>(0)?,
                            row.get::<_, String>(1)?,
                            row.get::<_, Vec<u8>>(2)?,
                        ))
                    },
                )
                .optional()?;

            row.map(|(id, title, blob)| -> Result<Document> {
                Ok(Document {
                    id,
                    title,
                    embedding: codec::decode_blob(&blob, dimension)?,
                })
            })
            .transpose()
        })
        .await?
    }

    /// Number of stored documents
    pub async fn count(&self) -> Result<usize> {
        let pool = self.pool.clone();

        tokio::task::spawn_blocking(move || -> Result<usize> {
            let conn = pool.get()?;
            let count: i64 =
                conn.query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
            Ok(count as usize)
        })
        .await?
    }
}

/// Record the dimension on first open, verify it afterwards
fn ensure_dimension(conn: &Connection, dimension: usize) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO store_meta (key, value) VALUES (?1, ?2)",
        params![DIMENSION_KEY, dimension.to_string()],
    )?;

    let stored: String = conn.query_row(
        "SELECT value FROM store_meta WHERE key = ?1",
        params![DIMENSION_KEY],
        |row| row.get(0),
    )?;

    let stored: usize = stored.parse().map_err(|_| {
        FaqError::StoreUnavailable(format!("corrupt stored dimension: {}", stored))
    })?;

    if stored != dimension {
        return Err(FaqError::DimensionMismatch {
            expected: stored,
            actual: dimension,
        });
    }
    Ok(())
}

fn exact_search(
    conn: &Connection,
    query: &[f32],
    k: usize,
    dimension: usize,
) -> Result<Vec<Neighbor>> {
    let mut stmt = conn.prepare("SELECT id, title, embedding FROM documents")?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, Vec<u8>>(2)?,
        ))
    })?;

    let mut hits = Vec::new();
    for row in rows {
        let (id, title, blob) = row?;
        let vector = codec::decode_blob(&blob, dimension)?;
        hits.push(Neighbor {
            id,
            title,
            distance: l2_distance(query, &vector),
        });
    }

    Ok(rank(hits, k))
}

fn approximate_search(
    conn: &Connection,
    ann: &AnnIndex,
    query: &[f32],
    k: usize,
    dimension: usize,
) -> Result<Vec<Neighbor>> {
    // Over-fetch so exact re-ranking can repair the graph's ordering
    let candidates = ann.search(query, (k * 4).max(k + 16));
    if candidates.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; candidates.len()].join(",");
    let sql = format!(
        "SELECT id, title, embedding FROM documents WHERE id IN ({})",
        placeholders
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(candidates.iter().map(|c| c.id)), |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, Vec<u8>>(2)?,
        ))
    })?;

    let mut hits = Vec::with_capacity(candidates.len());
    for row in rows {
        let (id, title, blob) = row?;
        let vector = codec::decode_blob(&blob, dimension)?;
        hits.push(Neighbor {
            id,
            title,
            distance: l2_distance(query, &vector),
        });
    }

    Ok(rank(hits, k))
}

fn rank(mut hits: Vec<Neighbor>, k: usize) -> Vec<Neighbor> {
    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance).then(a.id.cmp(&b.id)));
    hits.truncate(k);
    hits
}
