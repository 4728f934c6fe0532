/// HNSW index used to shortlist nearest-neighbour candidates
use hnsw_rs::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Candidate returned by the approximate search
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Document id
    pub id: i64,
    /// Approximate L2 distance reported by the index
    pub distance: f32,
}

/// In-memory HNSW graph over document embeddings (L2 metric)
///
/// The graph is not persisted: it is rebuilt from the documents table each
/// time the store is opened, then kept current on every insert.
pub struct AnnIndex {
    index: Hnsw<'static, f32, DistL2>,
    dimension: usize,
    ef_search: usize,
    count: AtomicUsize,
}

/// Upper bound on HNSW layers accepted by hnsw_rs
const MAX_LAYERS: usize = 16;

impl AnnIndex {
    /// Create an empty index
    ///
    /// * `m` - connections per node per layer
    /// * `ef_construction` - candidate list size while building
    /// * `ef_search` - candidate list size while searching
    /// * `max_elements` - capacity hint
    pub fn new(
        dimension: usize,
        m: usize,
        ef_construction: usize,
        ef_search: usize,
        max_elements: usize,
    ) -> Self {
        let index = Hnsw::<f32, DistL2>::new(m, max_elements, MAX_LAYERS, ef_construction, DistL2);

        Self {
            index,
            dimension,
            ef_search,
            count: AtomicUsize::new(0),
        }
    }

    /// Insert one vector; callers validate the dimension first
    pub fn insert(&self, id: i64, vector: &[f32]) {
        debug_assert_eq!(vector.len(), self.dimension);
        self.index.insert((vector, id as usize));
        self.count.fetch_add(1, Ordering::SeqCst);
    }

    /// Return up to `k` candidates, closest first
    pub fn search(&self, query: &[f32], k: usize) -> Vec<Candidate> {
        if self.is_empty() || k == 0 {
            return Vec::new();
        }

        let ef = self.ef_search.max(k);
        self.index
            .search(query, k, ef)
            .into_iter()
            .map(|neighbour| Candidate {
                id: neighbour.d_id as i64,
                distance: neighbour.distance,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axis(dimension: usize, hot: usize, value: f32) -> Vec<f32> {
        let mut v = vec![0.0; dimension];
        v[hot] = value;
        v
    }

    #[test]
    fn test_index_creation() {
        let index = AnnIndex::new(384, 16, 200, 64, 1000);
        assert_eq!(index.dimension(), 384);
        assert!(index.is_empty());
        assert!(index.search(&vec![0.0; 384], 5).is_empty());
    }

    #[test]
    fn test_insert_and_search() {
        let index = AnnIndex::new(16, 16, 200, 64, 1000);

        index.insert(1, &axis(16, 0, 1.0));
        index.insert(2, &axis(16, 1, 1.0));
        index.insert(3, &axis(16, 0, 0.9));
        assert_eq!(index.len(), 3);

        let results = index.search(&axis(16, 0, 1.0), 2);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, 1);
        assert!(results[0].distance < 1e-6);
        assert_eq!(results[1].id, 3);
    }
}
