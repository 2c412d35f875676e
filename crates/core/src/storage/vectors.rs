//! In-memory vector cache and metadata index, kept in sync with the durable store.
//!
//! [`VectorStore`] owns the authoritative map of cached vectors together with
//! the [`MetadataIndex`] over their metadata, both behind one `RwLock`.
//! Mutations hold the write lock for their whole duration and persist before
//! touching memory: if the durable commit fails, the cache and index are left
//! exactly as they were. Reads and searches share the read lock.

use crate::error::{Entity, Result, StoreError};
use crate::filter_types::MetadataFilter;
use crate::search::filter::MetadataIndex;
use crate::search::hybrid::hybrid_search;
use crate::search::types::{HybridSearchRequest, HybridSearchResponse, SearchRequest, SearchResponse};
use crate::search::vector::vector_search;
use crate::storage::codec;
use crate::storage::kv::{DurableStore, Partition};
use crate::storage::next_timestamp;
use crate::vector::Vector;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::ops::ControlFlow;
use std::sync::Arc;

/// Cached vectors and the inverted index over their metadata.
#[derive(Debug, Default)]
pub struct VectorCache {
    pub vectors: HashMap<String, Arc<Vector>>,
    pub index: MetadataIndex,
}

impl VectorCache {
    fn put(&mut self, vector: Arc<Vector>) {
        self.index.add(&vector.id, &vector.metadata);
        self.vectors.insert(vector.id.clone(), vector);
    }

    fn take(&mut self, id: &str) -> Option<Arc<Vector>> {
        let vector = self.vectors.remove(id)?;
        self.index.remove(id, &vector.metadata);
        Some(vector)
    }

    /// All cached vectors in ascending ID order.
    pub fn sorted(&self) -> Vec<Arc<Vector>> {
        let mut all: Vec<Arc<Vector>> = self.vectors.values().cloned().collect();
        all.sort_unstable_by(|a, b| a.id.cmp(&b.id));
        all
    }

    /// Vectors matching every pair of `filter`, in ascending ID order.
    /// An empty filter matches all vectors.
    pub fn filter(&self, filter: &MetadataFilter) -> Vec<Arc<Vector>> {
        let Some(ids) = self.index.matching_ids(filter) else {
            return self.sorted();
        };
        let mut matched: Vec<Arc<Vector>> = ids
            .into_iter()
            .filter_map(|id| self.vectors.get(id).cloned())
            .collect();
        matched.sort_unstable_by(|a, b| a.id.cmp(&b.id));
        matched
    }
}

/// Thread-safe vector store.
#[derive(Debug)]
pub struct VectorStore {
    kv: Arc<DurableStore>,
    data: RwLock<VectorCache>,
}

impl VectorStore {
    /// Rebuilds the cache and index from every record in the vectors partition.
    ///
    /// A record that fails to decode aborts the load.
    pub fn load(kv: Arc<DurableStore>) -> Result<Self> {
        let mut cache = VectorCache::default();
        kv.for_each(Partition::Vectors, |key, bytes| {
            let vector: Vector = codec::decode(bytes).inspect_err(|e| {
                tracing::error!(vector_id = %key, "Failed to decode stored vector: {}", e);
            })?;
            cache.put(Arc::new(vector));
            Ok(ControlFlow::Continue(()))
        })?;

        tracing::info!(
            vectors = cache.vectors.len(),
            metadata_keys = cache.index.key_count(),
            "Rebuilt vector cache"
        );
        Ok(Self {
            kv,
            data: RwLock::new(cache),
        })
    }

    /// Inserts a new vector, stamping both timestamps with the current time.
    ///
    /// Fails with `Conflict` if the ID is taken.
    pub fn insert(&self, mut vector: Vector) -> Result<Arc<Vector>> {
        vector.validate()?;
        let mut data = self.data.write();
        if data.vectors.contains_key(&vector.id) {
            return Err(StoreError::conflict(Entity::Vector, &vector.id));
        }

        let now = Utc::now();
        vector.created_at = now;
        vector.updated_at = now;

        let bytes = codec::encode(&vector)?;
        if !self.kv.put_new(Partition::Vectors, &vector.id, &bytes)? {
            return Err(StoreError::conflict(Entity::Vector, &vector.id));
        }

        let vector = Arc::new(vector);
        data.put(Arc::clone(&vector));
        tracing::debug!(vector_id = %vector.id, dimension = vector.dimension(), "Vector inserted");
        Ok(vector)
    }

    /// Retrieves a vector by ID.
    pub fn get(&self, id: &str) -> Result<Arc<Vector>> {
        self.data
            .read()
            .vectors
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(Entity::Vector, id))
    }

    /// Replaces the vector stored under `id`.
    ///
    /// The ID of `vector` is ignored in favour of `id`; `created_at` is carried
    /// over and `updated_at` advances.
    pub fn update(&self, id: &str, mut vector: Vector) -> Result<Arc<Vector>> {
        vector.id = id.to_string();
        vector.validate()?;
        let mut data = self.data.write();
        let previous = data
            .vectors
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(Entity::Vector, id))?;

        vector.created_at = previous.created_at;
        vector.updated_at = next_timestamp(previous.updated_at);

        let bytes = codec::encode(&vector)?;
        self.kv.put(Partition::Vectors, id, &bytes)?;

        let vector = Arc::new(vector);
        data.take(id);
        data.put(Arc::clone(&vector));
        tracing::debug!(vector_id = %id, "Vector updated");
        Ok(vector)
    }

    /// Deletes a vector from the durable store, the cache, and the index.
    pub fn delete(&self, id: &str) -> Result<()> {
        let mut data = self.data.write();
        if !data.vectors.contains_key(id) {
            return Err(StoreError::not_found(Entity::Vector, id));
        }
        if !self.kv.delete(Partition::Vectors, id)? {
            tracing::warn!(vector_id = %id, "Cached vector had no durable record");
        }
        data.take(id);
        tracing::debug!(vector_id = %id, "Vector deleted");
        Ok(())
    }

    /// A window of cached vectors in ascending ID order.
    pub fn list(&self, limit: usize, offset: usize) -> Vec<Arc<Vector>> {
        self.data
            .read()
            .sorted()
            .into_iter()
            .skip(offset)
            .take(limit)
            .collect()
    }

    /// Vectors matching every pair of `filter`, in ascending ID order.
    pub fn filter(&self, filter: &MetadataFilter) -> Vec<Arc<Vector>> {
        self.data.read().filter(filter)
    }

    /// Plain cosine-similarity search over the vectors matching `request.filter`.
    pub fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        if request.query.is_empty() {
            return Err(StoreError::EmptyQuery);
        }
        let data = self.data.read();
        let candidates = data.filter(&request.filter);
        vector_search(candidates, request)
    }

    /// Hybrid BM25 + cosine search over every cached vector.
    pub fn hybrid_search(&self, request: &HybridSearchRequest) -> Result<HybridSearchResponse> {
        if request.query.is_empty() || request.query_vector.is_empty() {
            return Err(StoreError::EmptyQuery);
        }
        let data = self.data.read();
        let corpus = data.sorted();
        hybrid_search(&corpus, request)
    }

    /// Number of cached vectors.
    pub fn len(&self) -> usize {
        self.data.read().vectors.len()
    }

    /// Returns `true` if no vectors are cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of distinct metadata keys in the index.
    pub fn metadata_key_count(&self) -> usize {
        self.data.read().index.key_count()
    }

    /// Total `(key, value, id)` entries in the index.
    pub fn index_entry_count(&self) -> usize {
        self.data.read().index.entry_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::filter_types::{metadata, Metadata};
    use crate::search::filter::matches_filter;
    use std::time::Duration;
    use tempfile::TempDir;

    fn open_store(dir: &TempDir) -> VectorStore {
        let kv = DurableStore::open(&dir.path().join("vectors.redb"), Duration::from_secs(1)).unwrap();
        VectorStore::load(Arc::new(kv)).unwrap()
    }

    fn vec_with(id: &str, values: Vec<f32>, meta: &[(&str, &str)]) -> Vector {
        Vector::new(id, values, "", metadata(meta))
    }

    fn ids(vectors: &[Arc<Vector>]) -> Vec<&str> {
        vectors.iter().map(|v| v.id.as_str()).collect()
    }

    fn seed(store: &VectorStore) {
        store
            .insert(vec_with(
                "vec001",
                vec![0.5, 0.2, 0.1, 0.7],
                &[("category", "science"), ("author", "Alice")],
            ))
            .unwrap();
        store
            .insert(vec_with(
                "vec002",
                vec![0.9, 0.1, 0.4, 0.3],
                &[("category", "math"), ("author", "Bob")],
            ))
            .unwrap();
        store
            .insert(vec_with(
                "vec003",
                vec![0.2, 0.8, 0.5, 0.1],
                &[("category", "science"), ("author", "Charlie")],
            ))
            .unwrap();
    }

    // ── CRUD ───────────────────────────────────────────────────────────

    #[test]
    fn test_insert_and_get() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        let stored = store
            .insert(vec_with("v1", vec![1.0, 2.0], &[("k", "v")]))
            .unwrap();
        assert_eq!(stored.created_at, stored.updated_at);

        let fetched = store.get("v1").unwrap();
        assert_eq!(*fetched, *stored);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_insert_duplicate_conflicts() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        store.insert(vec_with("v1", vec![1.0], &[])).unwrap();
        let err = store.insert(vec_with("v1", vec![2.0], &[])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(store.get("v1").unwrap().values, vec![1.0]);
    }

    #[test]
    fn test_insert_invalid_rejected() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        for bad in [
            vec_with("", vec![1.0], &[]),
            vec_with("v1", vec![], &[]),
            vec_with("v1", vec![f32::INFINITY], &[]),
        ] {
            assert_eq!(store.insert(bad).unwrap_err().kind(), ErrorKind::InvalidInput);
        }
        assert!(store.is_empty());
    }

    #[test]
    fn test_get_missing() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        assert_eq!(store.get("nope").unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_update_preserves_created_at() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        let original = store
            .insert(vec_with("v1", vec![1.0, 0.0], &[("color", "red")]))
            .unwrap();

        let err = store
            .update("missing", vec_with("other", vec![0.0, 1.0], &[]))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let updated = store
            .update("v1", vec_with("other", vec![0.0, 1.0], &[("color", "blue")]))
            .unwrap();
        assert_eq!(updated.id, "v1");
        assert_eq!(updated.created_at, original.created_at);
        assert!(updated.updated_at > original.updated_at);
        assert_eq!(store.get("v1").unwrap().values, vec![0.0, 1.0]);
    }

    #[test]
    fn test_update_reindexes_metadata() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        store
            .insert(vec_with("v1", vec![1.0], &[("color", "red"), ("size", "s")]))
            .unwrap();
        store
            .update("v1", vec_with("v1", vec![1.0], &[("color", "blue")]))
            .unwrap();

        assert!(store.filter(&metadata(&[("color", "red")])).is_empty());
        assert!(store.filter(&metadata(&[("size", "s")])).is_empty());
        assert_eq!(ids(&store.filter(&metadata(&[("color", "blue")]))), vec!["v1"]);
        assert_eq!(store.metadata_key_count(), 1);
    }

    #[test]
    fn test_delete() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        seed(&store);
        store.delete("vec001").unwrap();

        assert_eq!(store.get("vec001").unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(ids(&store.list(10, 0)), vec!["vec002", "vec003"]);
        assert_eq!(
            ids(&store.filter(&metadata(&[("category", "science")]))),
            vec!["vec003"]
        );
        assert!(store.filter(&metadata(&[("author", "Alice")])).is_empty());
        assert_eq!(store.delete("vec001").unwrap_err().kind(), ErrorKind::NotFound);
    }

    // ── List and filter ────────────────────────────────────────────────

    #[test]
    fn test_list_windows() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        seed(&store);
        assert_eq!(ids(&store.list(2, 0)), vec!["vec001", "vec002"]);
        assert_eq!(ids(&store.list(2, 2)), vec!["vec003"]);
        assert!(store.list(10, 3).is_empty());
        assert!(store.list(10, 100).is_empty());
    }

    #[test]
    fn test_filter() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        seed(&store);

        assert_eq!(store.filter(&MetadataFilter::new()).len(), 3);
        assert_eq!(
            ids(&store.filter(&metadata(&[("category", "science")]))),
            vec!["vec001", "vec003"]
        );
        assert_eq!(
            ids(&store.filter(&metadata(&[("category", "science"), ("author", "Charlie")]))),
            vec!["vec003"]
        );
        assert!(store.filter(&metadata(&[("year", "2024")])).is_empty());
        assert!(store.filter(&metadata(&[("category", "art")])).is_empty());
    }

    #[test]
    fn test_churn_leaves_no_residual_index_entries() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        for round in 0..5 {
            for i in 0..10 {
                let tag = format!("t{}", (i + round) % 3);
                store
                    .insert(vec_with(&format!("v{i}"), vec![1.0, i as f32], &[("tag", tag.as_str())]))
                    .unwrap();
            }
            for i in 0..10 {
                store.delete(&format!("v{i}")).unwrap();
            }
        }
        assert!(store.is_empty());
        assert_eq!(store.metadata_key_count(), 0);
        assert_eq!(store.index_entry_count(), 0);
    }

    #[test]
    fn test_index_agrees_with_scan() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        for i in 0..30 {
            let bucket = format!("b{}", i % 4);
            let meta: Metadata = metadata(&[
                ("parity", if i % 2 == 0 { "even" } else { "odd" }),
                ("bucket", bucket.as_str()),
            ]);
            store
                .insert(Vector::new(format!("v{i:02}"), vec![1.0], "", meta))
                .unwrap();
        }
        for i in (0..30).step_by(3) {
            store.delete(&format!("v{i:02}")).unwrap();
        }

        let filter = metadata(&[("parity", "even"), ("bucket", "b2")]);
        let expected: Vec<String> = store
            .list(usize::MAX, 0)
            .iter()
            .filter(|v| matches_filter(&v.metadata, &filter))
            .map(|v| v.id.clone())
            .collect();
        let actual: Vec<String> = store.filter(&filter).iter().map(|v| v.id.clone()).collect();
        assert_eq!(actual, expected);
        assert!(!actual.is_empty());
    }

    // ── Search ─────────────────────────────────────────────────────────

    #[test]
    fn test_search_with_filter() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        seed(&store);
        let resp = store
            .search(&SearchRequest {
                query: vec![0.4, 0.2, 0.1, 0.6],
                top_k: 2,
                filter: metadata(&[("category", "science")]),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(resp.total, 2);
        let found: Vec<&str> = resp.results.iter().map(|r| r.vector.id.as_str()).collect();
        assert_eq!(found, vec!["vec001", "vec003"]);
        assert!(resp.results[0].score > resp.results[1].score);
    }

    #[test]
    fn test_search_no_candidates() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        seed(&store);
        let resp = store
            .search(&SearchRequest {
                query: vec![1.0, 0.0, 0.0, 0.0],
                filter: metadata(&[("category", "poetry")]),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(resp.total, 0);
        assert!(resp.results.is_empty());
    }

    #[test]
    fn test_search_empty_query() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        let err = store.search(&SearchRequest::default()).unwrap_err();
        assert!(matches!(err, StoreError::EmptyQuery));
        let err = store
            .hybrid_search(&HybridSearchRequest {
                query_vector: vec![1.0],
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::EmptyQuery));
    }

    #[test]
    fn test_hybrid_search_covers_all_vectors() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        store
            .insert(Vector::new("a", vec![1.0, 0.0], "rust storage engine", Metadata::new()))
            .unwrap();
        store
            .insert(Vector::new("b", vec![0.0, 1.0], "gardening tips", Metadata::new()))
            .unwrap();
        let resp = store
            .hybrid_search(&HybridSearchRequest {
                query: "rust".into(),
                query_vector: vec![0.0, 1.0],
                vector_weight: 0.1,
                keyword_weight: 0.9,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(resp.total, 2);
        assert_eq!(resp.results[0].id, "a");
        assert!(resp.results[0].keyword_score > 0.0);
        assert_eq!(resp.results[1].keyword_score, 0.0);
    }

    // ── Durability ─────────────────────────────────────────────────────

    #[test]
    fn test_reload_rebuilds_cache_and_index() {
        let dir = TempDir::new().unwrap();
        {
            let store = open_store(&dir);
            seed(&store);
            store
                .update(
                    "vec002",
                    vec_with("vec002", vec![0.9, 0.1, 0.4, 0.3], &[("category", "science")]),
                )
                .unwrap();
            store.delete("vec003").unwrap();
        }
        let store = open_store(&dir);
        assert_eq!(store.len(), 2);
        assert_eq!(
            ids(&store.filter(&metadata(&[("category", "science")]))),
            vec!["vec001", "vec002"]
        );
        assert!(store.filter(&metadata(&[("author", "Bob")])).is_empty());
        assert_eq!(store.get("vec001").unwrap().values, vec![0.5, 0.2, 0.1, 0.7]);
    }

    #[test]
    fn test_load_fails_on_corrupt_record() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vectors.redb");
        {
            let kv = DurableStore::open(&path, Duration::from_secs(1)).unwrap();
            kv.put(Partition::Vectors, "bad", b"{not json").unwrap();
        }
        let kv = DurableStore::open(&path, Duration::from_secs(1)).unwrap();
        let err = VectorStore::load(Arc::new(kv)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_failed_commit_leaves_cache_untouched() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        seed(&store);
        let science = metadata(&[("category", "science")]);
        let before = store.get("vec002").unwrap();
        let entries = store.index_entry_count();

        store.kv.set_fail_commits(true);
        let err = store
            .insert(vec_with("vec004", vec![0.1, 0.1, 0.1, 0.1], &[("category", "science")]))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
        let err = store
            .update("vec002", vec_with("vec002", vec![0.3, 0.3, 0.3, 0.3], &[("category", "science")]))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
        let err = store.delete("vec003").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);

        assert_eq!(store.len(), 3);
        assert_eq!(store.index_entry_count(), entries);
        assert_eq!(store.get("vec002").unwrap(), before);
        assert!(store.get("vec004").is_err());
        assert_eq!(ids(&store.filter(&science)), vec!["vec001", "vec003"]);
        assert_eq!(ids(&store.filter(&metadata(&[("author", "Bob")]))), vec!["vec002"]);

        // Nothing reached the file either.
        store.kv.set_fail_commits(false);
        drop(store);
        let store = open_store(&dir);
        assert_eq!(ids(&store.list(10, 0)), vec!["vec001", "vec002", "vec003"]);
        assert_eq!(store.get("vec002").unwrap().values, vec![0.9, 0.1, 0.4, 0.3]);
    }

    // ── Concurrency ────────────────────────────────────────────────────

    #[test]
    fn test_concurrent_writers_and_readers() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        std::thread::scope(|s| {
            for t in 0..4 {
                let store = &store;
                s.spawn(move || {
                    let thread = t.to_string();
                    for i in 0..25 {
                        let id = format!("t{t}-{i:02}");
                        store
                            .insert(vec_with(
                                &id,
                                vec![1.0, t as f32, i as f32],
                                &[("thread", thread.as_str())],
                            ))
                            .unwrap();
                    }
                });
            }
            for _ in 0..2 {
                let store = &store;
                s.spawn(move || {
                    for _ in 0..25 {
                        let resp = store
                            .search(&SearchRequest {
                                query: vec![1.0, 1.0, 1.0],
                                top_k: 5,
                                ..Default::default()
                            })
                            .unwrap();
                        assert!(resp.results.len() <= 5);
                    }
                });
            }
        });
        assert_eq!(store.len(), 100);
        for t in 0..4 {
            let thread = t.to_string();
            assert_eq!(store.filter(&metadata(&[("thread", thread.as_str())])).len(), 25);
        }
    }

    #[test]
    fn test_concurrent_duplicate_insert_single_winner() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        let winners: usize = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|t| {
                    let store = &store;
                    s.spawn(move || store.insert(vec_with("same", vec![t as f32 + 1.0], &[])).is_ok())
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap() as usize).sum()
        });
        assert_eq!(winners, 1);
        assert_eq!(store.len(), 1);
    }
}
