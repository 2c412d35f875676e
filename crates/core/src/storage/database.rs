use crate::config::StoreConfig;
use crate::error::Result;
use crate::storage::documents::DocumentStore;
use crate::storage::kv::{DurableStore, Partition};
use crate::storage::vectors::VectorStore;
use std::sync::Arc;

/// An open store: one durable file shared by the vector and document layers.
///
/// Construct it once and share it (typically behind an `Arc`) with everything
/// that needs storage access.
#[derive(Debug)]
pub struct Database {
    kv: Arc<DurableStore>,
    vectors: VectorStore,
    documents: DocumentStore,
}

impl Database {
    /// Opens the store described by `config` and rebuilds the vector cache.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        let kv = Arc::new(DurableStore::open(&config.db_path, config.open_timeout)?);
        let vectors = VectorStore::load(Arc::clone(&kv))?;
        let documents = DocumentStore::new(Arc::clone(&kv));
        tracing::info!(
            path = ?config.db_path,
            vectors = vectors.len(),
            "Database opened"
        );
        Ok(Self {
            kv,
            vectors,
            documents,
        })
    }

    pub fn vectors(&self) -> &VectorStore {
        &self.vectors
    }

    pub fn documents(&self) -> &DocumentStore {
        &self.documents
    }

    /// Verifies that the vectors partition can still be read.
    pub fn health(&self) -> Result<()> {
        self.kv.check(Partition::Vectors)
    }

    /// Releases the durable handle. Every committed write is already on disk.
    pub fn close(self) {
        let path = self.kv.path().to_path_buf();
        drop(self);
        tracing::info!("Database at {:?} closed", path);
    }
}
