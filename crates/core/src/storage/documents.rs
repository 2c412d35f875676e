//! Document CRUD directly against the durable store.
//!
//! Documents are not cached. Each mutation runs its existence check and its
//! write in one redb write transaction, so concurrent inserts of the same ID
//! cannot both succeed and concurrent updates cannot lose `created_at`.

use crate::document::Document;
use crate::error::{Entity, Result, StoreError};
use crate::storage::codec;
use crate::storage::kv::{DurableStore, Partition};
use crate::storage::next_timestamp;
use chrono::Utc;
use std::ops::ControlFlow;
use std::sync::Arc;

#[derive(Debug)]
pub struct DocumentStore {
    kv: Arc<DurableStore>,
}

impl DocumentStore {
    pub fn new(kv: Arc<DurableStore>) -> Self {
        Self { kv }
    }

    /// Stores a new document. Fails with `Conflict` if the ID is taken.
    pub fn insert(&self, mut doc: Document) -> Result<Document> {
        doc.validate()?;
        let now = Utc::now();
        doc.created_at = now;
        doc.updated_at = now;

        let bytes = codec::encode(&doc)?;
        if !self.kv.put_new(Partition::Documents, &doc.id, &bytes)? {
            return Err(StoreError::conflict(Entity::Document, &doc.id));
        }
        tracing::debug!(document_id = %doc.id, "Document inserted");
        Ok(doc)
    }

    pub fn get(&self, id: &str) -> Result<Document> {
        match self.kv.get(Partition::Documents, id)? {
            Some(bytes) => codec::decode(&bytes),
            None => Err(StoreError::not_found(Entity::Document, id)),
        }
    }

    /// Replaces the document stored under `id`, keeping its `created_at`.
    pub fn update(&self, id: &str, mut doc: Document) -> Result<Document> {
        doc.id = id.to_string();
        doc.validate()?;
        let updated = self.kv.replace(Partition::Documents, id, |bytes| {
            let existing: Document = codec::decode(bytes)?;
            doc.created_at = existing.created_at;
            doc.updated_at = next_timestamp(existing.updated_at);
            Ok((codec::encode(&doc)?, doc))
        })?;
        match updated {
            Some(doc) => {
                tracing::debug!(document_id = %id, "Document updated");
                Ok(doc)
            }
            None => Err(StoreError::not_found(Entity::Document, id)),
        }
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        if !self.kv.delete(Partition::Documents, id)? {
            return Err(StoreError::not_found(Entity::Document, id));
        }
        tracing::debug!(document_id = %id, "Document deleted");
        Ok(())
    }

    /// Documents in ascending ID order, skipping `offset` records.
    ///
    /// Records that fail to decode are logged and skipped; they still count
    /// toward `offset`.
    pub fn list(&self, limit: usize, offset: usize) -> Result<Vec<Document>> {
        let mut docs = Vec::new();
        if limit == 0 {
            return Ok(docs);
        }
        let mut skipped = 0;
        self.kv.for_each(Partition::Documents, |key, bytes| {
            if skipped < offset {
                skipped += 1;
                return Ok(ControlFlow::Continue(()));
            }
            match codec::decode::<Document>(bytes) {
                Ok(doc) => docs.push(doc),
                Err(e) => tracing::warn!(document_id = %key, "Skipping undecodable document: {}", e),
            }
            Ok(if docs.len() >= limit {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            })
        })?;
        Ok(docs)
    }

    /// Documents carrying `tag`, in ascending ID order, windowed by `offset` and `limit`.
    ///
    /// Scans the whole partition; undecodable records are logged and skipped.
    pub fn list_by_tag(&self, tag: &str, limit: usize, offset: usize) -> Result<Vec<Document>> {
        let mut docs = Vec::new();
        if limit == 0 {
            return Ok(docs);
        }
        let mut matched = 0;
        self.kv.for_each(Partition::Documents, |key, bytes| {
            let doc = match codec::decode::<Document>(bytes) {
                Ok(doc) => doc,
                Err(e) => {
                    tracing::warn!(document_id = %key, "Skipping undecodable document: {}", e);
                    return Ok(ControlFlow::Continue(()));
                }
            };
            if !doc.has_tag(tag) {
                return Ok(ControlFlow::Continue(()));
            }
            matched += 1;
            if matched > offset {
                docs.push(doc);
            }
            Ok(if docs.len() >= limit {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            })
        })?;
        Ok(docs)
    }
}
