//! Document records.
//!
//! A `Document` is a titled piece of content with tags. Documents live only in
//! the durable store; they are not cached or indexed in memory.

use crate::error::{Result, StoreError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Unique identifier, chosen by the caller.
    pub id: String,
    pub title: String,
    pub content: String,
    /// Ordered tags; [`crate::storage::DocumentStore::list_by_tag`] matches them exactly.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Stamped on insert and never changed afterwards.
    pub created_at: DateTime<Utc>,
    /// Stamped on every successful write.
    pub updated_at: DateTime<Utc>,
}

impl Document {
    /// Creates an unsaved document. Timestamps are re-stamped when it is stored.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        tags: Vec<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            tags,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns `true` if the document carries `tag`.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(StoreError::invalid("document id must not be empty"));
        }
        if self.title.is_empty() {
            return Err(StoreError::invalid("document title must not be empty"));
        }
        if self.content.is_empty() {
            return Err(StoreError::invalid("document content must not be empty"));
        }
        Ok(())
    }
}
