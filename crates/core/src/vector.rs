//! Vector records.
//!
//! A `Vector` is an embedding with optional free text (scored by BM25 in
//! hybrid queries) and string metadata (matched exactly by filters).

use crate::config;
use crate::error::{Result, StoreError};
use crate::filter_types::Metadata;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored embedding vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    /// Unique identifier, chosen by the caller.
    pub id: String,
    /// Embedding components.
    #[serde(rename = "vector")]
    pub values: Vec<f32>,
    /// Free text, may be empty.
    #[serde(default)]
    pub text: String,
    /// Exact-match filter attributes.
    #[serde(default)]
    pub metadata: Metadata,
    /// Stamped on insert and never changed afterwards.
    pub created_at: DateTime<Utc>,
    /// Stamped on every successful write.
    pub updated_at: DateTime<Utc>,
}

impl Vector {
    /// Creates an unsaved vector. Timestamps are re-stamped when it is stored.
    pub fn new(
        id: impl Into<String>,
        values: Vec<f32>,
        text: impl Into<String>,
        metadata: Metadata,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            values,
            text: text.into(),
            metadata,
            created_at: now,
            updated_at: now,
        }
    }

    /// Number of components.
    pub fn dimension(&self) -> usize {
        self.values.len()
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(StoreError::invalid("vector id must not be empty"));
        }
        validate_values(&self.values)
    }
}

/// Checks that an embedding has 1..=[`config::MAX_DIMENSION`] finite components.
pub fn validate_values(values: &[f32]) -> Result<()> {
    if values.is_empty() || values.len() > config::MAX_DIMENSION {
        return Err(StoreError::invalid(format!(
            "vector dimension must be between 1 and {}, got {}",
            config::MAX_DIMENSION,
            values.len()
        )));
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(StoreError::invalid("vector contains NaN or Inf"));
    }
    Ok(())
}
