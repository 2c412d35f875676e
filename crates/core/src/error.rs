//! Error types for the storage and query layers.
//!
//! Every fallible operation returns [`StoreError`]. Callers that only care
//! about the broad category (for example to pick an HTTP status code) use
//! [`StoreError::kind`].

use crate::search::similarity::SimilarityError;
use std::fmt;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = StoreError> = std::result::Result<T, E>;

/// The entity a [`StoreError::NotFound`] or [`StoreError::Conflict`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Vector,
    Document,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Vector => f.write_str("vector"),
            Entity::Document => f.write_str("document"),
        }
    }
}

/// Broad error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    InvalidInput,
    Internal,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} '{id}' not found")]
    NotFound { entity: Entity, id: String },

    #[error("{entity} '{id}' already exists")]
    Conflict { entity: Entity, id: String },

    #[error("query must not be empty")]
    EmptyQuery,

    #[error(transparent)]
    Similarity(#[from] SimilarityError),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("storage error: {0}")]
    Storage(#[from] redb::Error),

    #[error("record encoding error: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub(crate) fn not_found(entity: Entity, id: &str) -> Self {
        StoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub(crate) fn conflict(entity: Entity, id: &str) -> Self {
        StoreError::Conflict {
            entity,
            id: id.to_string(),
        }
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        StoreError::InvalidInput(msg.into())
    }

    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::NotFound { .. } => ErrorKind::NotFound,
            StoreError::Conflict { .. } => ErrorKind::Conflict,
            StoreError::EmptyQuery | StoreError::Similarity(_) | StoreError::InvalidInput(_) => {
                ErrorKind::InvalidInput
            }
            StoreError::Storage(_) | StoreError::Codec(_) | StoreError::Io(_) => {
                ErrorKind::Internal
            }
        }
    }
}

// redb reports each transaction stage with its own error type.
macro_rules! impl_from_redb {
    ($($ty:ident),* $(,)?) => {
        $(
            impl From<redb::$ty> for StoreError {
                fn from(err: redb::$ty) -> Self {
                    StoreError::Storage(err.into())
                }
            }
        )*
    };
}

impl_from_redb!(
    DatabaseError,
    TransactionError,
    TableError,
    StorageError,
    CommitError,
);
