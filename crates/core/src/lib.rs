//! # vectradb-core
//!
//! Embedded vector and document store backed by a single redb file.
//!
//! Vectors are mirrored in memory with an inverted index over their metadata
//! and support exact-match filtering, cosine-similarity search, and hybrid
//! search that blends cosine similarity with BM25 (optionally fuzzy) keyword
//! relevance. Documents are a plain durable CRUD store with tag listing.
//!
//! This is the core library crate with no async dependencies. The HTTP
//! server lives in `vectradb-server`.

/// BM25 lexical scoring: tokenizer, per-query inverted index, scorer, and fuzzy matching.
pub mod bm25;
/// Global configuration constants and [`StoreConfig`].
pub mod config;
/// The `Document` record.
pub mod document;
/// Error taxonomy shared by every layer.
pub mod error;
/// Metadata and filter type aliases.
pub mod filter_types;
/// Query execution: similarity, filtering, hybrid ranking, pagination.
pub mod search;
/// Storage layer: durable store, vector cache, documents, and the `Database` handle.
pub mod storage;
/// The `Vector` record.
pub mod vector;

pub use config::StoreConfig;
pub use document::Document;
pub use error::{Entity, ErrorKind, Result, StoreError};
pub use filter_types::{Metadata, MetadataFilter};
pub use search::{
    HybridHit, HybridSearchRequest, HybridSearchResponse, ScoredVector, SearchRequest,
    SearchResponse,
};
pub use storage::{Database, DocumentStore, VectorStore};
pub use vector::Vector;
