//! vectradb-server: HTTP server for VectraDB.
//!
//! Provides the REST API over a single shared [`vectradb_core::Database`].
//! Storage, indexing, and search logic live in `vectradb-core`.

/// REST API layer: Axum router, HTTP handlers, models, metrics.
pub mod api;
