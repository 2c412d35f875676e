//! Global configuration constants for VectraDB.
//!
//! Scoring parameters, query defaults, input validation limits, and server
//! defaults are defined here. These are compile-time constants; runtime
//! configuration is handled by [`StoreConfig`] and by CLI arguments and
//! environment variables in the server's `main.rs`.

use std::path::PathBuf;
use std::time::Duration;

/// BM25 Okapi term frequency saturation parameter.
///
/// Controls how quickly term frequency saturates. Higher values allow TF to grow more.
pub const BM25_K1: f32 = 1.5;

/// BM25 Okapi document length normalization parameter.
///
/// 0.0 = no normalization, 1.0 = full normalization.
pub const BM25_B: f32 = 0.75;

/// Characters trimmed from both ends of every token by the BM25 tokenizer.
pub const TOKEN_TRIM_CHARS: &[char] = &[
    '.', ',', '!', '?', '"', '\'', '(', ')', '[', ']', '{', '}', ':', ';',
];

/// Default `top_k` when a search request passes zero or a negative value.
pub const DEFAULT_TOP_K: usize = 10;

/// Default page size for search and list requests.
pub const DEFAULT_LIMIT: usize = 10;

/// First page number (pages are 1-based).
pub const DEFAULT_PAGE: usize = 1;

/// Weight given to each side of a hybrid query when both weights are zero.
pub const DEFAULT_HYBRID_WEIGHT: f32 = 0.5;

/// Maximum allowed vector dimension.
pub const MAX_DIMENSION: usize = 10_000;

/// Maximum `top_k` accepted by the HTTP layer.
pub const MAX_TOP_K: i64 = 1_000;

/// Maximum page size accepted by the HTTP layer.
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Name of the durable partition holding vectors.
pub const VECTORS_PARTITION: &str = "vectors";

/// Name of the durable partition holding documents.
pub const DOCUMENTS_PARTITION: &str = "documents";

/// Default path of the durable store file.
pub const DEFAULT_DB_PATH: &str = "./data/vectradb.redb";

/// Default time to wait for the durable store file lock, in seconds.
pub const DEFAULT_OPEN_TIMEOUT_SECS: u64 = 1;

/// Pause between attempts while another handle holds the store file.
pub const OPEN_RETRY_INTERVAL_MS: u64 = 25;

/// Default HTTP server port.
pub const DEFAULT_PORT: u16 = 8080;

/// Per-request timeout in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum request body size in bytes (a 10000-dimension vector in JSON fits comfortably).
pub const MAX_REQUEST_BODY_BYTES: usize = 4 * 1024 * 1024;

/// Maximum number of requests processed concurrently.
pub const MAX_CONCURRENT_REQUESTS: usize = 512;

/// Capacity of the request buffer in front of the concurrency limiter.
pub const REQUEST_BUFFER_SIZE: usize = 1024;

/// Default graceful shutdown timeout in seconds.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// Runtime settings for opening a [`crate::storage::Database`].
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path of the durable store file. Parent directories are created on open.
    pub db_path: PathBuf,
    /// How long to wait for another process to release the store file.
    pub open_timeout: Duration,
}

impl StoreConfig {
    /// Creates a config for the given path with the default open timeout.
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            open_timeout: Duration::from_secs(DEFAULT_OPEN_TIMEOUT_SECS),
        }
    }

    /// Overrides the open timeout.
    pub fn with_open_timeout(mut self, timeout: Duration) -> Self {
        self.open_timeout = timeout;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DB_PATH)
    }
}
