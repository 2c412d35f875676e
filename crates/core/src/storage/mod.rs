//! Storage layer: durable key-value store, vector cache, documents, and the
//! [`Database`] facade that ties them together.
//!
//! Every record lives in a single redb file split into two partitions.
//! Vectors are additionally mirrored in memory together with a metadata
//! index; documents are read straight from disk.

/// Record encoding for the durable store.
pub mod codec;
/// Database facade: open, health check, close.
pub mod database;
/// Document CRUD and listing.
pub mod documents;
/// redb-backed partitioned key-value store.
pub mod kv;
/// Vector cache, metadata index, and search entry points.
pub mod vectors;

pub use database::Database;
pub use documents::DocumentStore;
pub use kv::{DurableStore, Partition};
pub use vectors::VectorStore;

use chrono::{DateTime, Duration, Utc};

/// Timestamp for a record replacing one last updated at `previous`.
///
/// Always strictly later than `previous`, even if the wall clock has not
/// advanced or went backwards.
pub(crate) fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::nanoseconds(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_timestamp_advances() {
        let past = Utc::now() - Duration::seconds(5);
        assert!(next_timestamp(past) > past);

        let future = Utc::now() + Duration::hours(1);
        assert_eq!(next_timestamp(future), future + Duration::nanoseconds(1));
    }
}
