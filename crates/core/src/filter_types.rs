//! Metadata and filter types shared by the storage and search modules.

use std::collections::BTreeMap;

/// Metadata attached to a vector: string keys to string values.
///
/// Ordered so encoded records are byte-stable.
pub type Metadata = BTreeMap<String, String>;

/// Exact-match filter: every `(key, value)` pair must be present on a vector.
///
/// An empty filter matches every vector.
pub type MetadataFilter = BTreeMap<String, String>;

/// Builds a [`Metadata`] map from string pairs.
pub fn metadata(pairs: &[(&str, &str)]) -> Metadata {
    pairs
        .iter()
        .map(|&(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
