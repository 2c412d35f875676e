//! Exact-match metadata filtering.
//!
//! [`MetadataIndex`] is an inverted index from `(key, value)` pairs to the IDs
//! of the vectors currently carrying them. Filters are answered by
//! intersecting the ID sets of every pair in the filter instead of scanning
//! all vectors. [`matches_filter`] evaluates the same predicate on a single
//! metadata map.

use crate::filter_types::{Metadata, MetadataFilter};
use std::collections::{HashMap, HashSet};

/// Check if `metadata` holds every `(key, value)` pair of `filter`.
pub fn matches_filter(metadata: &Metadata, filter: &MetadataFilter) -> bool {
    filter
        .iter()
        .all(|(k, v)| metadata.get(k).is_some_and(|actual| actual == v))
}

/// Inverted index: metadata key → metadata value → IDs holding that pair.
///
/// Empty ID sets are pruned, and so are keys whose value map becomes empty,
/// so the index never holds entries for pairs no vector carries.
#[derive(Debug, Default)]
pub struct MetadataIndex {
    entries: HashMap<String, HashMap<String, HashSet<String>>>,
}

impl MetadataIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers every pair of `metadata` for `id`.
    pub fn add(&mut self, id: &str, metadata: &Metadata) {
        for (key, value) in metadata {
            self.entries
                .entry(key.clone())
                .or_default()
                .entry(value.clone())
                .or_default()
                .insert(id.to_string());
        }
    }

    /// Removes every pair of `metadata` for `id`, pruning emptied sets.
    pub fn remove(&mut self, id: &str, metadata: &Metadata) {
        for (key, value) in metadata {
            let Some(values) = self.entries.get_mut(key) else {
                continue;
            };
            if let Some(ids) = values.get_mut(value) {
                ids.remove(id);
                if ids.is_empty() {
                    values.remove(value);
                }
            }
            if values.is_empty() {
                self.entries.remove(key);
            }
        }
    }

    /// IDs matching every pair of `filter`.
    ///
    /// Returns `None` for an empty filter, meaning "no restriction". A key or
    /// value absent from the index yields an empty set.
    pub fn matching_ids(&self, filter: &MetadataFilter) -> Option<HashSet<&str>> {
        if filter.is_empty() {
            return None;
        }

        let mut sets: Vec<&HashSet<String>> = Vec::with_capacity(filter.len());
        for (key, value) in filter {
            match self.entries.get(key).and_then(|values| values.get(value)) {
                Some(ids) => sets.push(ids),
                None => return Some(HashSet::new()),
            }
        }

        // Walk the smallest set and check membership in the others.
        sets.sort_by_key(|ids| ids.len());
        let Some((smallest, rest)) = sets.split_first() else {
            return Some(HashSet::new());
        };
        Some(
            smallest
                .iter()
                .map(String::as_str)
                .filter(|id| rest.iter().all(|ids| ids.contains(*id)))
                .collect(),
        )
    }

    /// IDs holding exactly `(key, value)`, if any.
    pub fn ids_for(&self, key: &str, value: &str) -> Option<&HashSet<String>> {
        self.entries.get(key).and_then(|values| values.get(value))
    }

    /// Number of distinct metadata keys indexed.
    pub fn key_count(&self) -> usize {
        self.entries.len()
    }

    /// Total number of `(key, value, id)` entries.
    pub fn entry_count(&self) -> usize {
        self.entries
            .values()
            .flat_map(|values| values.values())
            .map(HashSet::len)
            .sum()
    }

    /// Returns `true` if nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
