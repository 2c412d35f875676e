//! Query and result types for plain and hybrid search.

use crate::filter_types::MetadataFilter;
use crate::vector::Vector;
use std::sync::Arc;

/// A vector with its cosine similarity to the query.
#[derive(Debug, Clone)]
pub struct ScoredVector {
    /// The matched vector (shared with the cache).
    pub vector: Arc<Vector>,
    /// Cosine similarity (higher = more similar).
    pub score: f32,
}

/// Plain similarity search.
///
/// `top_k`, `page` and `limit` use zero or negative values to request defaults.
#[derive(Debug, Clone, Default)]
pub struct SearchRequest {
    pub query: Vec<f32>,
    pub top_k: i64,
    pub filter: MetadataFilter,
    pub page: i64,
    pub limit: i64,
}

/// One page of a plain search.
#[derive(Debug, Clone)]
pub struct SearchResponse {
    /// Number of hits after the top-k cut, across all pages.
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    pub results: Vec<ScoredVector>,
}

/// Hybrid lexical + vector search over every cached vector.
///
/// When `vector_weight + keyword_weight == 0` both weights default to 0.5.
/// `fuzzy_threshold > 0` enables partial BM25 credit for near-miss terms;
/// `fuzzy_weight > 0` adds a weighted token-level fuzzy score.
#[derive(Debug, Clone, Default)]
pub struct HybridSearchRequest {
    pub query: String,
    pub query_vector: Vec<f32>,
    pub vector_weight: f32,
    pub keyword_weight: f32,
    pub fuzzy_weight: f32,
    pub fuzzy_threshold: f32,
    pub page: i64,
    pub limit: i64,
}

/// One ranked item of a hybrid search.
#[derive(Debug, Clone, PartialEq)]
pub struct HybridHit {
    pub id: String,
    pub text: String,
    /// Cosine similarity, or 0 when the vector is incomparable with the query.
    pub vector_score: f32,
    pub keyword_score: f32,
    pub fuzzy_score: f32,
    pub hybrid_score: f32,
}

/// One page of a hybrid search.
#[derive(Debug, Clone)]
pub struct HybridSearchResponse {
    /// Number of ranked vectors across all pages.
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    pub results: Vec<HybridHit>,
}
