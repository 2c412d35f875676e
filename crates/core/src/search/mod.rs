//! Query execution: similarity scoring, metadata filtering, hybrid ranking,
//! and pagination.

/// Exact-match metadata filtering and the metadata inverted index.
pub mod filter;
/// Hybrid ranking combining cosine similarity, BM25, and fuzzy scores.
pub mod hybrid;
/// Default handling for paging parameters.
pub mod pagination;
/// Cosine similarity between embeddings.
pub mod similarity;
/// Search request and result types.
pub mod types;
/// Plain cosine-similarity search.
pub mod vector;

pub use filter::{matches_filter, MetadataIndex};
pub use hybrid::hybrid_search;
pub use pagination::{normalize_list, normalize_top_k, PageWindow};
pub use similarity::{cosine_similarity, SimilarityError};
pub use types::{
    HybridHit, HybridSearchRequest, HybridSearchResponse, ScoredVector, SearchRequest,
    SearchResponse,
};
pub use vector::vector_search;
