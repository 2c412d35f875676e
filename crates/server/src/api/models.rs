//! Request and response data transfer objects for the REST API.
//!
//! All types derive `Serialize` and/or `Deserialize` for JSON marshalling via Axum.
//! Vectors and documents are returned in their stored layout.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use vectradb_core::document::Document;
use vectradb_core::filter_types::{Metadata, MetadataFilter};
use vectradb_core::search::{HybridHit, HybridSearchResponse, SearchResponse};
use vectradb_core::vector::Vector;

/// Request body for `POST /vectors`.
#[derive(Debug, Deserialize)]
pub struct CreateVectorRequest {
    pub id: String,
    pub vector: Vec<f32>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub metadata: Metadata,
}

/// Request body for `PUT /vectors/:id`.
#[derive(Debug, Deserialize)]
pub struct UpdateVectorRequest {
    pub vector: Vec<f32>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub metadata: Metadata,
}

/// Request body for `POST /search`. Zero or negative integers select defaults.
#[derive(Debug, Deserialize)]
pub struct SearchRequestBody {
    pub query: Vec<f32>,
    #[serde(default)]
    pub top_k: i64,
    #[serde(default)]
    pub filter: MetadataFilter,
    #[serde(default)]
    pub page: i64,
    #[serde(default)]
    pub limit: i64,
}

/// Request body for `POST /search/hybrid`.
#[derive(Debug, Deserialize)]
pub struct HybridSearchRequestBody {
    pub query: String,
    pub query_vector: Vec<f32>,
    #[serde(default)]
    pub vector_weight: f32,
    #[serde(default)]
    pub keyword_weight: f32,
    #[serde(default)]
    pub fuzzy_weight: f32,
    #[serde(default)]
    pub fuzzy_threshold: f32,
    #[serde(default)]
    pub page: i64,
    #[serde(default)]
    pub limit: i64,
}

/// Request body for `POST /documents`.
#[derive(Debug, Deserialize)]
pub struct CreateDocumentRequest {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Request body for `PUT /documents/:id`.
#[derive(Debug, Deserialize)]
pub struct UpdateDocumentRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Query string for list endpoints.
///
/// Kept as raw strings so that unparsable values fall back to defaults
/// instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl ListParams {
    /// Raw `(limit, offset)`; missing or unparsable values read as 0.
    pub fn raw(&self) -> (i64, i64) {
        let parse = |v: &Option<String>| {
            v.as_deref()
                .and_then(|s| s.trim().parse::<i64>().ok())
                .unwrap_or(0)
        };
        (parse(&self.limit), parse(&self.offset))
    }
}

/// Response body for list endpoints.
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub limit: usize,
    pub offset: usize,
    /// 1-based page implied by `offset` and `limit`.
    pub page: usize,
}

impl<T> ListResponse<T> {
    pub fn new(items: Vec<T>, limit: usize, offset: usize) -> Self {
        Self {
            items,
            limit,
            offset,
            page: offset / limit.max(1) + 1,
        }
    }
}

/// A single plain-search hit.
#[derive(Debug, Serialize)]
pub struct SearchHit {
    pub vector: Vector,
    pub score: f32,
}

/// Response body for `POST /search`.
#[derive(Debug, Serialize)]
pub struct SearchResponseBody {
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    pub results: Vec<SearchHit>,
}

impl From<SearchResponse> for SearchResponseBody {
    fn from(resp: SearchResponse) -> Self {
        Self {
            total: resp.total,
            page: resp.page,
            limit: resp.limit,
            results: resp
                .results
                .into_iter()
                .map(|hit| SearchHit {
                    vector: Arc::unwrap_or_clone(hit.vector),
                    score: hit.score,
                })
                .collect(),
        }
    }
}

/// A single hybrid-search hit.
#[derive(Debug, Serialize)]
pub struct HybridHitBody {
    pub id: String,
    pub text: String,
    pub vector_score: f32,
    pub keyword_score: f32,
    pub fuzzy_score: f32,
    pub hybrid_score: f32,
}

impl From<HybridHit> for HybridHitBody {
    fn from(hit: HybridHit) -> Self {
        Self {
            id: hit.id,
            text: hit.text,
            vector_score: hit.vector_score,
            keyword_score: hit.keyword_score,
            fuzzy_score: hit.fuzzy_score,
            hybrid_score: hit.hybrid_score,
        }
    }
}

/// Response body for `POST /search/hybrid`.
#[derive(Debug, Serialize)]
pub struct HybridSearchResponseBody {
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    pub results: Vec<HybridHitBody>,
}

impl From<HybridSearchResponse> for HybridSearchResponseBody {
    fn from(resp: HybridSearchResponse) -> Self {
        Self {
            total: resp.total,
            page: resp.page,
            limit: resp.limit,
            results: resp.results.into_iter().map(HybridHitBody::from).collect(),
        }
    }
}

/// Response body for `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub vectors: usize,
    pub uptime_seconds: u64,
}

/// Converts stored documents and vectors for list responses.
pub fn vectors_to_body(vectors: Vec<Arc<Vector>>) -> Vec<Vector> {
    vectors.into_iter().map(Arc::unwrap_or_clone).collect()
}

/// Builds an unsaved document from an update body.
pub fn document_from_update(id: &str, req: UpdateDocumentRequest) -> Document {
    Document::new(id, req.title, req.content, req.tags)
}
