//! HTTP request handlers and shared application state.

use crate::api::errors::ApiError;
use crate::api::metrics;
use crate::api::models::*;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Instant;
use vectradb_core::config;
use vectradb_core::document::Document;
use vectradb_core::search::{normalize_list, HybridSearchRequest, SearchRequest};
use vectradb_core::storage::Database;
use vectradb_core::vector::{validate_values, Vector};

/// Shared application state passed to every handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub prometheus_handle: PrometheusHandle,
    pub start_time: Instant,
}

fn validate_id(id: &str) -> Result<(), ApiError> {
    if id.is_empty() {
        return Err(ApiError::BadRequest("ID must not be empty".into()));
    }
    Ok(())
}

/// Dimension and finiteness checks, skipped for an empty query so the
/// core reports it as an empty query.
fn validate_query_vector(values: &[f32]) -> Result<(), ApiError> {
    if values.is_empty() {
        return Ok(());
    }
    validate_values(values)?;
    Ok(())
}

fn validate_weight(name: &str, value: f32) -> Result<(), ApiError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ApiError::BadRequest(format!(
            "{} must be between 0 and 1, got {}",
            name, value
        )));
    }
    Ok(())
}

fn validate_limit(limit: i64) -> Result<(), ApiError> {
    if limit > config::MAX_PAGE_LIMIT {
        return Err(ApiError::BadRequest(format!(
            "limit must be at most {}",
            config::MAX_PAGE_LIMIT
        )));
    }
    Ok(())
}

fn list_window(params: &ListParams) -> Result<(usize, usize), ApiError> {
    let (limit, offset) = params.raw();
    validate_limit(limit)?;
    Ok(normalize_list(limit, offset))
}

// ── Health & metrics ──

/// `GET /health`: 200 when the vectors partition is readable, 503 otherwise.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (status, label) = match state.db.health() {
        Ok(()) => (StatusCode::OK, "healthy"),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
        }
    };
    metrics::update_vector_metrics(&state.db);
    (
        status,
        Json(HealthResponse {
            status: label.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            vectors: state.db.vectors().len(),
            uptime_seconds: state.start_time.elapsed().as_secs(),
        }),
    )
}

pub async fn metrics_endpoint(State(state): State<AppState>) -> String {
    metrics::update_vector_metrics(&state.db);
    state.prometheus_handle.render()
}

// ── Vectors ──

pub async fn create_vector(
    State(state): State<AppState>,
    Json(req): Json<CreateVectorRequest>,
) -> Result<(StatusCode, Json<Vector>), ApiError> {
    validate_id(&req.id)?;
    validate_values(&req.vector)?;

    let vector = Vector::new(req.id, req.vector, req.text, req.metadata);
    let stored = state.db.vectors().insert(vector)?;
    metrics::record_write_operation("vector", "insert");
    tracing::info!(vector_id = %stored.id, dimension = stored.dimension(), "Vector created");
    Ok((StatusCode::CREATED, Json(Arc::unwrap_or_clone(stored))))
}

pub async fn get_vector(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vector>, ApiError> {
    let vector = state.db.vectors().get(&id)?;
    Ok(Json(Arc::unwrap_or_clone(vector)))
}

pub async fn update_vector(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateVectorRequest>,
) -> Result<Json<Vector>, ApiError> {
    validate_values(&req.vector)?;

    let vector = Vector::new(id.as_str(), req.vector, req.text, req.metadata);
    let stored = state.db.vectors().update(&id, vector)?;
    metrics::record_write_operation("vector", "update");
    tracing::info!(vector_id = %id, "Vector updated");
    Ok(Json(Arc::unwrap_or_clone(stored)))
}

pub async fn delete_vector(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.db.vectors().delete(&id)?;
    metrics::record_write_operation("vector", "delete");
    tracing::info!(vector_id = %id, "Vector deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_vectors(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResponse<Vector>>, ApiError> {
    let (limit, offset) = list_window(&params)?;
    let vectors = state.db.vectors().list(limit, offset);
    Ok(Json(ListResponse::new(
        vectors_to_body(vectors),
        limit,
        offset,
    )))
}

// ── Search ──

pub async fn search(
    State(state): State<AppState>,
    Json(req): Json<SearchRequestBody>,
) -> Result<Json<SearchResponseBody>, ApiError> {
    validate_query_vector(&req.query)?;
    if req.top_k > config::MAX_TOP_K {
        return Err(ApiError::BadRequest(format!(
            "top_k must be at most {}",
            config::MAX_TOP_K
        )));
    }
    validate_limit(req.limit)?;

    let start = Instant::now();
    let resp = state.db.vectors().search(&SearchRequest {
        query: req.query,
        top_k: req.top_k,
        filter: req.filter,
        page: req.page,
        limit: req.limit,
    })?;
    metrics::record_search_operation("vector");
    tracing::debug!(
        total = resp.total,
        elapsed_us = start.elapsed().as_micros() as u64,
        "Vector search complete"
    );
    Ok(Json(resp.into()))
}

pub async fn hybrid_search(
    State(state): State<AppState>,
    Json(req): Json<HybridSearchRequestBody>,
) -> Result<Json<HybridSearchResponseBody>, ApiError> {
    validate_query_vector(&req.query_vector)?;
    validate_weight("vector_weight", req.vector_weight)?;
    validate_weight("keyword_weight", req.keyword_weight)?;
    validate_weight("fuzzy_weight", req.fuzzy_weight)?;
    validate_weight("fuzzy_threshold", req.fuzzy_threshold)?;
    validate_limit(req.limit)?;

    let start = Instant::now();
    let resp = state.db.vectors().hybrid_search(&HybridSearchRequest {
        query: req.query,
        query_vector: req.query_vector,
        vector_weight: req.vector_weight,
        keyword_weight: req.keyword_weight,
        fuzzy_weight: req.fuzzy_weight,
        fuzzy_threshold: req.fuzzy_threshold,
        page: req.page,
        limit: req.limit,
    })?;
    metrics::record_search_operation("hybrid");
    tracing::debug!(
        total = resp.total,
        fuzzy = req.fuzzy_threshold > 0.0,
        elapsed_us = start.elapsed().as_micros() as u64,
        "Hybrid search complete"
    );
    Ok(Json(resp.into()))
}

// ── Documents ──

pub async fn create_document(
    State(state): State<AppState>,
    Json(req): Json<CreateDocumentRequest>,
) -> Result<(StatusCode, Json<Document>), ApiError> {
    let doc = Document::new(req.id, req.title, req.content, req.tags);
    let stored = state.db.documents().insert(doc)?;
    metrics::record_write_operation("document", "insert");
    tracing::info!(document_id = %stored.id, "Document created");
    Ok((StatusCode::CREATED, Json(stored)))
}

pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Document>, ApiError> {
    Ok(Json(state.db.documents().get(&id)?))
}

pub async fn update_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateDocumentRequest>,
) -> Result<Json<Document>, ApiError> {
    let stored = state
        .db
        .documents()
        .update(&id, document_from_update(&id, req))?;
    metrics::record_write_operation("document", "update");
    tracing::info!(document_id = %id, "Document updated");
    Ok(Json(stored))
}

pub async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.db.documents().delete(&id)?;
    metrics::record_write_operation("document", "delete");
    tracing::info!(document_id = %id, "Document deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_documents(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResponse<Document>>, ApiError> {
    let (limit, offset) = list_window(&params)?;
    let docs = state.db.documents().list(limit, offset)?;
    Ok(Json(ListResponse::new(docs, limit, offset)))
}

pub async fn list_documents_by_tag(
    State(state): State<AppState>,
    Path(tag): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResponse<Document>>, ApiError> {
    let (limit, offset) = list_window(&params)?;
    let docs = state.db.documents().list_by_tag(&tag, limit, offset)?;
    Ok(Json(ListResponse::new(docs, limit, offset)))
}
