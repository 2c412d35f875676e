//! Exact cosine-similarity search over a candidate set.
//!
//! Pipeline: score every candidate, drop the ones that cannot be compared
//! with the query (wrong dimension or zero magnitude), sort by descending
//! score with ascending ID as tie-breaker, cut to `top_k`, then return the
//! requested page.

use crate::error::{Result, StoreError};
use crate::search::pagination::{normalize_top_k, PageWindow};
use crate::search::similarity::cosine_similarity;
use crate::search::types::{ScoredVector, SearchRequest, SearchResponse};
use crate::vector::Vector;
use std::cmp::Ordering;
use std::sync::Arc;

/// Scores `candidates` against `query`, best first. Incomparable candidates and
/// non-finite scores are skipped.
pub fn rank_by_similarity(
    candidates: impl IntoIterator<Item = Arc<Vector>>,
    query: &[f32],
) -> Vec<ScoredVector> {
    let mut scored: Vec<ScoredVector> = candidates
        .into_iter()
        .filter_map(|vector| {
            let score = cosine_similarity(query, &vector.values)
                .ok()
                .filter(|s| s.is_finite())?;
            Some(ScoredVector { vector, score })
        })
        .collect();
    scored.sort_unstable_by(compare_scored);
    scored
}

fn compare_scored(a: &ScoredVector, b: &ScoredVector) -> Ordering {
    b.score
        .partial_cmp(&a.score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.vector.id.cmp(&b.vector.id))
}

/// Runs a plain search over already-filtered `candidates`.
pub fn vector_search(
    candidates: impl IntoIterator<Item = Arc<Vector>>,
    request: &SearchRequest,
) -> Result<SearchResponse> {
    if request.query.is_empty() {
        return Err(StoreError::EmptyQuery);
    }
    let top_k = normalize_top_k(request.top_k);
    let window = PageWindow::normalize(request.page, request.limit);

    let mut ranked = rank_by_similarity(candidates, &request.query);
    ranked.truncate(top_k);
    let total = ranked.len();

    Ok(SearchResponse {
        total,
        page: window.page,
        limit: window.limit,
        results: window.apply(ranked),
    })
}
