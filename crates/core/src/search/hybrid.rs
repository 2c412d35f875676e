//! Hybrid lexical + vector ranking.
//!
//! Every vector in the corpus receives
//!
//! ```text
//! hybrid = vector_weight * cosine + keyword_weight * bm25 + fuzzy_weight * fuzzy
//! ```
//!
//! where `cosine` is 0 for vectors incomparable with the query, `bm25` comes
//! from one BM25 pass over the texts of the whole corpus, and `fuzzy` is the
//! token-level fuzzy similarity (computed only when `fuzzy_weight > 0`).
//! Scores are not normalized, so BM25 may dominate when it is large.

use crate::bm25;
use crate::config;
use crate::error::{Result, StoreError};
use crate::search::pagination::PageWindow;
use crate::search::similarity::cosine_similarity;
use crate::search::types::{HybridHit, HybridSearchRequest, HybridSearchResponse};
use crate::vector::Vector;
use std::cmp::Ordering;
use std::sync::Arc;

/// Resolves the vector/keyword weights, defaulting both to 0.5 when they sum to zero.
pub fn effective_weights(vector_weight: f32, keyword_weight: f32) -> (f32, f32) {
    if vector_weight + keyword_weight == 0.0 {
        (config::DEFAULT_HYBRID_WEIGHT, config::DEFAULT_HYBRID_WEIGHT)
    } else {
        (vector_weight, keyword_weight)
    }
}

/// Ranks `corpus` for a hybrid query. The corpus order fixes BM25 document
/// positions only; ties in the final ranking are broken by ascending ID.
pub fn hybrid_search(
    corpus: &[Arc<Vector>],
    request: &HybridSearchRequest,
) -> Result<HybridSearchResponse> {
    if request.query.is_empty() || request.query_vector.is_empty() {
        return Err(StoreError::EmptyQuery);
    }
    let (vector_weight, keyword_weight) =
        effective_weights(request.vector_weight, request.keyword_weight);
    let window = PageWindow::normalize(request.page, request.limit);

    let keyword_scores = bm25::score_corpus(
        &request.query,
        corpus.iter().map(|v| v.text.as_str()),
        request.fuzzy_threshold,
    );

    let fuzzy_query = (request.fuzzy_weight > 0.0).then(|| bm25::tokenize(&request.query));

    let mut hits: Vec<HybridHit> = corpus
        .iter()
        .zip(keyword_scores)
        .map(|(vector, keyword_score)| {
            let vector_score = cosine_similarity(&request.query_vector, &vector.values)
                .ok()
                .filter(|s| s.is_finite())
                .unwrap_or(0.0);
            let fuzzy_score = fuzzy_query
                .as_ref()
                .map_or(0.0, |tokens| bm25::fuzzy_similarity_tokens(tokens, &vector.text));
            HybridHit {
                id: vector.id.clone(),
                text: vector.text.clone(),
                vector_score,
                keyword_score,
                fuzzy_score,
                hybrid_score: vector_weight * vector_score
                    + keyword_weight * keyword_score
                    + request.fuzzy_weight * fuzzy_score,
            }
        })
        .collect();

    hits.sort_unstable_by(|a, b| {
        b.hybrid_score
            .partial_cmp(&a.hybrid_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });

    let total = hits.len();
    Ok(HybridSearchResponse {
        total,
        page: window.page,
        limit: window.limit,
        results: window.apply(hits),
    })
}
