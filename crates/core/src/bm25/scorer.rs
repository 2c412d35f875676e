//! BM25 Okapi scoring engine.
//!
//! Scores every document of an [`InvertedIndex`] against a query using the
//! BM25 formula with `k1` and `b` from [`crate::config`]:
//!
//! ```text
//! idf(t)     = ln(1 + (N - df(t) + 0.5) / (df(t) + 0.5))
//! score(d)   = Σ idf(t) * tf(t,d) * (k1 + 1) / (tf(t,d) + k1 * (1 - b + b * |d| / avgdl))
//! ```
//!
//! Query tokens are summed with repetition. With a positive fuzzy threshold, a
//! document lacking a query term still earns partial term frequency from its
//! terms whose [`term_similarity`] reaches the threshold.

use crate::bm25::fuzzy::term_similarity;
use crate::bm25::inverted_index::InvertedIndex;
use crate::bm25::tokenizer::tokenize;
use crate::config;

/// BM25 score of every indexed document, indexed by `doc_id`.
///
/// `fuzzy_threshold <= 0.0` disables fuzzy matching.
pub fn bm25_scores(index: &InvertedIndex, query: &str, fuzzy_threshold: f32) -> Vec<f32> {
    let doc_count = index.doc_count as usize;
    let mut scores = vec![0.0f32; doc_count];
    let query_tokens = tokenize(query);
    if query_tokens.is_empty() || doc_count == 0 {
        return scores;
    }

    let avgdl = index.average_doc_length();
    let n = index.doc_count as f32;
    let k1 = config::BM25_K1;
    let b = config::BM25_B;
    let fuzzy = fuzzy_threshold > 0.0;

    let mut tf = vec![0.0f32; doc_count];
    let mut exact = vec![false; doc_count];

    for token in query_tokens.iter() {
        tf.fill(0.0);
        exact.fill(false);

        if let Some(postings) = index.index.get(token) {
            for posting in postings {
                tf[posting.doc_id as usize] = posting.term_frequency as f32;
                exact[posting.doc_id as usize] = true;
            }
        }

        if fuzzy {
            for (term, postings) in &index.index {
                if term == token {
                    continue;
                }
                let sim = term_similarity(token, term);
                if sim < fuzzy_threshold || sim <= 0.0 {
                    continue;
                }
                for posting in postings {
                    let doc = posting.doc_id as usize;
                    if !exact[doc] {
                        tf[doc] += sim * posting.term_frequency as f32;
                    }
                }
            }
        }

        let df = index.document_frequency(token) as f32;
        let idf = (1.0 + (n - df + 0.5) / (df + 0.5)).ln();

        for (doc, &t) in tf.iter().enumerate() {
            if t == 0.0 {
                continue;
            }
            // t > 0 implies the document has tokens, so avgdl > 0.
            let dl = index.doc_length(doc as u32) as f32;
            let tf_norm = (t * (k1 + 1.0)) / (t + k1 * (1.0 - b + b * dl / avgdl));
            scores[doc] += idf * tf_norm;
        }
    }

    scores
}
