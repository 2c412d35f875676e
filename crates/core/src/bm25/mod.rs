//! BM25 lexical scoring: tokenizer, per-query inverted index, Okapi BM25
//! scorer, and edit-distance fuzzy matching.

/// Normalized Levenshtein similarity between terms and texts.
pub mod fuzzy;
/// Inverted index with postings lists and document length tracking.
pub mod inverted_index;
/// BM25 Okapi scoring over an inverted index.
pub mod scorer;
/// Whitespace tokenizer with edge punctuation trimming.
pub mod tokenizer;

pub use fuzzy::{fuzzy_similarity, fuzzy_similarity_tokens, term_similarity};
pub use inverted_index::InvertedIndex;
pub use scorer::bm25_scores;
pub use tokenizer::{tokenize, Tokens};

/// BM25 score of every text in `corpus` against `query`, in corpus order.
pub fn score_corpus<'a>(
    query: &str,
    corpus: impl IntoIterator<Item = &'a str>,
    fuzzy_threshold: f32,
) -> Vec<f32> {
    let index = InvertedIndex::from_corpus(corpus);
    bm25_scores(&index, query, fuzzy_threshold)
}
