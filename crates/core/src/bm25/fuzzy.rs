//! Edit-distance term matching.
//!
//! Similarity between two terms is `1 - levenshtein(a, b) / max(len(a), len(b))`
//! with lengths counted in characters, so identical terms score 1.0 and
//! completely different terms of equal length score 0.0.

use crate::bm25::tokenizer::{tokenize, Tokens};

/// Normalized Levenshtein similarity of two terms in `[0, 1]`.
pub fn term_similarity(a: &str, b: &str) -> f32 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - strsim::levenshtein(a, b) as f32 / max_len as f32
}

/// Average over query tokens of the best [`term_similarity`] against any
/// token of `text`. Returns 0.0 if either side has no tokens.
pub fn fuzzy_similarity(query: &str, text: &str) -> f32 {
    fuzzy_similarity_tokens(&tokenize(query), text)
}

/// [`fuzzy_similarity`] for a query tokenized once and scored against many texts.
pub fn fuzzy_similarity_tokens(query_tokens: &Tokens, text: &str) -> f32 {
    let text_tokens = tokenize(text);
    if query_tokens.is_empty() || text_tokens.is_empty() {
        return 0.0;
    }

    let total: f32 = query_tokens
        .iter()
        .map(|q| {
            text_tokens
                .iter()
                .map(|t| term_similarity(q, t))
                .fold(0.0f32, f32::max)
        })
        .sum();
    total / query_tokens.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_similarity() {
        assert_eq!(term_similarity("rust", "rust"), 1.0);
        assert!((term_similarity("machine", "machne") - (1.0 - 1.0 / 7.0)).abs() < 1e-6);
        assert_eq!(term_similarity("abc", "xyz"), 0.0);
        assert_eq!(term_similarity("", ""), 1.0);
    }

    #[test]
    fn test_term_similarity_counts_chars() {
        // One substitution over four characters, regardless of UTF-8 width.
        assert!((term_similarity("café", "cafe") - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_fuzzy_similarity() {
        assert_eq!(fuzzy_similarity("", "anything"), 0.0);
        assert_eq!(fuzzy_similarity("anything", ""), 0.0);
        assert!((fuzzy_similarity("Rust", "rust is fast") - 1.0).abs() < 1e-6);

        // "golang" shares no characters with "rust".
        let partial = fuzzy_similarity("rust golang", "rust");
        assert!((partial - 0.5).abs() < 1e-6, "got {partial}");
    }

    #[test]
    fn test_pretokenized_query_matches() {
        let query = tokenize("Pyton data");
        for text in ["python data science", "rust", ""] {
            assert_eq!(
                fuzzy_similarity_tokens(&query, text),
                fuzzy_similarity("Pyton data", text)
            );
        }
    }
}
