//! Inverted index for BM25 scoring.
//!
//! Maps terms to postings lists (document position + term frequency). An index
//! is built per query over the corpus being ranked, so documents are
//! identified by their u32 position in that corpus.

use crate::bm25::tokenizer::tokenize;
use std::collections::HashMap;

/// A single entry in a term's postings list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posting {
    /// Position of the document in the corpus.
    pub doc_id: u32,
    /// Number of times the term appears in this document.
    pub term_frequency: u32,
}

/// Inverted index mapping terms to postings lists.
///
/// Document lengths are tracked for BM25 length normalization.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    /// term → list of postings, in ascending `doc_id` order
    pub index: HashMap<String, Vec<Posting>>,
    /// doc_id → document length (number of tokens)
    pub doc_lengths: Vec<u32>,
    /// Total number of documents indexed
    pub doc_count: u32,
    /// Sum of all document lengths (for average calculation)
    pub total_doc_length: u64,
}

impl InvertedIndex {
    /// Creates a new empty inverted index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Indexes every text of `corpus`; the i-th text gets `doc_id` i.
    pub fn from_corpus<'a>(corpus: impl IntoIterator<Item = &'a str>) -> Self {
        let mut idx = Self::new();
        for (i, text) in corpus.into_iter().enumerate() {
            idx.add_document(i as u32, text);
        }
        idx
    }

    /// Index a document's text under `doc_id`.
    pub fn add_document(&mut self, doc_id: u32, text: &str) {
        let tokens = tokenize(text);
        let doc_len = tokens.len() as u32;

        let idx = doc_id as usize;
        if idx >= self.doc_lengths.len() {
            self.doc_lengths.resize(idx + 1, 0);
        }
        self.doc_lengths[idx] = doc_len;
        self.doc_count += 1;
        self.total_doc_length += doc_len as u64;

        let mut tf_map: HashMap<&str, u32> = HashMap::new();
        for token in tokens.iter() {
            *tf_map.entry(token).or_insert(0) += 1;
        }

        for (term, tf) in tf_map {
            self.index
                .entry(term.to_string())
                .or_default()
                .push(Posting {
                    doc_id,
                    term_frequency: tf,
                });
        }
    }

    /// Number of documents containing `term`.
    pub fn document_frequency(&self, term: &str) -> u32 {
        self.index.get(term).map_or(0, |p| p.len() as u32)
    }

    /// Length in tokens of document `doc_id` (0 if unknown).
    pub fn doc_length(&self, doc_id: u32) -> u32 {
        self.doc_lengths.get(doc_id as usize).copied().unwrap_or(0)
    }

    /// Returns the average document length across all indexed documents.
    pub fn average_doc_length(&self) -> f32 {
        if self.doc_count == 0 {
            return 0.0;
        }
        self.total_doc_length as f32 / self.doc_count as f32
    }
}
