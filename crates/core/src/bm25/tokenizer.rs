//! Whitespace tokenizer for BM25 scoring.
//!
//! Tokenizes text by lowercasing, splitting on Unicode whitespace, and trimming
//! the punctuation in [`config::TOKEN_TRIM_CHARS`] from both ends of each word.
//! Words that are pure punctuation are discarded. Uses a zero-per-token
//! allocation design via byte spans.

use crate::config;

/// Tokenized text: owns the lowercased buffer, provides &str slices via byte spans.
/// Only 1 heap allocation (the lowercased String) instead of N per-token Strings.
pub struct Tokens {
    buffer: String,
    spans: Vec<(u32, u32)>, // (start, end) byte offsets into buffer
}

impl Tokens {
    /// Returns an iterator over the token `&str` slices.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.spans
            .iter()
            .map(|&(s, e)| &self.buffer[s as usize..e as usize])
    }

    /// Returns the number of tokens.
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// Returns `true` if there are no tokens.
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

/// Tokenize text: lowercase, split on whitespace, trim edge punctuation.
/// Returns a Tokens struct that owns the lowercased buffer. Zero per-token allocation.
pub fn tokenize(text: &str) -> Tokens {
    let buffer = text.to_lowercase();
    let mut spans = Vec::new();
    let mut start: Option<usize> = None;

    for (i, c) in buffer.char_indices() {
        if c.is_whitespace() {
            if let Some(s) = start.take() {
                push_trimmed(&buffer, s, i, &mut spans);
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        push_trimmed(&buffer, s, buffer.len(), &mut spans);
    }

    Tokens { buffer, spans }
}

fn push_trimmed(buffer: &str, start: usize, end: usize, spans: &mut Vec<(u32, u32)>) {
    let word = &buffer[start..end];
    let head_trimmed = word.trim_start_matches(config::TOKEN_TRIM_CHARS);
    let token = head_trimmed.trim_end_matches(config::TOKEN_TRIM_CHARS);
    if token.is_empty() {
        return;
    }
    let s = start + (word.len() - head_trimmed.len());
    spans.push((s as u32, (s + token.len()) as u32));
}
