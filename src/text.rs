//! Text normalization and word-boundary matching shared by the extractors.

use crate::constants::normalizer::{KEPT_PUNCTUATION, RIGHT_SINGLE_QUOTE};

/// Normalize review text for matching and deduplication.
///
/// Lowercases, keeps only ASCII letters/digits, the punctuation in
/// [`KEPT_PUNCTUATION`] plus the Unicode right single quote, collapses
/// whitespace runs to single spaces, and trims. Idempotent: normalizing an
/// already-normalized string returns it unchanged.
pub fn normalize<T: AsRef<str>>(text: T) -> String {
    let mut normalized = String::new();
    let mut seen_space = false;
    for ch in text.as_ref().to_lowercase().chars() {
        if ch.is_whitespace() {
            if !seen_space && !normalized.is_empty() {
                normalized.push(' ');
                seen_space = true;
            }
        } else if is_kept(ch) {
            normalized.push(ch);
            seen_space = false;
        }
    }
    while normalized.ends_with(' ') {
        normalized.pop();
    }
    normalized
}

fn is_kept(ch: char) -> bool {
    ch.is_ascii_lowercase()
        || ch.is_ascii_digit()
        || ch == RIGHT_SINGLE_QUOTE
        || KEPT_PUNCTUATION.contains(&ch)
}

/// Whole-word containment test over normalized text.
///
/// Returns true when `term` occurs in `text` with both ends on a word
/// boundary (start/end of string or a non-alphanumeric neighbor). Multi-word
/// terms match as a contiguous substring, so `seat availability` matches
/// inside `the seat availability was poor` but `seat` alone does not match
/// inside `seating`.
pub fn contains_term(text: &str, term: &str) -> bool {
    !term_occurrences(text, term).is_empty()
}

/// Byte ranges of every whole-word occurrence of `term` in `text`.
///
/// Each range covers the matched substring; both ends sit on a word
/// boundary. Used by the dictionary extractor to mask longer matches before
/// testing shorter terms.
pub fn term_occurrences(text: &str, term: &str) -> Vec<(usize, usize)> {
    if term.is_empty() {
        return Vec::new();
    }
    let mut occurrences = Vec::new();
    for (start, _) in text.match_indices(term) {
        let end = start + term.len();
        let left_ok = start == 0
            || text[..start]
                .chars()
                .next_back()
                .is_some_and(|ch| !ch.is_ascii_alphanumeric());
        let right_ok = end == text.len()
            || text[end..]
                .chars()
                .next()
                .is_some_and(|ch| !ch.is_ascii_alphanumeric());
        if left_ok && right_ok {
            occurrences.push((start, end));
        }
    }
    occurrences
}
