//! Clause segmentation on contrastive conjunctions.
//!
//! Sentiment is scored per clause rather than globally, so a review like
//! "clean but crowded" contributes two independently-scored clauses. The
//! conjunction words themselves carry no aspect content and are discarded.

use crate::constants::segmenter::CONTRASTIVE_CONJUNCTIONS;
use crate::types::ClauseText;

/// Split raw review text into ordered, non-empty clauses.
///
/// Conjunctions are matched case-insensitively as whole words (an
/// alphanumeric run), so "butter" never splits. A review containing no
/// contrastive conjunction yields exactly one clause equal to the trimmed
/// whole text; empty clauses produced by leading/trailing/adjacent
/// conjunctions are dropped. Deterministic for a given input.
pub fn clauses(review: &str) -> Vec<ClauseText> {
    let mut result = Vec::new();
    let mut clause_start = 0usize;
    let mut word_start: Option<usize> = None;

    let close_word = |start: usize, end: usize, clause_start: &mut usize,
                      result: &mut Vec<ClauseText>| {
        if is_conjunction(&review[start..end]) {
            push_clause(&review[*clause_start..start], result);
            *clause_start = end;
        }
    };

    for (idx, ch) in review.char_indices() {
        if ch.is_alphanumeric() {
            word_start.get_or_insert(idx);
        } else if let Some(start) = word_start.take() {
            close_word(start, idx, &mut clause_start, &mut result);
        }
    }
    if let Some(start) = word_start {
        close_word(start, review.len(), &mut clause_start, &mut result);
    }
    push_clause(&review[clause_start..], &mut result);
    result
}

fn push_clause(text: &str, result: &mut Vec<ClauseText>) {
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        result.push(trimmed.to_string());
    }
}

fn is_conjunction(word: &str) -> bool {
    CONTRASTIVE_CONJUNCTIONS
        .iter()
        .any(|conj| word.eq_ignore_ascii_case(conj))
}
