//! Dual-source aspect-term extraction.
//!
//! Candidates come from two independent sources per clause: the token-tagging
//! model ([`model_candidates`]) and the aspect dictionary
//! ([`dictionary_candidates`]). Both are best-effort; a model failure costs
//! one clause's candidates, never the analysis.

use tracing::warn;

use crate::constants::labels::UNCATEGORIZED_CATEGORY;
use crate::dictionary::AspectDictionary;
use crate::model::{AspectTagger, Token, TokenKind};
use crate::tag::Tag;
use crate::text::{normalize, term_occurrences};
use crate::types::{CategoryLabel, ClauseText, TermText};

/// Which extraction source produced a candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CandidateOrigin {
    /// Decoded from tagger output.
    Model,
    /// Matched against the aspect dictionary.
    Dictionary,
}

/// An aspect term proposed by one extraction source for one clause.
///
/// Consumed by the pipeline's reconciler and discarded once folded into a
/// result entry.
#[derive(Clone, Debug)]
pub struct AspectCandidate {
    /// Surface text of the proposed term.
    pub term: TermText,
    /// Clause the term was found in; used as sentiment-scoring context.
    pub source_clause: ClauseText,
    /// Extraction source.
    pub origin: CandidateOrigin,
    /// Category resolved at extraction time (dictionary candidates only).
    pub category: Option<CategoryLabel>,
}

/// Span decode state: either between spans or accumulating one.
enum DecodeState {
    Idle,
    Building(Vec<Token>),
}

/// Explicit begin/inside/none span decoder.
///
/// Transition table (boundary tokens are excluded before decoding):
/// - `BeginTerm`: close any open span, then start a new one.
/// - `InsideTerm`: append when building; ignore when idle. An inside-tag
///   with no preceding begin-tag is noise, not an error.
/// - `NonAspect`: close any open span.
/// - end of input: close any open span.
struct SpanDecoder {
    state: DecodeState,
    spans: Vec<TermText>,
}

impl SpanDecoder {
    fn new() -> Self {
        Self {
            state: DecodeState::Idle,
            spans: Vec::new(),
        }
    }

    fn observe(&mut self, token: &Token, tag: Tag) {
        match tag {
            Tag::BeginTerm => {
                self.close();
                self.state = DecodeState::Building(vec![token.clone()]);
            }
            Tag::InsideTerm => {
                if let DecodeState::Building(tokens) = &mut self.state {
                    tokens.push(token.clone());
                }
            }
            Tag::NonAspect => self.close(),
        }
    }

    fn close(&mut self) {
        if let DecodeState::Building(tokens) = std::mem::replace(&mut self.state, DecodeState::Idle)
        {
            let span = detokenize(&tokens);
            if !span.is_empty() {
                self.spans.push(span);
            }
        }
    }

    fn finish(mut self) -> Vec<TermText> {
        self.close();
        self.spans
    }
}

/// Rebuild surface text from span tokens: continuations join without a
/// space, everything else is space-separated.
fn detokenize(tokens: &[Token]) -> TermText {
    let mut text = String::new();
    for token in tokens {
        if !text.is_empty() && token.kind != TokenKind::Continuation {
            text.push(' ');
        }
        text.push_str(&token.text);
    }
    text.trim().to_string()
}

/// Decode tagged tokens into aspect-term spans, skipping boundary markers.
pub fn decode_spans(tokens: &[Token], tags: &[Tag]) -> Vec<TermText> {
    let mut decoder = SpanDecoder::new();
    for (token, tag) in tokens.iter().zip(tags) {
        if token.kind == TokenKind::Boundary {
            continue;
        }
        decoder.observe(token, *tag);
    }
    decoder.finish()
}

/// Extract model-tagged aspect candidates from one clause.
///
/// Normalizes the clause (empty normalized text yields no candidates), runs
/// the tagger over its own tokenization, decodes spans, and deduplicates by
/// exact trimmed text within this call. Tagger failures are logged and
/// yield an empty list.
pub fn model_candidates(clause: &str, tagger: &dyn AspectTagger) -> Vec<AspectCandidate> {
    let normalized = normalize(clause);
    if normalized.is_empty() {
        return Vec::new();
    }
    let tokens = tagger.tokenize(&normalized);
    let tags = match tagger.tag(&tokens) {
        Ok(tags) => tags,
        Err(error) => {
            warn!(%error, clause, "tagger failed; dropping model candidates for clause");
            return Vec::new();
        }
    };
    if tags.len() != tokens.len() {
        warn!(
            tokens = tokens.len(),
            tags = tags.len(),
            clause,
            "tagger returned a tag count mismatch; dropping model candidates for clause"
        );
        return Vec::new();
    }

    let mut candidates = Vec::new();
    for span in decode_spans(&tokens, &tags) {
        if candidates
            .iter()
            .any(|candidate: &AspectCandidate| candidate.term == span)
        {
            continue;
        }
        candidates.push(AspectCandidate {
            term: span,
            source_clause: clause.to_string(),
            origin: CandidateOrigin::Model,
            category: None,
        });
    }
    candidates
}

/// Extract dictionary-matched aspect candidates from one clause.
///
/// Tests dictionary terms longest-first with whole-word matching against the
/// normalized clause, masking each matched span so multi-word terms beat the
/// single-word substrings they contain. Matches that resolve to the
/// uncategorized label are dropped as spurious substring collisions.
pub fn dictionary_candidates(
    clause: &str,
    dictionary: &AspectDictionary,
) -> Vec<AspectCandidate> {
    let normalized = normalize(clause);
    if normalized.is_empty() {
        return Vec::new();
    }
    let mut masked = vec![false; normalized.len()];
    let mut candidates = Vec::new();
    for term in dictionary.terms_longest_first() {
        let category = dictionary.category_for(term);
        if category == UNCATEGORIZED_CATEGORY {
            continue;
        }
        let mut matched = false;
        for (start, end) in term_occurrences(&normalized, term) {
            if masked[start..end].iter().any(|byte| *byte) {
                continue;
            }
            masked[start..end].iter_mut().for_each(|byte| *byte = true);
            matched = true;
        }
        if !matched {
            continue;
        }
        candidates.push(AspectCandidate {
            term: term.to_string(),
            source_clause: clause.to_string(),
            origin: CandidateOrigin::Dictionary,
            category: Some(category),
        });
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::model_tests::STUB_TAGGER;
    use crate::errors::ModelError;

    /// Tagger that tokenizes on whitespace and labels tokens from a fixed
    /// per-word tag table.
    struct TableTagger {
        entries: Vec<(&'static str, Tag)>,
        fail: bool,
    }

    impl TableTagger {
        fn new(entries: Vec<(&'static str, Tag)>) -> Self {
            Self {
                entries,
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                entries: Vec::new(),
                fail: true,
            }
        }
    }

    impl AspectTagger for TableTagger {
        fn tokenize(&self, text: &str) -> Vec<Token> {
            let mut tokens = vec![Token::boundary("[CLS]")];
            tokens.extend(text.split_whitespace().map(Token::word));
            tokens.push(Token::boundary("[SEP]"));
            tokens
        }

        fn tag(&self, tokens: &[Token]) -> Result<Vec<Tag>, ModelError> {
            if self.fail {
                return Err(ModelError::new(STUB_TAGGER, "weights unavailable"));
            }
            Ok(tokens
                .iter()
                .map(|token| {
                    self.entries
                        .iter()
                        .find(|(word, _)| *word == token.text)
                        .map(|(_, tag)| *tag)
                        .unwrap_or(Tag::NonAspect)
                })
                .collect())
        }
    }

    #[test]
    fn decode_emits_begin_plus_inside_runs() {
        let tokens = vec![
            Token::word("the"),
            Token::word("seat"),
            Token::word("availability"),
            Token::word("was"),
            Token::word("poor"),
        ];
        let tags = vec![
            Tag::NonAspect,
            Tag::BeginTerm,
            Tag::InsideTerm,
            Tag::NonAspect,
            Tag::NonAspect,
        ];
        assert_eq!(decode_spans(&tokens, &tags), ["seat availability"]);
    }

    #[test]
    fn decode_ignores_leading_inside_tags() {
        let tokens = vec![Token::word("noise"), Token::word("seat")];
        let tags = vec![Tag::InsideTerm, Tag::BeginTerm];
        assert_eq!(decode_spans(&tokens, &tags), ["seat"]);
    }

    #[test]
    fn decode_closes_span_on_new_begin_tag() {
        let tokens = vec![Token::word("seat"), Token::word("fare")];
        let tags = vec![Tag::BeginTerm, Tag::BeginTerm];
        assert_eq!(decode_spans(&tokens, &tags), ["seat", "fare"]);
    }

    #[test]
    fn decode_closes_trailing_span_at_end_of_sequence() {
        let tokens = vec![Token::word("was"), Token::word("crowded")];
        let tags = vec![Tag::NonAspect, Tag::BeginTerm];
        assert_eq!(decode_spans(&tokens, &tags), ["crowded"]);
    }

    #[test]
    fn decode_excludes_boundary_tokens() {
        let tokens = vec![
            Token::boundary("[CLS]"),
            Token::word("seat"),
            Token::boundary("[SEP]"),
        ];
        let tags = vec![Tag::BeginTerm, Tag::BeginTerm, Tag::InsideTerm];
        // Tags stay aligned 1:1 with tokens; only non-boundary pairs decode.
        assert_eq!(decode_spans(&tokens, &tags), ["seat"]);
    }

    #[test]
    fn detokenize_joins_continuations_without_spaces() {
        let tokens = vec![
            Token::word("air"),
            Token::continuation("con"),
            Token::word("unit"),
        ];
        assert_eq!(detokenize(&tokens), "aircon unit");
    }

    #[test]
    fn model_candidates_deduplicates_within_one_clause() {
        let tagger = TableTagger::new(vec![("seat", Tag::BeginTerm)]);
        let candidates = model_candidates("seat next to seat", &tagger);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].term, "seat");
        assert_eq!(candidates[0].origin, CandidateOrigin::Model);
        assert_eq!(candidates[0].category, None);
    }

    #[test]
    fn model_candidates_recover_from_tagger_failure() {
        let tagger = TableTagger::failing();
        assert!(model_candidates("the seats were fine", &tagger).is_empty());
    }

    #[test]
    fn model_candidates_skip_empty_normalized_clause() {
        let tagger = TableTagger::new(Vec::new());
        assert!(model_candidates("***", &tagger).is_empty());
    }

    #[test]
    fn dictionary_candidates_prefer_longest_match() {
        let dictionary = AspectDictionary::from_pairs([
            ("seat", "comfort"),
            ("seat availability", "comfort"),
        ]);
        let candidates = dictionary_candidates("the seat availability was poor", &dictionary);
        let terms: Vec<&str> = candidates
            .iter()
            .map(|candidate| candidate.term.as_str())
            .collect();
        assert_eq!(terms, ["seat availability"]);
        assert_eq!(candidates[0].category.as_deref(), Some("comfort"));
    }

    #[test]
    fn dictionary_candidates_keep_shorter_terms_outside_masked_spans() {
        let dictionary = AspectDictionary::from_pairs([
            ("seat", "comfort"),
            ("seat availability", "comfort"),
        ]);
        let candidates =
            dictionary_candidates("seat availability was poor and one seat was broken", &dictionary);
        let terms: Vec<&str> = candidates
            .iter()
            .map(|candidate| candidate.term.as_str())
            .collect();
        assert_eq!(terms, ["seat availability", "seat"]);
    }

    #[test]
    fn dictionary_candidates_drop_explicitly_uncategorized_terms() {
        let dictionary = AspectDictionary::from_pairs([
            ("queue", "other/uncategorized"),
            ("fare", "price"),
        ]);
        let candidates = dictionary_candidates("the queue for the fare gate was long", &dictionary);
        let terms: Vec<&str> = candidates
            .iter()
            .map(|candidate| candidate.term.as_str())
            .collect();
        assert_eq!(terms, ["fare"]);
    }

    #[test]
    fn dictionary_candidates_require_word_boundaries() {
        let dictionary = AspectDictionary::from_pairs([("seat", "comfort")]);
        assert!(dictionary_candidates("the seating area", &dictionary).is_empty());
    }
}
