//! Analysis orchestration.
//!
//! Ownership model:
//! - `AnalysisContext` is the immutable process-wide context: tagger, scorer,
//!   and dictionary, built once at startup and shared by reference across
//!   concurrent `analyze` calls.
//! - Each `analyze` call owns all of its working state (clauses, candidates,
//!   accepted-term set), so calls are independent and need no locking.
//!
//! Within one call the clause loop is sequential by design: candidates share
//! the accepted-term set, and the first source/clause to claim a term wins.
//! Callers needing throughput parallelize across reviews, not within one.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::constants::labels::{FALLBACK_TERM, UNCATEGORIZED_CATEGORY};
use crate::dictionary::AspectDictionary;
use crate::extract::{dictionary_candidates, model_candidates};
use crate::model::{AspectTagger, SentimentScorer};
use crate::segment::clauses;
use crate::tag::Polarity;
use crate::text::normalize;
use crate::types::{CategoryLabel, NormalizedTerm, TermText};

/// Finalized (term, category, polarity) triple handed to the caller.
///
/// Within one analysis result, normalized term texts are unique.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResultEntry {
    /// Aspect term surface text.
    pub term: TermText,
    /// Category resolved via the dictionary.
    pub category: CategoryLabel,
    /// Sentiment expressed toward the term in its originating clause.
    pub polarity: Polarity,
}

/// Per-call counters separating "no aspect found" from "a model failed".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AnalysisReport {
    /// Clauses produced by segmentation.
    pub clauses: usize,
    /// Candidates proposed by the tagging model across all clauses.
    pub model_candidates: usize,
    /// Candidates proposed by the dictionary across all clauses.
    pub dictionary_candidates: usize,
    /// Candidates skipped because their term was already accepted.
    pub duplicates_skipped: usize,
    /// Candidates suppressed by a scorer failure.
    pub scorer_failures: usize,
    /// Whether whole-review fallback scoring ran.
    pub fallback_used: bool,
}

/// Result of one `analyze` call: ordered entries plus observability data.
#[derive(Clone, Debug)]
pub struct Analysis {
    /// Entries sorted ascending by `(category, term)`.
    pub entries: Vec<ResultEntry>,
    /// Counters describing how the entries were produced.
    pub report: AnalysisReport,
    /// When the analysis ran.
    pub analyzed_at: DateTime<Utc>,
}

/// Immutable analysis context shared across concurrent calls.
///
/// Construction requires both models, so a context that exists can always
/// run; model-loading failures surface in the caller's own loader before a
/// context is ever built. The dictionary alone degrades gracefully: pass
/// [`AspectDictionary::empty`] and every term resolves to
/// `other/uncategorized`.
pub struct AnalysisContext {
    tagger: Arc<dyn AspectTagger>,
    scorer: Arc<dyn SentimentScorer>,
    dictionary: AspectDictionary,
}

impl AnalysisContext {
    /// Build a context from loaded models and a dictionary.
    pub fn new(
        tagger: Arc<dyn AspectTagger>,
        scorer: Arc<dyn SentimentScorer>,
        dictionary: AspectDictionary,
    ) -> Self {
        Self {
            tagger,
            scorer,
            dictionary,
        }
    }

    /// The dictionary this context resolves categories against.
    pub fn dictionary(&self) -> &AspectDictionary {
        &self.dictionary
    }

    /// Analyze one review into an ordered list of (term, category, polarity)
    /// entries.
    ///
    /// Empty or whitespace-only input yields an empty entry list. Per-clause
    /// extraction and per-candidate scoring are best-effort; failures drop
    /// individual candidates and are counted in the report.
    pub fn analyze(&self, review_text: &str) -> Analysis {
        let analyzed_at = Utc::now();
        let mut report = AnalysisReport::default();
        let mut entries: Vec<ResultEntry> = Vec::new();

        if review_text.trim().is_empty() {
            return Analysis {
                entries,
                report,
                analyzed_at,
            };
        }

        let mut accepted: HashSet<NormalizedTerm> = HashSet::new();
        let review_clauses = clauses(review_text);
        report.clauses = review_clauses.len();

        for clause in &review_clauses {
            let from_model = model_candidates(clause, self.tagger.as_ref());
            report.model_candidates += from_model.len();
            let from_dictionary = dictionary_candidates(clause, &self.dictionary);
            report.dictionary_candidates += from_dictionary.len();

            // Model candidates fold in first, so they win term claims over
            // dictionary candidates within the same clause.
            for candidate in from_model.into_iter().chain(from_dictionary) {
                let key = normalize(&candidate.term);
                if accepted.contains(&key) {
                    report.duplicates_skipped += 1;
                    continue;
                }
                accepted.insert(key);
                let polarity =
                    match self.resolve_sentiment(&candidate.source_clause, &candidate.term) {
                        Ok(Some(polarity)) => polarity,
                        Ok(None) => continue,
                        Err(()) => {
                            report.scorer_failures += 1;
                            continue;
                        }
                    };
                let category = candidate
                    .category
                    .unwrap_or_else(|| self.dictionary.category_for(&candidate.term));
                entries.push(ResultEntry {
                    term: candidate.term,
                    category,
                    polarity,
                });
            }
        }

        if entries.is_empty() {
            report.fallback_used = true;
            debug!("no aspects accepted; scoring whole-review fallback");
            if let Ok(Some(polarity)) = self.resolve_sentiment(review_text, review_text) {
                entries.push(ResultEntry {
                    term: FALLBACK_TERM.to_string(),
                    category: UNCATEGORIZED_CATEGORY.to_string(),
                    polarity,
                });
            }
        }

        entries.sort_by(|a, b| {
            (a.category.as_str(), a.term.as_str()).cmp(&(b.category.as_str(), b.term.as_str()))
        });

        Analysis {
            entries,
            report,
            analyzed_at,
        }
    }

    /// Score one (clause, term) pair.
    ///
    /// `Ok(None)` means not applicable (either side normalizes to empty);
    /// `Err(())` means the scorer itself failed. Neither outcome is ever
    /// stored as a polarity.
    fn resolve_sentiment(&self, clause: &str, term: &str) -> Result<Option<Polarity>, ()> {
        let clause = normalize(clause);
        let term = normalize(term);
        if clause.is_empty() || term.is_empty() {
            return Ok(None);
        }
        match self.scorer.score(&clause, &term) {
            Ok(polarity) => Ok(Some(polarity)),
            Err(error) => {
                warn!(%error, %term, "sentiment scoring failed; suppressing candidate");
                Err(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::model_tests::STUB_SCORER;
    use crate::errors::ModelError;
    use crate::model::{Token, TokenKind};
    use crate::tag::Tag;

    /// Tagger that marks listed words as single-token aspect terms.
    struct WordListTagger {
        aspect_words: Vec<&'static str>,
    }

    impl AspectTagger for WordListTagger {
        fn tokenize(&self, text: &str) -> Vec<Token> {
            let mut tokens = vec![Token::boundary("[CLS]")];
            tokens.extend(text.split_whitespace().map(Token::word));
            tokens.push(Token::boundary("[SEP]"));
            tokens
        }

        fn tag(&self, tokens: &[Token]) -> Result<Vec<Tag>, ModelError> {
            Ok(tokens
                .iter()
                .map(|token| {
                    if token.kind != TokenKind::Boundary
                        && self.aspect_words.contains(&token.text.as_str())
                    {
                        Tag::BeginTerm
                    } else {
                        Tag::NonAspect
                    }
                })
                .collect())
        }
    }

    /// Scorer that keys off simple cue words in the clause.
    struct CueScorer {
        fail_on_term: Option<&'static str>,
    }

    impl SentimentScorer for CueScorer {
        fn score(&self, primary: &str, secondary: &str) -> Result<Polarity, ModelError> {
            if self.fail_on_term == Some(secondary) {
                return Err(ModelError::new(STUB_SCORER, "scoring failed"));
            }
            if primary.contains("poor") || primary.contains("dirty") {
                Ok(Polarity::Negative)
            } else if primary.contains("clean") || primary.contains("great") {
                Ok(Polarity::Positive)
            } else {
                Ok(Polarity::Neutral)
            }
        }
    }

    fn context(aspect_words: Vec<&'static str>, fail_on_term: Option<&'static str>) -> AnalysisContext {
        AnalysisContext::new(
            Arc::new(WordListTagger { aspect_words }),
            Arc::new(CueScorer { fail_on_term }),
            AspectDictionary::from_pairs([
                ("seats", "comfort"),
                ("platform", "facilities"),
            ]),
        )
    }

    #[test]
    fn empty_input_yields_no_entries_and_no_fallback() {
        let analysis = context(Vec::new(), None).analyze("   ");
        assert!(analysis.entries.is_empty());
        assert!(!analysis.report.fallback_used);
    }

    #[test]
    fn entries_are_sorted_by_category_then_term() {
        let ctx = context(vec!["seats", "platform"], None);
        let analysis = ctx.analyze("the platform and seats were clean");
        let shaped: Vec<(&str, &str)> = analysis
            .entries
            .iter()
            .map(|entry| (entry.category.as_str(), entry.term.as_str()))
            .collect();
        assert_eq!(shaped, [("comfort", "seats"), ("facilities", "platform")]);
    }

    #[test]
    fn model_claim_beats_dictionary_claim_for_the_same_term() {
        let ctx = context(vec!["seats"], None);
        let analysis = ctx.analyze("the seats were clean");
        assert_eq!(analysis.entries.len(), 1);
        assert_eq!(analysis.report.duplicates_skipped, 1);
    }

    #[test]
    fn scorer_failure_suppresses_only_that_candidate() {
        let ctx = context(vec!["seats", "platform"], Some("seats"));
        let analysis = ctx.analyze("the seats and platform were clean");
        let terms: Vec<&str> = analysis
            .entries
            .iter()
            .map(|entry| entry.term.as_str())
            .collect();
        assert_eq!(terms, ["platform"]);
        assert_eq!(analysis.report.scorer_failures, 1);
    }

    #[test]
    fn fallback_emits_single_general_review_entry() {
        let ctx = context(Vec::new(), None);
        let analysis = ctx.analyze("it was great overall");
        assert!(analysis.report.fallback_used);
        assert_eq!(
            analysis.entries,
            vec![ResultEntry {
                term: FALLBACK_TERM.to_string(),
                category: UNCATEGORIZED_CATEGORY.to_string(),
                polarity: Polarity::Positive,
            }]
        );
    }
}
