//! External model interfaces.
//!
//! Ownership model:
//! - `AspectTagger` owns tokenization and per-token labeling; the pipeline
//!   never assumes a particular sub-word scheme beyond [`TokenKind`].
//! - `SentimentScorer` classifies a (primary text, secondary text) pair.
//! - Both are process-wide, read-only collaborators shared by reference
//!   across concurrent analysis calls; implementations must be `Send + Sync`.

use crate::errors::ModelError;
use crate::tag::{Polarity, Tag};
use crate::types::TokenText;

/// How a token relates to the surrounding surface text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    /// Ordinary token starting at a word boundary.
    Word,
    /// Sub-word continuation of the preceding token; joined without a space
    /// when spans are detokenized.
    Continuation,
    /// Sequence boundary marker required by the model (start/end sentinels);
    /// excluded from span construction.
    Boundary,
}

/// A normalized sub-word unit with its continuation/boundary role.
///
/// Ephemeral: produced and consumed within one extraction call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    /// Surface text with any continuation marker already stripped.
    pub text: TokenText,
    /// Role of this token during span construction.
    pub kind: TokenKind,
}

impl Token {
    /// Ordinary word-start token.
    pub fn word(text: impl Into<TokenText>) -> Self {
        Self {
            text: text.into(),
            kind: TokenKind::Word,
        }
    }

    /// Sub-word continuation token.
    pub fn continuation(text: impl Into<TokenText>) -> Self {
        Self {
            text: text.into(),
            kind: TokenKind::Continuation,
        }
    }

    /// Sequence boundary marker.
    pub fn boundary(text: impl Into<TokenText>) -> Self {
        Self {
            text: text.into(),
            kind: TokenKind::Boundary,
        }
    }
}

/// Token-tagging model interface (sequence encoder + token classifier).
///
/// For a fixed input, `tokenize` and `tag` should be deterministic so
/// repeated analyses of the same review produce identical output.
pub trait AspectTagger: Send + Sync {
    /// Split normalized text into model tokens, including any boundary
    /// markers the model requires.
    fn tokenize(&self, text: &str) -> Vec<Token>;

    /// Label each token with one of the three aspect tags.
    ///
    /// Must return exactly one tag per input token. Failures are recovered
    /// by the caller; a tagging error drops candidates for one clause, never
    /// the whole analysis.
    fn tag(&self, tokens: &[Token]) -> Result<Vec<Tag>, ModelError>;
}

/// Pairwise sentiment model interface (sequence encoder + pair classifier).
pub trait SentimentScorer: Send + Sync {
    /// Classify the sentiment of `primary` with respect to `secondary`.
    ///
    /// The pipeline passes the clause as `primary` and the candidate term as
    /// `secondary`. Failures are recovered by the caller; a scoring error
    /// suppresses one candidate, never the whole analysis.
    fn score(&self, primary: &str, secondary: &str) -> Result<Polarity, ModelError>;
}
