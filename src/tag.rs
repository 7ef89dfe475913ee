//! Label sets shared by the tagger and sentiment scorer boundaries.

use serde::{Deserialize, Serialize};

/// Per-token label produced by the aspect tagger.
///
/// Ids follow the annotation encoding used in training data:
/// 0 non-aspect, 1 begin-term, 2 inside-term. Tags are attached 1:1 to
/// tokens and never persisted.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Tag {
    /// Token is not part of any aspect term.
    NonAspect,
    /// Token starts a new aspect term span.
    BeginTerm,
    /// Token continues the current aspect term span.
    InsideTerm,
}

impl Tag {
    /// Decode an annotation tag id, rejecting anything outside the label set.
    pub fn from_id(id: i8) -> Option<Self> {
        match id {
            0 => Some(Self::NonAspect),
            1 => Some(Self::BeginTerm),
            2 => Some(Self::InsideTerm),
            _ => None,
        }
    }

    /// Annotation tag id for this label.
    pub fn id(self) -> i8 {
        match self {
            Self::NonAspect => 0,
            Self::BeginTerm => 1,
            Self::InsideTerm => 2,
        }
    }
}

/// Sentiment class expressed toward an aspect term.
///
/// Ids follow the annotation encoding: 0 Negative, 1 Neutral, 2 Positive.
/// "Not applicable" is expressed as `Option<Polarity>::None` at call sites
/// so it can never be stored as a real polarity.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum Polarity {
    /// Unfavorable sentiment toward the term.
    Negative,
    /// Neither favorable nor unfavorable.
    Neutral,
    /// Favorable sentiment toward the term.
    Positive,
}

impl Polarity {
    /// Decode an annotation polarity id; `-1` (unlabeled) and anything
    /// outside the label set map to `None`.
    pub fn from_id(id: i8) -> Option<Self> {
        match id {
            0 => Some(Self::Negative),
            1 => Some(Self::Neutral),
            2 => Some(Self::Positive),
            _ => None,
        }
    }

    /// Annotation polarity id for this class.
    pub fn id(self) -> i8 {
        match self {
            Self::Negative => 0,
            Self::Neutral => 1,
            Self::Positive => 2,
        }
    }

    /// Stable display label, as stored by callers.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Negative => "Negative",
            Self::Neutral => "Neutral",
            Self::Positive => "Positive",
        }
    }
}
