//! Aspect-based sentiment analysis for free-text reviews.
//!
//! The crate extracts the aspect terms a review discusses and the sentiment
//! polarity expressed toward each, attaching a category label per term. It
//! serves two paths: single-review inference through
//! [`pipeline::AnalysisContext::analyze`], and offline preparation of
//! training examples for the two underlying models through [`dataset`].
//!
//! The external models are abstracted behind [`model::AspectTagger`] and
//! [`model::SentimentScorer`]; this crate owns the orchestration around
//! them: normalization, clause segmentation, dual-source extraction,
//! reconciliation, per-term scoring, category resolution, and fallback.

#![warn(missing_docs)]

/// Dataset-preparation configuration.
pub mod config;
/// Centralized constants used across segmentation, labeling, and loading.
pub mod constants;
/// Offline training-example preparation from labeled token sequences.
pub mod dataset;
/// Aspect dictionary loading and category resolution.
pub mod dictionary;
/// BIO span decoding and the two per-clause extractors.
pub mod extract;
/// External model interfaces and token types.
pub mod model;
/// Analysis orchestration and result assembly.
pub mod pipeline;
/// Clause segmentation on contrastive conjunctions.
pub mod segment;
/// Tag and polarity label sets.
pub mod tag;
/// Text normalization and word-boundary matching helpers.
pub mod text;
/// Shared type aliases.
pub mod types;

mod errors;

pub use config::DatasetConfig;
pub use dictionary::AspectDictionary;
pub use errors::{ModelError, PipelineError};
pub use model::{AspectTagger, SentimentScorer, Token, TokenKind};
pub use pipeline::{Analysis, AnalysisContext, AnalysisReport, ResultEntry};
pub use tag::{Polarity, Tag};
pub use types::{CategoryLabel, ClauseText, TermText};
