//! Offline dataset preparation.
//!
//! Turns hand-labeled token sequences into training examples for the two
//! scoring models: per-token tagging examples (sub-word expanded through the
//! tagger's own tokenization) and (text, term, polarity) pair examples for
//! the pairwise sentiment model. Annotation rows arrive as a tabular file
//! whose `tokens`/`tags`/`polarities` columns hold bracketed list strings
//! like `['seat', 'comfort']` and `[1, 2]`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::DatasetConfig;
use crate::constants::dataset::UNLABELED_POLARITY_ID;
use crate::constants::tables::{POLARITIES_COLUMN, TAGS_COLUMN, TOKENS_COLUMN};
use crate::errors::PipelineError;
use crate::model::{AspectTagger, TokenKind};
use crate::tag::{Polarity, Tag};
use crate::types::{TermText, TokenText};

/// One hand-labeled token sequence from the annotation table.
///
/// `tokens`, `tags`, and `polarities` are aligned 1:1; a `None` polarity
/// marks an unlabeled token (`-1` in the annotation encoding).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabeledSequence {
    /// Word-level tokens as annotated.
    pub tokens: Vec<TokenText>,
    /// Aspect tag per token.
    pub tags: Vec<Tag>,
    /// Sentiment label per token, `None` where unlabeled.
    pub polarities: Vec<Option<Polarity>>,
}

impl LabeledSequence {
    /// Build a sequence from aligned label vectors.
    pub fn new(
        tokens: Vec<TokenText>,
        tags: Vec<Tag>,
        polarities: Vec<Option<Polarity>>,
    ) -> Result<Self, PipelineError> {
        if tokens.len() != tags.len() || tokens.len() != polarities.len() {
            return Err(PipelineError::Dataset(format!(
                "misaligned labels: {} tokens, {} tags, {} polarities",
                tokens.len(),
                tags.len(),
                polarities.len()
            )));
        }
        Ok(Self {
            tokens,
            tags,
            polarities,
        })
    }

    /// Parse one annotation row of bracketed list strings.
    pub fn from_row(tokens: &str, tags: &str, polarities: &str) -> Result<Self, PipelineError> {
        let tokens = parse_list_field(tokens);
        let tags = parse_id_field(tags)?
            .into_iter()
            .map(|id| {
                Tag::from_id(id)
                    .ok_or_else(|| PipelineError::Dataset(format!("unknown tag id {id}")))
            })
            .collect::<Result<Vec<Tag>, PipelineError>>()?;
        let polarities = parse_id_field(polarities)?
            .into_iter()
            .map(Polarity::from_id)
            .collect();
        Self::new(tokens, tags, polarities)
    }

    /// Reconstructed review text: annotated tokens joined by spaces.
    pub fn text(&self) -> String {
        self.tokens.join(" ")
    }
}

/// Sub-word training example for the tagging model.
///
/// Each annotated word's tag (and polarity) is repeated across the word's
/// sub-tokens, so labels stay aligned after tokenization.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaggingExample {
    /// Sub-word token texts, continuation markers stripped.
    pub tokens: Vec<TokenText>,
    /// Tag id per sub-word token.
    pub tag_ids: Vec<i8>,
    /// Polarity id per sub-word token (`-1` where unlabeled).
    pub polarity_ids: Vec<i8>,
}

/// (text, term, polarity) training example for the sentiment model.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PairExample {
    /// Full reconstructed review text (primary input).
    pub text: String,
    /// Aspect term span (secondary input).
    pub term: TermText,
    /// Sentiment label for the pair.
    pub polarity: Polarity,
}

/// Expand one labeled sequence into a tagging example.
///
/// Empty annotated tokens are skipped; boundary markers produced by the
/// tokenizer are excluded; output is truncated to
/// `config.max_sequence_tokens` sub-tokens.
pub fn tagging_example(
    sequence: &LabeledSequence,
    tagger: &dyn AspectTagger,
    config: &DatasetConfig,
) -> TaggingExample {
    let mut tokens = Vec::new();
    let mut tag_ids = Vec::new();
    let mut polarity_ids = Vec::new();
    for ((word, tag), polarity) in sequence
        .tokens
        .iter()
        .zip(&sequence.tags)
        .zip(&sequence.polarities)
    {
        if word.is_empty() {
            continue;
        }
        let polarity_id = polarity.map(Polarity::id).unwrap_or(UNLABELED_POLARITY_ID);
        for sub_token in tagger.tokenize(word) {
            if sub_token.kind == TokenKind::Boundary {
                continue;
            }
            tokens.push(sub_token.text);
            tag_ids.push(tag.id());
            polarity_ids.push(polarity_id);
        }
    }
    tokens.truncate(config.max_sequence_tokens);
    tag_ids.truncate(config.max_sequence_tokens);
    polarity_ids.truncate(config.max_sequence_tokens);
    TaggingExample {
        tokens,
        tag_ids,
        polarity_ids,
    }
}

/// Extract (text, term, polarity) pair examples from one labeled sequence.
///
/// Walks the tag sequence with the same begin/inside semantics the inference
/// decoder uses (a bare inside-tag is noise), carrying a polarity per span:
/// the begin-tag's label starts it and any labeled inside-tag overrides it.
/// Spans without a labeled polarity are dropped.
pub fn pair_examples(sequence: &LabeledSequence) -> Vec<PairExample> {
    let text = sequence.text();
    let mut examples = Vec::new();
    let mut span: Vec<&str> = Vec::new();
    let mut span_polarity: Option<Polarity> = None;

    let close =
        |span: &mut Vec<&str>, span_polarity: &mut Option<Polarity>, examples: &mut Vec<PairExample>| {
            if let (false, Some(polarity)) = (span.is_empty(), span_polarity.take()) {
                examples.push(PairExample {
                    text: text.clone(),
                    term: span.join(" "),
                    polarity,
                });
            }
            span.clear();
        };

    for ((word, tag), polarity) in sequence
        .tokens
        .iter()
        .zip(&sequence.tags)
        .zip(&sequence.polarities)
    {
        match tag {
            Tag::BeginTerm => {
                close(&mut span, &mut span_polarity, &mut examples);
                span.push(word);
                span_polarity = *polarity;
            }
            Tag::InsideTerm => {
                if !span.is_empty() {
                    span.push(word);
                    if polarity.is_some() {
                        span_polarity = *polarity;
                    }
                }
            }
            Tag::NonAspect => close(&mut span, &mut span_polarity, &mut examples),
        }
    }
    close(&mut span, &mut span_polarity, &mut examples);
    examples
}

/// Load labeled sequences from an annotation table with `tokens`, `tags`,
/// and `polarities` columns.
pub fn load_labeled_sequences(path: impl AsRef<Path>) -> Result<Vec<LabeledSequence>, PipelineError> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let tokens_idx = required_column(&headers, TOKENS_COLUMN)?;
    let tags_idx = required_column(&headers, TAGS_COLUMN)?;
    let polarities_idx = required_column(&headers, POLARITIES_COLUMN)?;

    let mut sequences = Vec::new();
    for row in reader.records() {
        let row = row?;
        sequences.push(LabeledSequence::from_row(
            row.get(tokens_idx).unwrap_or_default(),
            row.get(tags_idx).unwrap_or_default(),
            row.get(polarities_idx).unwrap_or_default(),
        )?);
    }
    info!(?path, rows = sequences.len(), "annotation table loaded");
    Ok(sequences)
}

/// Prepare tagging examples for every sequence, shuffling when configured.
pub fn prepare_tagging_examples(
    sequences: &[LabeledSequence],
    tagger: &dyn AspectTagger,
    config: &DatasetConfig,
) -> Vec<TaggingExample> {
    let mut examples: Vec<TaggingExample> = sequences
        .iter()
        .map(|sequence| tagging_example(sequence, tagger, config))
        .collect();
    maybe_shuffle(&mut examples, config);
    examples
}

/// Prepare pair examples for every sequence, shuffling when configured.
pub fn prepare_pair_examples(
    sequences: &[LabeledSequence],
    config: &DatasetConfig,
) -> Vec<PairExample> {
    let mut examples: Vec<PairExample> = sequences.iter().flat_map(pair_examples).collect();
    maybe_shuffle(&mut examples, config);
    examples
}

/// Write prepared examples as JSON Lines, one example per line.
pub fn write_jsonl<T: Serialize>(
    path: impl AsRef<Path>,
    examples: &[T],
) -> Result<(), PipelineError> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    for example in examples {
        let line = serde_json::to_string(example)
            .map_err(|error| PipelineError::Dataset(error.to_string()))?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    info!(?path, examples = examples.len(), "dataset written");
    Ok(())
}

fn maybe_shuffle<T>(examples: &mut [T], config: &DatasetConfig) {
    if config.shuffle {
        let mut rng = StdRng::seed_from_u64(config.seed);
        examples.shuffle(&mut rng);
    }
}

/// Parse a bracketed list string like `['seat', 'comfort']` into items.
///
/// Surrounding brackets and single/double quotes are stripped per item;
/// empty items are preserved so label alignment is the caller's decision.
fn parse_list_field(field: &str) -> Vec<TokenText> {
    let inner = field.trim().trim_start_matches('[').trim_end_matches(']');
    if inner.trim().is_empty() {
        return Vec::new();
    }
    inner
        .split(',')
        .map(|item| item.trim().trim_matches(|ch| ch == '\'' || ch == '"').to_string())
        .collect()
}

fn parse_id_field(field: &str) -> Result<Vec<i8>, PipelineError> {
    parse_list_field(field)
        .into_iter()
        .map(|item| {
            item.parse::<i8>()
                .map_err(|_| PipelineError::Dataset(format!("invalid label id '{item}'")))
        })
        .collect()
}

fn required_column(headers: &csv::StringRecord, name: &str) -> Result<usize, PipelineError> {
    headers
        .iter()
        .position(|header| header.trim() == name)
        .ok_or_else(|| PipelineError::Dataset(format!("required column '{name}' is missing")))
}
