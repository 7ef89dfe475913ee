//! Aspect dictionary loading and category resolution.
//!
//! The dictionary is a process-wide, read-only mapping from normalized term
//! text to an ordered set of category labels. It is built once at startup
//! and never mutated afterward, so concurrent analysis calls can share it by
//! reference without locking. When no dictionary file is available, callers
//! use [`AspectDictionary::empty`] and every term resolves to the
//! uncategorized label.

use std::path::Path;

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::constants::labels::UNCATEGORIZED_CATEGORY;
use crate::constants::tables::{CATEGORY_COLUMN, TERM_COLUMN};
use crate::errors::PipelineError;
use crate::text::normalize;
use crate::types::{CategoryLabel, NormalizedTerm};

/// Immutable term-to-categories mapping with a precomputed longest-first
/// term order for the dictionary extractor.
#[derive(Clone, Debug, Default)]
pub struct AspectDictionary {
    terms: IndexMap<NormalizedTerm, Vec<CategoryLabel>>,
    longest_first: Vec<NormalizedTerm>,
}

impl AspectDictionary {
    /// Dictionary with no entries; every lookup resolves to
    /// `other/uncategorized`. This is the degraded mode used when the
    /// dictionary source file is missing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a dictionary from (term, category) associations.
    ///
    /// Term keys go through the full text normalizer so lookups match
    /// clause text; category labels are only trimmed and lowercased, which
    /// preserves separator characters like the `/` in
    /// `other/uncategorized`. Empty values are skipped. Duplicate terms
    /// accumulate additional categories, and the first-seen category stays
    /// authoritative for resolution.
    pub fn from_pairs<I, T, C>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (T, C)>,
        T: AsRef<str>,
        C: AsRef<str>,
    {
        let mut terms: IndexMap<NormalizedTerm, Vec<CategoryLabel>> = IndexMap::new();
        for (term, category) in pairs {
            let term = normalize(term.as_ref());
            let category = category.as_ref().trim().to_lowercase();
            if term.is_empty() || category.is_empty() {
                continue;
            }
            let categories = terms.entry(term).or_default();
            if !categories.contains(&category) {
                categories.push(category);
            }
        }
        let mut longest_first: Vec<NormalizedTerm> = terms.keys().cloned().collect();
        longest_first.sort_by_key(|term| std::cmp::Reverse(term.chars().count()));
        Self {
            terms,
            longest_first,
        }
    }

    /// Load a dictionary from a tabular file with `term` and `category`
    /// columns. Returns an error when the file cannot be read or the
    /// required columns are absent; callers that want degraded mode fall
    /// back to [`AspectDictionary::empty`] themselves.
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let mut reader = csv::Reader::from_path(path)?;
        let headers = reader.headers()?.clone();
        let term_idx = column_index(&headers, TERM_COLUMN)?;
        let category_idx = column_index(&headers, CATEGORY_COLUMN)?;

        let mut pairs = Vec::new();
        for row in reader.records() {
            let row = row?;
            let term = row.get(term_idx).unwrap_or_default();
            let category = row.get(category_idx).unwrap_or_default();
            if term.trim().is_empty() || category.trim().is_empty() {
                debug!(?path, "skipping dictionary row with empty term or category");
                continue;
            }
            pairs.push((term.to_string(), category.to_string()));
        }
        let dictionary = Self::from_pairs(pairs);
        info!(?path, terms = dictionary.len(), "aspect dictionary loaded");
        Ok(dictionary)
    }

    /// Resolve the category for a term.
    ///
    /// Normalizes the term, looks it up, and returns the first associated
    /// category; unknown terms resolve to `other/uncategorized`. Pure.
    pub fn category_for(&self, term: &str) -> CategoryLabel {
        self.terms
            .get(&normalize(term))
            .and_then(|categories| categories.first())
            .cloned()
            .unwrap_or_else(|| UNCATEGORIZED_CATEGORY.to_string())
    }

    /// All categories recorded for a normalized term, in first-seen order.
    pub fn categories_for(&self, term: &str) -> &[CategoryLabel] {
        self.terms
            .get(&normalize(term))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Dictionary terms ordered by descending length, so multi-word terms
    /// are preferred over the single-word substrings they contain.
    pub fn terms_longest_first(&self) -> impl Iterator<Item = &str> {
        self.longest_first.iter().map(String::as_str)
    }

    /// Number of distinct terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// True when the dictionary holds no terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize, PipelineError> {
    headers
        .iter()
        .position(|header| header.trim() == name)
        .ok_or_else(|| {
            PipelineError::Dictionary(format!("required column '{name}' is missing"))
        })
}
