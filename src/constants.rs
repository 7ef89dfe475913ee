/// Constants used by text normalization.
pub mod normalizer {
    /// Punctuation retained by the normalizer; everything else outside
    /// letters, digits, and whitespace is stripped.
    pub const KEPT_PUNCTUATION: [char; 6] = ['.', ',', '!', '?', ';', '\''];
    /// Unicode right single quotation mark, kept alongside the ASCII
    /// apostrophe because reviews pasted from word processors use it.
    pub const RIGHT_SINGLE_QUOTE: char = '\u{2019}';
}

/// Constants used by clause segmentation.
pub mod segmenter {
    /// Contrastive conjunctions that bound independently-scored clauses.
    /// Matched case-insensitively as whole words and discarded from output.
    pub const CONTRASTIVE_CONJUNCTIONS: [&str; 8] = [
        "but",
        "however",
        "although",
        "yet",
        "nevertheless",
        "though",
        "whereas",
        "while",
    ];
}

/// Constants used by category resolution and result assembly.
pub mod labels {
    /// Category assigned when a term has no dictionary entry.
    pub const UNCATEGORIZED_CATEGORY: &str = "other/uncategorized";
    /// Synthetic term emitted when a non-empty review yields no aspects
    /// and whole-review fallback scoring succeeds.
    pub const FALLBACK_TERM: &str = "general_review";
}

/// Constants used by dictionary and annotation table loading.
pub mod tables {
    /// Required aspect-dictionary column holding the term text.
    pub const TERM_COLUMN: &str = "term";
    /// Required aspect-dictionary column holding the category label.
    pub const CATEGORY_COLUMN: &str = "category";
    /// Annotation column holding the bracketed token list.
    pub const TOKENS_COLUMN: &str = "tokens";
    /// Annotation column holding the bracketed tag-id list.
    pub const TAGS_COLUMN: &str = "tags";
    /// Annotation column holding the bracketed polarity-id list.
    pub const POLARITIES_COLUMN: &str = "polarities";
}

/// Constants used by dataset-preparation label encoding.
pub mod dataset {
    /// Polarity id marking an unlabeled token in annotation rows.
    pub const UNLABELED_POLARITY_ID: i8 = -1;
}
