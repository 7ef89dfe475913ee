/// Aspect term surface text as emitted to callers.
/// Examples: `seat availability`, `general_review`
pub type TermText = String;
/// Normalized (lowercased, charset-filtered, whitespace-collapsed) term text
/// used for deduplication and dictionary lookup.
/// Example: `seat availability`
pub type NormalizedTerm = String;
/// Category label attached to an aspect term.
/// Examples: `comfort`, `cleanliness`, `other/uncategorized`
pub type CategoryLabel = String;
/// One independently-scored sub-span of a review, produced by the segmenter.
/// Example: `the seats were clean`
pub type ClauseText = String;
/// Surface text of a single tokenizer token, continuation markers included.
/// Examples: `seat`, `##ing`, `[CLS]`
pub type TokenText = String;
/// Name of the external model component reporting a failure.
/// Examples: `tagger`, `sentiment scorer`
pub type ComponentName = String;
