/// Controls offline dataset preparation.
#[derive(Clone, Debug)]
pub struct DatasetConfig {
    /// Max sub-word tokens kept per tagging example; longer sequences are
    /// truncated to match the encoder's input window.
    pub max_sequence_tokens: usize,
    /// RNG seed used when shuffling prepared examples.
    pub seed: u64,
    /// Whether prepared examples are shuffled before export.
    pub shuffle: bool,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            max_sequence_tokens: 128,
            seed: 42,
            shuffle: true,
        }
    }
}
