use serde::{Deserialize, Serialize};

use token::{NormalizerKind, TokenizerConfig};

/// Configuration for [`WitnessBuilder`](crate::WitnessBuilder).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WitnessConfig {
    pub tokenizer: TokenizerConfig,
    /// Tokenize an item's normalized reading instead of its plain text.
    pub use_normalized_text: bool,
    /// Drop a lone `"\n"` right after a no-word-break mark, so that a word
    /// hyphenated across a line break comes out as one word.
    pub swallow_newline_after_no_word_break: bool,
    /// Applied in order to the normalization of every word token once words
    /// are joined across items.
    pub normalizers: Vec<NormalizerKind>,
}

impl Default for WitnessConfig {
    fn default() -> Self {
        Self {
            tokenizer: TokenizerConfig::default(),
            use_normalized_text: true,
            swallow_newline_after_no_word_break: true,
            normalizers: Vec::new(),
        }
    }
}

impl WitnessConfig {
    pub fn with_tokenizer(mut self, tokenizer: TokenizerConfig) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    pub fn with_normalizers(mut self, normalizers: impl IntoIterator<Item = NormalizerKind>) -> Self {
        self.normalizers = normalizers.into_iter().collect();
        self
    }

    pub fn with_normalized_text(mut self, use_normalized_text: bool) -> Self {
        self.use_normalized_text = use_normalized_text;
        self
    }
}
