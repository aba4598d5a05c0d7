//! Tokenizer configuration.
//!
//! The built-in punctuation table covers Latin, Arabic and Hebrew
//! transcriptions. Projects that need a different classification add
//! [`PunctuationOverride`] entries, either for every language or for a single
//! language tag.
//!
//! ```rust
//! use token::{PunctuationOverride, TokenizerConfig};
//!
//! let cfg = TokenizerConfig::default()
//!     .with_default_language("la")
//!     .with_override(PunctuationOverride::new("-").inside_word(false));
//! assert!(cfg.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::error::TokenizerConfigError;
use crate::punctuation::{CharacterClass, PunctuationTable};

/// Configuration for [`StringTokenizer`](crate::StringTokenizer).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TokenizerConfig {
    /// Emit `[1.2]`-style runs as a single numbering-label token.
    pub detect_numbering_labels: bool,
    /// Language used when a caller passes an empty language tag.
    pub default_language: String,
    /// Applied on top of the built-in table, in order.
    pub punctuation_overrides: Vec<PunctuationOverride>,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            detect_numbering_labels: true,
            default_language: String::new(),
            punctuation_overrides: Vec::new(),
        }
    }
}

impl TokenizerConfig {
    pub fn with_default_language(mut self, lang: impl Into<String>) -> Self {
        self.default_language = lang.into();
        self
    }

    pub fn with_numbering_labels(mut self, detect: bool) -> Self {
        self.detect_numbering_labels = detect;
        self
    }

    pub fn with_override(mut self, entry: PunctuationOverride) -> Self {
        self.punctuation_overrides.push(entry);
        self
    }

    pub fn validate(&self) -> Result<(), TokenizerConfigError> {
        for entry in &self.punctuation_overrides {
            let ch = entry.char()?;
            if ch.is_whitespace() && entry.is_punctuation {
                return Err(TokenizerConfigError::WhitespacePunctuation(ch));
            }
        }
        Ok(())
    }

    /// Builds the punctuation table: built-in entries plus the overrides.
    pub fn punctuation_table(&self) -> Result<PunctuationTable, TokenizerConfigError> {
        self.validate()?;
        let mut table = PunctuationTable::builtin();
        for entry in &self.punctuation_overrides {
            table.set_class(entry.char()?, entry.language.as_deref(), entry.class());
        }
        Ok(table)
    }
}

/// One injected punctuation table entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PunctuationOverride {
    /// Single character, as a string so the entry reads naturally in YAML.
    pub character: String,
    /// Restricts the entry to one language tag; `None` changes the default.
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default = "default_true")]
    pub is_punctuation: bool,
    /// Defaults to `is_punctuation`.
    #[serde(default)]
    pub is_punctuation_inside_word: Option<bool>,
    #[serde(default)]
    pub sticks_to_previous: bool,
    #[serde(default)]
    pub sticks_to_next: bool,
}

fn default_true() -> bool {
    true
}

impl PunctuationOverride {
    pub fn new(character: impl Into<String>) -> Self {
        Self {
            character: character.into(),
            language: None,
            is_punctuation: true,
            is_punctuation_inside_word: None,
            sticks_to_previous: false,
            sticks_to_next: false,
        }
    }

    pub fn for_language(mut self, lang: impl Into<String>) -> Self {
        self.language = Some(lang.into());
        self
    }

    pub fn punctuation(mut self, is_punctuation: bool) -> Self {
        self.is_punctuation = is_punctuation;
        self
    }

    pub fn inside_word(mut self, is_punctuation_inside_word: bool) -> Self {
        self.is_punctuation_inside_word = Some(is_punctuation_inside_word);
        self
    }

    pub fn sticky(mut self, to_previous: bool, to_next: bool) -> Self {
        self.sticks_to_previous = to_previous;
        self.sticks_to_next = to_next;
        self
    }

    fn char(&self) -> Result<char, TokenizerConfigError> {
        let mut chars = self.character.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Ok(ch),
            _ => Err(TokenizerConfigError::InvalidCharacter(
                self.character.clone(),
            )),
        }
    }

    fn class(&self) -> CharacterClass {
        CharacterClass {
            is_punctuation: self.is_punctuation,
            is_punctuation_inside_word: self
                .is_punctuation_inside_word
                .unwrap_or(self.is_punctuation),
            sticks_to_previous: self.sticks_to_previous,
            sticks_to_next: self.sticks_to_next,
        }
    }
}
