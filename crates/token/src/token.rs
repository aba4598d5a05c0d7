use serde::{Deserialize, Serialize};

/// The kind of a token.
///
/// `Empty` is only ever used as the "nothing accumulated yet" value of token
/// accumulators; tokenizers never emit it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    #[default]
    Empty,
    Word,
    Whitespace,
    Punctuation,
    NumberingLabel,
}

impl TokenType {
    pub fn as_str(self) -> &'static str {
        match self {
            TokenType::Empty => "empty",
            TokenType::Word => "word",
            TokenType::Whitespace => "whitespace",
            TokenType::Punctuation => "punctuation",
            TokenType::NumberingLabel => "numbering_label",
        }
    }
}

/// A range of character positions, counted in Unicode scalar values.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub struct IntRange {
    pub start: usize,
    pub length: usize,
}

impl IntRange {
    pub fn new(start: usize, length: usize) -> Self {
        Self { start, length }
    }

    /// Range covering `start..=end_inclusive`.
    pub fn from_start_end(start: usize, end_inclusive: usize) -> Self {
        Self {
            start,
            length: end_inclusive + 1 - start,
        }
    }

    /// One past the last position in the range.
    pub fn end(&self) -> usize {
        self.start + self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }
}

/// First and last line touched by a token (1-based).
///
/// A whitespace token that contains newlines ends on a later line than the
/// one it starts on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct LineRange {
    pub start: usize,
    pub end: usize,
}

impl LineRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn single(line: usize) -> Self {
        Self {
            start: line,
            end: line,
        }
    }
}

/// The atomic unit of comparison between witnesses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    #[serde(rename = "type")]
    pub token_type: TokenType,
    /// Exact source text.
    pub text: String,
    /// Text used for comparison. Equal to `text` unless a normalizer ran.
    pub normalization: String,
    /// Position in the tokenized string; only set by the string tokenizer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub char_range: Option<IntRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_range: Option<LineRange>,
}

impl Token {
    pub fn new(token_type: TokenType, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            token_type,
            normalization: text.clone(),
            text,
            char_range: None,
            line_range: None,
        }
    }

    pub fn empty() -> Self {
        Self::new(TokenType::Empty, "")
    }

    pub fn word(text: impl Into<String>) -> Self {
        Self::new(TokenType::Word, text)
    }

    pub fn whitespace(text: impl Into<String>) -> Self {
        Self::new(TokenType::Whitespace, text)
    }

    pub fn punctuation(text: impl Into<String>) -> Self {
        Self::new(TokenType::Punctuation, text)
    }

    pub fn numbering_label(text: impl Into<String>) -> Self {
        Self::new(TokenType::NumberingLabel, text)
    }

    pub fn with_normalization(mut self, normalization: impl Into<String>) -> Self {
        self.normalization = normalization.into();
        self
    }

    pub fn with_char_range(mut self, range: IntRange) -> Self {
        self.char_range = Some(range);
        self
    }

    pub fn with_line_range(mut self, range: LineRange) -> Self {
        self.line_range = Some(range);
        self
    }

    /// Line the token starts on, if known.
    pub fn line_number(&self) -> Option<usize> {
        self.line_range.map(|r| r.start)
    }

    pub fn is_empty(&self) -> bool {
        self.token_type == TokenType::Empty
    }

    /// Two tokens are equivalent for collation when they have the same type
    /// and the same normalization, wherever they came from.
    pub fn is_equivalent(&self, other: &Token) -> bool {
        self.token_type == other.token_type && self.normalization == other.normalization
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        self.text.as_str()
    }
}

impl AsRef<Token> for Token {
    fn as_ref(&self) -> &Token {
        self
    }
}

impl AsMut<Token> for Token {
    fn as_mut(&mut self) -> &mut Token {
        self
    }
}
