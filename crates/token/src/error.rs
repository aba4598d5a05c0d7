use thiserror::Error;

/// Errors raised while building a tokenizer from configuration.
///
/// Tokenizing itself never fails; only an invalid punctuation override can.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TokenizerConfigError {
    #[error("punctuation override must name exactly one character, got {0:?}")]
    InvalidCharacter(String),
    #[error("whitespace character {0:?} cannot be classified as punctuation")]
    WhitespacePunctuation(char),
}
