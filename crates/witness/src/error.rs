use thiserror::Error;

use token::TokenizerConfigError;
use transcription::TranscriptionError;

/// Errors that can occur while building a witness.
///
/// Turning items into tokens never fails; only resolving the item range or
/// building the tokenizer can.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum WitnessError {
    #[error("invalid tokenizer configuration: {0}")]
    Tokenizer(#[from] TokenizerConfigError),
    #[error("cannot resolve item range: {0}")]
    Transcription(#[from] TranscriptionError),
}

/// Errors produced when parsing a witness identity string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum WitnessIdError {
    #[error("witness id {0:?} is not a full transcription id")]
    NotFullTranscription(String),
    #[error("witness id {id:?} is missing its {field}")]
    MissingField { id: String, field: &'static str },
    #[error("{field} {value:?} cannot be part of a witness id")]
    InvalidField { field: &'static str, value: String },
    #[error("witness id {id:?} has a non-numeric {field}: {value:?}")]
    InvalidNumber {
        id: String,
        field: &'static str,
        value: String,
    },
}
