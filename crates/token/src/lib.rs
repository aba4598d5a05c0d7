//! Collatio token layer.
//!
//! Tokens are the atomic unit of comparison between manuscript witnesses.
//! This crate defines the token model and the string tokenizer that turns a
//! transcribed run of text into words, whitespace, punctuation marks and
//! numbering labels.
//!
//! ## What we do
//!
//! - Split on whitespace, keeping the whitespace as tokens
//! - Language-aware punctuation, with a different rule inside words than at
//!   their edges (`3.5` is one word, `Sp.` is a word and a period)
//! - Numbering labels such as `[1.2]` or `[٣]` as single tokens
//! - Character ranges (in `char`s) and line ranges for every token
//! - Optional word normalizers (lowercase, NFC) for comparison
//!
//! ## Invariants worth knowing
//!
//! - Tokenizing never fails; concatenating the token texts gives back the
//!   input exactly
//! - No token has empty text
//! - Output depends only on text, language and config
//!
//! ```rust
//! use token::{tokenize, TokenType};
//!
//! let tokens = tokenize("Sp. nova", "la");
//! let kinds: Vec<TokenType> = tokens.iter().map(|t| t.token_type).collect();
//! assert_eq!(
//!     kinds,
//!     vec![
//!         TokenType::Word,
//!         TokenType::Punctuation,
//!         TokenType::Whitespace,
//!         TokenType::Word,
//!     ]
//! );
//! ```

mod config;
mod error;
mod normalize;
mod numeral;
mod punctuation;
mod token;
mod tokenizer;

pub use crate::config::{PunctuationOverride, TokenizerConfig};
pub use crate::error::TokenizerConfigError;
pub use crate::normalize::{
    normalize_tokens, Lowercase, NormalizerChain, NormalizerKind, TokenNormalizer, UnicodeNfc,
};
pub use crate::numeral::{is_numbering_label, DigitStyle};
pub use crate::punctuation::{CharacterClass, PunctuationTable};
pub use crate::token::{IntRange, LineRange, Token, TokenType};
pub use crate::tokenizer::{detokenize, tokenize, StringTokenizer};
