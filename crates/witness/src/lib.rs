//! Collatio witness builder.
//!
//! A witness is the token sequence of one transcribed source over an item
//! range of a document, with provenance: every token knows which items it
//! came from, and every mark or gap in the range is attached to the token
//! before or after it.
//!
//! ## How items become tokens
//!
//! - Each text item is tokenized on its own, in its own language
//! - A word that ends one item and a word that starts the next are joined
//! - Non-word tokens, marks, gaps and a change of text box close a word;
//!   a change of page does not
//! - A no-word-break mark keeps the word open, and the line break right
//!   after it is dropped
//!
//! ```rust
//! use transcription::{Bound, DocumentTranscription, PageTranscription};
//! use witness::{build_witness, WitnessConfig};
//!
//! let page = PageTranscription::from_column_texts("la", 0, &[&["in prin", "cipio erat"]]);
//! let doc = DocumentTranscription::new("1").with_page(1, page);
//! let w = build_witness(&doc, "AW1", 1, Bound::Start, Bound::End, &WitnessConfig::default())
//!     .expect("witness");
//! let texts: Vec<&str> = w.tokens.iter().map(|t| t.text()).collect();
//! assert_eq!(texts, vec!["in", " ", "principio", " ", "erat"]);
//! ```

mod builder;
mod config;
mod error;
mod hash;
mod id;
mod transcription_token;
mod witness;

pub use crate::builder::{build_witness, NonTokenItemIndexes, WitnessBuilder, WitnessTokens};
pub use crate::config::WitnessConfig;
pub use crate::error::{WitnessError, WitnessIdError};
pub use crate::hash::hash_tokens;
pub use crate::id::{canonical_timestamp, compact_timestamp, WitnessSystemId, TIMESTAMP_FORMAT};
pub use crate::transcription_token::{TextBoxLine, TextBoxLineRange, TranscriptionToken};
pub use crate::witness::TranscriptionWitness;
