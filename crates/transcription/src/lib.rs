//! Collatio transcription model.
//!
//! A document is a set of pages keyed by page id. A page holds text boxes in
//! insertion order: main columns, and annotations (marginal additions,
//! glosses) anchored to an item of an earlier box. Text boxes hold items:
//! text runs, editorial marks and gaps.
//!
//! ## Reading order
//!
//! Pages are read in id order. Within a page, every main column is read item
//! by item, and after each item come the boxes anchored to it, recursively.
//! Unanchored annotations come last. The anchor relation is kept as plain
//! indexes, never as references between boxes.
//!
//! ```text
//! column 0:  a  b  c  d
//!                  └── addition (anchored at (0, 2)):  x
//! reading order:  a b c x d
//! ```
//!
//! ## Errors
//!
//! Only explicit addresses can fail (unknown page, text box or item index).
//! Walks are total; a box whose anchor points nowhere is logged and read as
//! if unanchored.

mod address;
mod document;
mod error;
mod item;
mod page;
mod text_box;

pub use crate::address::{
    Bound, DocumentBound, ItemAddressInDocument, ItemAddressInPage, PageBound, UNDEFINED_PAGE,
};
pub use crate::document::{DocumentTranscription, ItemInDocument};
pub use crate::error::{IndexKind, TranscriptionError};
pub use crate::item::{attr, Item, ItemKind, MarkType};
pub use crate::page::{ItemInPage, PageTranscription};
pub use crate::text_box::{TextBox, TextBoxKind};
