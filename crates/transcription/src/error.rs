//! Error types produced by the transcription model.
//!
//! Only explicit addressing can fail. Walking a page or a document is total:
//! a text box with a broken anchor is walked as if it were unanchored.
//!
//! | Error | Raised by |
//! |-------|-----------|
//! | [`PageNotFound`](TranscriptionError::PageNotFound) | document lookups with an unknown page id |
//! | [`IndexOutOfBounds`](TranscriptionError::IndexOutOfBounds) | text box or item index past the stored count |
//! | [`MalformedAnchor`](TranscriptionError::MalformedAnchor) | [`validate_anchors`](crate::PageTranscription::validate_anchors) |

use thiserror::Error;

use crate::address::ItemAddressInPage;

/// What an out-of-bounds index was pointing at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    TextBox,
    Item,
}

impl std::fmt::Display for IndexKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            IndexKind::TextBox => "text box",
            IndexKind::Item => "item",
        })
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TranscriptionError {
    #[error("page {0} not found")]
    PageNotFound(i32),
    #[error("{kind} index {index} out of bounds (count {count})")]
    IndexOutOfBounds {
        kind: IndexKind,
        index: i64,
        count: usize,
    },
    #[error("text box {text_box} has malformed anchor {anchor}")]
    MalformedAnchor {
        text_box: usize,
        anchor: ItemAddressInPage,
    },
}

impl TranscriptionError {
    pub(crate) fn text_box_out_of_bounds(index: i64, count: usize) -> Self {
        TranscriptionError::IndexOutOfBounds {
            kind: IndexKind::TextBox,
            index,
            count,
        }
    }

    pub(crate) fn item_out_of_bounds(index: i64, count: usize) -> Self {
        TranscriptionError::IndexOutOfBounds {
            kind: IndexKind::Item,
            index,
            count,
        }
    }
}
