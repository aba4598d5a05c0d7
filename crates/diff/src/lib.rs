//! Collatio diff engine.
//!
//! Minimal edit scripts between two sequences with Myers' O(ND) algorithm,
//! used to line up the token sequences of two witnesses.
//!
//! ## What we do
//!
//! - [`diff`] runs the search to completion on the calling thread
//! - [`CooperativeDiff`] runs it one edit distance per tick, with progress
//!   counters and an abort switch; with the `async` feature,
//!   `CooperativeDiff::calculate` drives it on tokio
//! - [`diff_tokens`] and [`diff_against_base`] compare witnesses token by
//!   token, optionally fanning out over rayon
//!
//! ## Invariants worth knowing
//!
//! - Replaying a script with [`apply_edit_script`] gives back `b` exactly
//! - Deletes plus inserts equal `|a| + |b| - 2 * LCS(a, b)`
//! - Direct and cooperative runs return identical scripts
//! - An aborted run yields no script; it is not an error
//!
//! ```rust
//! use diff::{diff, EditCommand};
//!
//! let a: Vec<char> = "abcabba".chars().collect();
//! let b: Vec<char> = "cbabac".chars().collect();
//! let ops = diff(&a, &b, |x, y| x == y);
//! let kept: Vec<usize> = ops
//!     .iter()
//!     .filter(|op| op.command == EditCommand::Keep)
//!     .map(|op| op.index)
//!     .collect();
//! assert_eq!(kept, vec![2, 3, 4, 6]);
//! ```

mod config;
mod cooperative;
mod edit;
mod error;
mod myers;
mod pairwise;

pub use crate::config::DiffConfig;
pub use crate::cooperative::{AbortHandle, CooperativeDiff, DiffState, Tick};
pub use crate::edit::{apply_edit_script, edit_distance, EditCommand, EditOp};
pub use crate::error::DiffError;
pub use crate::myers::{diff, diff_eq};
pub use crate::pairwise::{diff_against_base, diff_tokens};
