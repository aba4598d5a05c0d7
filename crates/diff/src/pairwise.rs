//! Token-level diffs between witnesses.

use std::time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use token::Token;
use tracing::{info, Level};

use crate::config::DiffConfig;
use crate::edit::{edit_distance, EditOp};
use crate::myers::diff;

/// Diffs two token sequences, treating tokens as equal when their type and
/// normalized text match. Positions and provenance are ignored.
pub fn diff_tokens<A, B>(a: &[A], b: &[B]) -> Vec<EditOp>
where
    A: AsRef<Token>,
    B: AsRef<Token>,
{
    diff(a, b, |x, y| x.as_ref().is_equivalent(y.as_ref()))
}

/// Diffs `base` against every sequence in `others`, in order.
///
/// With the `parallel` feature and `cfg.use_parallel` set, the diffs run on
/// the rayon pool; the result order is the same either way.
pub fn diff_against_base<T, S>(base: &[T], others: &[S], cfg: &DiffConfig) -> Vec<Vec<EditOp>>
where
    T: AsRef<Token> + Sync,
    S: AsRef<[T]> + Sync,
{
    let span = tracing::span!(
        Level::INFO,
        "diff.against_base",
        base_len = base.len(),
        witnesses = others.len(),
        parallel = cfg.use_parallel
    );
    let _guard = span.enter();
    let start = Instant::now();

    let scripts = run_pairwise(base, others, cfg);

    let total_distance: usize = scripts.iter().map(|ops| edit_distance(ops)).sum();
    info!(
        total_distance,
        elapsed_micros = start.elapsed().as_micros() as u64,
        "pairwise_diffs_done"
    );
    scripts
}

#[cfg(feature = "parallel")]
fn run_pairwise<T, S>(base: &[T], others: &[S], cfg: &DiffConfig) -> Vec<Vec<EditOp>>
where
    T: AsRef<Token> + Sync,
    S: AsRef<[T]> + Sync,
{
    if cfg.use_parallel {
        others
            .par_iter()
            .map(|other| diff_tokens(base, other.as_ref()))
            .collect()
    } else {
        others
            .iter()
            .map(|other| diff_tokens(base, other.as_ref()))
            .collect()
    }
}

#[cfg(not(feature = "parallel"))]
fn run_pairwise<T, S>(base: &[T], others: &[S], _cfg: &DiffConfig) -> Vec<Vec<EditOp>>
where
    T: AsRef<Token> + Sync,
    S: AsRef<[T]> + Sync,
{
    others
        .iter()
        .map(|other| diff_tokens(base, other.as_ref()))
        .collect()
}
