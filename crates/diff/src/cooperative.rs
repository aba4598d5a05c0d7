//! Interruptible diff.
//!
//! [`CooperativeDiff`] runs the Myers search one edit distance per
//! [`tick`](CooperativeDiff::tick), so a caller on a busy thread can
//! interleave other work, report progress and give up early.
//!
//! ```text
//! Waiting --start--> Running --tick--> Running
//!                       |                 |
//!                       +--solved/abort---+--> Waiting
//! ```

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::edit::{edit_distance, EditOp};
use crate::error::DiffError;
use crate::myers::MyersSearch;

type Equality<'a, A, B> = Box<dyn FnMut(&A, &B) -> bool + Send + 'a>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiffState {
    Waiting,
    Running,
}

/// Outcome of one [`tick`](CooperativeDiff::tick).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tick {
    /// More ticks are needed.
    Pending,
    Done(Vec<EditOp>),
    /// An abort was requested; the partial search is gone.
    Aborted,
}

/// Requests an abort of whatever run is active on the engine it came from.
///
/// The request is honoured at the start of the next tick, never in the
/// middle of one.
#[derive(Debug, Clone, Default)]
pub struct AbortHandle {
    flag: Arc<AtomicBool>,
}

impl AbortHandle {
    pub fn abort(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_abort_requested(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    fn take(&self) -> bool {
        self.flag.swap(false, Ordering::AcqRel)
    }

    fn clear(&self) {
        self.flag.store(false, Ordering::Release);
    }
}

struct Run<'a, A, B> {
    a: &'a [A],
    b: &'a [B],
    eq: Equality<'a, A, B>,
    search: MyersSearch,
}

/// Single-run diff engine.
///
/// One engine holds at most one active run; starting another while it is
/// running fails with [`DiffError::AlreadyRunning`]. Iteration counters stay
/// readable after the run ends.
pub struct CooperativeDiff<'a, A, B = A> {
    run: Option<Run<'a, A, B>>,
    abort: AbortHandle,
    run_count: u64,
    iterations: usize,
    max_iterations: usize,
}

impl<'a, A, B> CooperativeDiff<'a, A, B> {
    pub fn new() -> Self {
        Self {
            run: None,
            abort: AbortHandle::default(),
            run_count: 0,
            iterations: 0,
            max_iterations: 0,
        }
    }

    pub fn state(&self) -> DiffState {
        if self.run.is_some() {
            DiffState::Running
        } else {
            DiffState::Waiting
        }
    }

    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    /// Ticks completed by the current or last run.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Most ticks the current or last run can take: `|a| + |b| + 1`.
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Runs started on this engine.
    pub fn run_count(&self) -> u64 {
        self.run_count
    }

    pub fn abort_handle(&self) -> AbortHandle {
        self.abort.clone()
    }

    /// Asks the active run to stop at the next tick. Does nothing when the
    /// engine is waiting.
    pub fn abort(&self) {
        if self.is_running() {
            self.abort.abort();
        }
    }

    /// Begins a run. Stale abort requests from before the call are dropped.
    pub fn start<F>(&mut self, a: &'a [A], b: &'a [B], eq: F) -> Result<(), DiffError>
    where
        F: FnMut(&A, &B) -> bool + Send + 'a,
    {
        if self.run.is_some() {
            return Err(DiffError::AlreadyRunning);
        }
        self.abort.clear();
        self.run_count += 1;
        let search = MyersSearch::new(a.len(), b.len());
        self.iterations = 0;
        self.max_iterations = search.max_iterations();
        debug!(
            run = self.run_count,
            n = a.len(),
            m = b.len(),
            max_iterations = self.max_iterations,
            "diff_start"
        );
        self.run = Some(Run {
            a,
            b,
            eq: Box::new(eq),
            search,
        });
        Ok(())
    }

    /// Runs one edit distance of the active search.
    pub fn tick(&mut self) -> Result<Tick, DiffError> {
        let run = self.run.as_mut().ok_or(DiffError::NotRunning)?;

        if self.abort.take() {
            self.run = None;
            debug!(run = self.run_count, iterations = self.iterations, "diff_aborted");
            return Ok(Tick::Aborted);
        }

        let solved = run.search.step(run.a, run.b, &mut run.eq);
        self.iterations = run.search.iterations();
        if !solved {
            return Ok(Tick::Pending);
        }

        let Some(run) = self.run.take() else {
            return Err(DiffError::NotRunning);
        };
        let ops = run.search.into_script();
        debug!(
            run = self.run_count,
            iterations = self.iterations,
            edit_distance = edit_distance(&ops),
            "diff_finished"
        );
        Ok(Tick::Done(ops))
    }

    /// Ticks until the run finishes or is aborted.
    pub fn finish(&mut self) -> Result<Option<Vec<EditOp>>, DiffError> {
        loop {
            match self.tick()? {
                Tick::Pending => {}
                Tick::Done(ops) => return Ok(Some(ops)),
                Tick::Aborted => return Ok(None),
            }
        }
    }

    /// Starts a run and drives it to the end, yielding to the tokio scheduler
    /// after every tick. Resolves to `None` when aborted.
    #[cfg(feature = "async")]
    pub async fn calculate<F>(
        &mut self,
        a: &'a [A],
        b: &'a [B],
        eq: F,
    ) -> Result<Option<Vec<EditOp>>, DiffError>
    where
        F: FnMut(&A, &B) -> bool + Send + 'a,
    {
        self.start(a, b, eq)?;
        loop {
            match self.tick()? {
                Tick::Pending => tokio::task::yield_now().await,
                Tick::Done(ops) => return Ok(Some(ops)),
                Tick::Aborted => return Ok(None),
            }
        }
    }
}

impl<A, B> Default for CooperativeDiff<'_, A, B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, B> fmt::Debug for CooperativeDiff<'_, A, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lengths = self.run.as_ref().map(|r| r.search.lengths());
        f.debug_struct("CooperativeDiff")
            .field("state", &self.state())
            .field("lengths", &lengths)
            .field("run_count", &self.run_count)
            .field("iterations", &self.iterations)
            .field("max_iterations", &self.max_iterations)
            .finish()
    }
}
