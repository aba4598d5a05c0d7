use thiserror::Error;

/// Misuse of a [`CooperativeDiff`](crate::CooperativeDiff) engine.
///
/// An aborted run is not an error: it resolves to [`Tick::Aborted`](crate::Tick)
/// or to `None` from `calculate`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DiffError {
    #[error("a diff is already running on this engine")]
    AlreadyRunning,
    #[error("no diff is running on this engine")]
    NotRunning,
}
