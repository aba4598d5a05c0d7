use serde::{Deserialize, Serialize};

/// Settings for diffing many witnesses at once.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DiffConfig {
    /// Run the pairwise diffs of [`diff_against_base`](crate::diff_against_base)
    /// on the rayon pool. Ignored without the `parallel` feature.
    pub use_parallel: bool,
}

impl DiffConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parallel(mut self, use_parallel: bool) -> Self {
        self.use_parallel = use_parallel;
        self
    }
}
