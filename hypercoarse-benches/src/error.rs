//! Benchmark setup error type.
//!
//! Lets setup functions propagate failures with `?` instead of panicking
//! inside Criterion closures.

use hypercoarse_core::CoarsenError;

use crate::graph::SyntheticGraphError;

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Synthetic graph generation failed.
    #[error("synthetic graph generation failed: {0}")]
    Synthetic(#[from] SyntheticGraphError),
    /// Building or running a coarsener failed.
    #[error("coarsening failed: {0}")]
    Coarsen(#[from] CoarsenError),
}
