//! Error types surfaced by fitting and scoring.
//!
//! [`Error`] is generic over the error type of the dissimilarity measure so a
//! failing measure reaches the caller unchanged. Measures that cannot fail use
//! [`Infallible`], which is also the default parameter.

use std::convert::Infallible;

use crate::model::ForestHandle;

/// Errors returned by the fit and score entry points.
#[derive(Debug, thiserror::Error)]
pub enum Error<E: std::error::Error + 'static = Infallible> {
    /// Fit parameters were rejected before any work started.
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// The handle was never issued by this registry or has been released.
    #[error("{0} is not a live forest of this registry")]
    InvalidHandle(ForestHandle),

    /// The caller's cancel token fired before the batch completed.
    #[error("operation cancelled before completion")]
    CancellationRequested,

    /// The worker pool for a multi-threaded run could not be created.
    #[error("failed to build worker thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// The early-exit condition could not evaluate a node.
    #[error("exit condition failed: {0}")]
    ExitCondition(#[source] MeasureError),

    /// The dissimilarity measure failed; the measure's own error is kept as is.
    #[error(transparent)]
    Dissimilarity(E),
}

impl<E: std::error::Error + 'static> Error<E> {
    /// Returns the measure error, if this is one.
    pub fn into_dissimilarity(self) -> Option<E> {
        match self {
            Self::Dissimilarity(e) => Some(e),
            _ => None,
        }
    }

    /// Returns `true` if the operation stopped because of cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::CancellationRequested)
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// At least one tree is required.
    #[error("tree_count must be at least 1")]
    InvalidTreeCount,

    /// A tree needs at least two items to split.
    #[error("subsample_size must be at least 2, got {0}")]
    InvalidSubsampleSize(u32),

    /// The default split strategy needs at least one draw.
    #[error("max_split_attempts must be at least 1")]
    InvalidSplitAttempts,

    /// Nothing to fit on.
    #[error("dataset must contain at least one item")]
    EmptyDataset,

    /// Item indices are stored as `u32`.
    #[error("dataset has {0} items, at most {max} are supported", max = u32::MAX)]
    DatasetTooLarge(usize),
}

/// Errors raised by the built-in dissimilarity measures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MeasureError {
    /// The two items have a different number of components.
    #[error("dimension mismatch: left item has {left} components, right item has {right}")]
    DimensionMismatch { left: usize, right: usize },

    /// A per-dimension kernel scaling vector does not match the items.
    #[error("kernel scaling vector has {expected} entries but items have {got} components")]
    ScalingMismatch { expected: usize, got: usize },
}
