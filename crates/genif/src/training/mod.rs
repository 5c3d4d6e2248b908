//! Forest construction.
//!
//! - [`ForestTrainer`], [`ForestParams`]: fit a forest on a dataset
//! - [`TreeBuilder`]: grow one tree from a subsample
//! - [`SplitStrategy`], [`RandomPairSplit`], [`FarthestPairSplit`]: reference selection
//! - [`ExitCondition`], [`AverageKernelValue`]: optional early stopping
//! - [`FitLogger`], [`Verbosity`]: structured logging
//! - [`sampling`]: per-tree seeds and subsampling

mod builder;
mod exit;
mod logger;
pub mod sampling;
pub mod split;
mod trainer;

pub use builder::TreeBuilder;
pub use exit::{AverageKernelValue, ExitCondition, NoExit};
pub use logger::{FitLogger, Verbosity};
pub use split::{FarthestPairSplit, RandomPairSplit, Split, SplitOutcome, SplitStrategy};
pub use trainer::{ForestParams, ForestTrainer};
