//! genif: Generalized Isolation Forest for Rust.
//!
//! Unsupervised anomaly detection for any item type that comes with a
//! dissimilarity measure: numeric vectors, categorical tuples, strings,
//! graphs or mixed records. Trees split a subsample by picking two reference
//! items and routing everything to the nearer one; items that get isolated
//! after few splits score close to 1.
//!
//! # Key Types
//!
//! - [`GenIFModel`] - Fit a forest and score items
//! - [`GenIFConfig`] - Configuration builder
//! - [`Dissimilarity`] - The measure an item type supplies
//! - [`ForestRegistry`] / [`ForestHandle`] - Handle-based fit / score / release
//!
//! # Example
//!
//! ```
//! use genif::measure::Levenshtein;
//! use genif::{GenIFConfig, GenIFModel};
//!
//! let mut names: Vec<String> = ["alice", "alicia", "alina", "alice", "aline", "alise"]
//!     .iter()
//!     .cycle()
//!     .take(60)
//!     .map(|s| s.to_string())
//!     .collect();
//! names.push("zzzzzzzzzzzzzzzzzz".to_string());
//!
//! let config = GenIFConfig::builder().tree_count(50).build().unwrap();
//! let (_, scores) = GenIFModel::fit_score(&names, Levenshtein, config).unwrap();
//! let outlier = scores[60];
//! assert!(scores[..60].iter().all(|&s| s < outlier));
//! ```

pub mod cancel;
pub mod error;
pub mod inference;
pub mod measure;
pub mod model;
pub mod repr;
pub mod testing;
pub mod training;
pub mod utils;

// =============================================================================
// Convenience Re-exports
// =============================================================================

// High-level model types
pub use model::{ForestHandle, ForestRegistry, GenIFConfig, GenIFModel};

// Errors
pub use error::{ConfigError, Error, MeasureError};

// Measures
pub use measure::Dissimilarity;

// Cooperative cancellation
pub use cancel::CancelToken;

// Shared utilities
pub use utils::{Parallelism, run_with_threads};
