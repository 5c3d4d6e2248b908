//! High-level GenIF configuration with builder pattern.
//!
//! [`GenIFConfig`] uses the `bon` crate for builder generation, with
//! validation at build time.
//!
//! # Example
//!
//! ```
//! use genif::model::GenIFConfig;
//!
//! // All defaults: 100 trees, subsamples of 256, seed 42
//! let config = GenIFConfig::builder().build().unwrap();
//! assert_eq!(config.tree_count, 100);
//!
//! let config = GenIFConfig::builder()
//!     .tree_count(200)
//!     .subsample_size(512)
//!     .seed(7)
//!     .build()
//!     .unwrap();
//! ```

use std::num::NonZeroUsize;

use bon::Builder;

use crate::error::ConfigError;
use crate::training::{ForestParams, Verbosity};

/// Configuration for fitting a Generalized Isolation Forest.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[builder(
    derive(Clone, Debug),
    finish_fn(vis = "", name = __build_internal)
)]
pub struct GenIFConfig {
    /// Number of trees. Default: 100.
    #[builder(default = 100)]
    pub tree_count: u32,

    /// Items drawn (without replacement) per tree. Default: 256.
    ///
    /// Clamped to the dataset size at fit time.
    #[builder(default = 256)]
    pub subsample_size: u32,

    /// Random seed. Default: 42.
    #[builder(default = 42)]
    pub seed: u64,

    /// Reference draws before a subset is declared homogeneous by the
    /// default split strategy. Default: 10.
    #[builder(default = 10)]
    pub max_split_attempts: u32,

    /// Number of threads. `None` uses all available cores.
    pub n_threads: Option<NonZeroUsize>,

    /// Verbosity level. Default: `Silent`.
    #[builder(default)]
    pub verbosity: Verbosity,
}

/// Custom finishing function that validates the config.
impl<S: gen_i_f_config_builder::IsComplete> GenIFConfigBuilder<S> {
    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any parameter is invalid:
    /// - `tree_count == 0`
    /// - `subsample_size < 2`
    /// - `max_split_attempts == 0`
    pub fn build(self) -> Result<GenIFConfig, ConfigError> {
        let config = self.__build_internal();
        config.validate()?;
        Ok(config)
    }
}

impl GenIFConfig {
    /// Validate the configuration.
    ///
    /// Fit calls this again, so a config assembled field by field cannot
    /// skip the checks.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tree_count == 0 {
            return Err(ConfigError::InvalidTreeCount);
        }
        if self.subsample_size < 2 {
            return Err(ConfigError::InvalidSubsampleSize(self.subsample_size));
        }
        if self.max_split_attempts == 0 {
            return Err(ConfigError::InvalidSplitAttempts);
        }
        Ok(())
    }

    /// Thread count in `run_with_threads` terms (0 = all cores).
    pub fn thread_count(&self) -> usize {
        self.n_threads.map_or(0, NonZeroUsize::get)
    }

    pub(crate) fn to_forest_params(&self) -> ForestParams {
        ForestParams {
            n_trees: self.tree_count,
            subsample_size: self.subsample_size,
            seed: self.seed,
            verbosity: self.verbosity,
        }
    }
}

impl Default for GenIFConfig {
    fn default() -> Self {
        // Builder defaults are valid by construction.
        Self::builder().__build_internal()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GenIFConfig::builder().build().unwrap();
        assert_eq!(config.tree_count, 100);
        assert_eq!(config.subsample_size, 256);
        assert_eq!(config.seed, 42);
        assert_eq!(config.max_split_attempts, 10);
        assert_eq!(config.n_threads, None);
        assert_eq!(config.verbosity, Verbosity::Silent);
        assert_eq!(config, GenIFConfig::default());
        assert_eq!(config.thread_count(), 0);
    }

    #[test]
    fn test_invalid_tree_count() {
        let result = GenIFConfig::builder().tree_count(0).build();
        assert_eq!(result.unwrap_err(), ConfigError::InvalidTreeCount);
    }

    #[test]
    fn test_invalid_subsample_size() {
        for m in [0, 1] {
            let result = GenIFConfig::builder().subsample_size(m).build();
            assert_eq!(result.unwrap_err(), ConfigError::InvalidSubsampleSize(m));
        }
        assert!(GenIFConfig::builder().subsample_size(2).build().is_ok());
    }

    #[test]
    fn test_invalid_split_attempts() {
        let result = GenIFConfig::builder().max_split_attempts(0).build();
        assert_eq!(result.unwrap_err(), ConfigError::InvalidSplitAttempts);
    }

    #[test]
    fn test_hand_built_config_is_rejected() {
        let config = GenIFConfig {
            tree_count: 0,
            ..GenIFConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidTreeCount));
    }

    #[test]
    fn test_threads_and_params() {
        let config = GenIFConfig::builder()
            .n_threads(NonZeroUsize::new(3).unwrap())
            .tree_count(7)
            .seed(1)
            .build()
            .unwrap();
        assert_eq!(config.thread_count(), 3);
        let params = config.to_forest_params();
        assert_eq!(params.n_trees, 7);
        assert_eq!(params.seed, 1);
        assert_eq!(params.subsample_size, 256);
    }
}
