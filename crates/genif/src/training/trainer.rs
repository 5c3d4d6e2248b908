//! Forest trainer: one independently seeded tree per task.

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use super::builder::TreeBuilder;
use super::exit::{ExitCondition, NoExit};
use super::logger::{FitLogger, Verbosity};
use super::sampling::{subsample_indices, tree_seed};
use super::split::{RandomPairSplit, SplitStrategy};
use crate::cancel::CancelToken;
use crate::error::{ConfigError, Error};
use crate::measure::Dissimilarity;
use crate::repr::IsolationForest;
use crate::utils::Parallelism;

// =============================================================================
// ForestParams
// =============================================================================

/// Parameters for forest training.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForestParams {
    /// Number of trees.
    pub n_trees: u32,
    /// Requested subsample size; the effective size is `min(subsample_size, n)`.
    pub subsample_size: u32,
    /// Random seed.
    pub seed: u64,
    /// Verbosity level for training output.
    pub verbosity: Verbosity,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            subsample_size: 256,
            seed: 42,
            verbosity: Verbosity::default(),
        }
    }
}

impl ForestParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_trees == 0 {
            return Err(ConfigError::InvalidTreeCount);
        }
        if self.subsample_size < 2 {
            return Err(ConfigError::InvalidSubsampleSize(self.subsample_size));
        }
        Ok(())
    }
}

// =============================================================================
// ForestTrainer
// =============================================================================

/// Isolation forest trainer.
pub struct ForestTrainer<'a, D, S = RandomPairSplit, X = NoExit> {
    measure: &'a D,
    strategy: &'a S,
    exit: &'a X,
    params: ForestParams,
}

impl<'a, D, S: SplitStrategy> ForestTrainer<'a, D, S> {
    pub fn new(measure: &'a D, strategy: &'a S, params: ForestParams) -> Self {
        Self {
            measure,
            strategy,
            exit: &NoExit,
            params,
        }
    }
}

impl<'a, D, S: SplitStrategy, X> ForestTrainer<'a, D, S, X> {
    /// Stop growing nodes early when `exit` says so.
    pub fn with_exit_condition<Y>(self, exit: &'a Y) -> ForestTrainer<'a, D, S, Y> {
        ForestTrainer {
            measure: self.measure,
            strategy: self.strategy,
            exit,
            params: self.params,
        }
    }

    pub fn params(&self) -> &ForestParams {
        &self.params
    }

    /// Train a forest on `items`.
    ///
    /// **Note:** This method does NOT create a thread pool. The caller must set up
    /// parallelism via `rayon::ThreadPool::install()` if desired.
    ///
    /// Tree `i` draws its subsample and every split from a generator seeded
    /// with [`tree_seed`]`(seed, i)`, so the result is the same for any
    /// `parallelism`. `cancel` is checked before each tree.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidConfig`] for invalid params, an empty dataset or one
    ///   with more than `u32::MAX` items
    /// - [`Error::CancellationRequested`] if `cancel` fired
    /// - [`Error::Dissimilarity`] if the measure failed
    /// - [`Error::ExitCondition`] if the exit condition failed
    pub fn train<T>(
        &self,
        items: &[T],
        parallelism: Parallelism,
        cancel: Option<&CancelToken>,
    ) -> Result<IsolationForest<T>, Error<D::Error>>
    where
        T: Clone + Send + Sync,
        D: Dissimilarity<T>,
        X: ExitCondition<T>,
    {
        self.params.validate()?;
        let n_samples = items.len();
        if n_samples == 0 {
            return Err(ConfigError::EmptyDataset.into());
        }
        if u32::try_from(n_samples).is_err() {
            return Err(ConfigError::DatasetTooLarge(n_samples).into());
        }
        let subsample_size = self.params.subsample_size.min(n_samples as u32);

        let mut logger = FitLogger::new(self.params.verbosity);
        logger.start_fit(n_samples, subsample_size, self.params.n_trees);

        let builder =
            TreeBuilder::new(items, self.measure, self.strategy).with_exit_condition(self.exit);
        let seed = self.params.seed;
        let build_tree = |tree_idx: usize| -> Result<_, Error<D::Error>> {
            if cancel.is_some_and(CancelToken::is_cancelled) {
                return Err(Error::CancellationRequested);
            }
            let mut rng = Xoshiro256PlusPlus::seed_from_u64(tree_seed(seed, tree_idx));
            let subset = subsample_indices(n_samples, subsample_size as usize, &mut rng);
            let tree = builder.build(subset, &mut rng)?;
            logger.log_tree(tree_idx, tree.n_nodes(), tree.n_leaves());
            Ok(tree)
        };
        let result = parallelism.maybe_par_try_map(0..self.params.n_trees as usize, build_tree);

        let trees = match result {
            Ok(trees) => trees,
            Err(err) => {
                if err.is_cancelled() {
                    logger.log_cancelled("fit");
                }
                return Err(err);
            }
        };

        let forest = IsolationForest::from_trained(n_samples, subsample_size, trees);
        logger.finish_fit(forest.n_trees(), forest.n_nodes());
        Ok(forest)
    }
}
