//! GenIF model implementation.
//!
//! High-level wrapper around [`IsolationForest`] with fitting and scoring.
//! Access components via [`forest()`](GenIFModel::forest),
//! [`measure()`](GenIFModel::measure) and [`config()`](GenIFModel::config).

use crate::cancel::CancelToken;
use crate::error::Error;
use crate::inference::Scorer;
use crate::measure::Dissimilarity;
use crate::repr::{ForestValidationError, IsolationForest};
use crate::training::{
    ExitCondition, FitLogger, ForestTrainer, NoExit, RandomPairSplit, SplitStrategy,
};
use crate::utils::{Parallelism, run_with_threads};

use super::GenIFConfig;

/// A fit Generalized Isolation Forest together with its measure.
///
/// The forest holds copies of its split references, so the training data can
/// be dropped as soon as `fit` returns.
///
/// # Example
///
/// ```
/// use genif::measure::Euclidean;
/// use genif::model::{GenIFConfig, GenIFModel};
///
/// let mut items: Vec<[f64; 2]> = (0..200)
///     .map(|i| [(i % 20) as f64 * 0.1, (i / 20) as f64 * 0.1])
///     .collect();
/// items.push([25.0, 25.0]);
///
/// let config = GenIFConfig::builder().tree_count(50).build().unwrap();
/// let model = GenIFModel::fit(&items, Euclidean, config).unwrap();
///
/// let scores = model.score(&items).unwrap();
/// assert!(scores.iter().all(|&s| s > 0.0 && s <= 1.0));
/// assert!(scores[200] > scores[0]);
/// ```
pub struct GenIFModel<T, D> {
    forest: IsolationForest<T>,
    measure: D,
    config: GenIFConfig,
}

impl<T, D> GenIFModel<T, D>
where
    T: Clone + Send + Sync,
    D: Dissimilarity<T>,
{
    /// Fit a model with the default [`RandomPairSplit`] strategy.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidConfig`] for an invalid config or dataset
    /// - [`Error::ThreadPool`] if the requested pool cannot be built
    /// - [`Error::Dissimilarity`] if the measure fails
    pub fn fit(items: &[T], measure: D, config: GenIFConfig) -> Result<Self, Error<D::Error>> {
        let strategy = RandomPairSplit::new(config.max_split_attempts);
        Self::fit_impl(items, measure, &strategy, &NoExit, config, None)
    }

    /// Fit a model whose trees stop growing a node once `exit` fires.
    ///
    /// # Errors
    ///
    /// As [`fit`](Self::fit), plus [`Error::ExitCondition`] if `exit` fails.
    pub fn fit_with_exit_condition<X: ExitCondition<T>>(
        items: &[T],
        measure: D,
        exit: &X,
        config: GenIFConfig,
    ) -> Result<Self, Error<D::Error>> {
        let strategy = RandomPairSplit::new(config.max_split_attempts);
        Self::fit_impl(items, measure, &strategy, exit, config, None)
    }

    /// Fit a model with a custom split strategy.
    ///
    /// `max_split_attempts` in the config only applies to the default strategy.
    pub fn fit_with_strategy<S: SplitStrategy>(
        items: &[T],
        measure: D,
        strategy: &S,
        config: GenIFConfig,
    ) -> Result<Self, Error<D::Error>> {
        Self::fit_impl(items, measure, strategy, &NoExit, config, None)
    }

    /// Fit a model, giving up with [`Error::CancellationRequested`] once
    /// `cancel` fires. Nothing is returned from a cancelled fit.
    pub fn fit_cancellable(
        items: &[T],
        measure: D,
        config: GenIFConfig,
        cancel: &CancelToken,
    ) -> Result<Self, Error<D::Error>> {
        let strategy = RandomPairSplit::new(config.max_split_attempts);
        Self::fit_impl(items, measure, &strategy, &NoExit, config, Some(cancel))
    }

    /// Fit, then score the training items.
    pub fn fit_score(
        items: &[T],
        measure: D,
        config: GenIFConfig,
    ) -> Result<(Self, Vec<f64>), Error<D::Error>> {
        let model = Self::fit(items, measure, config)?;
        let scores = model.score(items)?;
        Ok((model, scores))
    }

    fn fit_impl<S: SplitStrategy, X: ExitCondition<T>>(
        items: &[T],
        measure: D,
        strategy: &S,
        exit: &X,
        config: GenIFConfig,
        cancel: Option<&CancelToken>,
    ) -> Result<Self, Error<D::Error>> {
        config.validate()?;
        let forest = run_with_threads(config.thread_count(), |parallelism| {
            Self::fit_inner(items, &measure, strategy, exit, &config, parallelism, cancel)
        })??;
        Ok(Self {
            forest,
            measure,
            config,
        })
    }

    /// Internal fitting (no thread pool management).
    fn fit_inner<S: SplitStrategy, X: ExitCondition<T>>(
        items: &[T],
        measure: &D,
        strategy: &S,
        exit: &X,
        config: &GenIFConfig,
        parallelism: Parallelism,
        cancel: Option<&CancelToken>,
    ) -> Result<IsolationForest<T>, Error<D::Error>> {
        let trainer = ForestTrainer::new(measure, strategy, config.to_forest_params())
            .with_exit_condition(exit);
        trainer.train(items, parallelism, cancel)
    }

    /// Create a model from a forest, the measure it was fit with and a config.
    ///
    /// The config's thread count and verbosity drive scoring.
    ///
    /// # Errors
    ///
    /// Returns the first structural problem in `forest`.
    pub fn from_parts(
        forest: IsolationForest<T>,
        measure: D,
        config: GenIFConfig,
    ) -> Result<Self, ForestValidationError> {
        forest.validate()?;
        Ok(Self {
            forest,
            measure,
            config,
        })
    }

    /// Decompose into forest, measure and config.
    pub fn into_parts(self) -> (IsolationForest<T>, D, GenIFConfig) {
        (self.forest, self.measure, self.config)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn forest(&self) -> &IsolationForest<T> {
        &self.forest
    }

    pub fn measure(&self) -> &D {
        &self.measure
    }

    pub fn config(&self) -> &GenIFConfig {
        &self.config
    }

    pub fn n_trees(&self) -> usize {
        self.forest.n_trees()
    }

    /// Effective subsample size `m`.
    pub fn subsample_size(&self) -> u32 {
        self.forest.subsample_size()
    }

    pub fn scorer(&self) -> Scorer<'_, T, D> {
        Scorer::new(&self.forest, &self.measure)
    }

    // =========================================================================
    // Scoring
    // =========================================================================

    /// Anomaly scores in (0, 1] for `items`, in input order.
    pub fn score(&self, items: &[T]) -> Result<Vec<f64>, Error<D::Error>> {
        self.score_impl(items, None)
    }

    /// Like [`score`](Self::score), but drops the batch with
    /// [`Error::CancellationRequested`] once `cancel` fires.
    pub fn score_cancellable(
        &self,
        items: &[T],
        cancel: &CancelToken,
    ) -> Result<Vec<f64>, Error<D::Error>> {
        self.score_impl(items, Some(cancel))
    }

    fn score_impl(
        &self,
        items: &[T],
        cancel: Option<&CancelToken>,
    ) -> Result<Vec<f64>, Error<D::Error>> {
        let mut logger = FitLogger::new(self.config.verbosity);
        logger.start_scoring(items.len());
        let scorer = self.scorer();
        let result = run_with_threads(self.config.thread_count(), |parallelism| {
            scorer.score_batch(items, parallelism, cancel)
        })?;
        match &result {
            Ok(scores) => logger.finish_scoring(scores.len()),
            Err(err) if err.is_cancelled() => logger.log_cancelled("score"),
            Err(_) => {}
        }
        result
    }

    /// Score a single item on the calling thread.
    pub fn score_one(&self, item: &T) -> Result<f64, D::Error> {
        self.scorer().score_one(item)
    }

    /// Adjusted path length of `item` in every tree, in tree order.
    pub fn path_lengths(&self, item: &T) -> Result<Vec<f64>, D::Error> {
        self.scorer().path_lengths(item)
    }

    /// Mean adjusted path length of `item`.
    pub fn average_path_length(&self, item: &T) -> Result<f64, D::Error> {
        self.scorer().average_path_length(item)
    }
}

impl<T, D> std::fmt::Debug for GenIFModel<T, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenIFModel")
            .field("n_trees", &self.forest.n_trees())
            .field("n_samples", &self.forest.n_samples())
            .field("subsample_size", &self.forest.subsample_size())
            .field("n_nodes", &self.forest.n_nodes())
            .finish()
    }
}
