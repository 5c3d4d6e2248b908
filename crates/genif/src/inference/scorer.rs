//! Batch and single-item scoring.

use super::normalize::anomaly_score;
use crate::Parallelism;
use crate::cancel::CancelToken;
use crate::error::Error;
use crate::measure::Dissimilarity;
use crate::repr::IsolationForest;

/// Scores items against a fit forest.
///
/// Borrows the forest and the measure it was fit with. Scoring is pure: the
/// same item always gets the same score, and batch results keep input order
/// regardless of parallelism.
#[derive(Debug)]
pub struct Scorer<'a, T, D> {
    forest: &'a IsolationForest<T>,
    measure: &'a D,
}

impl<T, D> Clone for Scorer<'_, T, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, D> Copy for Scorer<'_, T, D> {}

impl<'a, T, D: Dissimilarity<T>> Scorer<'a, T, D> {
    pub fn new(forest: &'a IsolationForest<T>, measure: &'a D) -> Self {
        Self { forest, measure }
    }

    /// Adjusted path length of `item` in every tree, in tree order.
    pub fn path_lengths(&self, item: &T) -> Result<Vec<f64>, D::Error> {
        self.forest
            .trees()
            .iter()
            .map(|tree| tree.path_length(self.measure, item))
            .collect()
    }

    /// Mean adjusted path length of `item` over the forest.
    ///
    /// Trees are summed in order so the result does not depend on threading.
    pub fn average_path_length(&self, item: &T) -> Result<f64, D::Error> {
        let n_trees = self.forest.n_trees();
        if n_trees == 0 {
            return Ok(0.0);
        }
        let mut total = 0.0;
        for tree in self.forest.trees() {
            total += tree.path_length(self.measure, item)?;
        }
        Ok(total / n_trees as f64)
    }

    /// Anomaly score of one item, in (0, 1].
    pub fn score_one(&self, item: &T) -> Result<f64, D::Error> {
        let mean = self.average_path_length(item)?;
        Ok(anomaly_score(mean, self.forest.subsample_size()))
    }

    /// Score a batch, one task per item.
    ///
    /// `cancel` is polled before each item; once it fires the whole batch is
    /// dropped and [`Error::CancellationRequested`] returned.
    pub fn score_batch(
        &self,
        items: &[T],
        parallelism: Parallelism,
        cancel: Option<&CancelToken>,
    ) -> Result<Vec<f64>, Error<D::Error>>
    where
        T: Sync,
    {
        parallelism.maybe_par_try_map(items, |item| {
            if cancel.is_some_and(CancelToken::is_cancelled) {
                return Err(Error::CancellationRequested);
            }
            self.score_one(item).map_err(Error::Dissimilarity)
        })
    }
}
