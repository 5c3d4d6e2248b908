//! Early-exit conditions: stop growing a node before its stopping depth.
//!
//! The builder asks the condition about every node it would otherwise split,
//! passing the node's representative. The root's representative is the first
//! member of the subsample; a child's is the split reference its members were
//! routed to.
//!
//! - [`NoExit`]: never stops early (default)
//! - [`AverageKernelValue`]: stops once members are, on average, similar
//!   enough to the representative

use crate::error::MeasureError;
use crate::measure::{FeatureVector, Kernel};

/// Decides whether a node becomes a leaf before the usual stopping rules.
pub trait ExitCondition<T>: Send + Sync {
    /// `true` to turn the node holding `subset` into a leaf.
    ///
    /// `subset` holds at least two indices into `items`, and `representative`
    /// is an index into `items`.
    fn should_stop(
        &self,
        items: &[T],
        subset: &[u32],
        representative: u32,
    ) -> Result<bool, MeasureError>;
}

/// Never stops early.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoExit;

impl<T> ExitCondition<T> for NoExit {
    #[inline]
    fn should_stop(&self, _: &[T], _: &[u32], _: u32) -> Result<bool, MeasureError> {
        Ok(false)
    }
}

/// Stops when the mean kernel value between the representative and the
/// node's members reaches `threshold`.
///
/// A threshold of 0 makes every tree a single leaf; a threshold above the
/// kernel's maximum never stops.
///
/// # Example
///
/// ```
/// use genif::measure::{Euclidean, Rbf};
/// use genif::training::AverageKernelValue;
/// use genif::{GenIFConfig, GenIFModel};
///
/// let items: Vec<[f64; 2]> = (0..100).map(|i| [i as f64 * 0.01, 0.0]).collect();
/// let exit = AverageKernelValue::new(Rbf::new(1.0), 0.9);
/// let config = GenIFConfig::builder().tree_count(10).build().unwrap();
/// let gated =
///     GenIFModel::fit_with_exit_condition(&items, Euclidean, &exit, config.clone()).unwrap();
/// let plain = GenIFModel::fit(&items, Euclidean, config).unwrap();
/// assert!(gated.forest().n_nodes() < plain.forest().n_nodes());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AverageKernelValue<K> {
    pub kernel: K,
    pub threshold: f64,
}

impl<K: Kernel> AverageKernelValue<K> {
    pub fn new(kernel: K, threshold: f64) -> Self {
        Self { kernel, threshold }
    }

    /// Mean of `kernel(representative, member)` over `subset`.
    pub fn mean_similarity<V: FeatureVector>(
        &self,
        items: &[V],
        subset: &[u32],
        representative: u32,
    ) -> Result<f64, MeasureError> {
        if subset.is_empty() {
            return Ok(0.0);
        }
        let rep = &items[representative as usize];
        let mut total = 0.0;
        for &idx in subset {
            total += self.kernel.evaluate(rep, &items[idx as usize])?;
        }
        Ok(total / subset.len() as f64)
    }
}

impl<V: FeatureVector, K: Kernel> ExitCondition<V> for AverageKernelValue<K> {
    fn should_stop(
        &self,
        items: &[V],
        subset: &[u32],
        representative: u32,
    ) -> Result<bool, MeasureError> {
        Ok(self.mean_similarity(items, subset, representative)? >= self.threshold)
    }
}
