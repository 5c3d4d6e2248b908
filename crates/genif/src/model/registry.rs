//! Handle-based access to fit forests.
//!
//! [`ForestRegistry`] owns fit models and hands out opaque [`ForestHandle`]s.
//! A handle is only valid for the registry that issued it and only until it
//! is released; anything else is rejected with [`Error::InvalidHandle`].

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use crate::cancel::CancelToken;
use crate::error::Error;
use crate::measure::Dissimilarity;

use super::{GenIFConfig, GenIFModel};

static NEXT_REGISTRY_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque reference to a forest held by a [`ForestRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ForestHandle {
    registry: u64,
    slot: u64,
}

impl fmt::Display for ForestHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "forest #{} of registry #{}", self.slot, self.registry)
    }
}

/// Owns fit models and resolves handles to them.
///
/// Lookups take a read lock just long enough to clone an [`Arc`], so scoring
/// never holds the lock and may run concurrently with fits and releases.
///
/// ```
/// use genif::measure::Euclidean;
/// use genif::model::{ForestRegistry, GenIFConfig};
///
/// let registry = ForestRegistry::new();
/// let items: Vec<f64> = (0..64).map(f64::from).collect();
/// let config = GenIFConfig::builder().tree_count(10).build().unwrap();
///
/// let handle = registry.fit(&items, Euclidean, config).unwrap();
/// let scores = registry.score(handle, &items).unwrap();
/// assert_eq!(scores.len(), items.len());
///
/// registry.release(handle).unwrap();
/// assert!(registry.score(handle, &items).is_err());
/// ```
pub struct ForestRegistry<T, D> {
    id: u64,
    next_slot: AtomicU64,
    models: RwLock<HashMap<u64, Arc<GenIFModel<T, D>>>>,
}

impl<T, D> ForestRegistry<T, D> {
    pub fn new() -> Self {
        Self {
            id: NEXT_REGISTRY_ID.fetch_add(1, Ordering::Relaxed),
            next_slot: AtomicU64::new(0),
            models: RwLock::new(HashMap::new()),
        }
    }

    /// Number of live forests.
    pub fn len(&self) -> usize {
        self.models
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `handle` refers to a live forest of this registry.
    pub fn contains(&self, handle: ForestHandle) -> bool {
        handle.registry == self.id
            && self
                .models
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .contains_key(&handle.slot)
    }

    /// Take ownership of an already fit model.
    pub fn insert(&self, model: GenIFModel<T, D>) -> ForestHandle {
        let slot = self.next_slot.fetch_add(1, Ordering::Relaxed);
        self.models
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(slot, Arc::new(model));
        ForestHandle {
            registry: self.id,
            slot,
        }
    }

    fn lookup(&self, handle: ForestHandle) -> Option<Arc<GenIFModel<T, D>>> {
        if handle.registry != self.id {
            return None;
        }
        self.models
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&handle.slot)
            .cloned()
    }
}

impl<T, D> ForestRegistry<T, D>
where
    T: Clone + Send + Sync,
    D: Dissimilarity<T>,
{
    /// Fit a forest on `items` and register it.
    pub fn fit(
        &self,
        items: &[T],
        measure: D,
        config: GenIFConfig,
    ) -> Result<ForestHandle, Error<D::Error>> {
        let model = GenIFModel::fit(items, measure, config)?;
        Ok(self.insert(model))
    }

    /// Like [`fit`](Self::fit); a cancelled fit registers nothing.
    pub fn fit_cancellable(
        &self,
        items: &[T],
        measure: D,
        config: GenIFConfig,
        cancel: &CancelToken,
    ) -> Result<ForestHandle, Error<D::Error>> {
        let model = GenIFModel::fit_cancellable(items, measure, config, cancel)?;
        Ok(self.insert(model))
    }

    /// Anomaly scores of `items` under the forest behind `handle`.
    pub fn score(&self, handle: ForestHandle, items: &[T]) -> Result<Vec<f64>, Error<D::Error>> {
        self.get(handle)?.score(items)
    }

    /// Like [`score`](Self::score), checking `cancel` between items.
    pub fn score_cancellable(
        &self,
        handle: ForestHandle,
        items: &[T],
        cancel: &CancelToken,
    ) -> Result<Vec<f64>, Error<D::Error>> {
        self.get(handle)?.score_cancellable(items, cancel)
    }

    /// Shared access to the model behind `handle`.
    pub fn get(&self, handle: ForestHandle) -> Result<Arc<GenIFModel<T, D>>, Error<D::Error>> {
        self.lookup(handle).ok_or(Error::InvalidHandle(handle))
    }

    /// Remove the forest behind `handle` and return it.
    ///
    /// Scoring calls that already resolved the handle finish normally; later
    /// lookups fail with [`Error::InvalidHandle`].
    pub fn release(&self, handle: ForestHandle) -> Result<Arc<GenIFModel<T, D>>, Error<D::Error>> {
        if handle.registry != self.id {
            return Err(Error::InvalidHandle(handle));
        }
        self.models
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&handle.slot)
            .ok_or(Error::InvalidHandle(handle))
    }
}

impl<T, D> Default for ForestRegistry<T, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, D> fmt::Debug for ForestRegistry<T, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForestRegistry")
            .field("id", &self.id)
            .field("n_forests", &self.len())
            .finish()
    }
}
