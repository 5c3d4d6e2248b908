//! Isolation forest storage.

use super::tree::{IsolationTree, TreeValidationError};
use crate::inference::average_path_length;

/// Structural validation errors for [`IsolationForest`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ForestValidationError {
    #[error("forest has no trees")]
    EmptyForest,
    #[error("tree {tree_idx} was built from {got} items, forest expects {expected}")]
    SubsampleSizeMismatch {
        tree_idx: usize,
        expected: u32,
        got: u32,
    },
    #[error("tree {tree_idx}: {error}")]
    InvalidTree {
        tree_idx: usize,
        error: TreeValidationError,
    },
}

/// Ensemble of isolation trees sharing one subsample size.
///
/// Deserialization (with the `serde` feature) runs [`validate`](Self::validate)
/// and fails on any error it reports.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "ForestSchema<T>"))]
pub struct IsolationForest<T> {
    trees: Vec<IsolationTree<T>>,
    n_samples: usize,
    subsample_size: u32,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct ForestSchema<T> {
    trees: Vec<IsolationTree<T>>,
    n_samples: usize,
    subsample_size: u32,
}

#[cfg(feature = "serde")]
impl<T> TryFrom<ForestSchema<T>> for IsolationForest<T> {
    type Error = ForestValidationError;

    fn try_from(schema: ForestSchema<T>) -> Result<Self, Self::Error> {
        let forest = Self {
            trees: schema.trees,
            n_samples: schema.n_samples,
            subsample_size: schema.subsample_size,
        };
        forest.validate()?;
        Ok(forest)
    }
}

impl<T> IsolationForest<T> {
    /// Create an empty forest for a dataset of `n_samples` items and
    /// per-tree subsamples of `subsample_size`.
    pub fn new(n_samples: usize, subsample_size: u32) -> Self {
        Self {
            trees: Vec::new(),
            n_samples,
            subsample_size,
        }
    }

    pub fn with_capacity(n_samples: usize, subsample_size: u32, n_trees: usize) -> Self {
        Self {
            trees: Vec::with_capacity(n_trees),
            n_samples,
            subsample_size,
        }
    }

    /// Append a tree.
    ///
    /// # Errors
    ///
    /// Returns [`ForestValidationError::SubsampleSizeMismatch`] if the tree was
    /// built from a different number of items than the forest's other trees.
    pub fn push_tree(&mut self, tree: IsolationTree<T>) -> Result<(), ForestValidationError> {
        if tree.subsample_size() != self.subsample_size {
            return Err(ForestValidationError::SubsampleSizeMismatch {
                tree_idx: self.trees.len(),
                expected: self.subsample_size,
                got: tree.subsample_size(),
            });
        }
        self.trees.push(tree);
        Ok(())
    }

    /// Assemble a forest from trees the trainer built with `subsample_size`.
    pub(crate) fn from_trained(
        n_samples: usize,
        subsample_size: u32,
        trees: Vec<IsolationTree<T>>,
    ) -> Self {
        Self {
            trees,
            n_samples,
            subsample_size,
        }
    }

    #[inline]
    pub fn trees(&self) -> &[IsolationTree<T>] {
        &self.trees
    }

    #[inline]
    pub fn tree(&self, idx: usize) -> Option<&IsolationTree<T>> {
        self.trees.get(idx)
    }

    #[inline]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Size `n` of the dataset the forest was fit on.
    #[inline]
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    /// Per-tree subsample size `m = min(subsample_size, n)`.
    #[inline]
    pub fn subsample_size(&self) -> u32 {
        self.subsample_size
    }

    /// Score normaliser `c(m)`.
    #[inline]
    pub fn normalizer(&self) -> f64 {
        average_path_length(self.subsample_size)
    }

    /// Total nodes across all trees.
    pub fn n_nodes(&self) -> usize {
        self.trees.iter().map(IsolationTree::n_nodes).sum()
    }

    /// Total split references across all trees.
    pub fn n_references(&self) -> usize {
        self.trees.iter().map(|t| t.references().len()).sum()
    }

    /// Validate structural invariants for this forest and every tree in it.
    pub fn validate(&self) -> Result<(), ForestValidationError> {
        if self.trees.is_empty() {
            return Err(ForestValidationError::EmptyForest);
        }
        for (i, tree) in self.trees.iter().enumerate() {
            if tree.subsample_size() != self.subsample_size {
                return Err(ForestValidationError::SubsampleSizeMismatch {
                    tree_idx: i,
                    expected: self.subsample_size,
                    got: tree.subsample_size(),
                });
            }
            tree.validate()
                .map_err(|e| ForestValidationError::InvalidTree { tree_idx: i, error: e })?;
        }
        Ok(())
    }
}
