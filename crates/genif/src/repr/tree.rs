//! Isolation tree storage and traversal.

use super::node::{Node, SplitReference};
use super::{NodeId, RefId};
use crate::inference::average_path_length;
use crate::measure::{Dissimilarity, Side, nearer};

// ============================================================================
// TreeValidationError
// ============================================================================

/// Structural validation errors for [`IsolationTree`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeValidationError {
    /// Tree has no nodes.
    #[error("tree has no nodes")]
    EmptyTree,
    /// A child pointer references an out-of-bounds node.
    #[error("node {node}: {side} child {child} is out of bounds ({n_nodes} nodes)")]
    ChildOutOfBounds {
        node: NodeId,
        side: &'static str,
        child: NodeId,
        n_nodes: usize,
    },
    /// A node references itself as a child.
    #[error("node {node} is its own child")]
    SelfLoop { node: NodeId },
    /// A node was reached by more than one path.
    #[error("node {node} is reachable by more than one path")]
    DuplicateVisit { node: NodeId },
    /// A cycle was detected during traversal.
    #[error("cycle through node {node}")]
    CycleDetected { node: NodeId },
    /// A node exists in storage but is unreachable from the root.
    #[error("node {node} is unreachable from the root")]
    UnreachableNode { node: NodeId },
    /// A split reference id is outside the reference table.
    #[error("node {node}: reference {reference} is out of bounds ({n_references} references)")]
    ReferenceOutOfBounds {
        node: NodeId,
        reference: RefId,
        n_references: usize,
    },
    /// A child is not deeper than its parent.
    #[error("node {node}: child {child} is not deeper than its parent")]
    DepthNotIncreasing { node: NodeId, child: NodeId },
    /// An internal node's size differs from the sum of its children's.
    #[error("node {node}: size {size} but children hold {children}")]
    SizeMismatch { node: NodeId, size: u32, children: u64 },
    /// Leaf sizes do not add up to the subsample size.
    #[error("leaf sizes sum to {got}, expected subsample size {expected}")]
    LeafSizeSum { expected: u32, got: u64 },
}

/// Where an item ended up after descending a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeafVisit {
    pub node: NodeId,
    /// Number of internal nodes evaluated on the way down.
    pub path_length: u32,
    /// Training items that reached the same leaf.
    pub size: u32,
}

// ============================================================================
// IsolationTree
// ============================================================================

/// A randomized binary partition of one subsample.
///
/// Internal nodes carry ids into [`references`](Self::references), which
/// holds copies of the items the split strategy picked, so a tree never
/// borrows the dataset it was fit on.
///
/// With the `serde` feature, deserialization goes through
/// [`from_parts`](Self::from_parts), so a structurally broken tree is
/// rejected by the deserializer and the stopping depth is recomputed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "TreeSchema<T>"))]
pub struct IsolationTree<T> {
    nodes: Box<[Node]>,
    references: Box<[SplitReference<T>]>,
    subsample_size: u32,
    #[cfg_attr(feature = "serde", serde(skip_serializing))]
    max_depth: u32,
}

/// Serialized shape of an [`IsolationTree`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct TreeSchema<T> {
    nodes: Vec<Node>,
    references: Vec<SplitReference<T>>,
    subsample_size: u32,
}

#[cfg(feature = "serde")]
impl<T> TryFrom<TreeSchema<T>> for IsolationTree<T> {
    type Error = TreeValidationError;

    fn try_from(schema: TreeSchema<T>) -> Result<Self, Self::Error> {
        Self::from_parts(schema.nodes, schema.references, schema.subsample_size)
    }
}

impl<T> IsolationTree<T> {
    /// Depth at which building stops: `ceil(log2(m))`, 0 for `m <= 1`.
    #[inline]
    pub fn stopping_depth(subsample_size: u32) -> u32 {
        if subsample_size <= 1 {
            0
        } else {
            u32::BITS - (subsample_size - 1).leading_zeros()
        }
    }

    /// Assemble a tree produced by the builder. Structure is trusted.
    pub(crate) fn from_built(
        nodes: Vec<Node>,
        references: Vec<SplitReference<T>>,
        subsample_size: u32,
    ) -> Self {
        let tree = Self {
            nodes: nodes.into_boxed_slice(),
            references: references.into_boxed_slice(),
            subsample_size,
            max_depth: Self::stopping_depth(subsample_size),
        };
        debug_assert_eq!(tree.validate(), Ok(()));
        tree
    }

    /// Rebuild a tree from its parts, e.g. after external deserialization.
    ///
    /// # Errors
    ///
    /// Returns the first structural problem found by [`validate`](Self::validate).
    pub fn from_parts(
        nodes: Vec<Node>,
        references: Vec<SplitReference<T>>,
        subsample_size: u32,
    ) -> Result<Self, TreeValidationError> {
        let tree = Self {
            nodes: nodes.into_boxed_slice(),
            references: references.into_boxed_slice(),
            subsample_size,
            max_depth: Self::stopping_depth(subsample_size),
        };
        tree.validate()?;
        Ok(tree)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// # Panics
    ///
    /// Panics if `id` is out of bounds.
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id as usize]
    }

    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn references(&self) -> &[SplitReference<T>] {
        &self.references
    }

    /// Number of items `m` the tree was built from.
    #[inline]
    pub fn subsample_size(&self) -> u32 {
        self.subsample_size
    }

    #[inline]
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Leaves with their ids, in arena order.
    pub fn leaves(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.is_leaf())
            .map(|(i, n)| (i as NodeId, n))
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    // =========================================================================
    // Traversal
    // =========================================================================

    /// Walk `item` from the root to its leaf.
    ///
    /// # Errors
    ///
    /// Returns the measure's error unchanged.
    pub fn traverse<D>(&self, measure: &D, item: &T) -> Result<LeafVisit, D::Error>
    where
        D: Dissimilarity<T> + ?Sized,
    {
        let mut node = 0;
        let mut path_length = 0;
        loop {
            match self.nodes[node as usize] {
                Node::Internal {
                    reference_a,
                    reference_b,
                    left,
                    right,
                    ..
                } => {
                    let a = &self.references[reference_a as usize].item;
                    let b = &self.references[reference_b as usize].item;
                    node = match nearer(measure, item, a, b)? {
                        Side::A => left,
                        Side::B => right,
                    };
                    path_length += 1;
                }
                Node::Leaf { size, .. } => {
                    return Ok(LeafVisit {
                        node,
                        path_length,
                        size,
                    });
                }
            }
        }
    }

    /// Path length of `item`, adjusted by `c(size)` for the subtree left
    /// unbuilt below its leaf.
    pub fn path_length<D>(&self, measure: &D, item: &T) -> Result<f64, D::Error>
    where
        D: Dissimilarity<T> + ?Sized,
    {
        let visit = self.traverse(measure, item)?;
        Ok(f64::from(visit.path_length) + average_path_length(visit.size))
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Validate structural invariants.
    ///
    /// Checks that the node graph is a tree rooted at 0, that reference ids
    /// are in bounds, depth grows along every edge, internal sizes equal the
    /// sum of their children and leaf sizes add up to the subsample size.
    pub fn validate(&self) -> Result<(), TreeValidationError> {
        let n_nodes = self.nodes.len();
        if n_nodes == 0 {
            return Err(TreeValidationError::EmptyTree);
        }
        let n_references = self.references.len();

        // Iterative DFS with color marking.
        // 0 = unvisited, 1 = visiting, 2 = done
        let mut color = vec![0u8; n_nodes];
        let mut stack: Vec<(NodeId, u8)> = vec![(0, 0)];
        let mut leaf_total: u64 = 0;

        while let Some((node, phase)) = stack.pop() {
            let node_usize = node as usize;
            if phase == 1 {
                color[node_usize] = 2;
                continue;
            }

            match color[node_usize] {
                0 => {}
                1 => return Err(TreeValidationError::CycleDetected { node }),
                _ => return Err(TreeValidationError::DuplicateVisit { node }),
            }
            color[node_usize] = 1;
            stack.push((node, 1));

            match self.nodes[node_usize] {
                Node::Leaf { size, .. } => leaf_total += u64::from(size),
                Node::Internal {
                    reference_a,
                    reference_b,
                    left,
                    right,
                    size,
                    depth,
                } => {
                    for reference in [reference_a, reference_b] {
                        if reference as usize >= n_references {
                            return Err(TreeValidationError::ReferenceOutOfBounds {
                                node,
                                reference,
                                n_references,
                            });
                        }
                    }
                    if left == node || right == node {
                        return Err(TreeValidationError::SelfLoop { node });
                    }
                    for (side, child) in [("left", left), ("right", right)] {
                        if child as usize >= n_nodes {
                            return Err(TreeValidationError::ChildOutOfBounds {
                                node,
                                side,
                                child,
                                n_nodes,
                            });
                        }
                        if self.nodes[child as usize].depth() <= depth {
                            return Err(TreeValidationError::DepthNotIncreasing { node, child });
                        }
                    }

                    let children = u64::from(self.nodes[left as usize].size())
                        + u64::from(self.nodes[right as usize].size());
                    if children != u64::from(size) {
                        return Err(TreeValidationError::SizeMismatch {
                            node,
                            size,
                            children,
                        });
                    }

                    // Visit children
                    stack.push((right, 0));
                    stack.push((left, 0));
                }
            }
        }

        for (i, &c) in color.iter().enumerate() {
            if c == 0 {
                return Err(TreeValidationError::UnreachableNode { node: i as NodeId });
            }
        }

        if leaf_total != u64::from(self.subsample_size) {
            return Err(TreeValidationError::LeafSizeSum {
                expected: self.subsample_size,
                got: leaf_total,
            });
        }

        Ok(())
    }
}
