//! Builds one isolation tree from a subsample.

use rand::Rng;

use super::exit::{ExitCondition, NoExit};
use super::split::{SplitOutcome, SplitStrategy};
use crate::error::Error;
use crate::measure::Dissimilarity;
use crate::repr::{IsolationTree, Node, NodeId, RefId, SplitReference};

/// Pending work: a node slot, the subset that reaches it, its depth and the
/// item the exit condition compares members against.
struct Pending {
    node: NodeId,
    subset: Vec<u32>,
    depth: u32,
    representative: u32,
}

/// Grows isolation trees over a borrowed dataset.
///
/// Nodes are allocated in an arena as they are discovered and filled in from
/// an explicit work stack, so deep trees never touch the call stack. The left
/// child is always expanded before the right one.
pub struct TreeBuilder<'a, T, D, S, X = NoExit> {
    items: &'a [T],
    measure: &'a D,
    strategy: &'a S,
    exit: &'a X,
}

impl<'a, T, D, S> TreeBuilder<'a, T, D, S> {
    pub fn new(items: &'a [T], measure: &'a D, strategy: &'a S) -> Self {
        Self {
            items,
            measure,
            strategy,
            exit: &NoExit,
        }
    }
}

impl<'a, T, D, S, X> TreeBuilder<'a, T, D, S, X> {
    /// Consult `exit` before splitting each node.
    pub fn with_exit_condition<Y>(self, exit: &'a Y) -> TreeBuilder<'a, T, D, S, Y> {
        TreeBuilder {
            items: self.items,
            measure: self.measure,
            strategy: self.strategy,
            exit,
        }
    }
}

impl<T, D, S, X> TreeBuilder<'_, T, D, S, X>
where
    T: Clone,
    D: Dissimilarity<T>,
    S: SplitStrategy,
    X: ExitCondition<T>,
{
    /// Build a tree over `subset` (indices into the dataset).
    ///
    /// A node becomes a leaf when it holds at most one item, reaches the
    /// stopping depth `ceil(log2(m))`, the exit condition fires, or the
    /// strategy finds its subset homogeneous. The exit condition never draws
    /// from `rng`.
    ///
    /// # Errors
    ///
    /// - [`Error::Dissimilarity`] if the measure failed
    /// - [`Error::ExitCondition`] if the exit condition failed
    pub fn build<R: Rng + ?Sized>(
        &self,
        subset: Vec<u32>,
        rng: &mut R,
    ) -> Result<IsolationTree<T>, Error<D::Error>> {
        let subsample_size = subset.len() as u32;
        let max_depth = IsolationTree::<T>::stopping_depth(subsample_size);

        let mut nodes = vec![Node::Leaf {
            size: subsample_size,
            depth: 0,
        }];
        let mut references: Vec<SplitReference<T>> = Vec::new();
        let representative = subset.first().copied().unwrap_or(0);
        let mut stack = vec![Pending {
            node: 0,
            subset,
            depth: 0,
            representative,
        }];

        while let Some(Pending {
            node,
            subset,
            depth,
            representative,
        }) = stack.pop()
        {
            let size = subset.len() as u32;
            let outcome = if size <= 1
                || depth >= max_depth
                || self
                    .exit
                    .should_stop(self.items, &subset, representative)
                    .map_err(Error::ExitCondition)?
            {
                SplitOutcome::Homogeneous
            } else {
                self.strategy
                    .split(self.items, &subset, self.measure, rng)
                    .map_err(Error::Dissimilarity)?
            };

            let split = match outcome {
                SplitOutcome::Split(split) => split,
                SplitOutcome::Homogeneous => {
                    nodes[node as usize] = Node::Leaf { size, depth };
                    continue;
                }
            };

            let reference_a = self.push_reference(&mut references, split.reference_a);
            let reference_b = self.push_reference(&mut references, split.reference_b);

            let left = nodes.len() as NodeId;
            let right = left + 1;
            let child_depth = depth + 1;
            nodes.push(Node::Leaf {
                size: split.near_a.len() as u32,
                depth: child_depth,
            });
            nodes.push(Node::Leaf {
                size: split.near_b.len() as u32,
                depth: child_depth,
            });
            nodes[node as usize] = Node::Internal {
                reference_a,
                reference_b,
                left,
                right,
                size,
                depth,
            };

            stack.push(Pending {
                node: right,
                subset: split.near_b,
                depth: child_depth,
                representative: split.reference_b,
            });
            stack.push(Pending {
                node: left,
                subset: split.near_a,
                depth: child_depth,
                representative: split.reference_a,
            });
        }

        Ok(IsolationTree::from_built(nodes, references, subsample_size))
    }

    fn push_reference(&self, references: &mut Vec<SplitReference<T>>, source_index: u32) -> RefId {
        let id = references.len() as RefId;
        references.push(SplitReference {
            source_index,
            item: self.items[source_index as usize].clone(),
        });
        id
    }
}
