//! Tree nodes and split references.

use super::{NodeId, RefId};

/// One node of an isolation tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Node {
    /// Routes an item to `left` when it is at least as near to reference A as
    /// to reference B, otherwise to `right`.
    Internal {
        reference_a: RefId,
        reference_b: RefId,
        left: NodeId,
        right: NodeId,
        /// Items of the subsample routed through this node.
        size: u32,
        depth: u32,
    },
    /// Terminal node.
    Leaf { size: u32, depth: u32 },
}

impl Node {
    #[inline]
    pub fn size(&self) -> u32 {
        match *self {
            Node::Internal { size, .. } | Node::Leaf { size, .. } => size,
        }
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        match *self {
            Node::Internal { depth, .. } | Node::Leaf { depth, .. } => depth,
        }
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    /// `(left, right)` for internal nodes.
    #[inline]
    pub fn children(&self) -> Option<(NodeId, NodeId)> {
        match *self {
            Node::Internal { left, right, .. } => Some((left, right)),
            Node::Leaf { .. } => None,
        }
    }

    /// `(reference_a, reference_b)` for internal nodes.
    #[inline]
    pub fn references(&self) -> Option<(RefId, RefId)> {
        match *self {
            Node::Internal {
                reference_a,
                reference_b,
                ..
            } => Some((reference_a, reference_b)),
            Node::Leaf { .. } => None,
        }
    }
}

/// A split reference copied out of the training data.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SplitReference<T> {
    /// Position of the item in the dataset the tree was fit on.
    pub source_index: u32,
    pub item: T,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_accessors() {
        let internal = Node::Internal {
            reference_a: 0,
            reference_b: 1,
            left: 1,
            right: 2,
            size: 7,
            depth: 0,
        };
        assert!(!internal.is_leaf());
        assert_eq!(internal.size(), 7);
        assert_eq!(internal.children(), Some((1, 2)));
        assert_eq!(internal.references(), Some((0, 1)));

        let leaf = Node::Leaf { size: 3, depth: 2 };
        assert!(leaf.is_leaf());
        assert_eq!(leaf.depth(), 2);
        assert_eq!(leaf.children(), None);
        assert_eq!(leaf.references(), None);
    }
}
