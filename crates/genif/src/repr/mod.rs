//! Isolation tree and forest storage.
//!
//! Trees are arenas of [`Node`]s addressed by [`NodeId`] (root = 0) plus a
//! table of copied split references addressed by [`RefId`]. Both are frozen
//! once built.

/// Index into a tree's node arena.
pub type NodeId = u32;

/// Index into a tree's split reference table.
pub type RefId = u32;

pub mod forest;
pub mod node;
pub mod tree;

pub use forest::{ForestValidationError, IsolationForest};
pub use node::{Node, SplitReference};
pub use tree::{IsolationTree, LeafVisit, TreeValidationError};
