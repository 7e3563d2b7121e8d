//! Ordered collections built on a generic binary tree engine.
//!
//! [`BinaryTree`] owns the nodes, as a flat arena addressed by [`NodeId`],
//! and re-establishes a pluggable [`Property`] after every structural edit.
//! [`SearchTree`] keeps items ordered under a [`Comparator`] and hands every
//! edit to a [`Balancer`], of which [`RedBlack`] is the self balancing one.
//! [`Heap`] is a second client of the same engine.

mod depth;
mod error;
mod heap;
mod node;
mod rbt;
mod search;
mod tree;

pub use crate::depth::Depth;
pub use crate::error::Error;
pub use crate::heap::{Heap, HeapOrder};
pub use crate::node::{Arena, Color, Node, NodeId, Side};
pub use crate::rbt::{RedBlack, RedBlackTree};
pub use crate::search::{
    Balancer, BinarySearchTree, Comparator, Edits, Iter, Natural, SearchTree, Stats, Unbalanced,
};
pub use crate::tree::{BinaryTree, Directions, NoProperty, Property};

#[cfg(test)]
mod depth_test;
#[cfg(test)]
mod node_test;
