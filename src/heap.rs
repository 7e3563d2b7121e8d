use std::cmp::Ordering;

use crate::node::{Arena, NodeId};
use crate::search::{Comparator, Natural};
use crate::tree::{BinaryTree, Directions, Property};

/// Heap ordering as a [`Property`]: every node compares less than or
/// equal to its children. Repairs by swapping payloads, one level at a
/// time, and asks the engine to continue where the payload moved.
#[derive(Clone, Default)]
pub struct HeapOrder<C> {
    cmp: C,
}

impl<C> HeapOrder<C> {
    fn less<T>(&self, nodes: &Arena<T>, a: NodeId, b: NodeId) -> bool
    where
        C: Comparator<T>,
    {
        self.cmp.compare(nodes[a].data(), nodes[b].data()) == Ordering::Less
    }

    fn percolate_up<T>(&self, nodes: &mut Arena<T>, node: NodeId) -> Directions
    where
        C: Comparator<T>,
    {
        match nodes[node].parent() {
            Some(parent) if self.less(nodes, node, parent) => {
                nodes.swap_data(node, parent);
                Directions::PARENT
            }
            _ => Directions::NONE,
        }
    }
}

impl<T, C> Property<T> for HeapOrder<C>
where
    C: Comparator<T>,
{
    fn maintain_property_add(&mut self, nodes: &mut Arena<T>, node: NodeId) -> Directions {
        self.percolate_up(nodes, node)
    }

    fn maintain_property_remove(&mut self, nodes: &mut Arena<T>, node: NodeId) -> Directions {
        let dirs = self.percolate_up(nodes, node);
        if !dirs.is_empty() {
            return dirs;
        }

        let (left, right) = (nodes[node].left(), nodes[node].right());
        let (child, dir) = match (left, right) {
            (Some(l), Some(r)) if self.less(nodes, r, l) => (r, Directions::RIGHT),
            (Some(l), _) => (l, Directions::LEFT),
            (None, Some(r)) => (r, Directions::RIGHT),
            (None, None) => return Directions::NONE,
        };
        if self.less(nodes, child, node) {
            nodes.swap_data(node, child);
            dir
        } else {
            Directions::NONE
        }
    }
}

/// Binary min-heap under comparator `C`, laid out as a complete binary
/// tree on [`BinaryTree`].
///
/// ```
/// use rbtree_index::Heap;
///
/// let mut heap: Heap<i32> = Heap::new();
/// heap.push(3);
/// heap.push(1);
/// heap.push(2);
/// assert_eq!(heap.peek(), Some(&1));
/// assert_eq!(heap.into_sorted_vec(), vec![1, 2, 3]);
/// ```
#[derive(Clone)]
pub struct Heap<T, C = Natural> {
    tree: BinaryTree<T, HeapOrder<C>>,
}

impl<T> Heap<T, Natural>
where
    T: Ord,
{
    pub fn new() -> Heap<T, Natural> {
        Heap::with_comparator(Natural)
    }
}

impl<T> Default for Heap<T, Natural>
where
    T: Ord,
{
    fn default() -> Self {
        Heap::new()
    }
}

impl<T, C> Heap<T, C>
where
    C: Comparator<T>,
{
    pub fn with_comparator(cmp: C) -> Heap<T, C> {
        Heap {
            tree: BinaryTree::new(HeapOrder { cmp }),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn clear(&mut self) {
        self.tree.clear()
    }

    /// Smallest item, without removing it.
    pub fn peek(&self) -> Option<&T> {
        self.tree.root().ok()
    }

    pub fn push(&mut self, item: T) {
        self.tree.insert(item);
    }

    /// Remove and return the smallest item.
    pub fn pop(&mut self) -> Option<T> {
        let root = self.tree.root_node()?;
        Some(self.tree.remove(root))
    }

    /// Drain the heap in ascending order.
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut items = Vec::with_capacity(self.len());
        while let Some(item) = self.pop() {
            items.push(item);
        }
        items
    }

    /// The underlying binary tree.
    #[inline]
    pub fn as_tree(&self) -> &BinaryTree<T, HeapOrder<C>> {
        &self.tree
    }
}
