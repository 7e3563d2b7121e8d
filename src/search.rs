use std::{
    cmp::Ordering,
    collections::BTreeSet,
    iter::FromIterator,
    mem,
};

use log::{debug, trace};
use rand::Rng;

use crate::depth::Depth;
use crate::error::Error;
use crate::node::{Arena, Node, NodeId, Side};
use crate::tree::BinaryTree;

/// Total order used to place items in a [`SearchTree`]. Must return
/// `Ordering::Equal` only for items that are truly equal, such items are
/// treated as duplicates.
pub trait Comparator<T> {
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

/// Natural ordering of `T: Ord`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Natural;

impl<T> Comparator<T> for Natural
where
    T: Ord,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

impl<T, F> Comparator<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

/// Nodes whose parent/child links were altered while balancing.
pub type Edits = BTreeSet<NodeId>;

/// Rebalancing step run by [`SearchTree`] after every ordering-preserving
/// edit.
pub trait Balancer<T> {
    /// Called with the freshly linked leaf, after insertion.
    fn balance_add(&mut self, tree: &mut BinaryTree<T>, node: NodeId) -> Edits;

    /// Called with the node just unlinked from the tree. The node had at
    /// most one child when it was unlinked, and its own links still point
    /// at its former parent and child.
    fn balance_remove(&mut self, tree: &mut BinaryTree<T>, node: NodeId) -> Edits;

    /// Check balancer specific invariants, return black-height if the
    /// balancer maintains one.
    fn validate(&self, _tree: &BinaryTree<T>) -> Result<Option<usize>, Error<T>> {
        Ok(None)
    }
}

/// Balancer that never rebalances, gives a plain binary search tree.
#[derive(Clone, Copy, Debug, Default)]
pub struct Unbalanced;

impl<T> Balancer<T> for Unbalanced {
    fn balance_add(&mut self, _tree: &mut BinaryTree<T>, _node: NodeId) -> Edits {
        Edits::new()
    }

    fn balance_remove(&mut self, _tree: &mut BinaryTree<T>, _node: NodeId) -> Edits {
        Edits::new()
    }
}

/// SearchTree keeps its items in binary-search-tree order, under the
/// injected comparator `C`, and lets balancer `B` restore shape after
/// every edit.
#[derive(Clone)]
pub struct SearchTree<T, C = Natural, B = Unbalanced> {
    name: String,
    tree: BinaryTree<T>,
    cmp: C,
    balancer: B,
}

/// Binary search tree without rebalancing, degenerates into a chain on
/// sorted input.
pub type BinarySearchTree<T, C = Natural> = SearchTree<T, C, Unbalanced>;

/// Different ways to construct a new SearchTree instance.
impl<T, B> SearchTree<T, Natural, B>
where
    T: Ord,
    B: Balancer<T> + Default,
{
    /// Create an empty tree ordered by `T: Ord`, identified by `name`.
    pub fn new<S>(name: S) -> SearchTree<T, Natural, B>
    where
        S: AsRef<str>,
    {
        SearchTree::with_comparator(name, Natural)
    }

    /// Create a new tree and load it with items from `iter`. Items must
    /// be unique.
    pub fn load_from<S, I>(name: S, iter: I) -> Result<SearchTree<T, Natural, B>, Error<T>>
    where
        S: AsRef<str>,
        I: Iterator<Item = T>,
    {
        let mut tree = SearchTree::new(name);
        for item in iter {
            if !tree.add(item) {
                return Err(Error::DuplicateKey);
            }
        }
        Ok(tree)
    }
}

impl<T, C, B> SearchTree<T, C, B>
where
    C: Comparator<T>,
    B: Balancer<T> + Default,
{
    /// Create an empty tree ordered by `cmp`, identified by `name`.
    pub fn with_comparator<S>(name: S, cmp: C) -> SearchTree<T, C, B>
    where
        S: AsRef<str>,
    {
        SearchTree {
            name: name.as_ref().to_string(),
            tree: BinaryTree::default(),
            cmp,
            balancer: Default::default(),
        }
    }
}

/// Maintenance API.
impl<T, C, B> SearchTree<T, C, B> {
    /// Identify this instance.
    #[inline]
    pub fn id(&self) -> String {
        self.name.clone()
    }

    /// Return number of items in this instance.
    #[inline]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Return the item at the root of the tree.
    #[inline]
    pub fn root(&self) -> Result<&T, Error<T>> {
        self.tree.root()
    }

    /// Number of levels in the tree.
    #[inline]
    pub fn height(&self) -> usize {
        self.tree.height()
    }

    /// Remove all items.
    pub fn clear(&mut self) {
        debug!("{} clear {} items", self.name, self.tree.len());
        self.tree.clear()
    }

    /// Return quickly with basic statisics, only entries() method is valid
    /// with this statisics.
    pub fn stats(&self) -> Stats {
        Stats::new(self.tree.len(), mem::size_of::<Node<T>>())
    }

    /// The underlying binary tree.
    #[inline]
    pub fn as_tree(&self) -> &BinaryTree<T> {
        &self.tree
    }

    #[cfg(test)]
    pub(crate) fn as_tree_mut(&mut self) -> &mut BinaryTree<T> {
        &mut self.tree
    }
}

/// Write operations.
impl<T, C, B> SearchTree<T, C, B>
where
    C: Comparator<T>,
    B: Balancer<T>,
{
    /// Add `value` to the tree. Return false, dropping `value`, if an
    /// equal item is already present.
    pub fn add(&mut self, value: T) -> bool {
        match self.insert(value) {
            Some(node) => {
                let edits = self.balancer.balance_add(&mut self.tree, node);
                trace!("{} add {:?} edits {:?}", self.name, node, edits);
                true
            }
            None => false,
        }
    }

    /// Remove item equal to `value`. Return false if not found.
    pub fn remove(&mut self, value: &T) -> bool {
        self.take(value).is_some()
    }

    /// Remove item equal to `value` and return it.
    pub fn take(&mut self, value: &T) -> Option<T> {
        let node = self.unlink(value)?;
        let edits = self.balancer.balance_remove(&mut self.tree, node);
        trace!("{} remove {:?} edits {:?}", self.name, node, edits);
        Some(self.tree.nodes.release(node))
    }

    // plain bst insert, returns the new leaf.
    fn insert(&mut self, value: T) -> Option<NodeId> {
        let (mut parent, mut side) = (None, Side::Left);
        let mut cursor = self.tree.root;
        while let Some(node) = cursor {
            let n = &self.tree.nodes[node];
            side = match self.cmp.compare(&value, n.data()) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => return None,
            };
            parent = Some(node);
            cursor = n.child(side);
        }

        let node = self.tree.nodes.alloc(value);
        self.tree.transplant(parent, side, Some(node));
        self.tree.count += 1;
        Some(node)
    }

    // plain bst delete, returns the node that got detached from the tree.
    // Detached node is not released, its links are intact for balancer.
    fn unlink(&mut self, value: &T) -> Option<NodeId> {
        let target = self.find(value)?;
        let nodes = &mut self.tree.nodes;
        let node = match (nodes[target].left(), nodes[target].right()) {
            (Some(_), Some(right)) => {
                let successor = nodes.first(right);
                nodes.swap_data(target, successor);
                successor
            }
            _ => target,
        };

        let n = &nodes[node];
        let (parent, side, child) = (n.parent(), n.side(), n.left().or(n.right()));
        self.tree.transplant(parent, side, child);
        self.tree.count -= 1;
        Some(node)
    }
}

/// Read operations.
impl<T, C, B> SearchTree<T, C, B>
where
    C: Comparator<T>,
{
    /// Binary search for `value`, return the handle of its node. The
    /// handle stays valid until that item is removed.
    pub fn find(&self, value: &T) -> Option<NodeId> {
        let mut node = self.tree.root;
        while let Some(n) = node {
            let n = &self.tree.nodes[n];
            node = match self.cmp.compare(value, n.data()) {
                Ordering::Less => n.left(),
                Ordering::Greater => n.right(),
                Ordering::Equal => return node,
            };
        }
        None
    }

    pub fn contains(&self, value: &T) -> bool {
        self.find(value).is_some()
    }

    /// Return the stored item equal to `value`.
    pub fn get(&self, value: &T) -> Option<&T> {
        self.find(value)
            .map(|node| self.tree.nodes[node].data())
    }

    /// Smallest item.
    pub fn first(&self) -> Option<&T> {
        let nodes = &self.tree.nodes;
        self.tree.root.map(|root| nodes[nodes.first(root)].data())
    }

    /// Largest item.
    pub fn last(&self) -> Option<&T> {
        let nodes = &self.tree.nodes;
        self.tree.root.map(|root| nodes[nodes.last(root)].data())
    }

    /// Return a random item from this tree.
    pub fn random<R: Rng>(&self, rng: &mut R) -> Option<&T> {
        let nodes = &self.tree.nodes;
        let mut node = self.tree.root?;

        let mut at_depth = rng.gen::<u8>() % 40;
        loop {
            let next = match rng.gen::<u8>() % 2 {
                0 => nodes[node].left(),
                _ => nodes[node].right(),
            };
            match next {
                Some(next) if at_depth > 0 => {
                    at_depth -= 1;
                    node = next;
                }
                _ => break Some(nodes[node].data()),
            }
        }
    }

    /// Iterate over all items in ascending order. Each call starts a fresh
    /// walk.
    pub fn iter(&self) -> Iter<'_, T> {
        let nodes = &self.tree.nodes;
        Iter {
            nodes,
            front: self.tree.root.map(|root| nodes.first(root)),
            back: self.tree.root.map(|root| nodes.last(root)),
            remaining: self.tree.len(),
        }
    }

    /// Validate tree with following rules:
    ///
    /// * Items are in sort-order.
    /// * Number of items matches number of nodes.
    /// * Balancer specific rules, like colour rules for red-black.
    ///
    /// Additionally return full statistics on the tree. Refer to [`Stats`]
    /// for more information.
    pub fn validate(&self) -> Result<Stats, Error<T>>
    where
        T: Clone,
        B: Balancer<T>,
    {
        let res = self.do_validate();
        if let Err(err) = &res {
            debug!("{} validate failed: {}", self.name, err.kind());
        }
        res
    }

    fn do_validate(&self) -> Result<Stats, Error<T>>
    where
        T: Clone,
        B: Balancer<T>,
    {
        let nodes = &self.tree.nodes;
        let mut live = 0;
        let mut prev: Option<&T> = None;
        for item in self.iter() {
            if let Some(prev) = prev {
                if self.cmp.compare(prev, item) != Ordering::Less {
                    return Err(Error::SortError(prev.clone(), item.clone()));
                }
            }
            prev = Some(item);
            live += 1;
        }
        if live != self.tree.len() || nodes.live() != self.tree.len() {
            return Err(Error::CountMismatch(self.tree.len(), live));
        }

        let mut stats = Stats::new(self.tree.len(), mem::size_of::<Node<T>>());
        stats.set_depths(Depth::from_tree(nodes, self.tree.root));
        if let Some(blacks) = self.balancer.validate(&self.tree)? {
            stats.set_blacks(blacks);
        }
        Ok(stats)
    }
}

/// Traversals, visitor is called with (item, visit-index, depth).
impl<T, C, B> SearchTree<T, C, B> {
    pub fn pre_order<F>(&self, visitor: F)
    where
        F: FnMut(&T, usize, usize),
    {
        self.tree.pre_order(visitor)
    }

    /// Visit items in ascending order.
    pub fn in_order<F>(&self, visitor: F)
    where
        F: FnMut(&T, usize, usize),
    {
        self.tree.in_order(visitor)
    }

    /// Visit items in descending order.
    pub fn reverse_in_order<F>(&self, visitor: F)
    where
        F: FnMut(&T, usize, usize),
    {
        self.tree.reverse_in_order(visitor)
    }

    pub fn post_order<F>(&self, visitor: F)
    where
        F: FnMut(&T, usize, usize),
    {
        self.tree.post_order(visitor)
    }

    pub fn level_order<F>(&self, visitor: F)
    where
        F: FnMut(&T, usize, usize),
    {
        self.tree.level_order(visitor)
    }
}

impl<T, B> FromIterator<T> for SearchTree<T, Natural, B>
where
    T: Ord,
    B: Balancer<T> + Default,
{
    /// Duplicate items are skipped.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = SearchTree::new("from-iter");
        iter.into_iter().for_each(|item| {
            tree.add(item);
        });
        tree
    }
}

impl<'a, T, C, B> IntoIterator for &'a SearchTree<T, C, B>
where
    C: Comparator<T>,
{
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

/// Ascending iterator over items of a [`SearchTree`], walks in-order
/// successor links.
pub struct Iter<'a, T> {
    nodes: &'a Arena<T>,
    front: Option<NodeId>,
    back: Option<NodeId>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.front?;
        self.remaining -= 1;
        self.front = self.nodes.find_next_node(node);
        Some(self.nodes[node].data())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.back?;
        self.remaining -= 1;
        self.back = self.nodes.find_previous_node(node);
        Some(self.nodes[node].data())
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

/// Statistics on [`SearchTree`]. Serves two purpose:
///
/// * To get partial but quick statistics via [`SearchTree::stats`] method.
/// * To get full statisics via [`SearchTree::validate`] method.
#[derive(Default, Debug)]
pub struct Stats {
    entries: usize, // number of entries in the tree.
    node_size: usize,
    blacks: Option<usize>,
    depths: Option<Depth>,
}

impl Stats {
    fn new(entries: usize, node_size: usize) -> Stats {
        Stats {
            entries,
            node_size,
            blacks: Default::default(),
            depths: Default::default(),
        }
    }

    #[inline]
    fn set_blacks(&mut self, blacks: usize) {
        self.blacks = Some(blacks)
    }

    #[inline]
    fn set_depths(&mut self, depths: Depth) {
        self.depths = Some(depths)
    }

    /// Return number entries in the tree.
    #[inline]
    pub fn entries(&self) -> usize {
        self.entries
    }

    /// Return node-size, including the link overhead of an arena slot.
    /// Node size varies with the item type.
    #[inline]
    pub fn node_size(&self) -> usize {
        self.node_size
    }

    /// Return number of black nodes from root to any null leaf, only
    /// for red-black trees.
    #[inline]
    pub fn blacks(&self) -> Option<usize> {
        self.blacks
    }

    /// Return [`Depth`] statistics.
    pub fn depths(&self) -> Option<Depth> {
        match &self.depths {
            Some(depths) if depths.samples() > 0 => Some(depths.clone()),
            _ => None,
        }
    }
}
