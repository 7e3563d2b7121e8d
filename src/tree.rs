use std::{collections::VecDeque, ops::BitOr};

use log::trace;

use crate::error::Error;
use crate::node::{Arena, NodeId, Side};

/// Set of directions, relative to a node, where a structural property
/// is not yet known to hold.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Directions(u8);

impl Directions {
    pub const NONE: Directions = Directions(0);
    pub const PARENT: Directions = Directions(1);
    pub const LEFT: Directions = Directions(2);
    pub const RIGHT: Directions = Directions(4);

    #[inline]
    pub fn contains(self, other: Directions) -> bool {
        (self.0 & other.0) == other.0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Directions {
    type Output = Directions;

    fn bitor(self, rhs: Directions) -> Directions {
        Directions(self.0 | rhs.0)
    }
}

/// Per-node structural invariant, re-established by [`BinaryTree`] after
/// every insert and remove.
///
/// Each hook inspects `node` right after a structural edit, repairs what
/// it can locally, and returns the directions in which the invariant may
/// still be violated. The engine then calls the same hook on each of those
/// neighbours, until every hook returns [`Directions::NONE`].
pub trait Property<T> {
    fn maintain_property_add(&mut self, _nodes: &mut Arena<T>, _node: NodeId) -> Directions {
        Directions::NONE
    }

    fn maintain_property_remove(&mut self, _nodes: &mut Arena<T>, _node: NodeId) -> Directions {
        Directions::NONE
    }
}

/// Property that holds trivially, tree is shaped purely by its insert and
/// remove policies.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProperty;

impl<T> Property<T> for NoProperty {}

/// BinaryTree manages the root pointer, item count and node arena of a
/// binary tree.
///
/// By default new items fill the first open slot of a complete binary
/// tree, and removal swaps the target payload with the last slot before
/// detaching that slot. A [`Property`] strategy is consulted after
/// every such edit.
#[derive(Clone)]
pub struct BinaryTree<T, P = NoProperty> {
    pub(crate) nodes: Arena<T>,
    pub(crate) root: Option<NodeId>,
    pub(crate) count: usize,
    property: P,
}

impl<T, P> Default for BinaryTree<T, P>
where
    P: Default,
{
    fn default() -> Self {
        BinaryTree::new(P::default())
    }
}

impl<T, P> BinaryTree<T, P> {
    pub fn new(property: P) -> BinaryTree<T, P> {
        BinaryTree {
            nodes: Default::default(),
            root: Default::default(),
            count: Default::default(),
            property,
        }
    }

    /// Return number of entries in this tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Return the root node handle, None for an empty tree.
    #[inline]
    pub fn root_node(&self) -> Option<NodeId> {
        self.root
    }

    /// Return payload at the root of the tree.
    pub fn root(&self) -> Result<&T, Error<T>> {
        match self.root {
            Some(root) => Ok(self.nodes[root].data()),
            None => Err(Error::EmptyTree),
        }
    }

    /// The property strategy maintained by this tree.
    #[inline]
    pub fn property(&self) -> &P {
        &self.property
    }

    /// Read access to the nodes of this tree.
    #[inline]
    pub fn nodes(&self) -> &Arena<T> {
        &self.nodes
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.count = 0;
    }

    /// Number of levels in the tree, 0 for an empty tree. Walks level by
    /// level, a degenerate chain does not grow the call stack.
    pub fn height(&self) -> usize {
        let mut queue: VecDeque<(NodeId, usize)> = VecDeque::new();
        queue.extend(self.root.map(|root| (root, 1)));
        let mut height = 0;
        while let Some((node, level)) = queue.pop_front() {
            height = usize::max(height, level);
            let n = &self.nodes[node];
            queue.extend(n.left().map(|left| (left, level + 1)));
            queue.extend(n.right().map(|right| (right, level + 1)));
        }
        height
    }

    /// Rotate left at `n`, see [`Arena::rotate_left`]. Root pointer is
    /// reassigned when `n` was the root, and that is reported back.
    pub fn rotate_left(&mut self, n: NodeId) -> Result<bool, Error<T>> {
        self.rotate(n, Side::Left)
    }

    /// Rotate right at `n`, see [`Arena::rotate_right`].
    pub fn rotate_right(&mut self, n: NodeId) -> Result<bool, Error<T>> {
        self.rotate(n, Side::Right)
    }

    pub(crate) fn rotate(&mut self, n: NodeId, toward: Side) -> Result<bool, Error<T>> {
        let was_root = self.nodes.rotate(n, toward)?;
        if was_root {
            self.root = self.nodes[n].parent();
        }
        trace!("rotate {:?} at {:?} root:{}", toward, n, was_root);
        Ok(was_root)
    }

    /// Hang `child` off `parent` at `side`, or make it the root when
    /// `parent` is None.
    pub(crate) fn transplant(&mut self, parent: Option<NodeId>, side: Side, child: Option<NodeId>) {
        self.nodes.attach(parent, side, child);
        if parent.is_none() {
            self.root = child;
        }
    }
}

/// Complete tree placement and property propagation.
impl<T, P> BinaryTree<T, P>
where
    P: Property<T>,
{
    /// Insert `data` at the first open slot of the complete tree and
    /// re-establish the tree property. Return the node created for data,
    /// although property maintenance may since have moved data elsewhere.
    pub fn insert(&mut self, data: T) -> NodeId {
        let position = self.count + 1;
        let path = slot_path(position);
        let node = self.nodes.alloc(data);
        match path.split_last() {
            Some((side, walk)) => match self.walk(walk) {
                Some(parent) => self.nodes.attach(Some(parent), *side, Some(node)),
                None => panic!("insert(): no open slot at {}, call the programmer", position),
            },
            None => self.transplant(None, Side::Left, Some(node)),
        }
        self.count += 1;

        self.propagate(node, true);
        node
    }

    /// Remove payload at `node`, by moving the payload of the last
    /// complete-tree slot into it and detaching the last slot.
    pub fn remove(&mut self, node: NodeId) -> T {
        let last = match self.walk(&slot_path(self.count)) {
            Some(last) => last,
            None => panic!("remove(): missing last slot {}, call the programmer", self.count),
        };
        self.nodes.swap_data(node, last);
        let (parent, side) = (self.nodes[last].parent(), self.nodes.side(last));
        self.transplant(parent, side, None);
        self.count -= 1;
        let data = self.nodes.release(last);

        if node != last {
            self.propagate(node, false);
        }
        data
    }

    // walk from root along path, None if a link is missing.
    fn walk(&self, path: &[Side]) -> Option<NodeId> {
        let mut node = self.root?;
        for side in path.iter() {
            node = self.nodes[node].child(*side)?;
        }
        Some(node)
    }

    fn propagate(&mut self, node: NodeId, add: bool) {
        let mut worklist = vec![node];
        while let Some(node) = worklist.pop() {
            let dirs = if add {
                self.property.maintain_property_add(&mut self.nodes, node)
            } else {
                self.property.maintain_property_remove(&mut self.nodes, node)
            };
            if dirs.is_empty() {
                continue;
            }
            let n = &self.nodes[node];
            let targets = [
                (Directions::PARENT, n.parent()),
                (Directions::LEFT, n.left()),
                (Directions::RIGHT, n.right()),
            ];
            for (dir, target) in targets.iter() {
                match target {
                    Some(target) if dirs.contains(*dir) => worklist.push(*target),
                    _ => (),
                }
            }
        }
    }
}

// Position `n` (1-based) in a complete binary tree, as the sequence of
// child links from the root. Leading bit of `n` is the root, every bit
// after that picks left (0) or right (1).
pub(crate) fn slot_path(n: usize) -> Vec<Side> {
    if n == 0 {
        return vec![];
    }
    let bits = (std::mem::size_of::<usize>() * 8) - (n.leading_zeros() as usize);
    (0..bits - 1)
        .rev()
        .map(|i| match (n >> i) & 1 {
            0 => Side::Left,
            _ => Side::Right,
        })
        .collect()
}

/// Traversals, visitor is called with (payload, visit-index, depth).
impl<T, P> BinaryTree<T, P> {
    pub fn pre_order<F>(&self, mut visitor: F)
    where
        F: FnMut(&T, usize, usize),
    {
        let mut index = 0;
        self.do_pre_order(self.root, 0, &mut index, &mut visitor)
    }

    pub fn in_order<F>(&self, mut visitor: F)
    where
        F: FnMut(&T, usize, usize),
    {
        let mut index = 0;
        self.do_in_order(self.root, 0, &mut index, &mut visitor, Side::Left)
    }

    pub fn reverse_in_order<F>(&self, mut visitor: F)
    where
        F: FnMut(&T, usize, usize),
    {
        let mut index = 0;
        self.do_in_order(self.root, 0, &mut index, &mut visitor, Side::Right)
    }

    pub fn post_order<F>(&self, mut visitor: F)
    where
        F: FnMut(&T, usize, usize),
    {
        let mut index = 0;
        self.do_post_order(self.root, 0, &mut index, &mut visitor)
    }

    pub fn level_order<F>(&self, mut visitor: F)
    where
        F: FnMut(&T, usize, usize),
    {
        let mut queue: VecDeque<(NodeId, usize)> = VecDeque::new();
        queue.extend(self.root.map(|root| (root, 0)));
        let mut index = 0;
        while let Some((node, depth)) = queue.pop_front() {
            let n = &self.nodes[node];
            visitor(n.data(), index, depth);
            index += 1;
            queue.extend(n.left().map(|left| (left, depth + 1)));
            queue.extend(n.right().map(|right| (right, depth + 1)));
        }
    }

    fn do_pre_order<F>(&self, node: Option<NodeId>, depth: usize, index: &mut usize, visitor: &mut F)
    where
        F: FnMut(&T, usize, usize),
    {
        if let Some(node) = node {
            let n = &self.nodes[node];
            visitor(n.data(), *index, depth);
            *index += 1;
            self.do_pre_order(n.left(), depth + 1, index, visitor);
            self.do_pre_order(n.right(), depth + 1, index, visitor);
        }
    }

    // first is the side visited before the node itself.
    fn do_in_order<F>(
        &self,
        node: Option<NodeId>,
        depth: usize,
        index: &mut usize,
        visitor: &mut F,
        first: Side,
    ) where
        F: FnMut(&T, usize, usize),
    {
        if let Some(node) = node {
            let n = &self.nodes[node];
            self.do_in_order(n.child(first), depth + 1, index, visitor, first);
            visitor(n.data(), *index, depth);
            *index += 1;
            self.do_in_order(n.child(first.opposite()), depth + 1, index, visitor, first);
        }
    }

    fn do_post_order<F>(&self, node: Option<NodeId>, depth: usize, index: &mut usize, visitor: &mut F)
    where
        F: FnMut(&T, usize, usize),
    {
        if let Some(node) = node {
            let n = &self.nodes[node];
            self.do_post_order(n.left(), depth + 1, index, visitor);
            self.do_post_order(n.right(), depth + 1, index, visitor);
            visitor(n.data(), *index, depth);
            *index += 1;
        }
    }
}

