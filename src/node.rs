use std::{
    mem,
    ops::{Index, IndexMut},
};

use crate::error::Error;

/// Handle to a node slot inside an [`Arena`]. Handles stay valid until
/// the node is removed from its tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Return the slot index backing this handle.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Colour of a node, only interpreted by the red-black balancer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

/// Which child link of a parent a node hangs off, also used as rotation
/// direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Node corresponds to a single entry in a tree.
#[derive(Clone)]
pub struct Node<T> {
    data: T,
    parent: Option<NodeId>,
    left: Option<NodeId>,
    right: Option<NodeId>,
    // survives unlinking, family queries on a detached node depend on it.
    is_left: bool,
    color: Color,
}

impl<T> Node<T> {
    fn new(data: T) -> Node<T> {
        Node {
            data,
            parent: None,
            left: None,
            right: None,
            is_left: false,
            color: Color::Red,
        }
    }

    #[inline]
    pub fn data(&self) -> &T {
        &self.data
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    pub fn left(&self) -> Option<NodeId> {
        self.left
    }

    #[inline]
    pub fn right(&self) -> Option<NodeId> {
        self.right
    }

    #[inline]
    pub fn child(&self, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    /// Side of the parent this node hangs off. For the root, and for a
    /// node detached from the root position, this is `Side::Right`.
    #[inline]
    pub fn side(&self) -> Side {
        if self.is_left {
            Side::Left
        } else {
            Side::Right
        }
    }

    #[inline]
    pub fn is_left_child(&self) -> bool {
        self.is_left
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn is_black(&self) -> bool {
        self.color == Color::Black
    }

    #[inline]
    fn set_child(&mut self, side: Side, child: Option<NodeId>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }
}

/// Arena holds every node of a tree in a flat vector, links between
/// nodes are [`NodeId`] indices. Freed slots are recycled.
#[derive(Clone)]
pub struct Arena<T> {
    slots: Vec<Option<Node<T>>>,
    free: Vec<usize>,
    live: usize,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Arena {
            slots: Default::default(),
            free: Default::default(),
            live: Default::default(),
        }
    }
}

impl<T> Index<NodeId> for Arena<T> {
    type Output = Node<T>;

    fn index(&self, id: NodeId) -> &Node<T> {
        match self.slots.get(id.0) {
            Some(Some(node)) => node,
            _ => panic!("index(): stale node handle {:?}", id),
        }
    }
}

impl<T> IndexMut<NodeId> for Arena<T> {
    fn index_mut(&mut self, id: NodeId) -> &mut Node<T> {
        match self.slots.get_mut(id.0) {
            Some(Some(node)) => node,
            _ => panic!("index_mut(): stale node handle {:?}", id),
        }
    }
}

/// Allocation and payload operations.
impl<T> Arena<T> {
    /// Return number of allocated nodes, including nodes detached from
    /// the tree but not yet released.
    #[inline]
    pub fn live(&self) -> usize {
        self.live
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&Node<T>> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    // new nodes are red and unlinked.
    pub(crate) fn alloc(&mut self, data: T) -> NodeId {
        let node = Some(Node::new(data));
        self.live += 1;
        match self.free.pop() {
            Some(index) => {
                self.slots[index] = node;
                NodeId(index)
            }
            None => {
                self.slots.push(node);
                NodeId(self.slots.len() - 1)
            }
        }
    }

    pub(crate) fn release(&mut self, id: NodeId) -> T {
        match self.slots.get_mut(id.0).and_then(Option::take) {
            Some(node) => {
                self.live -= 1;
                self.free.push(id.0);
                node.data
            }
            None => panic!("release(): stale node handle {:?}", id),
        }
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.live = 0;
    }

    /// Exchange payloads of two nodes, links are left untouched.
    pub(crate) fn swap_data(&mut self, a: NodeId, b: NodeId) {
        if a == b {
            return;
        }
        let (lo, hi) = if a.0 < b.0 { (a.0, b.0) } else { (b.0, a.0) };
        let (head, tail) = self.slots.split_at_mut(hi);
        match (head.get_mut(lo), tail.first_mut()) {
            (Some(Some(x)), Some(Some(y))) => mem::swap(&mut x.data, &mut y.data),
            _ => panic!("swap_data(): stale node handle {:?} {:?}", a, b),
        }
    }

    #[inline]
    pub(crate) fn set_color(&mut self, id: NodeId, color: Color) {
        self[id].color = color
    }

    /// Absent nodes count as black.
    #[inline]
    pub fn is_red(&self, id: Option<NodeId>) -> bool {
        id.map_or(false, |id| !self[id].is_black())
    }

    #[inline]
    pub fn is_black(&self, id: Option<NodeId>) -> bool {
        id.map_or(true, |id| self[id].is_black())
    }
}

/// Link primitives.
impl<T> Arena<T> {
    /// Hang `child` off `parent` at `side`. When `parent` is None,
    /// `child` becomes a root, caller must update the root pointer.
    pub(crate) fn attach(&mut self, parent: Option<NodeId>, side: Side, child: Option<NodeId>) {
        if let Some(parent) = parent {
            self[parent].set_child(side, child);
        }
        if let Some(child) = child {
            let node = &mut self[child];
            node.parent = parent;
            node.is_left = parent.is_some() && side == Side::Left;
        }
    }

    //              (p)                       (p)
    //               |                         |
    //               n                         x
    //              / \                       / \
    //             /   \                     /   \
    //          left    x                   n     xr
    //                 / \                 / \
    //               xl   xr            left  xl
    //
    /// Promote `n.right` into the position of `n`. Return true when `n`
    /// was the root, in which case the caller must reassign its root
    /// pointer to the promoted node.
    pub fn rotate_left(&mut self, n: NodeId) -> Result<bool, Error<T>> {
        self.rotate(n, Side::Left)
    }

    //              (p)                       (p)
    //               |                         |
    //               n                         x
    //              / \                       / \
    //             /   \                     /   \
    //            x    right               xl     n
    //           / \                             / \
    //         xl   xr                         xr   right
    //
    /// Mirror of [`Arena::rotate_left`], promotes `n.left`.
    pub fn rotate_right(&mut self, n: NodeId) -> Result<bool, Error<T>> {
        self.rotate(n, Side::Right)
    }

    /// Rotate so that `n` moves down to `toward`, its child on the
    /// opposite side taking its place.
    pub(crate) fn rotate(&mut self, n: NodeId, toward: Side) -> Result<bool, Error<T>> {
        let from = toward.opposite();
        let x = match self[n].child(from) {
            Some(x) => x,
            None => {
                let msg = format!("{:?} at {:?} has no {:?} child", toward, n, from);
                return Err(Error::InvalidRotation(msg));
            }
        };
        let (parent, side) = (self[n].parent, self[n].side());
        let inner = self[x].child(toward);

        self.attach(Some(n), from, inner);
        self.attach(parent, side, Some(x));
        self.attach(Some(x), toward, Some(n));
        Ok(parent.is_none())
    }
}

/// Family queries. These read the links of `n` and its relatives and never
/// modify them. A node just unlinked from the tree still answers them
/// relative to its former position, using its stale parent link and its
/// retained left-child flag.
impl<T> Arena<T> {
    #[inline]
    pub fn side(&self, n: NodeId) -> Side {
        self[n].side()
    }

    pub fn grandparent(&self, n: NodeId) -> Option<NodeId> {
        self[n].parent.and_then(|p| self[p].parent)
    }

    pub fn sibling(&self, n: NodeId) -> Option<NodeId> {
        let side = self[n].side().opposite();
        self[n].parent.and_then(|p| self[p].child(side))
    }

    pub fn uncle(&self, n: NodeId) -> Option<NodeId> {
        self[n].parent.and_then(|p| self.sibling(p))
    }

    /// Child of the sibling nearer to `n`.
    pub fn inner_nibling(&self, n: NodeId) -> Option<NodeId> {
        let side = self[n].side();
        self.sibling(n).and_then(|s| self[s].child(side))
    }

    /// Child of the sibling farther from `n`.
    pub fn outer_nibling(&self, n: NodeId) -> Option<NodeId> {
        let side = self[n].side().opposite();
        self.sibling(n).and_then(|s| self[s].child(side))
    }
}

/// In-order navigation.
impl<T> Arena<T> {
    /// Left most node under `n`, including `n` itself.
    pub fn first(&self, mut n: NodeId) -> NodeId {
        while let Some(left) = self[n].left {
            n = left;
        }
        n
    }

    /// Right most node under `n`, including `n` itself.
    pub fn last(&self, mut n: NodeId) -> NodeId {
        while let Some(right) = self[n].right {
            n = right;
        }
        n
    }

    /// In-order successor of `n`.
    pub fn find_next_node(&self, n: NodeId) -> Option<NodeId> {
        if let Some(right) = self[n].right {
            return Some(self.first(right));
        }
        let mut n = n;
        loop {
            match self[n].parent {
                Some(parent) if self[n].is_left => break Some(parent),
                Some(parent) => n = parent,
                None => break None,
            }
        }
    }

    /// In-order predecessor of `n`.
    pub fn find_previous_node(&self, n: NodeId) -> Option<NodeId> {
        if let Some(left) = self[n].left {
            return Some(self.last(left));
        }
        let mut n = n;
        loop {
            match self[n].parent {
                Some(parent) if !self[n].is_left => break Some(parent),
                Some(parent) => n = parent,
                None => break None,
            }
        }
    }
}
