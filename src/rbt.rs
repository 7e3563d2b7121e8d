//! Red-black balancing for [`SearchTree`].
//!
//! A freshly inserted node is red, and the insert fixup walks upward
//! recolouring until the red node has a black parent, finishing with at
//! most two rotations. After removal the fixup restores black-height on the
//! side that lost a black node, with at most three rotations.

use log::trace;

use crate::error::Error;
use crate::node::{Arena, Color, NodeId, Side};
use crate::search::{Balancer, Edits, Natural, SearchTree};
use crate::tree::BinaryTree;

/// Red-black balancer, plug into [`SearchTree`] to get a self balancing
/// tree. Refer to [`RedBlackTree`].
#[derive(Clone, Copy, Debug, Default)]
pub struct RedBlack;

/// RedBlackTree manage a single instance of in-memory ordered set using
/// [red-black][rbt] tree.
///
/// ```
/// use rbtree_index::RedBlackTree;
///
/// let mut tree: RedBlackTree<i64> = RedBlackTree::new("example");
/// assert!(tree.add(10));
/// assert!(tree.add(20));
/// assert!(!tree.add(10));
/// assert!(tree.contains(&20));
/// assert!(tree.remove(&10));
/// assert_eq!(tree.len(), 1);
/// assert!(tree.validate().is_ok());
/// ```
///
/// [rbt]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree
pub type RedBlackTree<T, C = Natural> = SearchTree<T, C, RedBlack>;

impl<T> Balancer<T> for RedBlack {
    fn balance_add(&mut self, tree: &mut BinaryTree<T>, node: NodeId) -> Edits {
        let mut edits = Edits::new();
        tree.nodes.set_color(node, Color::Red);
        insert_fixup(tree, node, &mut edits);
        edits
    }

    fn balance_remove(&mut self, tree: &mut BinaryTree<T>, node: NodeId) -> Edits {
        let mut edits = Edits::new();
        remove_fixup(tree, node, &mut edits);
        edits
    }

    /// Validate red-black rules:
    ///
    /// * Root is black.
    /// * No red node has a red parent.
    /// * Number of blacks is same on every path from a node to its leaves.
    fn validate(&self, tree: &BinaryTree<T>) -> Result<Option<usize>, Error<T>> {
        if tree.nodes.is_red(tree.root) {
            return Err(Error::RedRoot);
        }
        let blacks = validate_colors(&tree.nodes, tree.root, false)?;
        Ok(Some(blacks))
    }
}

fn insert_fixup<T>(tree: &mut BinaryTree<T>, node: NodeId, edits: &mut Edits) {
    let mut node = node;
    loop {
        let parent = match tree.nodes[node].parent() {
            Some(parent) => parent,
            None => {
                trace!("insert-fixup root {:?}", node);
                tree.nodes.set_color(node, Color::Black);
                return;
            }
        };
        if tree.nodes.is_black(Some(parent)) {
            return;
        }
        let grandparent = match tree.nodes[parent].parent() {
            Some(grandparent) => grandparent,
            None => {
                trace!("insert-fixup red root {:?}", parent);
                tree.nodes.set_color(parent, Color::Black);
                return;
            }
        };

        match tree.nodes.uncle(node) {
            Some(uncle) if tree.nodes.is_red(Some(uncle)) => {
                trace!("insert-fixup red uncle {:?}", uncle);
                tree.nodes.set_color(parent, Color::Black);
                tree.nodes.set_color(uncle, Color::Black);
                tree.nodes.set_color(grandparent, Color::Red);
                node = grandparent;
            }
            _ => {
                // zig-zag is first straightened into the outer shape.
                let side = tree.nodes.side(parent);
                let parent = if tree.nodes.side(node) != side {
                    trace!("insert-fixup inner grandchild {:?}", node);
                    rotate(tree, parent, side, edits);
                    node
                } else {
                    parent
                };
                trace!("insert-fixup outer grandchild, pivot {:?}", parent);
                rotate(tree, grandparent, side.opposite(), edits);
                tree.nodes.set_color(parent, Color::Black);
                tree.nodes.set_color(grandparent, Color::Red);
                return;
            }
        }
    }
}

fn remove_fixup<T>(tree: &mut BinaryTree<T>, node: NodeId, edits: &mut Edits) {
    if tree.nodes.is_red(Some(node)) {
        return;
    }
    // a black node with a single child, that child must be red.
    let n = &tree.nodes[node];
    if let Some(child) = n.left().or(n.right()) {
        trace!("remove-fixup promoted child {:?}", child);
        tree.nodes.set_color(child, Color::Black);
        return;
    }

    let mut node = node;
    loop {
        let parent = match tree.nodes[node].parent() {
            Some(parent) => parent,
            None => return,
        };
        let side = tree.nodes.side(node);

        let mut sibling = sibling_of(&tree.nodes, node);
        if tree.nodes.is_red(Some(sibling)) {
            trace!("remove-fixup red sibling {:?}", sibling);
            tree.nodes.set_color(sibling, Color::Black);
            tree.nodes.set_color(parent, Color::Red);
            rotate(tree, parent, side, edits);
            sibling = sibling_of(&tree.nodes, node);
        }

        let inner = tree.nodes.inner_nibling(node);
        let mut outer = tree.nodes.outer_nibling(node);
        if tree.nodes.is_black(inner) && tree.nodes.is_black(outer) {
            tree.nodes.set_color(sibling, Color::Red);
            if tree.nodes.is_red(Some(parent)) {
                trace!("remove-fixup black niblings, red parent {:?}", parent);
                tree.nodes.set_color(parent, Color::Black);
                return;
            }
            trace!("remove-fixup black niblings, black parent {:?}", parent);
            node = parent;
            continue;
        }

        if tree.nodes.is_black(outer) {
            trace!("remove-fixup red inner nibling {:?}", inner);
            if let Some(inner) = inner {
                tree.nodes.set_color(inner, Color::Black);
            }
            tree.nodes.set_color(sibling, Color::Red);
            rotate(tree, sibling, side.opposite(), edits);
            sibling = sibling_of(&tree.nodes, node);
            outer = tree.nodes.outer_nibling(node);
        }

        trace!("remove-fixup red outer nibling {:?}", outer);
        let color = tree.nodes[parent].color();
        tree.nodes.set_color(sibling, color);
        tree.nodes.set_color(parent, Color::Black);
        if let Some(outer) = outer {
            tree.nodes.set_color(outer, Color::Black);
        }
        rotate(tree, parent, side, edits);
        return;
    }
}

// a black non-root node always has a sibling, otherwise black-height of
// its parent would differ on either side.
fn sibling_of<T>(nodes: &Arena<T>, node: NodeId) -> NodeId {
    match nodes.sibling(node) {
        Some(sibling) => sibling,
        None => panic!("remove_fixup(): {:?} has no sibling, call the programmer", node),
    }
}

// rotate at node, node moving down toward `toward`, and note every node
// whose links change.
fn rotate<T>(tree: &mut BinaryTree<T>, node: NodeId, toward: Side, edits: &mut Edits) {
    let pivot = tree.nodes[node].child(toward.opposite());
    let inner = pivot.and_then(|pivot| tree.nodes[pivot].child(toward));
    let parent = tree.nodes[node].parent();

    if tree.rotate(node, toward).is_err() {
        panic!("rotate(): {:?} at {:?}, call the programmer", toward, node);
    }
    edits.insert(node);
    edits.extend(pivot);
    edits.extend(inner);
    edits.extend(parent);
}

fn validate_colors<T>(
    nodes: &Arena<T>,
    node: Option<NodeId>,
    from_red: bool,
) -> Result<usize, Error<T>> {
    let node = match node {
        Some(node) => node,
        None => return Ok(0),
    };

    let red = nodes.is_red(Some(node));
    if from_red && red {
        return Err(Error::ConsecutiveReds);
    }
    let (left, right) = (nodes[node].left(), nodes[node].right());
    let lblacks = validate_colors(nodes, left, red)?;
    let rblacks = validate_colors(nodes, right, red)?;
    if lblacks != rblacks {
        let err = format!("{:?} left: {} right: {}", node, lblacks, rblacks);
        return Err(Error::UnbalancedBlacks(err));
    }
    Ok(if red { lblacks } else { lblacks + 1 })
}
