use crate::error::Error;
use crate::node::{Arena, Color, NodeId, Side};

//          4
//        /   \
//       2     6
//      / \   / \
//     1   3 5   7
fn make_arena() -> (Arena<i32>, Vec<NodeId>) {
    let mut nodes: Arena<i32> = Arena::default();
    let ids: Vec<NodeId> = (0..=7).map(|i| nodes.alloc(i)).collect();
    nodes.attach(None, Side::Left, Some(ids[4]));
    nodes.attach(Some(ids[4]), Side::Left, Some(ids[2]));
    nodes.attach(Some(ids[4]), Side::Right, Some(ids[6]));
    nodes.attach(Some(ids[2]), Side::Left, Some(ids[1]));
    nodes.attach(Some(ids[2]), Side::Right, Some(ids[3]));
    nodes.attach(Some(ids[6]), Side::Left, Some(ids[5]));
    nodes.attach(Some(ids[6]), Side::Right, Some(ids[7]));
    (nodes, ids)
}

fn in_order(nodes: &Arena<i32>, root: NodeId) -> Vec<i32> {
    let mut items = vec![];
    let mut node = Some(nodes.first(root));
    while let Some(n) = node {
        items.push(*nodes[n].data());
        node = nodes.find_next_node(n);
    }
    items
}

#[test]
fn test_alloc() {
    let mut nodes: Arena<i32> = Arena::default();
    let a = nodes.alloc(10);
    assert_eq!(nodes.live(), 1);
    assert_eq!(nodes[a].color(), Color::Red);
    assert_eq!(nodes[a].parent(), None);
    assert_eq!(nodes[a].left(), None);
    assert_eq!(nodes[a].right(), None);

    assert_eq!(nodes.release(a), 10);
    assert_eq!(nodes.live(), 0);
    assert!(nodes.get(a).is_none());

    // released slots are recycled.
    let b = nodes.alloc(20);
    assert_eq!(a.index(), b.index());
    assert_eq!(*nodes[b].data(), 20);
}

#[test]
fn test_swap_data() {
    let (mut nodes, ids) = make_arena();
    nodes.swap_data(ids[1], ids[7]);
    assert_eq!(*nodes[ids[1]].data(), 7);
    assert_eq!(*nodes[ids[7]].data(), 1);
    assert_eq!(nodes[ids[1]].parent(), Some(ids[2]));

    nodes.swap_data(ids[3], ids[3]);
    assert_eq!(*nodes[ids[3]].data(), 3);
}

#[test]
fn test_family() {
    let (nodes, ids) = make_arena();

    assert_eq!(nodes.sibling(ids[4]), None);
    assert_eq!(nodes.sibling(ids[2]), Some(ids[6]));
    assert_eq!(nodes.sibling(ids[7]), Some(ids[5]));
    assert_eq!(nodes.grandparent(ids[2]), None);
    assert_eq!(nodes.grandparent(ids[5]), Some(ids[4]));
    assert_eq!(nodes.uncle(ids[1]), Some(ids[6]));
    assert_eq!(nodes.uncle(ids[7]), Some(ids[2]));
    assert_eq!(nodes.uncle(ids[2]), None);
    assert_eq!(nodes.inner_nibling(ids[2]), Some(ids[5]));
    assert_eq!(nodes.outer_nibling(ids[2]), Some(ids[7]));
    assert_eq!(nodes.inner_nibling(ids[6]), Some(ids[3]));
    assert_eq!(nodes.outer_nibling(ids[6]), Some(ids[1]));
    assert_eq!(nodes.inner_nibling(ids[1]), None);
    assert_eq!(nodes.side(ids[1]), Side::Left);
    assert_eq!(nodes.side(ids[3]), Side::Right);
}

#[test]
fn test_family_detached() {
    let (mut nodes, ids) = make_arena();

    // unlink 2 from 4, 2 keeps its own links.
    nodes.attach(Some(ids[4]), Side::Left, None);
    assert_eq!(nodes[ids[4]].left(), None);
    assert_eq!(nodes[ids[2]].parent(), Some(ids[4]));
    assert!(nodes[ids[2]].is_left_child());

    assert_eq!(nodes.sibling(ids[2]), Some(ids[6]));
    assert_eq!(nodes.inner_nibling(ids[2]), Some(ids[5]));
    assert_eq!(nodes.outer_nibling(ids[2]), Some(ids[7]));
    // but the old subtree is no longer reachable from 6's side.
    assert_eq!(nodes.uncle(ids[5]), None);
}

#[test]
fn test_next_previous() {
    let (nodes, ids) = make_arena();
    assert_eq!(nodes.first(ids[4]), ids[1]);
    assert_eq!(nodes.last(ids[4]), ids[7]);
    assert_eq!(in_order(&nodes, ids[4]), vec![1, 2, 3, 4, 5, 6, 7]);

    assert_eq!(nodes.find_next_node(ids[3]), Some(ids[4]));
    assert_eq!(nodes.find_next_node(ids[4]), Some(ids[5]));
    assert_eq!(nodes.find_next_node(ids[7]), None);
    assert_eq!(nodes.find_previous_node(ids[5]), Some(ids[4]));
    assert_eq!(nodes.find_previous_node(ids[4]), Some(ids[3]));
    assert_eq!(nodes.find_previous_node(ids[1]), None);
}

#[test]
fn test_rotate() {
    let (mut nodes, ids) = make_arena();

    // rotate at the root, promoted node must become the new root.
    assert_eq!(nodes.rotate_left(ids[4]), Ok(true));
    assert_eq!(nodes[ids[6]].parent(), None);
    assert_eq!(nodes[ids[6]].left(), Some(ids[4]));
    assert_eq!(nodes[ids[4]].right(), Some(ids[5]));
    assert_eq!(nodes[ids[5]].parent(), Some(ids[4]));
    assert!(!nodes[ids[5]].is_left_child());
    assert!(nodes[ids[4]].is_left_child());
    assert_eq!(in_order(&nodes, ids[6]), vec![1, 2, 3, 4, 5, 6, 7]);

    // rotate below the root.
    assert_eq!(nodes.rotate_right(ids[4]), Ok(false));
    assert_eq!(nodes[ids[6]].left(), Some(ids[2]));
    assert_eq!(nodes[ids[2]].parent(), Some(ids[6]));
    assert_eq!(nodes[ids[2]].right(), Some(ids[4]));
    assert_eq!(nodes[ids[4]].left(), Some(ids[3]));
    assert_eq!(in_order(&nodes, ids[6]), vec![1, 2, 3, 4, 5, 6, 7]);
}

#[test]
fn test_rotate_invalid() {
    let (mut nodes, ids) = make_arena();
    match nodes.rotate_left(ids[7]) {
        Err(Error::InvalidRotation(_)) => (),
        res => panic!("unexpected {:?}", res),
    }
    match nodes.rotate_right(ids[1]) {
        Err(Error::InvalidRotation(_)) => (),
        res => panic!("unexpected {:?}", res),
    }
    // failed rotation leaves links untouched.
    assert_eq!(nodes[ids[7]].parent(), Some(ids[6]));
    assert_eq!(in_order(&nodes, ids[4]), vec![1, 2, 3, 4, 5, 6, 7]);
}

#[test]
fn test_colors() {
    let (mut nodes, ids) = make_arena();
    assert!(nodes.is_black(None));
    assert!(!nodes.is_red(None));
    assert!(nodes.is_red(Some(ids[3])));
    nodes.set_color(ids[3], Color::Black);
    assert!(nodes.is_black(Some(ids[3])));
    assert!(nodes[ids[3]].is_black());
}
