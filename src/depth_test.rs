use crate::depth::Depth;
use crate::node::{Arena, NodeId, Side};

#[test]
fn test_depth() {
    let mut depths = Depth::default();
    assert_eq!(depths.samples(), 0);
    assert_eq!(depths.mean(), 0);
    assert_eq!(depths.percentile(99), 0);
    assert!(depths.percentiles().is_empty());

    (0..9).for_each(|_| depths.sample(3));
    depths.sample(4);
    assert_eq!(depths.samples(), 10);
    assert_eq!(depths.min(), 3);
    assert_eq!(depths.max(), 4);
    assert_eq!(depths.mean(), 3);
    assert_eq!(depths.percentile(50), 3);
    assert_eq!(depths.percentile(90), 3);
    assert_eq!(depths.percentile(91), 4);

    let percentiles = depths.percentiles();
    assert_eq!(percentiles.len(), 11);
    assert_eq!(percentiles[0], (90, 3));
    assert_eq!(percentiles[10], (100, 4));

    depths.pretty_print("test ");
    assert_eq!(
        depths.json(),
        "{ min: 3, mean: 3, max: 4, percentiles: { \
         90: 3, 91: 4, 92: 4, 93: 4, 94: 4, 95: 4, 96: 4, 97: 4, 98: 4, 99: 4, 100: 4 } }"
            .to_string()
    );
}

#[test]
fn test_depth_deep() {
    let mut depths = Depth::default();
    depths.sample(300);
    depths.sample(1);
    assert_eq!(depths.min(), 1);
    assert_eq!(depths.max(), 300);
    assert_eq!(depths.percentile(50), 1);
    assert_eq!(depths.percentile(100), 300);
}

#[test]
fn test_from_tree() {
    let depths = Depth::from_tree::<i32>(&Arena::default(), None);
    assert_eq!(depths.samples(), 1);
    assert_eq!(depths.max(), 0);

    //      1
    //     / \
    //    0   2
    //         \
    //          3
    let mut nodes: Arena<i32> = Arena::default();
    let ids: Vec<NodeId> = (0..4).map(|i| nodes.alloc(i)).collect();
    nodes.attach(Some(ids[1]), Side::Left, Some(ids[0]));
    nodes.attach(Some(ids[1]), Side::Right, Some(ids[2]));
    nodes.attach(Some(ids[2]), Side::Right, Some(ids[3]));

    let depths = Depth::from_tree(&nodes, Some(ids[1]));
    assert_eq!(depths.samples(), 5);
    assert_eq!(depths.min(), 2);
    assert_eq!(depths.max(), 3);
    // (2 + 2 + 2 + 3 + 3) / 5
    assert_eq!(depths.mean(), 2);
}
