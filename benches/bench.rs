use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use rbtree_index::{BinarySearchTree, Heap, RedBlackTree};

#[derive(Clone)]
enum TreeEnum {
    RedBlack(RedBlackTree<i32>),
    Plain(BinarySearchTree<i32>),
}

impl TreeEnum {
    fn contains(&self, k: &i32) -> bool {
        match self {
            Self::RedBlack(t) => t.contains(k),
            Self::Plain(t) => t.contains(k),
        }
    }

    fn add(&mut self, k: i32) -> bool {
        match self {
            Self::RedBlack(t) => t.add(k),
            Self::Plain(t) => t.add(k),
        }
    }

    fn remove(&mut self, k: &i32) -> bool {
        match self {
            Self::RedBlack(t) => t.remove(k),
            Self::Plain(t) => t.remove(k),
        }
    }
}

// Plain trees are loaded in level order of a perfect tree, so that both
// variants start out with the same shape and sorted input does not
// degenerate the unbalanced one.
fn level_order_keys(lo: i32, hi: i32, acc: &mut Vec<i32>) {
    let mut queue = std::collections::VecDeque::new();
    queue.push_back((lo, hi));
    while let Some((lo, hi)) = queue.pop_front() {
        if lo > hi {
            continue;
        }
        let mid = lo + (hi - lo) / 2;
        acc.push(mid);
        queue.push_back((lo, mid - 1));
        queue.push_back((mid + 1, hi));
    }
}

fn bench_helper(c: &mut Criterion, name: &str, f: impl Fn(&mut TreeEnum, i32)) {
    let mut group = c.benchmark_group(name);

    for num_levels in [3, 7, 11, 15].iter() {
        let num_nodes = 2i32.pow(*num_levels) - 1;
        let largest = num_nodes - 1;

        let mut keys = vec![];
        level_order_keys(0, largest, &mut keys);
        let rbt: RedBlackTree<i32> = RedBlackTree::load_from("bench", 0..num_nodes).unwrap();
        let bst: BinarySearchTree<i32> =
            BinarySearchTree::load_from("bench", keys.into_iter()).unwrap();

        let tree_tests = vec![
            ("redblack", TreeEnum::RedBlack(rbt)),
            ("plain", TreeEnum::Plain(bst)),
        ];
        for (name, tree) in tree_tests {
            let id = BenchmarkId::new(name, largest);

            group.bench_function(id, |b| {
                b.iter_custom(|iters| {
                    let mut time = std::time::Duration::from_secs(0);
                    for _ in 0..iters {
                        let mut tree = black_box(tree.clone());
                        let instant = std::time::Instant::now();
                        f(&mut tree, black_box(largest));
                        time += instant.elapsed();
                    }
                    time
                })
            });
        }
    }

    group.finish();
}

fn bench_heap(c: &mut Criterion) {
    let mut group = c.benchmark_group("heap");
    for size in [7, 127, 2047].iter() {
        group.bench_with_input(BenchmarkId::new("push-pop", size), size, |b, size| {
            b.iter(|| {
                let mut heap = Heap::new();
                for i in (0..*size).rev() {
                    heap.push(black_box(i));
                }
                while let Some(item) = heap.pop() {
                    black_box(item);
                }
            })
        });
    }
    group.finish();
}

pub fn criterion_benchmark(c: &mut Criterion) {
    bench_helper(c, "contains", |tree, i| {
        black_box(tree.contains(&i));
    });
    bench_helper(c, "remove", |tree, i| {
        tree.remove(&i);
    });
    bench_helper(c, "add", |tree, i| {
        tree.add(i + 1);
    });
    bench_helper(c, "contains-miss", |tree, i| {
        black_box(tree.contains(&(i + 1)));
    });
    bench_helper(c, "remove-miss", |tree, i| {
        tree.remove(&(i + 1));
    });
    bench_heap(c);
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
