use std::collections::{BTreeMap, VecDeque};

use log::info;

use crate::node::{Arena, NodeId};
#[allow(unused_imports)]
use crate::SearchTree;

/// Depth calculates minimum, maximum, average and percentile of null-leaf
/// depths in a [`SearchTree`]. A tree with `n` items has `n + 1` null
/// leaves, the empty tree has one at depth 0.
#[derive(Clone, Debug, Default)]
pub struct Depth {
    samples: usize,
    min: usize,
    max: usize,
    total: usize,
    // depth -> number of null leaves at that depth.
    histogram: BTreeMap<usize, usize>,
}

impl Depth {
    /// Walk the tree under `root` breadth first and sample the depth of
    /// every null leaf. Uses a queue, degenerate trees are fine.
    pub(crate) fn from_tree<T>(nodes: &Arena<T>, root: Option<NodeId>) -> Depth {
        let mut depths = Depth::default();
        let mut queue: VecDeque<(Option<NodeId>, usize)> = VecDeque::new();
        queue.push_back((root, 0));
        while let Some((node, depth)) = queue.pop_front() {
            match node {
                None => depths.sample(depth),
                Some(node) => {
                    queue.push_back((nodes[node].left(), depth + 1));
                    queue.push_back((nodes[node].right(), depth + 1));
                }
            }
        }
        depths
    }

    pub(crate) fn sample(&mut self, depth: usize) {
        self.samples += 1;
        self.total += depth;
        if self.samples == 1 || depth < self.min {
            self.min = depth
        }
        self.max = usize::max(self.max, depth);
        *self.histogram.entry(depth).or_insert(0) += 1;
    }

    /// Return number of null leaves sampled.
    pub fn samples(&self) -> usize {
        self.samples
    }

    pub fn min(&self) -> usize {
        self.min
    }

    pub fn max(&self) -> usize {
        self.max
    }

    /// Return the average depth, rounded down.
    pub fn mean(&self) -> usize {
        self.total.checked_div(self.samples).unwrap_or(0)
    }

    /// Smallest depth that covers at least `perc` percent of the null
    /// leaves. Zero when nothing was sampled.
    pub fn percentile(&self, perc: u8) -> usize {
        let want = (self.samples * usize::from(perc.min(100)) + 99) / 100;
        let mut acc = 0;
        for (depth, count) in self.histogram.iter() {
            acc += count;
            if acc >= want {
                return *depth;
            }
        }
        self.max
    }

    /// Return (percentile, depth) for percentiles 90 to 100.
    pub fn percentiles(&self) -> Vec<(u8, usize)> {
        if self.samples == 0 {
            return vec![];
        }
        (90..=100).map(|perc| (perc, self.percentile(perc))).collect()
    }

    /// Log depth statistics at info level.
    pub fn pretty_print(&self, prefix: &str) {
        info!(
            "{}depth (min, mean, max): {:?}",
            prefix,
            (self.min, self.mean(), self.max)
        );
        for (perc, depth) in self.percentiles() {
            info!("{}  {} percentile = {}", prefix, perc, depth);
        }
    }

    /// Convert depth statistics to JSON like text, useful for plotting.
    pub fn json(&self) -> String {
        let ps: Vec<String> = self
            .percentiles()
            .into_iter()
            .map(|(perc, depth)| format!("{}: {}", perc, depth))
            .collect();
        format!(
            "{{ min: {}, mean: {}, max: {}, percentiles: {{ {} }} }}",
            self.min,
            self.mean(),
            self.max,
            ps.join(", ")
        )
    }
}
