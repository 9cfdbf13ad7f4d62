// src/pipeline/forest.rs

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub const N_FEATURES: usize = 2;

/// Model input: `[score, accuracy]`.
pub type Features = [f64; N_FEATURES];

/// Growth limits shared by every tree of a forest.
#[derive(Debug, Clone, Copy)]
pub struct TreeParams {
    /// `None` grows until leaves are pure.
    pub max_depth: Option<usize>,
    /// Nodes with fewer samples become leaves.
    pub min_samples_split: usize,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
        }
    }
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    sse: f64,
    left: Vec<usize>,
    right: Vec<usize>,
}

/// CART regression tree using squared-error splits.
#[derive(Debug, Clone)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

impl RegressionTree {
    /// Grows a tree on the rows of `x`/`y` listed in `samples` (repeats allowed).
    pub fn fit(x: &[Features], y: &[f64], samples: &[usize], params: &TreeParams) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        tree.grow(x, y, samples.to_vec(), 0, params);
        tree
    }

    pub fn predict(&self, features: &Features) -> f64 {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if features[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    #[cfg(test)]
    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn grow(
        &mut self,
        x: &[Features],
        y: &[f64],
        samples: Vec<usize>,
        depth: usize,
        params: &TreeParams,
    ) -> usize {
        let index = self.nodes.len();
        let value = samples.iter().map(|&i| y[i]).sum::<f64>() / samples.len() as f64;
        self.nodes.push(Node::Leaf { value });

        let depth_reached = params.max_depth.is_some_and(|max| depth >= max);
        let pure = samples.iter().all(|&i| y[i] == y[samples[0]]);
        if depth_reached || pure || samples.len() < params.min_samples_split {
            return index;
        }

        let Some(split) = best_split(x, y, &samples) else {
            return index;
        };

        let left = self.grow(x, y, split.left, depth + 1, params);
        let right = self.grow(x, y, split.right, depth + 1, params);
        self.nodes[index] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        index
    }
}

/// Lowest summed squared error over all features and thresholds, if any split separates the samples.
fn best_split(x: &[Features], y: &[f64], samples: &[usize]) -> Option<BestSplit> {
    let n = samples.len();
    let mut best: Option<BestSplit> = None;

    for feature in 0..N_FEATURES {
        let mut sorted = samples.to_vec();
        sorted.sort_by(|&a, &b| x[a][feature].total_cmp(&x[b][feature]));

        let total_sum: f64 = sorted.iter().map(|&i| y[i]).sum();
        let total_sq: f64 = sorted.iter().map(|&i| y[i] * y[i]).sum();
        let mut left_sum = 0.0;
        let mut left_sq = 0.0;

        for k in 1..n {
            let prev = sorted[k - 1];
            left_sum += y[prev];
            left_sq += y[prev] * y[prev];

            let lo = x[prev][feature];
            let hi = x[sorted[k]][feature];
            if lo >= hi {
                continue;
            }

            let right_sum = total_sum - left_sum;
            let right_sq = total_sq - left_sq;
            let sse = (left_sq - left_sum * left_sum / k as f64)
                + (right_sq - right_sum * right_sum / (n - k) as f64);

            if best.as_ref().is_none_or(|b| sse < b.sse) {
                let mut threshold = lo + (hi - lo) / 2.0;
                if threshold >= hi {
                    threshold = lo;
                }
                best = Some(BestSplit {
                    feature,
                    threshold,
                    sse,
                    left: sorted[..k].to_vec(),
                    right: sorted[k..].to_vec(),
                });
            }
        }
    }

    best
}

/// Bagged ensemble of regression trees; predicts the mean of its trees.
#[derive(Debug, Clone)]
pub struct RandomForest {
    trees: Vec<RegressionTree>,
}

impl RandomForest {
    /// Fits `n_trees` trees, each on a bootstrap sample drawn from a seeded generator.
    /// Returns `None` when there is nothing to fit.
    pub fn fit(
        x: &[Features],
        y: &[f64],
        n_trees: usize,
        seed: u64,
        params: &TreeParams,
    ) -> Option<Self> {
        let n = x.len();
        if n == 0 || n != y.len() || n_trees == 0 {
            return None;
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let trees = (0..n_trees)
            .map(|_| {
                let mut tree_rng = ChaCha8Rng::seed_from_u64(rng.r#gen::<u64>());
                let bootstrap: Vec<usize> = (0..n).map(|_| tree_rng.gen_range(0..n)).collect();
                RegressionTree::fit(x, y, &bootstrap, params)
            })
            .collect();

        Some(Self { trees })
    }

    pub fn predict(&self, features: &Features) -> f64 {
        let total: f64 = self.trees.iter().map(|tree| tree.predict(features)).sum();
        total / self.trees.len() as f64
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}
