use serde::{Deserialize, Serialize};

use super::FeatureRow;

/// Growth limits for a single regression tree
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreeParams {
    /// Maximum depth; `None` grows until leaves are pure
    pub max_depth: Option<usize>,

    /// Minimum samples a node needs before it may be split
    pub min_samples_split: usize,

    /// Minimum samples each child of a split must keep
    pub min_samples_leaf: usize,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }
}

/// Tree node, stored in a flat arena
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Leaf {
        value: f64,
        samples: usize,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// CART regression tree using the squared-error criterion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

struct Candidate {
    feature: usize,
    threshold: f64,
    sse: f64,
}

impl RegressionTree {
    /// Fit a tree on the rows named by `sample` (indices may repeat)
    pub fn fit(x: &[FeatureRow], y: &[f64], mut sample: Vec<usize>, params: &TreeParams) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        if !sample.is_empty() {
            tree.grow(x, y, &mut sample, 0, params);
        }
        tree
    }

    /// Predict the target for one feature row
    ///
    /// A malformed arena (bad feature index, dangling or backward child)
    /// yields 0 instead of panicking or looping; `validate` reports it.
    pub fn predict(&self, row: &FeatureRow) -> f64 {
        let mut index = 0;
        for _ in 0..=self.nodes.len() {
            match self.nodes.get(index) {
                Some(Node::Leaf { value, .. }) => return *value,
                Some(Node::Split { feature, threshold, left, right }) => {
                    let Some(value) = row.get(*feature) else {
                        return 0.0;
                    };
                    index = if *value <= *threshold { *left } else { *right };
                }
                None => return 0.0,
            }
        }
        0.0
    }

    /// Check the arena invariants of a tree loaded from outside
    ///
    /// Children always sit after their parent and inside the arena, and
    /// split features index into a [`FeatureRow`].
    pub fn validate(&self) -> Result<(), String> {
        let width = FeatureRow::default().len();
        for (index, node) in self.nodes.iter().enumerate() {
            if let Node::Split { feature, threshold, left, right } = node {
                if *feature >= width {
                    return Err(format!("node {} splits on feature {} of {}", index, feature, width));
                }
                if !threshold.is_finite() {
                    return Err(format!("node {} has threshold {}", index, threshold));
                }
                for child in [*left, *right] {
                    if child <= index || child >= self.nodes.len() {
                        return Err(format!("node {} points to child {}", index, child));
                    }
                }
            }
        }
        Ok(())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| matches!(n, Node::Leaf { .. })).count()
    }

    /// Depth of the deepest leaf (a single leaf has depth 0)
    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], index: usize) -> usize {
            match &nodes[index] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, *left).max(walk(nodes, *right)),
            }
        }

        if self.nodes.is_empty() {
            0
        } else {
            walk(&self.nodes, 0)
        }
    }

    fn grow(
        &mut self,
        x: &[FeatureRow],
        y: &[f64],
        indices: &mut [usize],
        depth: usize,
        params: &TreeParams,
    ) -> usize {
        let n = indices.len();
        let mean = indices.iter().map(|&i| y[i]).sum::<f64>() / n as f64;

        let node_id = self.nodes.len();
        self.nodes.push(Node::Leaf { value: mean, samples: n });

        let depth_reached = params.max_depth.is_some_and(|max| depth >= max);
        let pure = indices.iter().all(|&i| (y[i] - mean).abs() <= f64::EPSILON * mean.abs().max(1.0));
        if n < params.min_samples_split || depth_reached || pure {
            return node_id;
        }

        let Some(best) = Self::best_split(x, y, indices, params) else {
            return node_id;
        };

        indices.sort_by(|&a, &b| x[a][best.feature].total_cmp(&x[b][best.feature]));
        let mid = indices.partition_point(|&i| x[i][best.feature] <= best.threshold);

        let (left_indices, right_indices) = indices.split_at_mut(mid);
        let left = self.grow(x, y, left_indices, depth + 1, params);
        let right = self.grow(x, y, right_indices, depth + 1, params);

        self.nodes[node_id] = Node::Split {
            feature: best.feature,
            threshold: best.threshold,
            left,
            right,
        };
        node_id
    }

    /// Exhaustive search over every feature and every boundary between
    /// distinct sorted values, minimizing the children's summed squared error
    fn best_split(x: &[FeatureRow], y: &[f64], indices: &[usize], params: &TreeParams) -> Option<Candidate> {
        let n = indices.len();
        let min_leaf = params.min_samples_leaf.max(1);
        if n < 2 * min_leaf {
            return None;
        }

        let total_sum: f64 = indices.iter().map(|&i| y[i]).sum();
        let total_sq: f64 = indices.iter().map(|&i| y[i] * y[i]).sum();

        let mut best: Option<Candidate> = None;
        let mut sorted = indices.to_vec();

        for feature in 0..x.first().map_or(0, |row| row.len()) {
            sorted.sort_by(|&a, &b| x[a][feature].total_cmp(&x[b][feature]));

            let mut left_sum = 0.0;
            let mut left_sq = 0.0;

            for k in 1..n {
                let prev = sorted[k - 1];
                left_sum += y[prev];
                left_sq += y[prev] * y[prev];

                let lo = x[prev][feature];
                let hi = x[sorted[k]][feature];
                if lo >= hi || k < min_leaf || n - k < min_leaf {
                    continue;
                }

                let right_sum = total_sum - left_sum;
                let right_sq = total_sq - left_sq;
                let left_sse = left_sq - left_sum * left_sum / k as f64;
                let right_sse = right_sq - right_sum * right_sum / (n - k) as f64;
                let sse = left_sse + right_sse;

                if best.as_ref().map_or(true, |b| sse < b.sse) {
                    let mut threshold = lo + (hi - lo) / 2.0;
                    if threshold >= hi {
                        threshold = lo;
                    }
                    best = Some(Candidate { feature, threshold, sse });
                }
            }
        }

        best
    }
}
