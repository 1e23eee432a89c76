use rand::{rngs::StdRng, Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::{
    tree::{RegressionTree, TreeParams},
    FeatureRow,
};

/// Hyper-parameters of the bagged ensemble
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_estimators: usize,
    pub tree: TreeParams,
    pub bootstrap: bool,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            tree: TreeParams::default(),
            bootstrap: true,
            seed: 42,
        }
    }
}

/// Random forest regressor: bootstrap-aggregated regression trees
///
/// Each tree's seed is drawn from a master RNG before any tree is grown, so
/// the fitted forest is identical whether trees are built on one thread or
/// many.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    params: ForestParams,
    trees: Vec<RegressionTree>,
}

impl RandomForest {
    /// Fit on the rayon pool the caller is running in
    pub fn fit(x: &[FeatureRow], y: &[f64], params: ForestParams) -> Self {
        let n = x.len().min(y.len());

        let mut master = StdRng::seed_from_u64(params.seed);
        let tree_seeds: Vec<u64> = (0..params.n_estimators).map(|_| master.gen()).collect();

        let trees = tree_seeds
            .par_iter()
            .map(|&seed| {
                let sample: Vec<usize> = if params.bootstrap && n > 0 {
                    let mut rng = StdRng::seed_from_u64(seed);
                    (0..n).map(|_| rng.gen_range(0..n)).collect()
                } else {
                    (0..n).collect()
                };
                RegressionTree::fit(x, y, sample, &params.tree)
            })
            .collect();

        Self { params, trees }
    }

    /// Mean of the per-tree predictions
    pub fn predict_row(&self, row: &FeatureRow) -> f64 {
        if self.trees.is_empty() {
            return 0.0;
        }
        self.trees.iter().map(|tree| tree.predict(row)).sum::<f64>() / self.trees.len() as f64
    }

    pub fn predict(&self, rows: &[FeatureRow]) -> Vec<f64> {
        rows.iter().map(|row| self.predict_row(row)).collect()
    }

    pub fn n_estimators(&self) -> usize {
        self.trees.len()
    }

    pub fn params(&self) -> &ForestParams {
        &self.params
    }

    /// Validate every tree, naming the first broken one
    pub fn validate(&self) -> Result<(), String> {
        for (index, tree) in self.trees.iter().enumerate() {
            tree.validate().map_err(|reason| format!("tree {}: {}", index, reason))?;
        }
        Ok(())
    }
}
