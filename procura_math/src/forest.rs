//! Random forest regressor
//!
//! Each tree is grown on a bootstrap resample of the training rows; the
//! forest prediction is the mean of the tree predictions.

use crate::tree::{validate_training_data, RegressionTree, TreeParams};
use crate::{MathError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Ensemble settings
#[derive(Debug, Clone, PartialEq)]
pub struct ForestParams {
    /// Number of trees
    pub n_estimators: usize,
    /// Growth limits applied to every tree
    pub tree: TreeParams,
    /// Resample rows with replacement for each tree
    pub bootstrap: bool,
    /// Seed for reproducible training; `None` draws from OS entropy
    pub seed: Option<u64>,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            tree: TreeParams::default(),
            bootstrap: true,
            seed: None,
        }
    }
}

/// Fitted random forest regressor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    trees: Vec<RegressionTree>,
    n_features: usize,
}

impl RandomForest {
    /// Train a forest using the seed in `params`
    pub fn fit(features: &[Vec<f64>], targets: &[f64], params: &ForestParams) -> Result<Self> {
        let mut rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::fit_with_rng(features, targets, params, &mut rng)
    }

    /// Train a forest drawing all randomness from `rng`
    pub fn fit_with_rng<R: Rng>(
        features: &[Vec<f64>],
        targets: &[f64],
        params: &ForestParams,
        rng: &mut R,
    ) -> Result<Self> {
        if params.n_estimators == 0 {
            return Err(MathError::InvalidInput(
                "A forest needs at least one tree".to_string(),
            ));
        }
        let n_features = validate_training_data(features, targets)?;

        let n_rows = targets.len();
        let mut trees = Vec::with_capacity(params.n_estimators);
        for _ in 0..params.n_estimators {
            let rows: Vec<usize> = if params.bootstrap {
                (0..n_rows).map(|_| rng.gen_range(0..n_rows)).collect()
            } else {
                (0..n_rows).collect()
            };
            trees.push(RegressionTree::fit_rows(
                features,
                targets,
                &rows,
                &params.tree,
                rng,
            )?);
        }

        Ok(Self { trees, n_features })
    }

    /// Mean prediction across all trees
    pub fn predict(&self, features: &[f64]) -> Result<f64> {
        let mut sum = 0.0;
        for tree in &self.trees {
            sum += tree.predict(features)?;
        }
        Ok(sum / self.trees.len() as f64)
    }

    /// Number of trees in the ensemble
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Number of features the forest was trained on
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// The fitted trees
    pub fn trees(&self) -> &[RegressionTree] {
        &self.trees
    }
}
