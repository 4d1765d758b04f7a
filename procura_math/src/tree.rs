//! CART regression tree
//!
//! Nodes are stored flat in pre-order; a split sends `x[feature] <= threshold`
//! to `left` and everything else to `right`. Splits minimise the summed
//! squared error of the two children.

use crate::{MathError, Result};
use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Relative reduction in squared error below which a split is not kept
const MIN_IMPROVEMENT: f64 = 1e-12;

/// Growth limits for a regression tree
#[derive(Debug, Clone, PartialEq)]
pub struct TreeParams {
    /// Maximum depth (root is depth 0); `None` grows until the leaves are pure
    pub max_depth: Option<usize>,
    /// Minimum samples a node needs before it may split
    pub min_samples_split: usize,
    /// Minimum samples on each side of a split
    pub min_samples_leaf: usize,
    /// Features considered per split; `None` considers all of them
    pub max_features: Option<usize>,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
        }
    }
}

impl TreeParams {
    /// Check the limits are usable
    pub fn validate(&self) -> Result<()> {
        if self.min_samples_split < 2 {
            return Err(MathError::InvalidInput(
                "min_samples_split must be at least 2".to_string(),
            ));
        }
        if self.min_samples_leaf == 0 {
            return Err(MathError::InvalidInput(
                "min_samples_leaf must be at least 1".to_string(),
            ));
        }
        if self.max_features == Some(0) {
            return Err(MathError::InvalidInput(
                "max_features must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// A single node of a fitted tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TreeNode {
    /// Terminal node predicting the mean of its training targets
    Leaf { value: f64, samples: usize },
    /// Internal node routing on one feature
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// Fitted regression tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    nodes: Vec<TreeNode>,
    n_features: usize,
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    error: f64,
}

struct Builder<'a, R: Rng> {
    features: &'a [Vec<f64>],
    targets: &'a [f64],
    params: &'a TreeParams,
    n_features: usize,
    rng: &'a mut R,
    nodes: Vec<TreeNode>,
}

impl RegressionTree {
    /// Fit a tree on every row of `features`
    pub fn fit<R: Rng>(
        features: &[Vec<f64>],
        targets: &[f64],
        params: &TreeParams,
        rng: &mut R,
    ) -> Result<Self> {
        let rows: Vec<usize> = (0..targets.len()).collect();
        Self::fit_rows(features, targets, &rows, params, rng)
    }

    /// Fit a tree on the given row indices (repeats allowed, as in a bootstrap sample)
    pub fn fit_rows<R: Rng>(
        features: &[Vec<f64>],
        targets: &[f64],
        rows: &[usize],
        params: &TreeParams,
        rng: &mut R,
    ) -> Result<Self> {
        params.validate()?;
        let n_features = validate_training_data(features, targets)?;

        if rows.is_empty() {
            return Err(MathError::InsufficientData(
                "Cannot fit a tree on zero rows".to_string(),
            ));
        }
        if let Some(&bad) = rows.iter().find(|&&r| r >= targets.len()) {
            return Err(MathError::InvalidInput(format!(
                "Row index {} out of range for {} rows",
                bad,
                targets.len()
            )));
        }

        let mut builder = Builder {
            features,
            targets,
            params,
            n_features,
            rng,
            nodes: Vec::new(),
        };
        builder.grow(rows.to_vec(), 0);

        Ok(Self {
            nodes: builder.nodes,
            n_features,
        })
    }

    /// Predict the target for one feature vector
    pub fn predict(&self, features: &[f64]) -> Result<f64> {
        if features.len() != self.n_features {
            return Err(MathError::InvalidInput(format!(
                "Expected {} features, got {}",
                self.n_features,
                features.len()
            )));
        }

        let mut node_idx = 0usize;
        loop {
            match self.nodes.get(node_idx) {
                Some(TreeNode::Leaf { value, .. }) => return Ok(*value),
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    // NaN goes left
                    node_idx = if features[*feature] > *threshold {
                        *right
                    } else {
                        *left
                    };
                }
                None => {
                    return Err(MathError::CalculationError(format!(
                        "Tree node {} does not exist",
                        node_idx
                    )))
                }
            }
        }
    }

    /// Nodes in pre-order
    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    /// Number of features the tree was trained on
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Depth of the deepest leaf
    pub fn depth(&self) -> usize {
        fn walk(nodes: &[TreeNode], idx: usize) -> usize {
            match &nodes[idx] {
                TreeNode::Leaf { .. } => 0,
                TreeNode::Split { left, right, .. } => {
                    1 + walk(nodes, *left).max(walk(nodes, *right))
                }
            }
        }

        if self.nodes.is_empty() {
            0
        } else {
            walk(&self.nodes, 0)
        }
    }
}

impl<'a, R: Rng> Builder<'a, R> {
    fn grow(&mut self, rows: Vec<usize>, depth: usize) -> usize {
        let node_idx = self.nodes.len();
        let (sum, sum_sq) = rows.iter().fold((0.0, 0.0), |(s, sq), &r| {
            let y = self.targets[r];
            (s + y, sq + y * y)
        });
        let n = rows.len() as f64;
        let mean = sum / n;
        let node_error = sum_sq - sum * sum / n;
        let tolerance = MIN_IMPROVEMENT * sum_sq.max(1.0);

        self.nodes.push(TreeNode::Leaf {
            value: mean,
            samples: rows.len(),
        });

        let depth_reached = self.params.max_depth.map_or(false, |d| depth >= d);
        if depth_reached
            || rows.len() < self.params.min_samples_split
            || node_error <= tolerance
        {
            return node_idx;
        }

        let best = match self.best_split(&rows) {
            Some(split) if node_error - split.error > tolerance => split,
            _ => return node_idx,
        };

        let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
            .into_iter()
            .partition(|&r| self.features[r][best.feature] <= best.threshold);

        let left = self.grow(left_rows, depth + 1);
        let right = self.grow(right_rows, depth + 1);

        self.nodes[node_idx] = TreeNode::Split {
            feature: best.feature,
            threshold: best.threshold,
            left,
            right,
        };
        node_idx
    }

    fn candidate_features(&mut self) -> Vec<usize> {
        match self.params.max_features {
            Some(k) if k < self.n_features => {
                index::sample(&mut *self.rng, self.n_features, k).into_vec()
            }
            _ => (0..self.n_features).collect(),
        }
    }

    fn best_split(&mut self, rows: &[usize]) -> Option<SplitCandidate> {
        let min_leaf = self.params.min_samples_leaf;
        let mut best: Option<SplitCandidate> = None;

        for feature in self.candidate_features() {
            let mut sorted: Vec<(f64, f64)> = rows
                .iter()
                .map(|&r| (self.features[r][feature], self.targets[r]))
                .collect();
            sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

            let total: f64 = sorted.iter().map(|(_, y)| y).sum();
            let total_sq: f64 = sorted.iter().map(|(_, y)| y * y).sum();
            let n = sorted.len();

            let mut left_sum = 0.0;
            let mut left_sq = 0.0;
            for i in 0..n - 1 {
                let (x, y) = sorted[i];
                left_sum += y;
                left_sq += y * y;

                let left_n = i + 1;
                let right_n = n - left_n;
                if left_n < min_leaf || right_n < min_leaf {
                    continue;
                }

                let next_x = sorted[i + 1].0;
                if next_x <= x {
                    continue;
                }

                let right_sum = total - left_sum;
                let right_sq = total_sq - left_sq;
                let error = (left_sq - left_sum * left_sum / left_n as f64)
                    + (right_sq - right_sum * right_sum / right_n as f64);

                if best.as_ref().map_or(true, |b| error < b.error) {
                    best = Some(SplitCandidate {
                        feature,
                        threshold: x + (next_x - x) / 2.0,
                        error,
                    });
                }
            }
        }

        best
    }
}

/// Check feature rows and targets line up; returns the feature count
pub(crate) fn validate_training_data(features: &[Vec<f64>], targets: &[f64]) -> Result<usize> {
    if features.is_empty() {
        return Err(MathError::InsufficientData(
            "Training data is empty".to_string(),
        ));
    }
    if features.len() != targets.len() {
        return Err(MathError::InvalidInput(format!(
            "Feature rows ({}) don't match targets ({})",
            features.len(),
            targets.len()
        )));
    }

    let n_features = features[0].len();
    if n_features == 0 {
        return Err(MathError::InvalidInput(
            "Feature rows must not be empty".to_string(),
        ));
    }
    if features.iter().any(|row| row.len() != n_features) {
        return Err(MathError::InvalidInput(
            "All feature rows must have the same length".to_string(),
        ));
    }
    if features.iter().flatten().chain(targets).any(|v| !v.is_finite()) {
        return Err(MathError::InvalidInput(
            "Training data must be finite".to_string(),
        ));
    }

    Ok(n_features)
}
