//! Bootstrap-aggregated regression forest
//!
//! Fits `n_trees` regression trees, each on a bootstrap resample of the
//! training rows, and predicts the mean of the per-tree predictions. Every
//! tree draws its resample from an `StdRng` seeded from the forest seed plus
//! the tree index, so a fit is bit-for-bit reproducible for a fixed dataset
//! and seed.

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{
    error::{CalificarError, Result},
    tree::{RegressionTree, TreeParams},
};

/// Training configuration for the forest.
#[derive(Debug, Clone, Copy)]
pub struct ForestParams {
    /// Number of trees in the ensemble.
    pub n_trees: usize,
    /// Per-tree growth limits.
    pub tree: TreeParams,
    /// Base seed; tree `t` uses `seed + t`.
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            tree: TreeParams::default(),
            seed: 42,
        }
    }
}

/// A fitted ensemble regression model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForestRegressor {
    trees: Vec<RegressionTree>,
    n_features: usize,
}

impl RandomForestRegressor {
    /// Fit the forest on `x` against labels `y`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidShape` when `x` is empty, rows are ragged, or `x` and
    /// `y` disagree in length.
    pub fn fit(x: &[Vec<f32>], y: &[f32], params: ForestParams) -> Result<Self> {
        if x.is_empty() {
            return Err(CalificarError::InvalidShape {
                reason: "cannot fit forest on an empty matrix".to_string(),
            });
        }
        if x.len() != y.len() {
            return Err(CalificarError::InvalidShape {
                reason: format!("{} rows but {} labels", x.len(), y.len()),
            });
        }
        let n_features = x[0].len();
        if x.iter().any(|row| row.len() != n_features) {
            return Err(CalificarError::InvalidShape {
                reason: "ragged rows in forest input".to_string(),
            });
        }

        let n = x.len();
        let trees = (0..params.n_trees)
            .map(|t| {
                let mut rng = StdRng::seed_from_u64(params.seed.wrapping_add(t as u64));
                let sample: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                RegressionTree::fit_indices(x, y, sample, params.tree)
            })
            .collect();

        Ok(Self { trees, n_features })
    }

    /// Number of trees in the fitted ensemble.
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Number of features the forest was fitted on.
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Predict the label for a single row: mean over all trees.
    ///
    /// # Errors
    ///
    /// Returns `InvalidShape` when the row width does not match the fitted
    /// width.
    pub fn predict_row(&self, row: &[f32]) -> Result<f32> {
        if row.len() != self.n_features {
            return Err(CalificarError::InvalidShape {
                reason: format!(
                    "forest fitted on {} features, got {}",
                    self.n_features,
                    row.len()
                ),
            });
        }
        let sum: f64 = self
            .trees
            .iter()
            .map(|tree| f64::from(tree.predict_row(row)))
            .sum();
        Ok((sum / self.trees.len() as f64) as f32)
    }
}
