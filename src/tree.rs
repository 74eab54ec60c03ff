//! CART regression tree
//!
//! Building block for the random forest: a binary tree grown by exhaustive
//! search over (feature, threshold) splits, choosing the split that
//! minimizes the summed squared error of the two children. Leaves predict
//! the mean label of their training rows.
//!
//! Trees are grown on caller-supplied row indices so the forest can hand
//! each tree its own bootstrap resample without copying the matrix.

use serde::{Deserialize, Serialize};

use crate::error::{CalificarError, Result};

/// Growth limits for a single tree.
#[derive(Debug, Clone, Copy)]
pub struct TreeParams {
    /// Maximum tree depth; the root is at depth 0.
    pub max_depth: usize,
    /// Minimum number of rows a node needs before it may split.
    pub min_samples_split: usize,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: 16,
            min_samples_split: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
enum Node {
    Leaf {
        value: f32,
    },
    Split {
        feature: usize,
        threshold: f32,
        left: usize,
        right: usize,
    },
}

/// A fitted regression tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionTree {
    nodes: Vec<Node>,
    root: usize,
}

impl RegressionTree {
    /// Fit a tree on the full matrix.
    ///
    /// # Errors
    ///
    /// Returns `InvalidShape` when `x` is empty or `x` and `y` disagree in
    /// length.
    pub fn fit(x: &[Vec<f32>], y: &[f32], params: TreeParams) -> Result<Self> {
        if x.is_empty() {
            return Err(CalificarError::InvalidShape {
                reason: "cannot fit tree on an empty matrix".to_string(),
            });
        }
        if x.len() != y.len() {
            return Err(CalificarError::InvalidShape {
                reason: format!("{} rows but {} labels", x.len(), y.len()),
            });
        }
        let indices: Vec<usize> = (0..x.len()).collect();
        Ok(Self::fit_indices(x, y, indices, params))
    }

    /// Fit a tree on a subset (or resample) of rows given by `indices`.
    ///
    /// Caller guarantees `indices` is non-empty and in bounds.
    pub(crate) fn fit_indices(
        x: &[Vec<f32>],
        y: &[f32],
        indices: Vec<usize>,
        params: TreeParams,
    ) -> Self {
        let mut nodes = Vec::new();
        let root = grow(&mut nodes, x, y, indices, 0, params);
        Self { nodes, root }
    }

    /// Predict the label for a single row by walking the tree.
    pub fn predict_row(&self, row: &[f32]) -> f32 {
        let mut at = self.root;
        loop {
            match &self.nodes[at] {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    at = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                },
            }
        }
    }

    /// Number of nodes in the fitted tree.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

/// Grow a subtree over `indices`, returning its node id.
fn grow(
    nodes: &mut Vec<Node>,
    x: &[Vec<f32>],
    y: &[f32],
    indices: Vec<usize>,
    depth: usize,
    params: TreeParams,
) -> usize {
    let mean = mean_label(y, &indices);

    let splittable = depth < params.max_depth
        && indices.len() >= params.min_samples_split
        && !constant_labels(y, &indices);

    if splittable {
        if let Some((feature, threshold)) = best_split(x, y, &indices) {
            let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
                .into_iter()
                .partition(|&i| x[i][feature] <= threshold);
            // A valid split always separates at least one row to each side
            let left = grow(nodes, x, y, left_idx, depth + 1, params);
            let right = grow(nodes, x, y, right_idx, depth + 1, params);
            nodes.push(Node::Split {
                feature,
                threshold,
                left,
                right,
            });
            return nodes.len() - 1;
        }
    }

    nodes.push(Node::Leaf { value: mean });
    nodes.len() - 1
}

fn mean_label(y: &[f32], indices: &[usize]) -> f32 {
    let sum: f64 = indices.iter().map(|&i| f64::from(y[i])).sum();
    (sum / indices.len() as f64) as f32
}

fn constant_labels(y: &[f32], indices: &[usize]) -> bool {
    let first = y[indices[0]];
    indices.iter().all(|&i| (y[i] - first).abs() < f32::EPSILON)
}

/// Exhaustive best split: minimize `SSE(left) + SSE(right)` over every
/// feature and every midpoint between consecutive distinct values.
///
/// Returns `None` when no feature separates the rows.
fn best_split(x: &[Vec<f32>], y: &[f32], indices: &[usize]) -> Option<(usize, f32)> {
    let n_features = x[indices[0]].len();
    let n = indices.len();

    let mut best: Option<(f64, usize, f32)> = None;

    for feature in 0..n_features {
        let mut pairs: Vec<(f32, f32)> = indices.iter().map(|&i| (x[i][feature], y[i])).collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

        let total_sum: f64 = pairs.iter().map(|&(_, l)| f64::from(l)).sum();
        let total_sq: f64 = pairs.iter().map(|&(_, l)| f64::from(l) * f64::from(l)).sum();

        let mut left_sum = 0.0f64;
        let mut left_sq = 0.0f64;
        for i in 1..n {
            let (v_prev, label_prev) = pairs[i - 1];
            left_sum += f64::from(label_prev);
            left_sq += f64::from(label_prev) * f64::from(label_prev);

            let v = pairs[i].0;
            if v <= v_prev {
                continue; // tied values cannot be separated here
            }

            let n_left = i as f64;
            let n_right = (n - i) as f64;
            let sse_left = left_sq - left_sum * left_sum / n_left;
            let right_sum = total_sum - left_sum;
            let sse_right = (total_sq - left_sq) - right_sum * right_sum / n_right;
            let score = sse_left + sse_right;

            let threshold = (v_prev + v) / 2.0;
            if best.map_or(true, |(b, _, _)| score < b) {
                best = Some((score, feature, threshold));
            }
        }
    }

    best.map(|(_, feature, threshold)| (feature, threshold))
}
