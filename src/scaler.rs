//! Per-feature standardization
//!
//! `StandardScaler` stores a mean and standard deviation per feature, fitted
//! on the training subset only, and applies `(x - mean) / std` at both
//! training and inference time. Persisted verbatim alongside the model so a
//! reloaded service scales exactly as the training run did.

use serde::{Deserialize, Serialize};

use crate::error::{CalificarError, Result};

/// Fitted per-feature standardization transform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    means: Vec<f32>,
    stds: Vec<f32>,
}

impl StandardScaler {
    /// Fit means and standard deviations over the rows of `x`.
    ///
    /// Uses the population standard deviation. A zero-variance column (such
    /// as the synthesized constant `sleepHours`) gets a scale of 1.0 so the
    /// transform stays finite.
    ///
    /// # Errors
    ///
    /// Returns `InvalidShape` when `x` is empty or rows are ragged.
    pub fn fit(x: &[Vec<f32>]) -> Result<Self> {
        let n_rows = x.len();
        if n_rows == 0 {
            return Err(CalificarError::InvalidShape {
                reason: "cannot fit scaler on an empty matrix".to_string(),
            });
        }
        let n_features = x[0].len();
        if x.iter().any(|row| row.len() != n_features) {
            return Err(CalificarError::InvalidShape {
                reason: "ragged rows in scaler input".to_string(),
            });
        }

        let mut means = vec![0.0f32; n_features];
        for row in x {
            for (m, v) in means.iter_mut().zip(row) {
                *m += v;
            }
        }
        for m in &mut means {
            *m /= n_rows as f32;
        }

        let mut stds = vec![0.0f32; n_features];
        for row in x {
            for ((s, v), m) in stds.iter_mut().zip(row).zip(&means) {
                let d = v - m;
                *s += d * d;
            }
        }
        for s in &mut stds {
            *s = (*s / n_rows as f32).sqrt();
            if *s == 0.0 {
                *s = 1.0;
            }
        }

        Ok(Self { means, stds })
    }

    /// Number of features this scaler was fitted on.
    pub fn n_features(&self) -> usize {
        self.means.len()
    }

    /// Standardize a single row.
    ///
    /// # Errors
    ///
    /// Returns `InvalidShape` when the row width does not match the fitted
    /// width.
    pub fn transform_row(&self, row: &[f32]) -> Result<Vec<f32>> {
        if row.len() != self.means.len() {
            return Err(CalificarError::InvalidShape {
                reason: format!(
                    "scaler fitted on {} features, got {}",
                    self.means.len(),
                    row.len()
                ),
            });
        }
        Ok(row
            .iter()
            .zip(&self.means)
            .zip(&self.stds)
            .map(|((v, m), s)| (v - m) / s)
            .collect())
    }

    /// Standardize every row of a matrix.
    pub fn transform(&self, x: &[Vec<f32>]) -> Result<Vec<Vec<f32>>> {
        x.iter().map(|row| self.transform_row(row)).collect()
    }
}
