//! Training dataset loading and splitting
//!
//! Parses the semicolon-delimited student records file, builds the design
//! matrix over the fixed feature schema, and provides a seeded train/test
//! split.
//!
//! The dataset carries dozens of demographic columns; only four are
//! consumed (`studytime`, `absences`, `freetime`, `Walc`). A fifth feature,
//! `sleepHours`, is absent from the source data and is synthesized as a
//! constant for every training row.

use std::path::Path;

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::error::{CalificarError, Result};

/// Ordered feature names every fitted scaler and model expects.
///
/// Invariant: scaling and prediction both assume request data is aligned to
/// exactly this order.
pub const FEATURE_SCHEMA: [&str; 5] = ["studytime", "absences", "freetime", "Walc", "sleepHours"];

/// The four features actually present in the source data.
pub const SOURCE_FEATURES: [&str; 4] = ["studytime", "absences", "freetime", "Walc"];

/// Label column: the student's final grade (0-20).
pub const LABEL_COLUMN: &str = "G3";

/// Constant value synthesized for the `sleepHours` column at training time.
pub const SLEEP_HOURS_DEFAULT: f32 = 8.0;

/// A loaded semicolon-delimited table: header names plus raw string cells.
#[derive(Debug, Clone)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Dataset {
    /// Load a dataset from a semicolon-delimited file with a header row.
    ///
    /// # Errors
    ///
    /// Returns `DatasetNotFound` if the file does not exist, `Io` on any
    /// other read failure, and `DatasetParse` if the table is malformed.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CalificarError::DatasetNotFound {
                    path: path.display().to_string(),
                }
            } else {
                CalificarError::Io {
                    reason: format!("failed to read {}: {e}", path.display()),
                }
            }
        })?;
        Self::parse(&text)
    }

    /// Parse a semicolon-delimited table from text.
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text.lines().filter(|l| !l.trim().is_empty());
        let header = lines.next().ok_or_else(|| CalificarError::DatasetParse {
            reason: "empty dataset".to_string(),
        })?;
        let columns: Vec<String> = split_fields(header);

        let mut rows = Vec::new();
        for (i, line) in lines.enumerate() {
            let fields = split_fields(line);
            if fields.len() != columns.len() {
                return Err(CalificarError::DatasetParse {
                    reason: format!(
                        "row {} has {} fields, expected {}",
                        i + 2,
                        fields.len(),
                        columns.len()
                    ),
                });
            }
            rows.push(fields);
        }

        Ok(Self { columns, rows })
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the dataset holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column names in file order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| CalificarError::MissingColumn {
                column: name.to_string(),
            })
    }

    fn numeric_cell(&self, row: usize, col: usize) -> Result<f32> {
        self.rows[row][col]
            .parse::<f32>()
            .map_err(|_| CalificarError::DatasetParse {
                reason: format!(
                    "non-numeric value '{}' in column '{}' at row {}",
                    self.rows[row][col],
                    self.columns[col],
                    row + 2
                ),
            })
    }

    /// Build the design matrix `x` and label vector `y`.
    ///
    /// Selects the four source features per row, appends the synthesized
    /// constant `sleepHours` column, and takes `G3` as the label. Column
    /// order of `x` matches [`FEATURE_SCHEMA`].
    ///
    /// # Errors
    ///
    /// Returns `MissingColumn` if `G3` or any source feature is absent from
    /// the header, and `DatasetParse` on a non-numeric cell.
    pub fn design_matrix(&self) -> Result<(Vec<Vec<f32>>, Vec<f32>)> {
        let label_idx = self.column_index(LABEL_COLUMN)?;
        let feature_idx: Vec<usize> = SOURCE_FEATURES
            .iter()
            .map(|name| self.column_index(name))
            .collect::<Result<_>>()?;

        let mut x = Vec::with_capacity(self.rows.len());
        let mut y = Vec::with_capacity(self.rows.len());
        for row in 0..self.rows.len() {
            let mut features = Vec::with_capacity(FEATURE_SCHEMA.len());
            for &col in &feature_idx {
                features.push(self.numeric_cell(row, col)?);
            }
            features.push(SLEEP_HOURS_DEFAULT);
            x.push(features);
            y.push(self.numeric_cell(row, label_idx)?);
        }

        Ok((x, y))
    }
}

/// Split a line on `;` and strip one layer of surrounding double quotes.
fn split_fields(line: &str) -> Vec<String> {
    line.split(';')
        .map(|f| {
            let f = f.trim();
            f.strip_prefix('"')
                .and_then(|s| s.strip_suffix('"'))
                .unwrap_or(f)
                .to_string()
        })
        .collect()
}

/// Seeded shuffle-and-split of `(x, y)` into training and holdout subsets.
///
/// `test_size` is the holdout fraction (rounded up to at least the requested
/// share). Deterministic for a fixed seed. The holdout subset is produced
/// for reproducibility of the split but no metric is computed from it.
///
/// Returns `(x_train, x_test, y_train, y_test)`.
#[allow(clippy::type_complexity)]
pub fn train_test_split(
    x: &[Vec<f32>],
    y: &[f32],
    test_size: f32,
    seed: u64,
) -> (Vec<Vec<f32>>, Vec<Vec<f32>>, Vec<f32>, Vec<f32>) {
    let n = x.len();
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let n_test = ((n as f32) * test_size).ceil() as usize;
    let (test_idx, train_idx) = indices.split_at(n_test.min(n));

    let take = |idx: &[usize]| -> (Vec<Vec<f32>>, Vec<f32>) {
        (
            idx.iter().map(|&i| x[i].clone()).collect(),
            idx.iter().map(|&i| y[i]).collect(),
        )
    };
    let (x_test, y_test) = take(test_idx);
    let (x_train, y_train) = take(train_idx);

    (x_train, x_test, y_train, y_test)
}
