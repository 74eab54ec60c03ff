//! Model lifecycle: load persisted artifacts or train from the dataset
//!
//! `obtain` is the single startup step that turns configuration into an
//! immutable [`ModelContext`]. It tries to deserialize a previously
//! persisted model and scaler first; on any load failure it logs the
//! distinguished reason and falls back to training fresh artifacts from the
//! dataset, persisting them for the next restart.
//!
//! The transition happens exactly once per process: handlers receive the
//! finished context and nothing ever mutates it afterwards.

use std::path::PathBuf;

use crate::{
    artifact,
    dataset::{self, Dataset, FEATURE_SCHEMA},
    error::Result,
    forest::{ForestParams, RandomForestRegressor},
    scaler::StandardScaler,
};

/// Holdout fraction for the train/test split.
const TEST_SIZE: f32 = 0.2;

/// Seed for the split shuffle; the forest seed lives in `ForestParams`.
const SPLIT_SEED: u64 = 42;

/// Where the dataset lives and where artifacts are persisted.
#[derive(Debug, Clone)]
pub struct LifecycleConfig {
    /// Semicolon-delimited training dataset.
    pub data_path: PathBuf,
    /// Persisted fitted model.
    pub model_path: PathBuf,
    /// Persisted fitted scaler.
    pub scaler_path: PathBuf,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("student-mat.csv"),
            model_path: PathBuf::from("student_model.bin"),
            scaler_path: PathBuf::from("scaler.bin"),
        }
    }
}

/// The immutable triple the prediction service runs on.
///
/// Built once at startup and shared read-only across requests. The schema
/// is the fixed feature ordering both the scaler and model were fitted
/// against; loaded artifacts are trusted to match it (no fingerprint check).
#[derive(Debug, Clone)]
pub struct ModelContext {
    /// Fitted ensemble regression model.
    pub model: RandomForestRegressor,
    /// Fitted per-feature standardization.
    pub scaler: StandardScaler,
    /// Ordered feature names expected by both.
    pub schema: Vec<String>,
}

impl ModelContext {
    /// Scale an aligned feature row and run inference on it.
    pub fn predict(&self, row: &[f32]) -> Result<f32> {
        let scaled = self.scaler.transform_row(row)?;
        self.model.predict_row(&scaled)
    }
}

/// How the context was produced, for logs and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelSource {
    /// Both artifacts deserialized successfully; training was skipped.
    Loaded,
    /// Artifact loading failed; fresh artifacts were trained and persisted.
    Trained,
}

fn feature_schema() -> Vec<String> {
    FEATURE_SCHEMA.iter().map(|s| (*s).to_string()).collect()
}

/// Produce a ready-to-serve model context.
///
/// Loads persisted artifacts when both deserialize, otherwise trains from
/// the dataset. Dataset problems (missing file, missing `G3` column) are
/// fatal: the error propagates and the process must not serve.
pub fn obtain(config: &LifecycleConfig) -> Result<(ModelContext, ModelSource)> {
    match load_artifacts(config) {
        Ok(ctx) => {
            log::info!(
                "loaded persisted model from {} and scaler from {}",
                config.model_path.display(),
                config.scaler_path.display()
            );
            Ok((ctx, ModelSource::Loaded))
        },
        Err(e) => {
            log::warn!("artifact load failed ({e}); training from dataset");
            let ctx = train(config)?;
            Ok((ctx, ModelSource::Trained))
        },
    }
}

fn load_artifacts(config: &LifecycleConfig) -> Result<ModelContext> {
    let model: RandomForestRegressor = artifact::load(&config.model_path)?;
    let scaler: StandardScaler = artifact::load(&config.scaler_path)?;
    Ok(ModelContext {
        model,
        scaler,
        schema: feature_schema(),
    })
}

/// Train fresh artifacts from the dataset and persist them.
fn train(config: &LifecycleConfig) -> Result<ModelContext> {
    let ds = Dataset::from_path(&config.data_path)?;
    let (x, y) = ds.design_matrix()?;
    log::info!("training on {} records", x.len());

    let (x_train, _x_test, y_train, _y_test) =
        dataset::train_test_split(&x, &y, TEST_SIZE, SPLIT_SEED);

    let scaler = StandardScaler::fit(&x_train)?;
    let x_train_scaled = scaler.transform(&x_train)?;

    let model = RandomForestRegressor::fit(&x_train_scaled, &y_train, ForestParams::default())?;

    artifact::save(&config.model_path, &model)?;
    artifact::save(&config.scaler_path, &scaler)?;
    log::info!(
        "persisted model to {} and scaler to {}",
        config.model_path.display(),
        config.scaler_path.display()
    );

    Ok(ModelContext {
        model,
        scaler,
        schema: feature_schema(),
    })
}
