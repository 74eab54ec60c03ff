//! # Calificar
//!
//! Student grade prediction service: trains a random forest regression model
//! on a behavioral-feature dataset and serves predictions over a REST API.
//!
//! Calificar (Spanish: "to grade") owns the full model lifecycle:
//!
//! - **Dataset loading**: semicolon-delimited student records with a `G3`
//!   final-grade label
//! - **Training**: standardization + 100-tree bootstrap-aggregated
//!   regression forest, seeded for reproducibility
//! - **Persistence**: fitted model and scaler saved as binary artifacts and
//!   reloaded across restarts, retraining on any load failure
//! - **Serving**: a `/predict` endpoint that aligns an arbitrary JSON record
//!   to the fixed feature schema, scales it, and maps the continuous
//!   prediction to a letter grade
//!
//! ## Example
//!
//! ```rust,ignore
//! use calificar::{
//!     api::{create_router, AppState},
//!     lifecycle::{self, LifecycleConfig},
//! };
//!
//! let (ctx, _source) = lifecycle::obtain(&LifecycleConfig::default())?;
//! let app = create_router(AppState::new(ctx));
//! axum::serve(listener, app).await?;
//! ```
//!
//! ## Architecture
//!
//! Startup is the only stateful step: `lifecycle::obtain` produces an
//! immutable [`lifecycle::ModelContext`] (model + scaler + feature schema)
//! exactly once, before the listener binds. Request handling is pure
//! in-memory computation over that shared read-only context, so no locking
//! is needed at serve time.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)] // usize -> f32 for means over small datasets
#![allow(clippy::cast_possible_truncation)] // f64 JSON values narrow to f32 features
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

pub mod api;
pub mod artifact;
pub mod dataset;
pub mod error;
pub mod forest;
pub mod grading;
pub mod lifecycle;
pub mod scaler;
pub mod tree;

// Re-exports for convenience
pub use error::{CalificarError, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(VERSION.starts_with("0."));
        assert!(VERSION.contains('.'));
    }
}
