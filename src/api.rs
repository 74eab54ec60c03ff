//! HTTP API for grade prediction
//!
//! Provides the REST surface over a finished [`ModelContext`] using axum.
//!
//! ## Endpoints
//!
//! - `GET /home` - Plain-text liveness string
//! - `POST /predict` - Predict a final grade from a JSON feature record
//!
//! ## Example
//!
//! ```rust,ignore
//! use calificar::api::{create_router, AppState};
//!
//! let state = AppState::new(ctx);
//! let app = create_router(state);
//! axum::serve(listener, app).await?;
//! ```
//!
//! Request bodies are arbitrary JSON objects keyed by feature name. The
//! handler aligns them to the fixed feature schema (missing keys fill 0,
//! unknown keys are dropped), scales, runs inference, and bands the result.
//! Every request-level failure becomes a `400` with a JSON error body; a bad
//! request never takes the process down.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::{CalificarError, Result},
    grading::letter_grade,
    lifecycle::ModelContext,
};

/// Application state shared across handlers.
///
/// Holds the immutable model context behind an `Arc`; nothing at request
/// time mutates it, so handlers share it without locking.
#[derive(Clone)]
pub struct AppState {
    ctx: Arc<ModelContext>,
}

impl AppState {
    /// Wrap a finished model context for serving.
    pub fn new(ctx: ModelContext) -> Self {
        Self { ctx: Arc::new(ctx) }
    }

    /// The served model context.
    pub fn context(&self) -> &ModelContext {
        &self.ctx
    }
}

/// Successful prediction: the continuous grade and its letter band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    /// Continuous predicted final grade (nominally 0-20, unclamped).
    pub predicted_grade: f32,
    /// Letter grade from the fixed band table.
    pub letter_grade: String,
}

/// Error response body for failed requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable failure description.
    pub error: String,
}

/// Create the service router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/home", get(home_handler))
        .route("/predict", post(predict_handler))
        .with_state(state)
}

/// Liveness endpoint.
async fn home_handler() -> &'static str {
    "Student Performance Predictor API is running!"
}

/// Prediction endpoint.
///
/// Takes the raw body so JSON parse failures surface as the service's own
/// `400` error shape rather than an extractor rejection.
async fn predict_handler(
    State(state): State<AppState>,
    body: String,
) -> std::result::Result<Json<PredictResponse>, (StatusCode, Json<ErrorResponse>)> {
    let ctx = state.context();
    let row = parse_and_align(&body, &ctx.schema).map_err(bad_request)?;
    let predicted_grade = ctx.predict(&row).map_err(bad_request)?;
    let letter = letter_grade(predicted_grade);

    Ok(Json(PredictResponse {
        predicted_grade,
        letter_grade: letter.to_string(),
    }))
}

fn bad_request(e: CalificarError) -> (StatusCode, Json<ErrorResponse>) {
    log::warn!("prediction request failed: {e}");
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
}

/// Parse a JSON object body and align it to `schema` order.
///
/// Alignment is purely structural: a missing feature fills 0.0 and keys
/// outside the schema are silently dropped. A present-but-non-numeric value
/// is an error, the analogue of the scaler rejecting a non-numeric cell.
fn parse_and_align(body: &str, schema: &[String]) -> Result<Vec<f32>> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| CalificarError::InvalidRequest {
            reason: format!("malformed JSON body: {e}"),
        })?;
    let record = value
        .as_object()
        .ok_or_else(|| CalificarError::InvalidRequest {
            reason: "request body must be a JSON object".to_string(),
        })?;

    schema
        .iter()
        .map(|name| match record.get(name) {
            None => Ok(0.0),
            Some(v) => v
                .as_f64()
                .map(|f| f as f32)
                .ok_or_else(|| CalificarError::InvalidRequest {
                    reason: format!("feature '{name}' is not numeric: {v}"),
                }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::FEATURE_SCHEMA;

    fn schema() -> Vec<String> {
        FEATURE_SCHEMA.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_align_full_record() {
        let body = r#"{"studytime": 3, "absences": 2, "freetime": 4, "Walc": 1, "sleepHours": 7}"#;
        let row = parse_and_align(body, &schema()).expect("align");
        assert_eq!(row, vec![3.0, 2.0, 4.0, 1.0, 7.0]);
    }

    #[test]
    fn test_align_missing_features_fill_zero() {
        let body = r#"{"studytime": 3}"#;
        let row = parse_and_align(body, &schema()).expect("align");
        assert_eq!(row, vec![3.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_align_empty_object_is_all_zeros() {
        let row = parse_and_align("{}", &schema()).expect("align");
        assert_eq!(row, vec![0.0; 5]);
    }

    #[test]
    fn test_align_drops_unknown_keys() {
        let body = r#"{"studytime": 3, "favouriteColour": "green"}"#;
        let row = parse_and_align(body, &schema()).expect("align");
        assert_eq!(row, vec![3.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_align_rejects_malformed_json() {
        let err = parse_and_align("{not json", &schema()).unwrap_err();
        assert!(matches!(err, CalificarError::InvalidRequest { .. }));
    }

    #[test]
    fn test_align_rejects_non_object_body() {
        let err = parse_and_align("[1, 2, 3]", &schema()).unwrap_err();
        match err {
            CalificarError::InvalidRequest { reason } => {
                assert!(reason.contains("JSON object"));
            },
            other => panic!("expected InvalidRequest, got {other:?}"),
        }
    }

    #[test]
    fn test_align_rejects_non_numeric_feature() {
        let body = r#"{"studytime": "lots"}"#;
        let err = parse_and_align(body, &schema()).unwrap_err();
        match err {
            CalificarError::InvalidRequest { reason } => {
                assert!(reason.contains("studytime"));
            },
            other => panic!("expected InvalidRequest, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_home_handler_liveness_string() {
        let body = home_handler().await;
        assert!(body.contains("running"));
    }

    #[test]
    fn test_predict_response_serialization() {
        let response = PredictResponse {
            predicted_grade: 14.2,
            letter_grade: "B+".to_string(),
        };
        let json = serde_json::to_string(&response).expect("serialization failed");
        assert!(json.contains("predicted_grade"));
        assert!(json.contains("B+"));
    }

    #[test]
    fn test_error_response_serialization() {
        let response = ErrorResponse {
            error: "malformed JSON body".to_string(),
        };
        let json = serde_json::to_string(&response).expect("serialization failed");
        assert!(json.contains("malformed JSON body"));
    }
}
