//! End-to-end tests for the prediction API
//!
//! Builds a real fitted context on synthetic data and drives the router
//! with in-process requests.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use tower::ServiceExt;

use calificar::{
    api::{create_router, AppState, ErrorResponse, PredictResponse},
    dataset::FEATURE_SCHEMA,
    forest::{ForestParams, RandomForestRegressor},
    grading::letter_grade,
    lifecycle::ModelContext,
    scaler::StandardScaler,
};

/// Fit a small but real model over the five-feature schema.
fn test_state() -> AppState {
    let x: Vec<Vec<f32>> = (0..40)
        .map(|i| {
            let studytime = (i % 4 + 1) as f32;
            let absences = (i % 13) as f32;
            let freetime = (i % 5 + 1) as f32;
            let walc = (i % 5 + 1) as f32;
            vec![studytime, absences, freetime, walc, 8.0]
        })
        .collect();
    let y: Vec<f32> = x
        .iter()
        .map(|row| (4.0 * row[0] - 0.5 * row[1] - row[3] + 6.0).clamp(0.0, 20.0))
        .collect();

    let scaler = StandardScaler::fit(&x).expect("fit scaler");
    let scaled = scaler.transform(&x).expect("transform");
    let params = ForestParams {
        n_trees: 25,
        ..ForestParams::default()
    };
    let model = RandomForestRegressor::fit(&scaled, &y, params).expect("fit forest");

    AppState::new(ModelContext {
        model,
        scaler,
        schema: FEATURE_SCHEMA.iter().map(|s| (*s).to_string()).collect(),
    })
}

async fn post_predict(body: &str) -> (StatusCode, Vec<u8>) {
    let app = create_router(test_state());
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/predict")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .expect("request"),
        )
        .await
        .expect("response");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    (status, bytes.to_vec())
}

#[tokio::test]
async fn test_home_returns_liveness_text() {
    let app = create_router(test_state());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/home")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let text = String::from_utf8(body.to_vec()).expect("utf8");
    assert!(text.contains("running"));
}

#[tokio::test]
async fn test_predict_full_record() {
    let (status, body) =
        post_predict(r#"{"studytime": 3, "absences": 2, "freetime": 4, "Walc": 1, "sleepHours": 8}"#)
            .await;
    assert_eq!(status, StatusCode::OK);

    let result: PredictResponse = serde_json::from_slice(&body).expect("response body");
    assert!(result.predicted_grade.is_finite());
    assert_eq!(result.letter_grade, letter_grade(result.predicted_grade));
}

#[tokio::test]
async fn test_predict_omitted_sleep_hours_fills_zero() {
    // The documented scenario: sleepHours omitted, service fills 0
    let (status, body) =
        post_predict(r#"{"studytime": 3, "absences": 2, "freetime": 4, "Walc": 1}"#).await;
    assert_eq!(status, StatusCode::OK);

    let with_default: PredictResponse = serde_json::from_slice(&body).expect("response body");
    assert_eq!(
        with_default.letter_grade,
        letter_grade(with_default.predicted_grade)
    );

    let (_, body) = post_predict(
        r#"{"studytime": 3, "absences": 2, "freetime": 4, "Walc": 1, "sleepHours": 0}"#,
    )
    .await;
    let explicit_zero: PredictResponse = serde_json::from_slice(&body).expect("response body");
    assert!((with_default.predicted_grade - explicit_zero.predicted_grade).abs() < f32::EPSILON);
}

#[tokio::test]
async fn test_predict_empty_object_succeeds() {
    let (status, body) = post_predict("{}").await;
    assert_eq!(status, StatusCode::OK);
    let result: PredictResponse = serde_json::from_slice(&body).expect("response body");
    assert!(result.predicted_grade.is_finite());
}

#[tokio::test]
async fn test_predict_ignores_unknown_keys() {
    let (_, base) = post_predict(r#"{"studytime": 2, "absences": 5}"#).await;
    let (status, extra) = post_predict(
        r#"{"studytime": 2, "absences": 5, "school": 99, "favouriteColour": "green"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let base: PredictResponse = serde_json::from_slice(&base).expect("base body");
    let extra: PredictResponse = serde_json::from_slice(&extra).expect("extra body");
    assert!((base.predicted_grade - extra.predicted_grade).abs() < f32::EPSILON);
}

#[tokio::test]
async fn test_predict_malformed_json_is_400() {
    let (status, body) = post_predict("{not json at all").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let err: ErrorResponse = serde_json::from_slice(&body).expect("error body");
    assert!(err.error.contains("malformed JSON"));
}

#[tokio::test]
async fn test_predict_non_object_body_is_400() {
    let (status, body) = post_predict("[1, 2, 3]").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let err: ErrorResponse = serde_json::from_slice(&body).expect("error body");
    assert!(err.error.contains("JSON object"));
}

#[tokio::test]
async fn test_predict_non_numeric_feature_is_400() {
    let (status, body) = post_predict(r#"{"studytime": "lots"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let err: ErrorResponse = serde_json::from_slice(&body).expect("error body");
    assert!(err.error.contains("studytime"));
}

#[tokio::test]
async fn test_predict_rejects_get() {
    let app = create_router(test_state());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/predict")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = create_router(test_state());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/nope")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
