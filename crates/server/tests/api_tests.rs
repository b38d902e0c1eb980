//! Integration tests for the prediction API endpoints

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use grade_predictor::api::{create_router, wait_for_signal, AppState};
use predictor_lib::{
    health::{components, HealthRegistry},
    CourseCatalog, GradeModel, PredictionService,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

/// The 30 first- and second-year courses the production model is trained on
const INPUT_COURSES: [&str; 30] = [
    "M1100", "M1101", "M1102", "PHYS100", "PHYS101", "I1100", "P1101", "S1101", "P1100", "M1103",
    "M1104", "M1105", "M1106", "M1107", "I1101", "I2202", "I2204", "I2205", "M2251", "M2250",
    "I2201", "I2203", "S2250", "I2206", "I2207", "I2208", "I2209", "I2210", "I2211", "I2234",
];

const OUTPUT_COURSES: [&str; 6] = ["I3301", "I3302", "I3303", "I3304", "I3305", "I3306"];

/// Monotone stand-in for the trained regressor: output `k` is the mean of
/// the features shifted by a per-course offset
struct MeanShiftModel;

impl GradeModel for MeanShiftModel {
    fn predict(&self, features: &[f64]) -> anyhow::Result<Vec<f64>> {
        anyhow::ensure!(
            features.len() == INPUT_COURSES.len(),
            "expected {} features, got {}",
            INPUT_COURSES.len(),
            features.len()
        );
        let mean = features.iter().sum::<f64>() / features.len() as f64;
        Ok((0..OUTPUT_COURSES.len())
            .map(|k| mean - 10.0 + 4.0 * k as f64)
            .collect())
    }

    fn name(&self) -> &str {
        "mean-shift"
    }
}

struct BrokenModel;

impl GradeModel for BrokenModel {
    fn predict(&self, _features: &[f64]) -> anyhow::Result<Vec<f64>> {
        anyhow::bail!("Feature shape mismatch, expected: 31, got 30")
    }

    fn name(&self) -> &str {
        "broken"
    }
}

struct PanickingModel;

impl GradeModel for PanickingModel {
    fn predict(&self, _features: &[f64]) -> anyhow::Result<Vec<f64>> {
        panic!("booster state corrupted")
    }

    fn name(&self) -> &str {
        "panicking"
    }
}

fn catalog() -> CourseCatalog {
    CourseCatalog::new(
        INPUT_COURSES.iter().map(|s| s.to_string()).collect(),
        OUTPUT_COURSES.iter().map(|s| s.to_string()).collect(),
    )
    .unwrap()
}

async fn setup_app_with(model: Arc<dyn GradeModel>) -> (Router, Arc<AppState>) {
    let health_registry = HealthRegistry::new();
    health_registry.register(components::API).await;
    health_registry.register(components::MODEL).await;
    health_registry.set_ready(true).await;

    let service = Arc::new(PredictionService::new(model, catalog()));
    let state = Arc::new(AppState::new(service, health_registry));
    (create_router(state.clone()), state)
}

async fn setup_test_app() -> Router {
    setup_app_with(Arc::new(MeanShiftModel)).await.0
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

async fn post_raw(app: Router, body: String) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/predict")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

async fn predict(app: Router, body: Value) -> (StatusCode, Value) {
    post_raw(app, body.to_string()).await
}

fn all_courses_at(grade: f64) -> Value {
    let grades: serde_json::Map<String, Value> = INPUT_COURSES
        .iter()
        .map(|c| (c.to_string(), json!(grade)))
        .collect();
    json!({ "grades": grades })
}

fn prediction_values(body: &Value) -> Vec<f64> {
    body["predictions"]
        .as_object()
        .unwrap()
        .values()
        .map(|v| v.as_f64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_home_reports_running() {
    let (status, body) = get(setup_test_app().await, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "running");
    assert_eq!(body["model"], "XGBoost Grade Predictor");
}

#[tokio::test]
async fn test_health_reports_healthy() {
    let (status, body) = get(setup_test_app().await, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert!(body["components"]["model"].is_object());
}

#[tokio::test]
async fn test_health_returns_503_when_model_unhealthy() {
    let (app, state) = setup_app_with(Arc::new(MeanShiftModel)).await;
    state
        .health_registry
        .set_unhealthy(components::MODEL, "Model file missing")
        .await;

    let (status, body) = get(app, "/health").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "unhealthy");
}

#[tokio::test]
async fn test_readyz_when_ready() {
    let (status, body) = get(setup_test_app().await, "/readyz").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ready"], true);
}

#[tokio::test]
async fn test_predict_structure_with_all_courses() {
    let (status, body) = predict(setup_test_app().await, all_courses_at(70.0)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["predictions"].as_object().unwrap().len(), OUTPUT_COURSES.len());
    assert!(body["average"].is_number());
    assert!(body["pass_rate"].is_number());
}

#[tokio::test]
async fn test_empty_grades_use_defaults() {
    let app = setup_test_app().await;
    let (status, first) = predict(app.clone(), json!({ "grades": {} })).await;
    let (_, second) = predict(app, json!({ "grades": {} })).await;

    assert_eq!(status, StatusCode::OK);
    assert!(first["average"].as_f64().unwrap() > 0.0);
    assert_eq!(first, second);

    // Every feature defaults to 70, so the model sees a mean of 70
    let (_, all_seventy) = predict(setup_test_app().await, all_courses_at(70.0)).await;
    assert_eq!(first, all_seventy);
}

#[tokio::test]
async fn test_partial_grades_return_every_output_course() {
    let body = json!({ "grades": { "M1100": 95.0, "I2234": 12.5 } });
    let (status, response) = predict(setup_test_app().await, body).await;

    assert_eq!(status, StatusCode::OK);
    let predictions = response["predictions"].as_object().unwrap();
    for course in OUTPUT_COURSES {
        assert!(predictions.contains_key(course), "missing {}", course);
    }
}

#[tokio::test]
async fn test_summary_statistics_match_predictions() {
    let body = json!({ "grades": { "M1100": 40.0, "M1101": 45.0, "I1100": 48.0 } });
    let (_, response) = predict(setup_test_app().await, body).await;

    let values = prediction_values(&response);
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let passed = values.iter().filter(|v| **v >= 50.0).count();

    assert!((response["average"].as_f64().unwrap() - mean).abs() < 1e-9);
    assert_eq!(
        response["pass_rate"].as_f64().unwrap(),
        100.0 * passed as f64 / values.len() as f64
    );
}

#[tokio::test]
async fn test_unknown_courses_do_not_change_response() {
    let app = setup_test_app().await;
    let (_, clean) = predict(app.clone(), json!({ "grades": { "M1100": 88.0 } })).await;
    let (status, noisy) = predict(
        app,
        json!({ "grades": { "M1100": 88.0, "CHEM999": 0.0, "ART101": 100.0 } }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(clean, noisy);
}

#[tokio::test]
async fn test_higher_grades_predict_higher_average() {
    let app = setup_test_app().await;
    let (low_status, low) = predict(app.clone(), all_courses_at(45.0)).await;
    let (high_status, high) = predict(app, all_courses_at(85.0)).await;

    assert_eq!(low_status, StatusCode::OK);
    assert_eq!(high_status, StatusCode::OK);
    assert!(high["average"].as_f64().unwrap() >= low["average"].as_f64().unwrap());
    assert!(high["pass_rate"].as_f64().unwrap() >= 0.0);
}

#[tokio::test]
async fn test_model_failure_returns_400_with_detail() {
    let (app, _) = setup_app_with(Arc::new(BrokenModel)).await;
    let (status, body) = predict(app, all_courses_at(70.0)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Feature shape mismatch, expected: 31, got 30");
}

#[tokio::test]
async fn test_model_panic_returns_400_and_keeps_service_healthy() {
    let (app, state) = setup_app_with(Arc::new(PanickingModel)).await;
    let (status, body) = predict(app.clone(), all_courses_at(70.0)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("Inference task failed"));

    let health = state.health_registry.health().await;
    assert!(health.components[components::MODEL].message.is_none());
    let (health_status, health_body) = get(app.clone(), "/health").await;
    assert_eq!(health_status, StatusCode::OK);
    assert_eq!(health_body["status"], "healthy");

    // Later requests still reach the model and fail the same way
    let (status, _) = predict(app, json!({ "grades": {} })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_body_returns_400_with_detail() {
    let app = setup_test_app().await;

    let (status, body) = post_raw(app.clone(), "{not json".to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string());

    let (status, body) = predict(app.clone(), json!({ "marks": {} })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("grades"));

    let (status, _) = predict(app, json!({ "grades": { "M1100": "A+" } })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let app = setup_test_app().await;
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/predict")
                .header(header::ORIGIN, "http://localhost:3000")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}

#[tokio::test]
async fn test_metrics_endpoint_exposes_prediction_metrics() {
    let app = setup_test_app().await;
    let _ = predict(app.clone(), all_courses_at(60.0)).await;

    let response = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers().get("content-type").unwrap();
    assert!(content_type.to_str().unwrap().contains("text/plain"));

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let metrics_text = String::from_utf8(body.to_vec()).unwrap();

    assert!(metrics_text.contains("grade_predictor_prediction_latency_seconds_bucket"));
    assert!(metrics_text.contains("grade_predictor_predictions_served_total"));
}

#[tokio::test]
async fn test_failed_signal_listener_keeps_server_running() {
    let broken = async { Err(std::io::Error::new(std::io::ErrorKind::Other, "no signal driver")) };
    let waited = tokio::time::timeout(Duration::from_millis(50), wait_for_signal(broken)).await;
    assert!(waited.is_err(), "shutdown must not fire when the listener fails");

    let fired = tokio::time::timeout(Duration::from_millis(50), wait_for_signal(async { Ok(()) })).await;
    assert!(fired.is_ok());
}
