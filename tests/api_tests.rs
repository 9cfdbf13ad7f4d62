// tests/api_tests.rs

mod common;

use std::{sync::Arc, time::Duration};

use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use rank_predictor::{
    Pipeline, routes,
    pipeline::model::ModelConfig,
    source::{Dataset, StaticSource},
    state::AppState,
};
use tower::ServiceExt;

fn app(source: StaticSource) -> axum::Router {
    let pipeline = Pipeline::new(Arc::new(source), ModelConfig::default(), Duration::from_secs(5));
    routes::create_router(AppState {
        pipeline: Arc::new(pipeline),
    })
}

fn full_source() -> StaticSource {
    let (history, results) = common::history_and_results();
    StaticSource::new(common::current_quiz(), history, results)
}

/// Helper function to spawn the app on a random port for testing.
/// Returns the base URL (e.g., "http://127.0.0.1:12345").
async fn spawn_app(source: StaticSource) -> String {
    let app = app(source);

    // Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    // Spawn the server in the background
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

#[tokio::test]
async fn health_check_works() {
    let response = app(full_source())
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn unknown_path_is_404() {
    // Arrange
    let address = spawn_app(full_source()).await;
    let client = reqwest::Client::new();

    // Act
    let response = client
        .get(&format!("{}/random_path_that_does_not_exist", address))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn predict_returns_rank_and_insights() {
    // Arrange
    let address = spawn_app(full_source()).await;
    let client = reqwest::Client::new();

    // Act
    let response = client
        .post(&format!("{}/predict", address))
        .json(&serde_json::json!({ "userId": "target" }))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();

    let rank = body["predicted_rank"].as_i64().expect("integer rank");
    assert!((common::MIN_RANK..=common::MAX_RANK).contains(&rank));
    assert_eq!(body["insights"]["weak_areas"], serde_json::json!(["Physics"]));
    assert!(body["insights"]["improvement_trend"].is_string());
    assert!(body["insights"]["overall_accuracy"].is_number());
}

#[tokio::test]
async fn predict_unknown_user_is_404() {
    let address = spawn_app(full_source()).await;
    let client = reqwest::Client::new();

    let response = client
        .post(&format!("{}/predict", address))
        .json(&serde_json::json!({ "userId": "nobody" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 404);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["kind"], "unknown_user");
    assert!(body.get("predicted_rank").is_none());
}

#[tokio::test]
async fn predict_fails_validation() {
    let address = spawn_app(full_source()).await;
    let client = reqwest::Client::new();

    // Act: Send an empty user id
    let response = client
        .post(&format!("{}/predict", address))
        .json(&serde_json::json!({ "userId": "" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn predict_without_user_id_is_bad_request() {
    let address = spawn_app(full_source()).await;
    let client = reqwest::Client::new();

    // Act: Send a body with no userId field
    let response = client
        .post(&format!("{}/predict", address))
        .json(&serde_json::json!({}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["kind"], "bad_request");
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn predict_with_non_json_body_is_bad_request() {
    let response = app(full_source())
        .oneshot(
            Request::post("/predict")
                .header("content-type", "application/json")
                .body(Body::from("not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["kind"], "bad_request");
}

#[tokio::test]
async fn unavailable_source_is_bad_gateway() {
    let source = StaticSource::default().with(Dataset::CurrentQuiz, common::current_quiz());
    let address = spawn_app(source).await;
    let client = reqwest::Client::new();

    let response = client
        .post(&format!("{}/predict", address))
        .json(&serde_json::json!({ "userId": "target" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 502);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["kind"], "fetch");
}

#[tokio::test]
async fn too_few_users_is_unprocessable() {
    let source = StaticSource::new(
        common::current_quiz(),
        serde_json::json!([{"userId": "solo", "score": 50, "responseMap": common::response_map(5, 3)}]),
        serde_json::json!([{"userId": "solo", "rank": 1234}]),
    );
    let address = spawn_app(source).await;
    let client = reqwest::Client::new();

    let response = client
        .post(&format!("{}/predict", address))
        .json(&serde_json::json!({ "userId": "solo" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 422);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["kind"], "insufficient_data");
}
