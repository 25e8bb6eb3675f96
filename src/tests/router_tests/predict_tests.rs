use crate::api::PredictResponse;
use crate::config::ReadinessPolicy;
use crate::router::handle;
use crate::tests::utils::{body_string, test_state, trained_state};
use astra::Body;
use http::{Method, Request};
use serde_json::json;

fn post_json(uri: &str, value: serde_json::Value) -> astra::Request {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(value.to_string()))
        .unwrap()
}

#[test]
fn health_reports_ok() {
    let (_dir, state) = test_state(ReadinessPolicy::Reject);
    let req = Request::builder()
        .method(Method::GET)
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let resp = handle(req, &state).expect("Handler failed");
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = serde_json::from_str(&body_string(resp)).unwrap();
    assert_eq!(body, json!({ "status": "ok" }));
}

#[test]
fn predict_returns_one_value_per_row() {
    let (_dir, state) = trained_state();
    let req = post_json(
        "/predict",
        json!({
            "accommodates": [4, 2, null],
            "city": ["NYC", "LA", "Atlantis"],
            "room_type": ["Entire home/apt", "Private room", null],
            "amenities": ["{\"Wifi\",Kitchen}", "Wifi", 7],
            "instant_bookabl": ["t", "f", "t"],
        }),
    );

    let resp = handle(req, &state).expect("Handler failed");
    assert_eq!(resp.status(), 200);

    let body: PredictResponse = serde_json::from_str(&body_string(resp)).unwrap();
    assert_eq!(body.predictions.len(), 3);
    assert!(body.predictions.iter().all(|p| p.is_finite()));
}

#[test]
fn mismatched_column_lengths_are_a_400() {
    let (_dir, state) = trained_state();
    let req = post_json("/predict", json!({ "beds": [1, 2, 3], "city": ["NYC", "LA"] }));

    let resp = handle(req, &state).expect("Handler failed");
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = serde_json::from_str(&body_string(resp)).unwrap();
    assert!(body["error"].as_str().unwrap().contains("shape mismatch"));
}

#[test]
fn malformed_json_is_a_400() {
    let (_dir, state) = trained_state();
    let req = Request::builder()
        .method(Method::POST)
        .uri("/predict")
        .body(Body::from("{not json"))
        .unwrap();

    let resp = handle(req, &state).expect("Handler failed");
    assert_eq!(resp.status(), 400);
}

#[test]
fn oversized_body_is_a_400() {
    let (_dir, state) = trained_state();
    let padding = "x".repeat(crate::router::MAX_BODY_BYTES as usize);
    let req = post_json("/predict", json!({ "city": [padding] }));

    let resp = handle(req, &state).expect("Handler failed");
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = serde_json::from_str(&body_string(resp)).unwrap();
    assert!(body["error"].as_str().unwrap().contains("exceeds"));
}

#[test]
fn body_at_the_limit_is_read() {
    let (_dir, state) = trained_state();
    let mut body = json!({ "city": ["NYC"] }).to_string();
    let room = crate::router::MAX_BODY_BYTES as usize - body.len();
    body.push_str(&" ".repeat(room));

    let req = Request::builder()
        .method(Method::POST)
        .uri("/predict")
        .body(Body::from(body))
        .unwrap();
    let resp = handle(req, &state).expect("Handler failed");
    assert_eq!(resp.status(), 200);
}

#[test]
fn predict_without_model_is_a_503_under_reject() {
    let (_dir, state) = test_state(ReadinessPolicy::Reject);
    let req = post_json("/predict", json!({ "beds": [1] }));

    let resp = handle(req, &state).expect("Handler failed");
    assert_eq!(resp.status(), 503);
    assert!(body_string(resp).contains("error"));
}

#[test]
fn unknown_route_is_not_found() {
    let (_dir, state) = test_state(ReadinessPolicy::Reject);
    let req = Request::builder()
        .method(Method::GET)
        .uri("/admin")
        .body(Body::empty())
        .unwrap();

    match handle(req, &state) {
        Err(err) => assert_eq!(err.status(), 404),
        Ok(resp) => panic!("expected 404, got {}", resp.status()),
    }
}
