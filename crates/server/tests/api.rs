//! Integration tests for the HTTP API
//!
//! Requests go through the full router (auth, request id, limits) with
//! `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use server::{build_router, config::ServerConfig, state::ServerState};
use tower::ServiceExt;

const API_KEY: &str = "test-api-key";

fn test_config() -> ServerConfig {
    let mut config = ServerConfig::default();
    config.api_keys.insert(API_KEY.to_string());
    config.rate_limit_per_minute = 1000;
    config
}

fn test_router(config: ServerConfig) -> Router {
    let state = ServerState::new(config).expect("Failed to create test state");
    build_router(Arc::new(state))
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("x-api-key", API_KEY)
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_health_is_public() {
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(test_router(test_config()), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_metrics_falls_back_to_json_without_recorder() {
    let request = Request::builder()
        .uri("/metrics")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(test_router(test_config()), request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["uptime_seconds"].is_u64());
}

#[tokio::test]
async fn test_match_requires_api_key() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/concepts/match")
        .header("content-type", "application/json")
        .body(Body::from(json!({"text": "mass", "concepts": ["mass"]}).to_string()))
        .unwrap();
    let (status, body) = send(test_router(test_config()), request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "AUTH_FAILED");
}

#[tokio::test]
async fn test_bearer_token_accepted() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/concepts/normalize")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {API_KEY}"))
        .body(Body::from(json!({"text": "Hi!"}).to_string()))
        .unwrap();
    let (status, _) = send(test_router(test_config()), request).await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_normalize_endpoint() {
    let request = post_json(
        "/api/v1/concepts/normalize",
        json!({"text": "  Photosynthesis\u{2014}converts  light!  "}),
    );
    let (status, body) = send(test_router(test_config()), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["normalized"], "photosynthesis converts light");
    assert_eq!(body["tokens"].as_array().unwrap().len(), 3);
    assert_eq!(body["tokens"][1]["start"], 15);
}

#[tokio::test]
async fn test_match_endpoint_whole_tokens() {
    let request = post_json(
        "/api/v1/concepts/match",
        json!({
            "text": "Q: Which process splits one nucleus into two?\nA) cells\nB) mitosis\nC) meiosis",
            "concepts": ["cell", "mitosis", "photosynthesis"]
        }),
    );
    let (status, body) = send(test_router(test_config()), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["matches"], json!(["mitosis"]));
    assert_eq!(body["total_matches"], 1);
    assert_eq!(body["hits"][0]["concept"], "mitosis");
}

#[tokio::test]
async fn test_match_endpoint_honors_cap() {
    let concepts: Vec<String> = (0..100).map(|i| format!("concept {i}")).collect();
    let text = concepts[..30].join(" ");
    let request = post_json(
        "/api/v1/concepts/match",
        json!({"text": text, "concepts": concepts, "max_matches": 3}),
    );
    let (status, body) = send(test_router(test_config()), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["matches"], json!(["concept 0", "concept 1", "concept 2"]));
}

#[tokio::test]
async fn test_match_endpoint_rejects_zero_cap() {
    let request = post_json(
        "/api/v1/concepts/match",
        json!({"text": "mass", "concepts": ["mass"], "max_matches": 0}),
    );
    let (status, body) = send(test_router(test_config()), request).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "CONCEPT_ERROR");
}

#[tokio::test]
async fn test_match_endpoint_rejects_oversized_concept_list() {
    let mut config = test_config();
    config.max_concepts = 2;
    let request = post_json(
        "/api/v1/concepts/match",
        json!({"text": "mass", "concepts": ["a", "b", "c"]}),
    );
    let (status, body) = send(test_router(config), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_tag_endpoint() {
    let request = post_json(
        "/api/v1/quiz/tag",
        json!({
            "concepts": ["newton s first law", "mass", "inertia"],
            "questions": [
                {"id": "q1", "prompt": "Newton's first law states an object stays at rest unless acted on."},
                {"id": "q2", "prompt": "Which quantity measures inertia?", "choices": ["Mass", "Weight"]},
                {"id": "q3", "prompt": "Define velocity."}
            ]
        }),
    );
    let (status, body) = send(test_router(test_config()), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_questions"], 3);
    assert_eq!(body["tagged"][0]["question_id"], "q1");
    assert_eq!(body["tagged"][0]["concepts"], json!(["newton s first law"]));
    assert_eq!(body["tagged"][1]["concepts"], json!(["mass", "inertia"]));
    assert_eq!(body["tagged"][2]["concepts"], json!([]));
}

#[tokio::test]
async fn test_tag_endpoint_rejects_blank_question_id() {
    let request = post_json(
        "/api/v1/quiz/tag",
        json!({"concepts": ["mass"], "questions": [{"id": " ", "prompt": "mass"}]}),
    );
    let (status, body) = send(test_router(test_config()), request).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "TAG_ERROR");
}

#[tokio::test]
async fn test_tag_endpoint_rejects_oversized_batch() {
    let mut config = test_config();
    config.max_batch_size = 1;
    let request = post_json(
        "/api/v1/quiz/tag",
        json!({
            "concepts": ["mass"],
            "questions": [{"id": "a", "prompt": "mass"}, {"id": "b", "prompt": "mass"}]
        }),
    );
    let (status, _) = send(test_router(config), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_request_id_echoed() {
    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "req-42")
        .body(Body::empty())
        .unwrap();
    let response = test_router(test_config()).oneshot(request).await.unwrap();

    assert_eq!(response.headers()["x-request-id"], "req-42");
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let request = Request::builder()
        .uri("/api/v1/nope")
        .header("x-api-key", API_KEY)
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(test_router(test_config()), request).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_rate_limit_enforced() {
    let mut config = test_config();
    config.rate_limit_per_minute = 1;
    let router = test_router(config);

    let first = post_json("/api/v1/concepts/normalize", json!({"text": "a"}));
    let (status, _) = send(router.clone(), first).await;
    assert_eq!(status, StatusCode::OK);

    let second = post_json("/api/v1/concepts/normalize", json!({"text": "b"}));
    let (status, body) = send(router, second).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error"]["code"], "RATE_LIMIT_EXCEEDED");
}
