//! API integration tests.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Duration, Utc};
use metrics_exporter_prometheus::PrometheusBuilder;
use serde_json::{json, Value};
use tower::ServiceExt;

use vscore_api::{create_router, ApiConfig, AppState};
use vscore_engine::{BatchLogger, BatchScorer, ScoreError, ScoreResult, ScoredBatch};
use vscore_models::RawVideoRecord;

/// Scorer whose stage output never lines up with its input.
struct MisalignedScorer;

impl BatchScorer for MisalignedScorer {
    fn score_batch(
        &self,
        videos: Vec<RawVideoRecord>,
        _now: DateTime<Utc>,
        _logger: &BatchLogger,
    ) -> ScoreResult<ScoredBatch> {
        Err(ScoreError::StageInvariant {
            stage: "exposure",
            expected: videos.len(),
            actual: 0,
        })
    }
}

/// Scorer that panics mid-batch.
struct PanickingScorer;

impl BatchScorer for PanickingScorer {
    fn score_batch(
        &self,
        _videos: Vec<RawVideoRecord>,
        _now: DateTime<Utc>,
        _logger: &BatchLogger,
    ) -> ScoreResult<ScoredBatch> {
        panic!("exposure table exhausted");
    }
}

fn router_with_scorer(scorer: Arc<dyn BatchScorer>) -> Router {
    create_router(AppState::with_scorer(ApiConfig::default(), scorer), None)
}

fn one_video_batch() -> String {
    json!({"videos": [{"id": "v1", "viewCount": 100, "subscriberCount": 10}]}).to_string()
}

fn test_router(config: ApiConfig) -> Router {
    let state = AppState::new(config).unwrap();
    create_router(state, None)
}

fn post_analyze(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/analyze")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn app_health(app: &Router) -> StatusCode {
    let mut request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    request
        .headers_mut()
        .insert("X-Forwarded-For", "192.168.1.100".parse().unwrap());
    app.clone().oneshot(request).await.unwrap().status()
}

fn days_ago(days: i64) -> String {
    (Utc::now() - Duration::days(days)).to_rfc3339()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = test_router(ApiConfig::default());

    for path in ["/health", "/healthz"] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "healthy");
        assert!(body["version"].is_string());
    }
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let app = test_router(ApiConfig::default());
    let response = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let handle = PrometheusBuilder::new().build_recorder().handle();
    let app = create_router(AppState::new(ApiConfig::default()).unwrap(), Some(handle));
    let response = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_empty_body_scores_empty_batch() {
    let app = test_router(ApiConfig::default());

    for body in ["", "{}", "[]", r#"{"videos": "nope"}"#, r#"{"videos": []}"#] {
        let response = app.clone().oneshot(post_analyze(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK, "body {body:?}");
        assert_eq!(json_body(response).await, json!({"results": [], "top10": []}));
    }
}

#[tokio::test]
async fn test_invalid_json_is_rejected() {
    let app = test_router(ApiConfig::default());
    let response = app.oneshot(post_analyze("{\"videos\": [")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Invalid JSON");
    assert!(body["details"].is_string());
}

#[tokio::test]
async fn test_non_post_methods_rejected() {
    let app = test_router(ApiConfig::default());

    for method in ["GET", "PUT", "DELETE"] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri("/api/analyze")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(json_body(response).await, json!({"error": "Only POST allowed"}));
    }
}

#[tokio::test]
async fn test_analyze_scores_batch() {
    let app = test_router(ApiConfig::default());
    let payload = json!({
        "videos": [
            {"id": "fresh-hit", "viewCount": 1_000_000, "subscriberCount": 1_000, "publishedAt": days_ago(10)},
            {"videoId": "evergreen", "viewCountRaw": "2500000", "subscriberCountRaw": "1000", "publishedAtRaw": days_ago(400)},
            {"id": "undated", "viewCount": "5000", "subscriberCount": "1000"},
            {"id": "no-subs", "viewCount": 900, "subscriberCount": 0, "publishedAt": days_ago(3)}
        ]
    });

    let response = app.oneshot(post_analyze(payload.to_string())).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 4);

    let ids: Vec<&str> = results.iter().map(|r| r["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["fresh-hit", "evergreen", "undated", "no-subs"]);

    let hit = &results[0];
    assert_eq!(hit["daysSincePublished"], 10);
    assert_eq!(hit["ratio"], 1000.0);
    assert_eq!(hit["isSustained"], false);

    let evergreen = &results[1];
    assert_eq!(evergreen["isSustained"], true);

    let undated = &results[2];
    assert!(undated["daysSincePublished"].is_null());
    assert!(undated["viewsPerDay"].is_null());
    assert_eq!(undated["exposureScore"], 0.0);

    let no_subs = &results[3];
    assert!(no_subs["ratio"].is_null());
    assert!(no_subs["ratioZ"].is_null());
    assert_eq!(no_subs["ratioLevel"], 1);

    let top10 = body["top10"].as_array().unwrap();
    assert_eq!(top10.len(), 4);
    assert_eq!(top10[0], "fresh-hit");
}

#[tokio::test]
async fn test_scoring_error_returns_server_error() {
    let app = router_with_scorer(Arc::new(MisalignedScorer));
    let response = app.oneshot(post_analyze(one_video_batch())).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json_body(response).await,
        json!({
            "error": "Server error",
            "details": "Stage exposure produced 0 outputs for 1 records"
        })
    );
}

#[tokio::test]
async fn test_scoring_panic_returns_server_error() {
    let app = router_with_scorer(Arc::new(PanickingScorer));
    let response = app
        .clone()
        .oneshot(post_analyze(one_video_batch()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Server error");
    assert!(body.get("results").is_none());
    let details = body["details"].as_str().unwrap();
    assert!(details.contains("panicked"), "details: {details}");

    // The server keeps serving after a panicking batch
    let health = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(health.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_empty_batch_skips_scorer() {
    let app = router_with_scorer(Arc::new(PanickingScorer));
    let response = app.oneshot(post_analyze(r#"{"videos": []}"#)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({"results": [], "top10": []}));
}

#[tokio::test]
async fn test_security_and_request_id_headers() {
    let app = test_router(ApiConfig::default());

    let response = app
        .clone()
        .oneshot(post_analyze("{}"))
        .await
        .unwrap();
    assert_eq!(response.headers()["X-Content-Type-Options"], "nosniff");
    assert_eq!(response.headers()["X-Frame-Options"], "DENY");
    assert!(response.headers().contains_key("X-Request-ID"));

    let mut request = post_analyze("{}");
    request
        .headers_mut()
        .insert("X-Request-ID", "client-req-7".parse().unwrap());
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.headers()["X-Request-ID"], "client-req-7");
}

#[tokio::test]
async fn test_rate_limiting() {
    let config = ApiConfig {
        rate_limit_rps: 1,
        rate_limit_burst: 1,
        ..Default::default()
    };
    let app = test_router(config);

    let from = |ip: &str| {
        let mut request = post_analyze("{}");
        request
            .headers_mut()
            .insert("X-Forwarded-For", ip.parse().unwrap());
        request
    };

    let first = app.clone().oneshot(from("192.168.1.100")).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = app.clone().oneshot(from("192.168.1.100")).await.unwrap();
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(second.headers()[header::RETRY_AFTER], "1");
    assert_eq!(json_body(second).await, json!({"error": "Rate limit exceeded"}));

    // Other clients are unaffected
    let other = app.clone().oneshot(from("192.168.1.101")).await.unwrap();
    assert_eq!(other.status(), StatusCode::OK);

    // Health probes sit outside the limited routes
    let health = app_health(&app).await;
    assert_eq!(health, StatusCode::OK);
}

#[tokio::test]
async fn test_body_size_limit() {
    let config = ApiConfig {
        max_body_size: 64,
        ..Default::default()
    };
    let app = test_router(config);

    let body = json!({"videos": [{"id": "x".repeat(200)}]}).to_string();
    let mut request = post_analyze(body.clone());
    request
        .headers_mut()
        .insert(header::CONTENT_LENGTH, body.len().into());

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
