mod common;

use axum::http::{Method, StatusCode};

use common::app::spawn_test_server_with_limits;
use common::http::{assert_json_error, request, response_json};

#[tokio::test]
async fn it_rate_limit_triggers_429_with_headers() {
    let app = spawn_test_server_with_limits(3).await;

    let mut final_status = StatusCode::OK;
    let mut final_headers = axum::http::HeaderMap::new();
    let mut final_body = serde_json::Value::Null;

    for _ in 0..4 {
        let response = request(&app.app, Method::GET, "/api/pingpong/ai-stats", None, &[]).await;
        let (status, headers, body) = response_json(response).await;
        final_status = status;
        final_headers = headers;
        final_body = body;
    }

    assert_eq!(final_status, StatusCode::TOO_MANY_REQUESTS);
    assert_json_error(&final_body, "RATE_LIMITED");
    assert!(final_headers.get("retry-after").is_some());
    assert!(final_headers.get("ratelimit-limit").is_some());
    assert!(final_headers.get("ratelimit-remaining").is_some());
    assert!(final_headers.get("ratelimit-reset").is_some());
}

#[tokio::test]
async fn it_allowed_requests_carry_quota_headers() {
    let app = spawn_test_server_with_limits(10).await;

    let response = request(&app.app, Method::GET, "/api/pingpong/ai-stats", None, &[]).await;
    let (status, headers, _) = response_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        headers.get("ratelimit-limit").and_then(|v| v.to_str().ok()),
        Some("10")
    );
    assert_eq!(
        headers
            .get("ratelimit-remaining")
            .and_then(|v| v.to_str().ok()),
        Some("9")
    );
}

#[tokio::test]
async fn it_health_probes_are_exempt() {
    let app = spawn_test_server_with_limits(1).await;

    for _ in 0..5 {
        let response = request(&app.app, Method::GET, "/health/live", None, &[]).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
