use axum::body::{to_bytes, Body};
use axum::http::{HeaderMap, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::Value;
use tower::util::ServiceExt;

/// One-shot a request against the router. A `Some` body is sent as JSON.
pub async fn request(
    app: &Router,
    method: Method,
    path: &str,
    body: Option<Value>,
    headers: &[(&str, String)],
) -> Response {
    let builder = headers.iter().fold(
        Request::builder().method(method).uri(path),
        |b, (name, value)| b.header(*name, value.as_str()),
    );

    let req = match body {
        Some(payload) => builder
            .header("content-type", "application/json")
            .body(Body::from(
                serde_json::to_vec(&payload).expect("serialize request body"),
            )),
        None => builder.body(Body::empty()),
    }
    .expect("build request");

    app.clone().oneshot(req).await.expect("oneshot response")
}

/// Splits a response into status, headers and parsed JSON body.
/// Empty bodies (e.g. preflight responses) come back as `{}`.
pub async fn response_json(resp: Response) -> (StatusCode, HeaderMap, Value) {
    let (parts, body) = resp.into_parts();
    let bytes = to_bytes(body, usize::MAX).await.expect("read body bytes");

    let json = match bytes.is_empty() {
        true => Value::Object(Default::default()),
        false => serde_json::from_slice(&bytes).expect("parse json body"),
    };

    (parts.status, parts.headers, json)
}

/// Asserts the arcade error envelope: `success: false`, the stable error
/// code, a human-readable message, and the traceId echoed by the
/// request-id middleware.
pub fn assert_json_error(body: &Value, code: &str) {
    assert_eq!(body["success"], Value::Bool(false), "body: {body}");
    assert_eq!(body["code"].as_str(), Some(code), "body: {body}");
    assert!(
        body["message"].as_str().is_some_and(|m| !m.is_empty()),
        "error body missing message: {body}"
    );
    assert!(
        body["traceId"].as_str().is_some_and(|t| !t.is_empty()),
        "error body missing traceId: {body}"
    );
}

/// Asserts the success envelope: 2xx status, `success: true` and a
/// `data` payload, with no error code smuggled in.
pub fn assert_status_ok_json(status: StatusCode, body: &Value) {
    assert!(status.is_success(), "status {status}, body: {body}");
    assert_eq!(body["success"], Value::Bool(true), "body: {body}");
    assert!(body.get("data").is_some(), "missing data: {body}");
    assert!(body.get("code").is_none(), "unexpected code: {body}");
}
