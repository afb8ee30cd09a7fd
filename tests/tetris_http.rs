mod common;

use axum::http::{Method, StatusCode};

use common::app::spawn_test_server;
use common::fixtures::start_session;
use common::http::{assert_json_error, assert_status_ok_json, request, response_json};

#[tokio::test]
async fn it_start_session_returns_tetris_params() {
    let app = spawn_test_server().await;

    let resp = request(
        &app.app,
        Method::POST,
        "/api/tetris/start-session",
        Some(serde_json::json!({})),
        &[],
    )
    .await;
    let (status, _, body) = response_json(resp).await;
    assert_status_ok_json(status, &body);

    let data = &body["data"];
    assert_eq!(data["game"], "tetris");
    assert_eq!(data["difficulty"], 0.5);

    let params = &data["behaviorParameters"];
    assert_eq!(params["dropSpeed"], 1.25);
    assert_eq!(params["rotationDelay"], 0.3);
    assert_eq!(params["lineClearBonus"], 1.25);

    let state = &data["state"];
    assert_eq!(state["score"], 0);
    assert_eq!(state["level"], 1);
    assert_eq!(state["linesCleared"], 0);
}

#[tokio::test]
async fn it_player_action_merges_reported_state() {
    let app = spawn_test_server().await;
    let session_id = start_session(&app.app, "tetris").await;

    let resp = request(
        &app.app,
        Method::POST,
        "/api/tetris/player-action",
        Some(serde_json::json!({
            "sessionId": session_id,
            "playerAction": "hard_drop",
            "outcome": "piece_placed",
            "gameState": { "score": 1500, "linesCleared": 3 }
        })),
        &[],
    )
    .await;
    let (status, _, body) = response_json(resp).await;
    assert_status_ok_json(status, &body);

    let data = &body["data"];
    assert_eq!(data["event"]["outcome"], "piece_placed");
    assert_eq!(data["event"]["outcomeValue"], 0.5);
    assert_eq!(data["gameState"]["score"], 1500);
    assert_eq!(data["gameState"]["linesCleared"], 3);
    // level was not in the delta, so the starting value holds
    assert_eq!(data["gameState"]["level"], 1);
}

#[tokio::test]
async fn it_player_action_without_state_skips_merge() {
    let app = spawn_test_server().await;
    let session_id = start_session(&app.app, "tetris").await;

    let resp = request(
        &app.app,
        Method::POST,
        "/api/tetris/player-action",
        Some(serde_json::json!({
            "sessionId": session_id,
            "playerAction": "rotate",
            "outcome": "move"
        })),
        &[],
    )
    .await;
    let (status, _, body) = response_json(resp).await;
    assert_status_ok_json(status, &body);
    assert!(body["data"]["gameState"].is_null());
    assert_eq!(body["data"]["event"]["outcomeValue"], 0.5);
}

#[tokio::test]
async fn it_suggestion_reports_session_pacing() {
    let app = spawn_test_server().await;
    let session_id = start_session(&app.app, "tetris").await;

    let resp = request(
        &app.app,
        Method::GET,
        &format!("/api/tetris/suggestion?sessionId={session_id}"),
        None,
        &[],
    )
    .await;
    let (status, _, body) = response_json(resp).await;
    assert_status_ok_json(status, &body);
    assert_eq!(body["data"]["sessionId"], session_id);
    assert_eq!(body["data"]["difficulty"], 0.5);
    assert_eq!(body["data"]["parameters"]["dropSpeed"], 1.25);
}

#[tokio::test]
async fn it_suggestion_rejects_pingpong_sessions() {
    let app = spawn_test_server().await;
    let session_id = start_session(&app.app, "pingpong").await;

    let resp = request(
        &app.app,
        Method::GET,
        &format!("/api/tetris/suggestion?sessionId={session_id}"),
        None,
        &[],
    )
    .await;
    let (status, _, body) = response_json(resp).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_json_error(&body, "VALIDATION_ERROR");
}

#[tokio::test]
async fn it_end_session_invalidates_id() {
    let app = spawn_test_server().await;
    let session_id = start_session(&app.app, "tetris").await;

    let resp = request(
        &app.app,
        Method::POST,
        "/api/tetris/end-session",
        Some(serde_json::json!({
            "sessionId": session_id,
            "finalScore": 8800,
            "playerName": "lin"
        })),
        &[],
    )
    .await;
    let (status, _, body) = response_json(resp).await;
    assert_status_ok_json(status, &body);
    assert_eq!(body["data"]["finalScore"], 8800);

    let follow_up = request(
        &app.app,
        Method::POST,
        "/api/tetris/player-action",
        Some(serde_json::json!({
            "sessionId": session_id,
            "playerAction": "rotate",
            "outcome": "move"
        })),
        &[],
    )
    .await;
    let (follow_status, _, follow_body) = response_json(follow_up).await;
    assert_eq!(follow_status, StatusCode::NOT_FOUND);
    assert_json_error(&follow_body, "SESSION_NOT_FOUND");
}
