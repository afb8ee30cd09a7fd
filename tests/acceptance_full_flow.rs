mod common;

use axum::http::{Method, StatusCode};

use common::app::spawn_test_server;
use common::fixtures::start_session;
use common::http::{request, response_json};

/// Start → play → learn → close, end to end over HTTP: ten player wins
/// pull the shared model down, the ended session lands on the
/// leaderboard, and a new session starts at the moved level.
#[tokio::test]
async fn at_full_flow_smoke() {
    let app = spawn_test_server().await;
    let session_id = start_session(&app.app, "pingpong").await;

    let mv = request(
        &app.app,
        Method::POST,
        "/api/pingpong/ai-move",
        Some(serde_json::json!({
            "sessionId": session_id,
            "gameState": { "ballX": 600.0, "ballY": 200.0, "ballVelX": 8.0, "ballVelY": 4.0 }
        })),
        &[],
    )
    .await;
    let (mv_status, _, mv_body) = response_json(mv).await;
    assert_eq!(mv_status, StatusCode::OK);
    assert!(mv_body["data"]["aiY"].as_f64().is_some());

    let mut last_level = 0.5;
    for _ in 0..10 {
        let action = request(
            &app.app,
            Method::POST,
            "/api/pingpong/player-action",
            Some(serde_json::json!({
                "sessionId": session_id,
                "playerAction": "paddle_up",
                "aiResponse": "track",
                "outcome": "player_win"
            })),
            &[],
        )
        .await;
        let (status, _, body) = response_json(action).await;
        assert_eq!(status, StatusCode::OK);
        last_level = body["data"]["difficultyLevel"].as_f64().unwrap();
    }
    // the tenth outcome fills the window and nudges the level down
    assert!(last_level < 0.5);

    let end = request(
        &app.app,
        Method::POST,
        "/api/pingpong/end-session",
        Some(serde_json::json!({
            "sessionId": session_id,
            "finalScore": 17,
            "playerName": "grace"
        })),
        &[],
    )
    .await;
    let (end_status, _, end_body) = response_json(end).await;
    assert_eq!(end_status, StatusCode::OK);
    assert_eq!(end_body["data"]["finalScore"], 17);

    // the moved model is what a NEW session snapshots
    let restart = request(
        &app.app,
        Method::POST,
        "/api/pingpong/start-session",
        Some(serde_json::json!({})),
        &[],
    )
    .await;
    let (_, _, restart_body) = response_json(restart).await;
    assert_eq!(restart_body["data"]["difficulty"], last_level);

    let board = request(&app.app, Method::GET, "/api/leaderboard/pingpong", None, &[]).await;
    let (board_status, _, board_body) = response_json(board).await;
    assert_eq!(board_status, StatusCode::OK);
    let entries = board_body["data"]["entries"].as_array().unwrap();
    assert_eq!(entries[0]["playerName"], "grace");

    let stats = request(&app.app, Method::GET, "/api/stats", None, &[]).await;
    let (stats_status, _, stats_body) = response_json(stats).await;
    assert_eq!(stats_status, StatusCode::OK);
    let pingpong = &stats_body["data"]["arcadeStats"]["games"]["pingpong"];
    assert_eq!(pingpong["aiDifficulty"], last_level);

    let health = request(&app.app, Method::GET, "/health/live", None, &[]).await;
    let (health_status, _, _) = response_json(health).await;
    assert_eq!(health_status, StatusCode::OK);
}

/// The two game types run against independent models: a lopsided
/// pingpong run leaves tetris untouched.
#[tokio::test]
async fn at_models_are_isolated_per_game() {
    let app = spawn_test_server().await;
    let pingpong_id = start_session(&app.app, "pingpong").await;

    for _ in 0..10 {
        let action = request(
            &app.app,
            Method::POST,
            "/api/pingpong/player-action",
            Some(serde_json::json!({
                "sessionId": pingpong_id,
                "playerAction": "paddle_up",
                "outcome": "ai_win"
            })),
            &[],
        )
        .await;
        let (status, _, _) = response_json(action).await;
        assert_eq!(status, StatusCode::OK);
    }

    let pingpong_stats = request(&app.app, Method::GET, "/api/pingpong/ai-stats", None, &[]).await;
    let (_, _, pingpong_body) = response_json(pingpong_stats).await;
    assert!(pingpong_body["data"]["difficulty"].as_f64().unwrap() > 0.5);

    let tetris_stats = request(&app.app, Method::GET, "/api/tetris/ai-stats", None, &[]).await;
    let (_, _, tetris_body) = response_json(tetris_stats).await;
    assert_eq!(tetris_body["data"]["difficulty"], 0.5);
    assert_eq!(tetris_body["data"]["gamesInMemory"], 0);
}
