use axum::http::Method;
use axum::Router;

use arcade_backend::agent::params::GameKind;
use arcade_backend::store::Store;

use super::http::{request, response_json};

pub fn seed_leaderboard(store: &Store, game: GameKind, player: &str, score: i64, difficulty: f64) {
    store.touch_player(player).expect("touch player");
    store
        .upsert_leaderboard_entry(game, player, score, difficulty)
        .expect("seed leaderboard entry");
}

/// Starts a session over HTTP and returns its id. `game` is the route
/// segment, "pingpong" or "tetris".
pub async fn start_session(app: &Router, game: &str) -> String {
    let resp = request(
        app,
        Method::POST,
        &format!("/api/{game}/start-session"),
        Some(serde_json::json!({})),
        &[],
    )
    .await;
    let (status, _, body) = response_json(resp).await;
    assert!(status.is_success(), "start-session failed: {body}");
    body["data"]["sessionId"]
        .as_str()
        .expect("sessionId in start response")
        .to_string()
}
