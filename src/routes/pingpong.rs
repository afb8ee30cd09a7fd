use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::agent::params::GameKind;
use crate::agent::types::PingPongDelta;
use crate::response::{ok, AppError};
use crate::state::AppState;
use crate::validation;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/start-session", post(start_session))
        .route("/ai-move", post(ai_move))
        .route("/player-action", post(player_action))
        .route("/end-session", post(end_session))
        .route("/ai-stats", get(ai_stats))
}

async fn start_session(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    let started = state.engine().start_session(GameKind::PingPong).await;
    ok(started)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AiMoveRequest {
    session_id: String,
    /// Client-reported state changes since the last tick. Absent fields
    /// leave the server-side value untouched.
    #[serde(default)]
    game_state: PingPongDelta,
}

async fn ai_move(
    State(state): State<AppState>,
    Json(req): Json<AiMoveRequest>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    validation::validate_session_id(&req.session_id).map_err(AppError::validation)?;
    let mv = state
        .engine()
        .compute_move(&req.session_id, &req.game_state)
        .await?;
    Ok(ok(mv))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerActionRequest {
    session_id: String,
    player_action: String,
    ai_response: Option<String>,
    outcome: String,
    #[serde(default)]
    context: serde_json::Value,
}

async fn player_action(
    State(state): State<AppState>,
    Json(req): Json<PlayerActionRequest>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    validation::validate_session_id(&req.session_id).map_err(AppError::validation)?;
    validation::validate_outcome_label(&req.outcome).map_err(AppError::validation)?;

    let event = state
        .engine()
        .record_outcome(
            &req.session_id,
            &req.player_action,
            req.ai_response.as_deref().unwrap_or(""),
            &req.outcome,
            req.context,
        )
        .await?;
    Ok(ok(event))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EndSessionRequest {
    session_id: String,
    final_score: Option<i64>,
    player_name: Option<String>,
    outcome: Option<String>,
}

async fn end_session(
    State(state): State<AppState>,
    Json(req): Json<EndSessionRequest>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    validation::validate_session_id(&req.session_id).map_err(AppError::validation)?;
    if let Some(name) = &req.player_name {
        validation::validate_player_name(name).map_err(AppError::validation)?;
    }
    if let Some(score) = req.final_score {
        if score < 0 {
            return Err(AppError::validation("finalScore must be non-negative"));
        }
    }
    if let Some(label) = &req.outcome {
        validation::validate_outcome_label(label).map_err(AppError::validation)?;
    }

    let ended = state
        .engine()
        .end_session(
            &req.session_id,
            req.final_score,
            req.player_name.as_deref(),
            req.outcome.as_deref(),
        )
        .await?;
    Ok(ok(ended))
}

async fn ai_stats(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    let stats = state.engine().ai_stats(GameKind::PingPong).await;
    ok(stats)
}
