use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::agent::params::GameKind;
use crate::agent::types::TetrisDelta;
use crate::response::{ok, AppError};
use crate::state::AppState;
use crate::validation;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/start-session", post(start_session))
        .route("/player-action", post(player_action))
        .route("/end-session", post(end_session))
        .route("/suggestion", get(suggestion))
        .route("/ai-stats", get(ai_stats))
}

async fn start_session(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    let started = state.engine().start_session(GameKind::Tetris).await;
    ok(started)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TetrisActionRequest {
    session_id: String,
    player_action: String,
    ai_response: Option<String>,
    outcome: String,
    /// Score/level/lines update carried with the action, if any.
    game_state: Option<TetrisDelta>,
    #[serde(default)]
    context: serde_json::Value,
}

async fn player_action(
    State(state): State<AppState>,
    Json(req): Json<TetrisActionRequest>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    validation::validate_session_id(&req.session_id).map_err(AppError::validation)?;
    validation::validate_outcome_label(&req.outcome).map_err(AppError::validation)?;

    let game_state = match &req.game_state {
        Some(delta) => Some(
            state
                .engine()
                .apply_tetris_delta(&req.session_id, delta)
                .await?,
        ),
        None => None,
    };

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
    Ok(ok(serde_json::json!({
        "event": event,
        "gameState": game_state,
    })))
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

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SuggestionQuery {
    session_id: String,
}

/// Difficulty-derived pacing parameters for one live session. Tetris has
/// no positional opponent, so this is the advisory counterpart to the
/// pingpong ai-move endpoint.
async fn suggestion(
    State(state): State<AppState>,
    Query(query): Query<SuggestionQuery>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    validation::validate_session_id(&query.session_id).map_err(AppError::validation)?;
    let (game, difficulty, params) = state
        .engine()
        .session_parameters(&query.session_id)
        .await?;
    if game != GameKind::Tetris {
        return Err(AppError::validation("session is not a tetris session"));
    }
    Ok(ok(serde_json::json!({
        "sessionId": query.session_id,
        "difficulty": difficulty,
        "parameters": params,
    })))
}

async fn ai_stats(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    let stats = state.engine().ai_stats(GameKind::Tetris).await;
    ok(stats)
}
