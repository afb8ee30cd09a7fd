use axum::extract::State;

use crate::agent::params::GameKind;
use crate::response::{ok, AppError};
use crate::state::AppState;

/// Arcade-wide aggregates across both games.
pub async fn arcade_stats(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let total_players = state.store().count_players()?;
    let total_sessions = state.store().count_game_sessions()?;

    let mut games = serde_json::Map::new();
    for game in GameKind::ALL {
        let stats = state.engine().ai_stats(game).await;
        games.insert(
            game.as_str().to_string(),
            serde_json::json!({
                "sessions": state.store().count_game_sessions_for(game)?,
                "recordedEvents": state.store().count_learning_events_for(game)?,
                "activeSessions": stats.active_sessions,
                "aiDifficulty": stats.difficulty,
            }),
        );
    }

    Ok(ok(serde_json::json!({
        "arcadeStats": {
            "totalPlayers": total_players,
            "totalSessions": total_sessions,
            "games": games,
            "counters": state.engine().metrics().snapshot(),
        },
    })))
}
