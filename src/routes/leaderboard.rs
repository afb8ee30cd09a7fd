use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::Router;
use serde::{Deserialize, Serialize};

use crate::agent::params::GameKind;
use crate::response::{ok, AppError};
use crate::state::AppState;
use crate::store::operations::leaderboard::LeaderboardEntry;

const GLOBAL_TOP_DEFAULT: usize = 5;
const GAME_TOP_DEFAULT: usize = 20;
const TOP_LIMIT_MAX: usize = 100;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(global_leaderboard))
        .route("/ai-performance", get(ai_performance))
        .route("/rankings", get(rankings))
        .route("/player/:player_name", get(player_stats))
        .route("/:game", get(game_leaderboard))
}

#[derive(Debug, Deserialize)]
struct LimitQuery {
    limit: Option<usize>,
}

fn clamp_limit(limit: Option<usize>, default: usize) -> usize {
    limit.unwrap_or(default).clamp(1, TOP_LIMIT_MAX)
}

fn parse_game(raw: &str) -> Result<GameKind, AppError> {
    GameKind::parse(raw)
        .ok_or_else(|| AppError::validation(&format!("unknown game type: {raw}")))
}

/// Per-game top scores, side by side.
async fn global_leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let limit = clamp_limit(query.limit, GLOBAL_TOP_DEFAULT);
    let mut games = serde_json::Map::new();
    for game in GameKind::ALL {
        let entries = state.store().top_leaderboard(game, limit)?;
        games.insert(
            game.as_str().to_string(),
            serde_json::json!({
                "topScores": entries,
                "totalPlayers": entries.len(),
            }),
        );
    }
    Ok(ok(serde_json::json!({ "games": games })))
}

async fn game_leaderboard(
    State(state): State<AppState>,
    Path(raw_game): Path<String>,
    Query(query): Query<LimitQuery>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let game = parse_game(&raw_game)?;
    let limit = clamp_limit(query.limit, GAME_TOP_DEFAULT);
    let entries = state.store().top_leaderboard(game, limit)?;
    Ok(ok(serde_json::json!({
        "game": game,
        "entries": entries,
        "totalEntries": entries.len(),
    })))
}

async fn player_stats(
    State(state): State<AppState>,
    Path(player_name): Path<String>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let player = state.store().get_player(&player_name)?;
    let entries = state.store().player_leaderboard_entries(&player_name)?;
    if player.is_none() && entries.is_empty() {
        return Err(AppError::player_not_found());
    }
    Ok(ok(serde_json::json!({
        "playerName": player_name,
        "player": player,
        "entries": entries,
    })))
}

/// Model health per game: live difficulty plus the flushed history.
async fn ai_performance(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let mut games = serde_json::Map::new();
    let mut total_samples = 0usize;
    for game in GameKind::ALL {
        let stats = state.engine().ai_stats(game).await;
        let samples = state.store().recent_ai_metrics(game, 20)?;
        let recorded_events = state.store().count_learning_events_for(game)?;
        total_samples += samples.len();
        games.insert(
            game.as_str().to_string(),
            serde_json::json!({
                "currentDifficulty": stats.difficulty,
                "gamesInMemory": stats.games_in_memory,
                "activeSessions": stats.active_sessions,
                "recordedEvents": recorded_events,
                "samples": samples,
            }),
        );
    }
    Ok(ok(serde_json::json!({
        "aiPerformance": games,
        "summary": { "totalSamples": total_samples },
    })))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RankedGame {
    score: i64,
    difficulty: f64,
    rank: usize,
    achieved_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PlayerRanking {
    player_name: String,
    games: HashMap<&'static str, RankedGame>,
    total_score: i64,
    games_played: usize,
}

/// Combined cross-game standing: each player's best per game plus the
/// summed total, ordered by total score.
async fn rankings(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let mut by_player: HashMap<String, PlayerRanking> = HashMap::new();

    for game in GameKind::ALL {
        let entries: Vec<LeaderboardEntry> = state.store().top_leaderboard(game, 10)?;
        for (index, entry) in entries.into_iter().enumerate() {
            let ranking = by_player
                .entry(entry.player_name.clone())
                .or_insert_with(|| PlayerRanking {
                    player_name: entry.player_name.clone(),
                    games: HashMap::new(),
                    total_score: 0,
                    games_played: 0,
                });
            ranking.total_score += entry.score;
            ranking.games_played += 1;
            ranking.games.insert(
                game.as_str(),
                RankedGame {
                    score: entry.score,
                    difficulty: entry.difficulty,
                    rank: index + 1,
                    achieved_at: entry.achieved_at,
                },
            );
        }
    }

    let total_players = by_player.len();
    let mut rankings: Vec<PlayerRanking> = by_player.into_values().collect();
    rankings.sort_by(|a, b| b.total_score.cmp(&a.total_score));
    rankings.truncate(20);

    Ok(ok(serde_json::json!({
        "playerRankings": rankings,
        "totalPlayers": total_players,
    })))
}
