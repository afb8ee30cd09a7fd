use chrono::{Duration, Utc};

use crate::agent::engine::AgentEngine;
use crate::agent::params::GameKind;
use crate::store::operations::ai_metrics::AiMetricSample;
use crate::store::Store;

/// Flushed samples older than this are dropped on each run.
const RETENTION_DAYS: i64 = 7;

pub async fn run(engine: &AgentEngine, store: &Store) {
    tracing::debug!("metrics_flush: start");

    for game in GameKind::ALL {
        let stats = engine.ai_stats(game).await;
        let recent_win_rate = if stats.recent_outcomes.is_empty() {
            None
        } else {
            Some(stats.recent_outcomes.iter().sum::<f64>() / stats.recent_outcomes.len() as f64)
        };
        let sample = AiMetricSample {
            game,
            difficulty: stats.difficulty,
            games_in_memory: stats.games_in_memory,
            recent_win_rate,
            active_sessions: stats.active_sessions,
            recorded_at: Utc::now(),
        };
        if let Err(e) = store.insert_ai_metric(&sample) {
            tracing::error!(error=%e, game=%game, "metrics_flush: failed to persist sample");
        }
    }

    match store.prune_ai_metrics(Utc::now() - Duration::days(RETENTION_DAYS)) {
        Ok(removed) => tracing::debug!(removed, "metrics_flush: done"),
        Err(e) => tracing::error!(error=%e, "metrics_flush: prune failed"),
    }
}
