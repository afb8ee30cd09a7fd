//! Turns outcome labels into structured learning events: encode the
//! label, move the shared model, then hand the event to the store
//! without making the caller wait on it.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::store::Store;

use super::difficulty::SharedDifficulty;
use super::metrics::AgentMetrics;
use super::params::GameKind;
use super::types::LearningEvent;

/// Encodes an outcome label into the model's [0,1] scale. Unrecognized
/// labels (move, rotate, piece_placed, ...) are neutral events.
pub fn outcome_value(label: &str) -> f64 {
    match label {
        "ai_win" | "opponent_win" => 1.0,
        "player_win" => 0.0,
        _ => 0.5,
    }
}

pub struct LearningRecorder {
    store: Arc<Store>,
    metrics: Arc<AgentMetrics>,
}

impl LearningRecorder {
    pub fn new(store: Arc<Store>, metrics: Arc<AgentMetrics>) -> Self {
        Self { store, metrics }
    }

    /// Records one outcome against the given model and returns the event
    /// carrying the post-update difficulty snapshot.
    #[allow(clippy::too_many_arguments)]
    pub async fn record(
        &self,
        model: &SharedDifficulty,
        game: GameKind,
        session_id: &str,
        player_action: &str,
        ai_response: &str,
        outcome: &str,
        context: serde_json::Value,
    ) -> LearningEvent {
        let value = outcome_value(outcome);
        let difficulty_level = model.record(value).await;

        let event = LearningEvent {
            event_id: Uuid::new_v4().to_string(),
            session_id: session_id.to_string(),
            game,
            timestamp: Utc::now(),
            player_action: player_action.to_string(),
            ai_response: ai_response.to_string(),
            outcome: outcome.to_string(),
            outcome_value: value,
            difficulty_level,
            context,
        };

        self.metrics
            .game(game)
            .outcomes_recorded
            .fetch_add(1, Ordering::Relaxed);
        self.spawn_persist(event.clone());
        event
    }

    /// Fire-and-forget: a failed write is logged and counted, never
    /// surfaced to the move/outcome flow.
    fn spawn_persist(&self, event: LearningEvent) {
        let store = self.store.clone();
        let metrics = self.metrics.clone();
        tokio::spawn(async move {
            if let Err(e) = store.insert_learning_event(&event) {
                metrics.persist_failures.fetch_add(1, Ordering::Relaxed);
                tracing::error!(error=%e, event_id=%event.event_id, "failed to persist learning event");
            }
        });
    }
}
