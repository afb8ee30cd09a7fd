use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::agent::params::GameKind;
use crate::store::keys;
use crate::store::{Store, StoreError};

/// Periodic snapshot of one game's shared model, written by the
/// metrics-flush worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiMetricSample {
    pub game: GameKind,
    pub difficulty: f64,
    pub games_in_memory: usize,
    pub recent_win_rate: Option<f64>,
    pub active_sessions: usize,
    pub recorded_at: DateTime<Utc>,
}

impl Store {
    pub fn insert_ai_metric(&self, sample: &AiMetricSample) -> Result<(), StoreError> {
        let key = keys::ai_metric_key(sample.game, sample.recorded_at.timestamp_millis());
        self.ai_metrics
            .insert(key.as_bytes(), Self::serialize(sample)?)?;
        Ok(())
    }

    /// Newest samples first, capped at `limit`.
    pub fn recent_ai_metrics(
        &self,
        game: GameKind,
        limit: usize,
    ) -> Result<Vec<AiMetricSample>, StoreError> {
        let prefix = keys::ai_metric_prefix(game);
        let mut samples = Vec::new();
        for item in self.ai_metrics.scan_prefix(prefix.as_bytes()) {
            let (_, value) = item?;
            samples.push(Self::deserialize::<AiMetricSample>(&value)?);
            if samples.len() >= limit {
                break;
            }
        }
        Ok(samples)
    }

    /// Drops samples recorded before the cutoff. Returns how many were
    /// removed.
    pub fn prune_ai_metrics(&self, cutoff: DateTime<Utc>) -> Result<usize, StoreError> {
        let cutoff_ms = cutoff.timestamp_millis();
        let mut stale = Vec::new();
        for item in self.ai_metrics.iter() {
            let (key, _) = item?;
            if let Some(ts) = keys::parse_reverse_timestamp_ms(&key) {
                if ts < cutoff_ms {
                    stale.push(key);
                }
            }
        }
        let removed = stale.len();
        for key in stale {
            self.ai_metrics.remove(key)?;
        }
        Ok(removed)
    }
}
