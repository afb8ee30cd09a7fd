//! Outcome-driven difficulty estimation: a rolling history of match
//! results nudges a single [0,1] scalar, slowly, one bounded step per
//! recorded outcome.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tokio::sync::Mutex;

use super::config::DifficultyConfig;

/// Window mean above this means the opponent is dominating.
const WIN_RATE_HIGH: f64 = 0.7;
/// Window mean below this means the player is dominating.
const WIN_RATE_LOW: f64 = 0.3;
/// Population variance above this marks an unstable window.
const VARIANCE_THRESHOLD: f64 = 0.1;
/// Step for a lopsided window.
const STEP_LARGE: f64 = 0.1;
/// Step for a balanced window.
const STEP_SMALL: f64 = 0.02;

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance; 0 for windows with fewer than 2 samples.
fn population_variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64
}

/// One model per game type, shared by every session of that type.
#[derive(Debug, Clone)]
pub struct DifficultyModel {
    level: f64,
    learning_rate: f64,
    memory_size: usize,
    read_window: usize,
    history: VecDeque<f64>,
}

impl DifficultyModel {
    pub fn new(config: &DifficultyConfig) -> Self {
        Self {
            level: config.initial_level.clamp(0.0, 1.0),
            learning_rate: config.learning_rate,
            memory_size: config.memory_size,
            read_window: config.read_window,
            history: VecDeque::with_capacity(config.memory_size),
        }
    }

    pub fn level(&self) -> f64 {
        self.level
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn history(&self) -> impl Iterator<Item = f64> + '_ {
        self.history.iter().copied()
    }

    /// Newest `read_window` outcomes, oldest first.
    pub fn recent_window(&self) -> Vec<f64> {
        let skip = self.history.len().saturating_sub(self.read_window);
        self.history.iter().skip(skip).copied().collect()
    }

    /// Applies the adjustment rule to one outcome window and returns the
    /// new level. Empty windows leave the level untouched.
    pub fn update(&mut self, recent_outcomes: &[f64]) -> f64 {
        if recent_outcomes.is_empty() {
            return self.level;
        }
        let win_rate = mean(recent_outcomes);
        let variance = population_variance(recent_outcomes);

        let step = if win_rate > WIN_RATE_HIGH {
            STEP_LARGE
        } else if win_rate < WIN_RATE_LOW {
            -STEP_LARGE
        } else if variance > VARIANCE_THRESHOLD {
            STEP_SMALL
        } else {
            -STEP_SMALL
        };

        self.level = (self.level + step * self.learning_rate).clamp(0.0, 1.0);
        self.level
    }

    /// Appends one outcome value, evicting the oldest entry past
    /// capacity, and re-runs the adjustment rule once the read window is
    /// filled. Returns the post-update level.
    pub fn record(&mut self, outcome_value: f64) -> f64 {
        self.history.push_back(outcome_value);
        if self.history.len() > self.memory_size {
            self.history.pop_front();
        }
        if self.history.len() >= self.read_window {
            let window = self.recent_window();
            self.update(&window);
        }
        self.level
    }
}

/// Live view of one model, safe to serialize into stats responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultySnapshot {
    pub level: f64,
    pub games_in_memory: usize,
    pub recent_outcomes: Vec<f64>,
}

/// Mutex-guarded model with a lock-free level mirror. Mutation goes
/// through the mutex; display/metrics reads load the atomic bits and may
/// trail an in-flight update.
#[derive(Debug)]
pub struct SharedDifficulty {
    model: Mutex<DifficultyModel>,
    level_bits: AtomicU64,
}

impl SharedDifficulty {
    pub fn new(config: &DifficultyConfig) -> Self {
        let model = DifficultyModel::new(config);
        let bits = model.level().to_bits();
        Self {
            model: Mutex::new(model),
            level_bits: AtomicU64::new(bits),
        }
    }

    /// Eventually-consistent level read, no lock taken.
    pub fn level(&self) -> f64 {
        f64::from_bits(self.level_bits.load(Ordering::Acquire))
    }

    pub async fn record(&self, outcome_value: f64) -> f64 {
        let mut model = self.model.lock().await;
        let level = model.record(outcome_value);
        self.level_bits.store(level.to_bits(), Ordering::Release);
        level
    }

    pub async fn snapshot(&self) -> DifficultySnapshot {
        let model = self.model.lock().await;
        DifficultySnapshot {
            level: model.level(),
            games_in_memory: model.history_len(),
            recent_outcomes: model.recent_window(),
        }
    }

    #[cfg(test)]
    pub async fn history_values(&self) -> Vec<f64> {
        self.model.lock().await.history().collect()
    }
}
