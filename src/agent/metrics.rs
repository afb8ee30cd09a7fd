use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use super::params::GameKind;

#[derive(Default)]
pub struct GameCounters {
    pub sessions_started: AtomicU64,
    pub sessions_ended: AtomicU64,
    pub moves_computed: AtomicU64,
    pub outcomes_recorded: AtomicU64,
}

impl GameCounters {
    fn snapshot(&self) -> GameCountersSnapshot {
        GameCountersSnapshot {
            sessions_started: self.sessions_started.load(Ordering::Relaxed),
            sessions_ended: self.sessions_ended.load(Ordering::Relaxed),
            moves_computed: self.moves_computed.load(Ordering::Relaxed),
            outcomes_recorded: self.outcomes_recorded.load(Ordering::Relaxed),
        }
    }
}

/// Process-lifetime counters, cheap to bump from any handler.
#[derive(Default)]
pub struct AgentMetrics {
    pingpong: GameCounters,
    tetris: GameCounters,
    pub persist_failures: AtomicU64,
    pub sessions_expired: AtomicU64,
    pub rate_limited: AtomicU64,
}

impl AgentMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn game(&self, game: GameKind) -> &GameCounters {
        match game {
            GameKind::PingPong => &self.pingpong,
            GameKind::Tetris => &self.tetris,
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            pingpong: self.pingpong.snapshot(),
            tetris: self.tetris.snapshot(),
            persist_failures: self.persist_failures.load(Ordering::Relaxed),
            sessions_expired: self.sessions_expired.load(Ordering::Relaxed),
            rate_limited: self.rate_limited.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameCountersSnapshot {
    pub sessions_started: u64,
    pub sessions_ended: u64,
    pub moves_computed: u64,
    pub outcomes_recorded: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub pingpong: GameCountersSnapshot,
    pub tetris: GameCountersSnapshot,
    pub persist_failures: u64,
    pub sessions_expired: u64,
    pub rate_limited: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate_per_game() {
        let metrics = AgentMetrics::new();
        metrics
            .game(GameKind::PingPong)
            .moves_computed
            .fetch_add(3, Ordering::Relaxed);
        metrics
            .game(GameKind::Tetris)
            .sessions_started
            .fetch_add(1, Ordering::Relaxed);

        let snap = metrics.snapshot();
        assert_eq!(snap.pingpong.moves_computed, 3);
        assert_eq!(snap.tetris.sessions_started, 1);
        assert_eq!(snap.pingpong.sessions_started, 0);
    }
}
