//! Wire-facing types shared across the agent: physical game state,
//! state deltas, move decisions, learning events, stats.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::params::{BehaviorParams, GameKind};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PingPongState {
    pub ball_x: f64,
    pub ball_y: f64,
    pub ball_vel_x: f64,
    pub ball_vel_y: f64,
    /// Opponent paddle center.
    pub ai_paddle_y: f64,
    pub player_paddle_y: f64,
    pub player_score: u32,
    pub ai_score: u32,
}

impl PingPongState {
    /// Serve position for a fresh session on the given field.
    pub fn initial(field_width: f64, field_height: f64) -> Self {
        Self {
            ball_x: field_width / 2.0,
            ball_y: field_height / 2.0,
            ball_vel_x: 5.0,
            ball_vel_y: 3.0,
            ai_paddle_y: field_height / 2.0,
            player_paddle_y: field_height / 2.0,
            player_score: 0,
            ai_score: 0,
        }
    }

    pub fn apply(&mut self, delta: &PingPongDelta) {
        if let Some(v) = delta.ball_x {
            self.ball_x = v;
        }
        if let Some(v) = delta.ball_y {
            self.ball_y = v;
        }
        if let Some(v) = delta.ball_vel_x {
            self.ball_vel_x = v;
        }
        if let Some(v) = delta.ball_vel_y {
            self.ball_vel_y = v;
        }
        if let Some(v) = delta.player_paddle_y {
            self.player_paddle_y = v;
        }
        if let Some(v) = delta.player_score {
            self.player_score = v;
        }
        if let Some(v) = delta.ai_score {
            self.ai_score = v;
        }
    }
}

/// Client-reported changes since the last tick. Absent fields keep the
/// server-side value.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PingPongDelta {
    pub ball_x: Option<f64>,
    pub ball_y: Option<f64>,
    pub ball_vel_x: Option<f64>,
    pub ball_vel_y: Option<f64>,
    pub player_paddle_y: Option<f64>,
    pub player_score: Option<u32>,
    pub ai_score: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TetrisState {
    pub score: u64,
    pub level: u32,
    pub lines_cleared: u32,
}

impl TetrisState {
    pub fn initial() -> Self {
        Self {
            score: 0,
            level: 1,
            lines_cleared: 0,
        }
    }

    pub fn apply(&mut self, delta: &TetrisDelta) {
        if let Some(v) = delta.score {
            self.score = v;
        }
        if let Some(v) = delta.level {
            self.level = v;
        }
        if let Some(v) = delta.lines_cleared {
            self.lines_cleared = v;
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TetrisDelta {
    pub score: Option<u64>,
    pub level: Option<u32>,
    pub lines_cleared: Option<u32>,
}

/// Per-session mutable numeric state, one variant per game type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PhysicalState {
    PingPong(PingPongState),
    Tetris(TetrisState),
}

impl PhysicalState {
    pub fn as_pingpong(&self) -> Option<&PingPongState> {
        match self {
            PhysicalState::PingPong(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_tetris(&self) -> Option<&TetrisState> {
        match self {
            PhysicalState::Tetris(s) => Some(s),
            _ => None,
        }
    }
}

/// Everything the transport layer needs to hand a client at session
/// start.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartedSession {
    pub session_id: String,
    pub game: GameKind,
    pub difficulty: f64,
    pub behavior_parameters: BehaviorParams,
    pub state: PhysicalState,
}

/// Opponent decision for one tick, with the difficulty and accuracy that
/// produced it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiMove {
    /// Absent when the session's game has no positional opponent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_y: Option<f64>,
    pub difficulty: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prediction_accuracy: Option<f64>,
    pub state: PhysicalState,
}

/// One recorded outcome, carrying the post-update difficulty snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningEvent {
    pub event_id: String,
    pub session_id: String,
    pub game: GameKind,
    pub timestamp: DateTime<Utc>,
    pub player_action: String,
    pub ai_response: String,
    pub outcome: String,
    pub outcome_value: f64,
    pub difficulty_level: f64,
    /// Caller-supplied context, passed through opaquely.
    #[serde(default)]
    pub context: serde_json::Value,
}

/// Close acknowledgement. `difficulty` is the model's level at close
/// time, which may differ from the session's starting snapshot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndedSession {
    pub session_id: String,
    pub game: GameKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_score: Option<i64>,
    pub difficulty: f64,
}

/// Live agent view for one game type.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentStats {
    pub game: GameKind,
    pub difficulty: f64,
    pub games_in_memory: usize,
    pub recent_outcomes: Vec<f64>,
    pub behavior_parameters: BehaviorParams,
    pub active_sessions: usize,
}
