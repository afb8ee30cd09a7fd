//! Difficulty level → behavior parameters, one fixed interpolation
//! table per game type. Direction is per-parameter: "harder" means a
//! shorter reaction time but a faster paddle.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::config::{AgentConfig, PingPongParamConfig, TetrisParamConfig};

/// Swing of the ball speed modifier around its 1.0 midpoint.
const BALL_SPEED_SWING: f64 = 0.4;
/// Scale of the line-clear score bonus at full difficulty.
const LINE_CLEAR_SCALE: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameKind {
    PingPong,
    Tetris,
}

impl GameKind {
    pub const ALL: [GameKind; 2] = [GameKind::PingPong, GameKind::Tetris];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameKind::PingPong => "pingpong",
            GameKind::Tetris => "tetris",
        }
    }

    pub fn parse(s: &str) -> Option<GameKind> {
        match s {
            "pingpong" => Some(GameKind::PingPong),
            "tetris" => Some(GameKind::Tetris),
            _ => None,
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Clamped linear blend over the [0,1] domain: inputs at or past an
/// endpoint return that endpoint's output exactly, never extrapolate.
pub fn interp(d: f64, at_zero: f64, at_one: f64) -> f64 {
    if d <= 0.0 {
        at_zero
    } else if d >= 1.0 {
        at_one
    } else {
        at_zero + (at_one - at_zero) * d
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PingPongParams {
    /// Seconds the opponent waits before reacting. Inverted mapping.
    pub reaction_time: f64,
    /// Probability the trajectory estimate is used unperturbed.
    pub prediction_accuracy: f64,
    /// Field units the paddle may travel per tick.
    pub paddle_speed: f64,
    pub ball_speed_modifier: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TetrisParams {
    pub drop_speed: f64,
    /// Seconds between opponent rotations. Inverted mapping.
    pub rotation_delay: f64,
    pub line_clear_bonus: f64,
}

/// Parameter set for one game type. Serialized untagged so responses
/// carry the plain per-game fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BehaviorParams {
    PingPong(PingPongParams),
    Tetris(TetrisParams),
}

impl BehaviorParams {
    pub fn game(&self) -> GameKind {
        match self {
            BehaviorParams::PingPong(_) => GameKind::PingPong,
            BehaviorParams::Tetris(_) => GameKind::Tetris,
        }
    }

    pub fn as_pingpong(&self) -> Option<&PingPongParams> {
        match self {
            BehaviorParams::PingPong(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_tetris(&self) -> Option<&TetrisParams> {
        match self {
            BehaviorParams::Tetris(p) => Some(p),
            _ => None,
        }
    }
}

pub fn pingpong_params(level: f64, config: &PingPongParamConfig) -> PingPongParams {
    PingPongParams {
        reaction_time: interp(level, config.reaction_time_max, config.reaction_time_min),
        prediction_accuracy: interp(
            level,
            config.prediction_accuracy_min,
            config.prediction_accuracy_max,
        ),
        paddle_speed: interp(level, config.paddle_speed_min, config.paddle_speed_max),
        ball_speed_modifier: 1.0 + (level - 0.5) * BALL_SPEED_SWING,
    }
}

pub fn tetris_params(level: f64, config: &TetrisParamConfig) -> TetrisParams {
    TetrisParams {
        drop_speed: interp(level, config.drop_speed_min, config.drop_speed_max),
        rotation_delay: interp(level, config.rotation_delay_max, config.rotation_delay_min),
        line_clear_bonus: 1.0 + level * LINE_CLEAR_SCALE,
    }
}

/// Total over the closed set of game types.
pub fn params_for(game: GameKind, level: f64, config: &AgentConfig) -> BehaviorParams {
    match game {
        GameKind::PingPong => BehaviorParams::PingPong(pingpong_params(level, &config.pingpong)),
        GameKind::Tetris => BehaviorParams::Tetris(tetris_params(level, &config.tetris)),
    }
}
