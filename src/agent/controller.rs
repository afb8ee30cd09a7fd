//! Pingpong opponent controller: one pure decision per tick from ball
//! kinematics and the paddle's last position. Imperfection comes from an
//! accuracy-gated Gaussian draw on the intercept estimate, so low
//! accuracy means noise more often, never larger noise.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::Serialize;

use super::config::FieldConfig;
use super::params::PingPongParams;
use super::types::PingPongState;

/// Gap below which a tracking paddle holds still.
const TRACK_DEAD_ZONE: f64 = 5.0;
/// Gap below which a recentering paddle holds still.
const DRIFT_DEAD_ZONE: f64 = 10.0;
/// Recentering runs at this fraction of paddle speed.
const DRIFT_SPEED_FACTOR: f64 = 0.5;

/// One tick's paddle decision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaddleMove {
    pub paddle_y: f64,
    /// Clamped intercept estimate, present only while the ball approaches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predicted_y: Option<f64>,
}

/// Linear extrapolation of the ball to the opponent's edge. Caller
/// guarantees `ball_vel_x > 0`.
fn predict_intercept_y(state: &PingPongState, field: &FieldConfig) -> f64 {
    let time_to_arrival = (field.width - state.ball_x) / state.ball_vel_x;
    state.ball_y + state.ball_vel_y * time_to_arrival
}

/// Moves `current` toward `target` by at most `max_step`, holding inside
/// the dead zone, and clamps the result into the travel band.
fn step_toward(
    current: f64,
    target: f64,
    max_step: f64,
    dead_zone: f64,
    field: &FieldConfig,
) -> f64 {
    let gap = target - current;
    if gap.abs() <= dead_zone {
        return current;
    }
    let step = gap.abs().min(max_step);
    let next = if gap > 0.0 {
        current + step
    } else {
        current - step
    };
    next.clamp(field.travel_min(), field.travel_max())
}

pub fn compute_move<R: Rng>(
    state: &PingPongState,
    params: &PingPongParams,
    field: &FieldConfig,
    noise_sigma: f64,
    rng: &mut R,
) -> PaddleMove {
    let current = state.ai_paddle_y;

    if state.ball_vel_x > 0.0 {
        let mut predicted = predict_intercept_y(state, field);
        if rng.gen::<f64>() > params.prediction_accuracy {
            // sigma 已在启动时校验为正
            let noise = Normal::new(0.0, noise_sigma)
                .map(|n| n.sample(rng))
                .unwrap_or(0.0);
            predicted += noise;
        }
        let predicted = predicted.clamp(field.travel_min(), field.travel_max());
        let paddle_y = step_toward(current, predicted, params.paddle_speed, TRACK_DEAD_ZONE, field);
        PaddleMove {
            paddle_y,
            predicted_y: Some(predicted),
        }
    } else {
        let paddle_y = step_toward(
            current,
            field.center_y(),
            params.paddle_speed * DRIFT_SPEED_FACTOR,
            DRIFT_DEAD_ZONE,
            field,
        );
        PaddleMove {
            paddle_y,
            predicted_y: None,
        }
    }
}
