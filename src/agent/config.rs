use serde::{Deserialize, Serialize};

/// 难度模型参数。阈值本身固定在 difficulty.rs 中，不在此配置。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyConfig {
    /// Starting level for a fresh model, in [0,1].
    pub initial_level: f64,
    /// Step multiplier applied to the adjustment rule.
    pub learning_rate: f64,
    /// Outcome history capacity (FIFO eviction past this).
    pub memory_size: usize,
    /// How many of the newest outcomes feed each update.
    pub read_window: usize,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self {
            initial_level: 0.5,
            learning_rate: 0.01,
            memory_size: 100,
            read_window: 10,
        }
    }
}

/// Pingpong parameter ranges. Direction (which end is "hard") is applied
/// by the mapper: reaction time shrinks as difficulty rises.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PingPongParamConfig {
    pub reaction_time_min: f64,
    pub reaction_time_max: f64,
    pub prediction_accuracy_min: f64,
    pub prediction_accuracy_max: f64,
    pub paddle_speed_min: f64,
    pub paddle_speed_max: f64,
}

impl Default for PingPongParamConfig {
    fn default() -> Self {
        Self {
            reaction_time_min: 0.1,
            reaction_time_max: 0.8,
            prediction_accuracy_min: 0.3,
            prediction_accuracy_max: 0.95,
            paddle_speed_min: 2.0,
            paddle_speed_max: 8.0,
        }
    }
}

/// Tetris parameter ranges. Rotation delay shrinks as difficulty rises.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TetrisParamConfig {
    pub drop_speed_min: f64,
    pub drop_speed_max: f64,
    pub rotation_delay_min: f64,
    pub rotation_delay_max: f64,
}

impl Default for TetrisParamConfig {
    fn default() -> Self {
        Self {
            drop_speed_min: 0.5,
            drop_speed_max: 2.0,
            rotation_delay_min: 0.1,
            rotation_delay_max: 0.5,
        }
    }
}

/// Pingpong field geometry. The paddle position is its CENTER y, so the
/// legal travel band is [paddle_height/2, height - paddle_height/2].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldConfig {
    pub width: f64,
    pub height: f64,
    pub paddle_height: f64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 500.0,
            paddle_height: 100.0,
        }
    }
}

impl FieldConfig {
    pub fn travel_min(&self) -> f64 {
        self.paddle_height / 2.0
    }

    pub fn travel_max(&self) -> f64 {
        self.height - self.paddle_height / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.height / 2.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControllerConfig {
    /// Standard deviation of the Gaussian prediction error, in field
    /// units. Lower accuracy makes the noise MORE FREQUENT, not larger.
    pub noise_sigma: f64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self { noise_sigma: 50.0 }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentConfig {
    #[serde(default)]
    pub difficulty: DifficultyConfig,
    #[serde(default)]
    pub pingpong: PingPongParamConfig,
    #[serde(default)]
    pub tetris: TetrisParamConfig,
    #[serde(default)]
    pub field: FieldConfig,
    #[serde(default)]
    pub controller: ControllerConfig,
}

impl AgentConfig {
    pub fn from_env(env_config: &crate::config::AgentEnvConfig) -> Self {
        let mut config = Self::default();
        config.difficulty.learning_rate = env_config.learning_rate;
        config.difficulty.memory_size = env_config.memory_size;
        config.controller.noise_sigma = env_config.noise_sigma;
        config
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.difficulty.initial_level) {
            return Err("difficulty.initial_level must be in [0,1]".to_string());
        }
        if self.difficulty.learning_rate <= 0.0 {
            return Err("difficulty.learning_rate must be > 0".to_string());
        }
        if self.difficulty.read_window == 0 {
            return Err("difficulty.read_window must be >= 1".to_string());
        }
        if self.difficulty.memory_size < self.difficulty.read_window {
            return Err("difficulty.memory_size must be >= read_window".to_string());
        }
        if self.pingpong.reaction_time_min >= self.pingpong.reaction_time_max {
            return Err("pingpong.reaction_time range is inverted".to_string());
        }
        if self.pingpong.prediction_accuracy_min >= self.pingpong.prediction_accuracy_max {
            return Err("pingpong.prediction_accuracy range is inverted".to_string());
        }
        if !(0.0..=1.0).contains(&self.pingpong.prediction_accuracy_min)
            || !(0.0..=1.0).contains(&self.pingpong.prediction_accuracy_max)
        {
            return Err("pingpong.prediction_accuracy range must be in [0,1]".to_string());
        }
        if self.pingpong.paddle_speed_min >= self.pingpong.paddle_speed_max {
            return Err("pingpong.paddle_speed range is inverted".to_string());
        }
        if self.pingpong.paddle_speed_min <= 0.0 {
            return Err("pingpong.paddle_speed_min must be > 0".to_string());
        }
        if self.tetris.drop_speed_min >= self.tetris.drop_speed_max {
            return Err("tetris.drop_speed range is inverted".to_string());
        }
        if self.tetris.rotation_delay_min >= self.tetris.rotation_delay_max {
            return Err("tetris.rotation_delay range is inverted".to_string());
        }
        if self.field.width <= 0.0 || self.field.height <= 0.0 {
            return Err("field dimensions must be > 0".to_string());
        }
        if self.field.paddle_height <= 0.0 || self.field.paddle_height >= self.field.height {
            return Err("field.paddle_height must be in (0, height)".to_string());
        }
        if self.controller.noise_sigma <= 0.0 {
            return Err("controller.noise_sigma must be > 0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = AgentConfig::default();
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn inverted_range_is_rejected() {
        let mut cfg = AgentConfig::default();
        cfg.pingpong.prediction_accuracy_min = 0.99;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn window_larger_than_memory_is_rejected() {
        let mut cfg = AgentConfig::default();
        cfg.difficulty.memory_size = 5;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn travel_band_accounts_for_paddle_half_height() {
        let field = FieldConfig::default();
        assert_eq!(field.travel_min(), 50.0);
        assert_eq!(field.travel_max(), 450.0);
        assert_eq!(field.center_y(), 250.0);
    }
}
