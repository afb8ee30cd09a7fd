//! Adaptive opponent core: per-game difficulty models, parameter
//! mapping, the paddle controller, live sessions, and outcome
//! recording.

pub mod config;
pub mod controller;
pub mod difficulty;
pub mod engine;
pub mod metrics;
pub mod params;
pub mod recorder;
pub mod sessions;
pub mod types;
