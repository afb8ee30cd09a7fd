pub mod ai_metrics;
pub mod game_sessions;
pub mod leaderboard;
pub mod learning_events;
pub mod players;
