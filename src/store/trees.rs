pub const PLAYERS: &str = "players";
pub const GAME_SESSIONS: &str = "game_sessions";
pub const LEARNING_EVENTS: &str = "learning_events";
pub const LEADERBOARD: &str = "leaderboard";
pub const AI_METRICS: &str = "ai_metrics";
pub const META: &str = "meta";
