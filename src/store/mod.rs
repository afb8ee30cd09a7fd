pub mod keys;
pub mod migrate;
pub mod operations;
pub mod trees;

use serde::de::DeserializeOwned;
use serde::Serialize;
use sled::Db;
use thiserror::Error;

#[derive(Debug)]
pub struct Store {
    db: Db,
    pub players: sled::Tree,
    pub game_sessions: sled::Tree,
    pub learning_events: sled::Tree,
    pub leaderboard: sled::Tree,
    pub ai_metrics: sled::Tree,
    pub meta: sled::Tree,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("not found: entity={entity}, key={key}")]
    NotFound { entity: String, key: String },
    #[error("validation error: {0}")]
    Validation(String),
    #[error("migration error at version {version}: {message}")]
    Migration { version: u32, message: String },
}

impl Store {
    pub fn open(sled_path: &str) -> Result<Self, StoreError> {
        let db = sled::open(sled_path)?;
        let players = db.open_tree(trees::PLAYERS)?;
        let game_sessions = db.open_tree(trees::GAME_SESSIONS)?;
        let learning_events = db.open_tree(trees::LEARNING_EVENTS)?;
        let leaderboard = db.open_tree(trees::LEADERBOARD)?;
        let ai_metrics = db.open_tree(trees::AI_METRICS)?;
        let meta = db.open_tree(trees::META)?;

        Ok(Self {
            db,
            players,
            game_sessions,
            learning_events,
            leaderboard,
            ai_metrics,
            meta,
        })
    }

    pub fn run_migrations(&self) -> Result<(), StoreError> {
        migrate::run(self)
    }

    pub fn flush(&self) -> Result<(), StoreError> {
        self.db.flush()?;
        Ok(())
    }

    pub fn raw_db(&self) -> &Db {
        &self.db
    }

    pub(crate) fn serialize<T: Serialize>(value: &T) -> Result<Vec<u8>, StoreError> {
        Ok(serde_json::to_vec(value)?)
    }

    pub(crate) fn deserialize<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, StoreError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
