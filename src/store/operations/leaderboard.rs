use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::agent::params::GameKind;
use crate::store::keys;
use crate::store::{Store, StoreError};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub player_name: String,
    pub game: GameKind,
    pub score: i64,
    pub difficulty: f64,
    pub achieved_at: DateTime<Utc>,
}

impl Store {
    /// Keeps one entry per (game, player) holding that player's best
    /// score. Returns true when the submitted score took the slot.
    pub fn upsert_leaderboard_entry(
        &self,
        game: GameKind,
        player_name: &str,
        score: i64,
        difficulty: f64,
    ) -> Result<bool, StoreError> {
        if player_name.trim().is_empty() {
            return Err(StoreError::Validation("player name is empty".to_string()));
        }
        if score < 0 {
            return Err(StoreError::Validation(format!(
                "score must be non-negative, got {score}"
            )));
        }

        let key = keys::leaderboard_key(game, player_name);
        if let Some(raw) = self.leaderboard.get(key.as_bytes())? {
            let existing: LeaderboardEntry = Self::deserialize(&raw)?;
            if existing.score >= score {
                return Ok(false);
            }
        }

        let entry = LeaderboardEntry {
            player_name: player_name.to_string(),
            game,
            score,
            difficulty,
            achieved_at: Utc::now(),
        };
        self.leaderboard
            .insert(key.as_bytes(), Self::serialize(&entry)?)?;
        Ok(true)
    }

    /// Best scores for one game, highest first.
    pub fn top_leaderboard(
        &self,
        game: GameKind,
        limit: usize,
    ) -> Result<Vec<LeaderboardEntry>, StoreError> {
        let prefix = keys::leaderboard_prefix(game);
        let mut entries = Vec::new();
        for item in self.leaderboard.scan_prefix(prefix.as_bytes()) {
            let (_, value) = item?;
            entries.push(Self::deserialize::<LeaderboardEntry>(&value)?);
        }
        entries.sort_by(|a, b| b.score.cmp(&a.score).then(a.achieved_at.cmp(&b.achieved_at)));
        entries.truncate(limit);
        Ok(entries)
    }

    /// Best scores across every game, highest first.
    pub fn global_leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, StoreError> {
        let mut entries = Vec::new();
        for item in self.leaderboard.iter() {
            let (_, value) = item?;
            entries.push(Self::deserialize::<LeaderboardEntry>(&value)?);
        }
        entries.sort_by(|a, b| b.score.cmp(&a.score).then(a.achieved_at.cmp(&b.achieved_at)));
        entries.truncate(limit);
        Ok(entries)
    }

    /// One player's entries across all games.
    pub fn player_leaderboard_entries(
        &self,
        player_name: &str,
    ) -> Result<Vec<LeaderboardEntry>, StoreError> {
        let mut entries = Vec::new();
        for game in GameKind::ALL {
            let key = keys::leaderboard_key(game, player_name);
            if let Some(raw) = self.leaderboard.get(key.as_bytes())? {
                entries.push(Self::deserialize::<LeaderboardEntry>(&raw)?);
            }
        }
        Ok(entries)
    }
}
