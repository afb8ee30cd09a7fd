use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::keys;
use crate::store::{Store, StoreError};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRecord {
    pub player_name: String,
    pub created_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
    pub games_played: u64,
}

impl Store {
    pub fn get_player(&self, player_name: &str) -> Result<Option<PlayerRecord>, StoreError> {
        let key = keys::player_key(player_name);
        match self.players.get(key.as_bytes())? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => Ok(None),
        }
    }

    /// Creates the player on first sight, otherwise bumps `last_seen_at`
    /// and the play counter.
    pub fn touch_player(&self, player_name: &str) -> Result<PlayerRecord, StoreError> {
        if player_name.trim().is_empty() {
            return Err(StoreError::Validation("player name is empty".to_string()));
        }
        let key = keys::player_key(player_name);
        let now = Utc::now();
        let record = match self.players.get(key.as_bytes())? {
            Some(raw) => {
                let mut record: PlayerRecord = Self::deserialize(&raw)?;
                record.last_seen_at = now;
                record.games_played += 1;
                record
            }
            None => PlayerRecord {
                player_name: player_name.to_string(),
                created_at: now,
                last_seen_at: now,
                games_played: 1,
            },
        };
        self.players
            .insert(key.as_bytes(), Self::serialize(&record)?)?;
        Ok(record)
    }

    pub fn count_players(&self) -> Result<usize, StoreError> {
        let mut count = 0usize;
        for item in self.players.iter() {
            let _ = item?;
            count += 1;
        }
        Ok(count)
    }
}
