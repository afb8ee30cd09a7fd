use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::agent::params::GameKind;
use crate::store::keys;
use crate::store::{Store, StoreError};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSessionRecord {
    pub session_id: String,
    pub game: GameKind,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub final_score: Option<i64>,
    pub difficulty_at_start: f64,
    pub difficulty_at_end: Option<f64>,
    pub player_name: Option<String>,
}

impl Store {
    pub fn insert_game_session(&self, record: &GameSessionRecord) -> Result<(), StoreError> {
        let key = keys::game_session_key(&record.session_id);
        self.game_sessions
            .insert(key.as_bytes(), Self::serialize(record)?)?;
        Ok(())
    }

    pub fn get_game_session(
        &self,
        session_id: &str,
    ) -> Result<Option<GameSessionRecord>, StoreError> {
        let key = keys::game_session_key(session_id);
        match self.game_sessions.get(key.as_bytes())? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn close_game_session(
        &self,
        session_id: &str,
        final_score: Option<i64>,
        difficulty_at_end: f64,
        player_name: Option<&str>,
    ) -> Result<GameSessionRecord, StoreError> {
        let key = keys::game_session_key(session_id);
        let raw = self
            .game_sessions
            .get(key.as_bytes())?
            .ok_or_else(|| StoreError::NotFound {
                entity: "game_session".to_string(),
                key: session_id.to_string(),
            })?;
        let mut record: GameSessionRecord = Self::deserialize(&raw)?;
        record.ended_at = Some(Utc::now());
        record.final_score = final_score;
        record.difficulty_at_end = Some(difficulty_at_end);
        if let Some(name) = player_name {
            record.player_name = Some(name.to_string());
        }
        self.game_sessions
            .insert(key.as_bytes(), Self::serialize(&record)?)?;
        Ok(record)
    }

    pub fn count_game_sessions(&self) -> Result<usize, StoreError> {
        let mut count = 0usize;
        for item in self.game_sessions.iter() {
            let _ = item?;
            count += 1;
        }
        Ok(count)
    }

    pub fn count_game_sessions_for(&self, game: GameKind) -> Result<usize, StoreError> {
        let mut count = 0usize;
        for item in self.game_sessions.iter() {
            let (_, value) = item?;
            let record: GameSessionRecord = Self::deserialize(&value)?;
            if record.game == game {
                count += 1;
            }
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    fn sample(session_id: &str, game: GameKind) -> GameSessionRecord {
        GameSessionRecord {
            session_id: session_id.to_string(),
            game,
            started_at: Utc::now(),
            ended_at: None,
            final_score: None,
            difficulty_at_start: 0.5,
            difficulty_at_end: None,
            player_name: None,
        }
    }

    #[test]
    fn close_merges_end_fields() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("db").to_str().unwrap()).unwrap();

        store.insert_game_session(&sample("s1", GameKind::PingPong)).unwrap();
        let closed = store
            .close_game_session("s1", Some(21), 0.62, Some("ada"))
            .unwrap();
        assert_eq!(closed.final_score, Some(21));
        assert_eq!(closed.difficulty_at_end, Some(0.62));
        assert_eq!(closed.player_name.as_deref(), Some("ada"));
        assert!(closed.ended_at.is_some());

        let reread = store.get_game_session("s1").unwrap().unwrap();
        assert_eq!(reread.difficulty_at_start, 0.5);
        assert!(reread.ended_at.is_some());
    }

    #[test]
    fn close_of_unknown_session_is_not_found() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("db").to_str().unwrap()).unwrap();
        let err = store.close_game_session("nope", None, 0.5, None).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn counts_split_by_game() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("db").to_str().unwrap()).unwrap();
        store.insert_game_session(&sample("a", GameKind::PingPong)).unwrap();
        store.insert_game_session(&sample("b", GameKind::PingPong)).unwrap();
        store.insert_game_session(&sample("c", GameKind::Tetris)).unwrap();

        assert_eq!(store.count_game_sessions().unwrap(), 3);
        assert_eq!(store.count_game_sessions_for(GameKind::PingPong).unwrap(), 2);
        assert_eq!(store.count_game_sessions_for(GameKind::Tetris).unwrap(), 1);
    }
}
