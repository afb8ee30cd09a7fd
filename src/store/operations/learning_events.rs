use crate::agent::params::GameKind;
use crate::agent::types::LearningEvent;
use crate::store::keys;
use crate::store::{Store, StoreError};

impl Store {
    pub fn insert_learning_event(&self, event: &LearningEvent) -> Result<(), StoreError> {
        let key = keys::learning_event_key(
            event.game,
            event.timestamp.timestamp_millis(),
            &event.event_id,
        );
        self.learning_events
            .insert(key.as_bytes(), Self::serialize(event)?)?;
        Ok(())
    }

    /// Newest events first, capped at `limit`.
    pub fn recent_learning_events(
        &self,
        game: GameKind,
        limit: usize,
    ) -> Result<Vec<LearningEvent>, StoreError> {
        let prefix = keys::learning_event_prefix(game);
        let mut events = Vec::new();
        for item in self.learning_events.scan_prefix(prefix.as_bytes()) {
            let (_, value) = item?;
            events.push(Self::deserialize::<LearningEvent>(&value)?);
            if events.len() >= limit {
                break;
            }
        }
        Ok(events)
    }

    pub fn count_learning_events_for(&self, game: GameKind) -> Result<usize, StoreError> {
        let prefix = keys::learning_event_prefix(game);
        let mut count = 0usize;
        for item in self.learning_events.scan_prefix(prefix.as_bytes()) {
            let _ = item?;
            count += 1;
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use tempfile::tempdir;

    use super::*;

    fn sample(event_id: &str, game: GameKind, age: Duration, outcome: &str) -> LearningEvent {
        LearningEvent {
            event_id: event_id.to_string(),
            session_id: "s1".to_string(),
            game,
            timestamp: Utc::now() - age,
            player_action: "rally".to_string(),
            ai_response: "return".to_string(),
            outcome: outcome.to_string(),
            outcome_value: 0.5,
            difficulty_level: 0.5,
            context: serde_json::Value::Null,
        }
    }

    #[test]
    fn recent_events_come_newest_first() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("db").to_str().unwrap()).unwrap();

        store
            .insert_learning_event(&sample("old", GameKind::PingPong, Duration::minutes(5), "draw"))
            .unwrap();
        store
            .insert_learning_event(&sample("new", GameKind::PingPong, Duration::seconds(0), "ai_win"))
            .unwrap();
        store
            .insert_learning_event(&sample("other", GameKind::Tetris, Duration::seconds(1), "draw"))
            .unwrap();

        let events = store.recent_learning_events(GameKind::PingPong, 10).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_id, "new");
        assert_eq!(events[1].event_id, "old");

        let limited = store.recent_learning_events(GameKind::PingPong, 1).unwrap();
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].event_id, "new");
    }

    #[test]
    fn counts_are_per_game() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("db").to_str().unwrap()).unwrap();
        store
            .insert_learning_event(&sample("a", GameKind::Tetris, Duration::seconds(2), "draw"))
            .unwrap();
        assert_eq!(store.count_learning_events_for(GameKind::Tetris).unwrap(), 1);
        assert_eq!(store.count_learning_events_for(GameKind::PingPong).unwrap(), 0);
    }
}
