//! Concurrent registry of active game sessions. The outer map lock is
//! held only for map operations; each session has its own lock so one
//! session's tick never serializes another's.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::params::{BehaviorParams, GameKind};
use super::types::PhysicalState;

#[derive(Debug)]
pub struct GameSession {
    pub session_id: String,
    pub game: GameKind,
    /// Level copied from the shared model at creation, never refreshed.
    pub difficulty_snapshot: f64,
    /// Computed once from the snapshot, reused for the whole session.
    pub params: BehaviorParams,
    pub state: PhysicalState,
    pub started_at: DateTime<Utc>,
    pub last_action_at: DateTime<Utc>,
}

struct Slot {
    game: GameKind,
    session: Arc<Mutex<GameSession>>,
}

#[derive(Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<String, Slot>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a session id and stores the session. The snapshot and
    /// params are the caller's; the registry never reads the live model.
    pub async fn create(
        &self,
        game: GameKind,
        difficulty_snapshot: f64,
        params: BehaviorParams,
        state: PhysicalState,
    ) -> String {
        let session_id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let session = GameSession {
            session_id: session_id.clone(),
            game,
            difficulty_snapshot,
            params,
            state,
            started_at: now,
            last_action_at: now,
        };
        let mut sessions = self.sessions.lock().await;
        sessions.insert(
            session_id.clone(),
            Slot {
                game,
                session: Arc::new(Mutex::new(session)),
            },
        );
        session_id
    }

    pub async fn get(&self, session_id: &str) -> Option<Arc<Mutex<GameSession>>> {
        let sessions = self.sessions.lock().await;
        sessions.get(session_id).map(|slot| slot.session.clone())
    }

    pub async fn remove(&self, session_id: &str) -> Option<Arc<Mutex<GameSession>>> {
        let mut sessions = self.sessions.lock().await;
        sessions.remove(session_id).map(|slot| slot.session)
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn count_for(&self, game: GameKind) -> usize {
        let sessions = self.sessions.lock().await;
        sessions.values().filter(|slot| slot.game == game).count()
    }

    /// Removes sessions whose last action predates the cutoff and
    /// returns them, for the cleanup job to close out. Never awaits a
    /// session lock while holding the map lock: a session whose lock is
    /// held is in use, so it is skipped until the next sweep.
    pub async fn remove_idle(&self, cutoff: DateTime<Utc>) -> Vec<Arc<Mutex<GameSession>>> {
        let mut sessions = self.sessions.lock().await;
        let stale: Vec<String> = sessions
            .iter()
            .filter_map(|(id, slot)| {
                let guard = slot.session.try_lock().ok()?;
                (guard.last_action_at < cutoff).then(|| id.clone())
            })
            .collect();
        stale
            .into_iter()
            .filter_map(|id| sessions.remove(&id).map(|slot| slot.session))
            .collect()
    }
}
