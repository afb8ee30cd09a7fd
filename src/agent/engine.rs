//! Facade over the adaptive agent: shared per-game difficulty models,
//! the session registry, the opponent controller, and the learning
//! recorder, behind the four session-scoped operations the transport
//! layer calls.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::{Mutex, RwLock};

use crate::response::AppError;
use crate::store::operations::game_sessions::GameSessionRecord;
use crate::store::Store;

use super::config::AgentConfig;
use super::controller;
use super::difficulty::SharedDifficulty;
use super::metrics::AgentMetrics;
use super::params::{params_for, BehaviorParams, GameKind};
use super::recorder::LearningRecorder;
use super::sessions::SessionRegistry;
use super::types::{
    AgentStats, AiMove, EndedSession, LearningEvent, PhysicalState, PingPongDelta, PingPongState,
    StartedSession, TetrisDelta, TetrisState,
};

pub struct AgentEngine {
    config: Arc<RwLock<AgentConfig>>,
    store: Arc<Store>,
    registry: SessionRegistry,
    pingpong_model: SharedDifficulty,
    tetris_model: SharedDifficulty,
    recorder: LearningRecorder,
    metrics: Arc<AgentMetrics>,
    rng: Mutex<StdRng>,
}

impl AgentEngine {
    pub fn new(config: AgentConfig, store: Arc<Store>) -> Self {
        Self::with_rng(config, store, StdRng::from_entropy())
    }

    /// Seeded variant so tests can replay the same noise draws.
    pub fn with_rng(config: AgentConfig, store: Arc<Store>, rng: StdRng) -> Self {
        let metrics = Arc::new(AgentMetrics::new());
        Self {
            pingpong_model: SharedDifficulty::new(&config.difficulty),
            tetris_model: SharedDifficulty::new(&config.difficulty),
            recorder: LearningRecorder::new(store.clone(), metrics.clone()),
            config: Arc::new(RwLock::new(config)),
            store,
            registry: SessionRegistry::new(),
            metrics,
            rng: Mutex::new(rng),
        }
    }

    /// The shared model for one game type. One instance per type for the
    /// whole process; every session of that type feeds it.
    pub fn model(&self, game: GameKind) -> &SharedDifficulty {
        match game {
            GameKind::PingPong => &self.pingpong_model,
            GameKind::Tetris => &self.tetris_model,
        }
    }

    pub fn metrics(&self) -> &Arc<AgentMetrics> {
        &self.metrics
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    pub async fn get_config(&self) -> AgentConfig {
        self.config.read().await.clone()
    }

    /// Creates a session with a difficulty snapshot and the parameters it
    /// implies. The snapshot never refreshes mid-session; later model
    /// movement only changes what NEW sessions start at.
    pub async fn start_session(&self, game: GameKind) -> StartedSession {
        let difficulty = self.model(game).level();
        let (params, state) = {
            let config = self.config.read().await;
            let params = params_for(game, difficulty, &config);
            let state = match game {
                GameKind::PingPong => PhysicalState::PingPong(PingPongState::initial(
                    config.field.width,
                    config.field.height,
                )),
                GameKind::Tetris => PhysicalState::Tetris(TetrisState::initial()),
            };
            (params, state)
        };

        let session_id = self.registry.create(game, difficulty, params, state).await;
        self.metrics
            .game(game)
            .sessions_started
            .fetch_add(1, Ordering::Relaxed);

        let record = GameSessionRecord {
            session_id: session_id.clone(),
            game,
            started_at: Utc::now(),
            ended_at: None,
            final_score: None,
            difficulty_at_start: difficulty,
            difficulty_at_end: None,
            player_name: None,
        };
        if let Err(e) = self.store.insert_game_session(&record) {
            tracing::error!(error=%e, session_id=%session_id, "failed to persist session start");
        }

        tracing::info!(session_id=%session_id, game=%game, difficulty, "game session started");
        StartedSession {
            session_id,
            game,
            difficulty,
            behavior_parameters: params,
            state,
        }
    }

    /// One opponent tick: apply the client's state delta, decide the
    /// paddle move, return the move plus the state it produced. Games
    /// without a positional opponent get a hold response.
    pub async fn compute_move(
        &self,
        session_id: &str,
        delta: &PingPongDelta,
    ) -> Result<AiMove, AppError> {
        let slot = self
            .registry
            .get(session_id)
            .await
            .ok_or_else(AppError::session_not_found)?;
        let mut guard = slot.lock().await;
        let session = &mut *guard;
        session.last_action_at = Utc::now();

        let difficulty = session.difficulty_snapshot;
        let game = session.game;

        let result = match (&mut session.state, &session.params) {
            (PhysicalState::PingPong(state), BehaviorParams::PingPong(params)) => {
                state.apply(delta);
                let config = self.config.read().await;
                let mut rng = self.rng.lock().await;
                let mv = controller::compute_move(
                    state,
                    params,
                    &config.field,
                    config.controller.noise_sigma,
                    &mut *rng,
                );
                drop(rng);
                state.ai_paddle_y = mv.paddle_y;
                tracing::debug!(
                    session_id,
                    paddle_y = mv.paddle_y,
                    predicted_y = ?mv.predicted_y,
                    "opponent move computed"
                );
                AiMove {
                    ai_y: Some(mv.paddle_y),
                    difficulty,
                    prediction_accuracy: Some(params.prediction_accuracy),
                    state: PhysicalState::PingPong(*state),
                }
            }
            _ => AiMove {
                ai_y: None,
                difficulty,
                prediction_accuracy: None,
                state: session.state,
            },
        };

        self.metrics
            .game(game)
            .moves_computed
            .fetch_add(1, Ordering::Relaxed);
        Ok(result)
    }

    /// Merges a client-reported score/level/lines update into a tetris
    /// session's state.
    pub async fn apply_tetris_delta(
        &self,
        session_id: &str,
        delta: &TetrisDelta,
    ) -> Result<TetrisState, AppError> {
        let slot = self
            .registry
            .get(session_id)
            .await
            .ok_or_else(AppError::session_not_found)?;
        let mut session = slot.lock().await;
        session.last_action_at = Utc::now();
        match &mut session.state {
            PhysicalState::Tetris(state) => {
                state.apply(delta);
                Ok(*state)
            }
            _ => Err(AppError::validation("session is not a tetris session")),
        }
    }

    /// Feeds one outcome into the session's shared model and returns the
    /// learning event. Persistence of the event never blocks this path.
    pub async fn record_outcome(
        &self,
        session_id: &str,
        player_action: &str,
        ai_response: &str,
        outcome: &str,
        context: serde_json::Value,
    ) -> Result<LearningEvent, AppError> {
        let slot = self
            .registry
            .get(session_id)
            .await
            .ok_or_else(AppError::session_not_found)?;
        let game = {
            let mut session = slot.lock().await;
            session.last_action_at = Utc::now();
            session.game
        };

        let event = self
            .recorder
            .record(
                self.model(game),
                game,
                session_id,
                player_action,
                ai_response,
                outcome,
                context,
            )
            .await;
        Ok(event)
    }

    /// Removes the session; later calls against the id fail with
    /// SessionNotFound. A final outcome label, when supplied, feeds the
    /// shared model one last time before removal. Bookkeeping writes
    /// are logged on failure, never surfaced.
    pub async fn end_session(
        &self,
        session_id: &str,
        final_score: Option<i64>,
        player_name: Option<&str>,
        final_outcome: Option<&str>,
    ) -> Result<EndedSession, AppError> {
        if let Some(label) = final_outcome {
            self.record_outcome(
                session_id,
                "game_end",
                "final_position",
                label,
                serde_json::json!({ "finalScore": final_score }),
            )
            .await?;
        }

        let slot = self
            .registry
            .remove(session_id)
            .await
            .ok_or_else(AppError::session_not_found)?;
        let session = slot.lock().await;
        let game = session.game;
        let difficulty = self.model(game).level();

        self.metrics
            .game(game)
            .sessions_ended
            .fetch_add(1, Ordering::Relaxed);

        if let Err(e) =
            self.store
                .close_game_session(session_id, final_score, difficulty, player_name)
        {
            tracing::error!(error=%e, session_id, "failed to close session record");
        }
        if let (Some(score), Some(name)) = (final_score, player_name) {
            if let Err(e) = self.store.touch_player(name) {
                tracing::error!(error=%e, player=%name, "failed to update player record");
            }
            if let Err(e) = self.store.upsert_leaderboard_entry(game, name, score, difficulty) {
                tracing::error!(error=%e, player=%name, "failed to update leaderboard");
            }
        }

        tracing::info!(session_id, game=%game, final_score=?final_score, "game session ended");
        Ok(EndedSession {
            session_id: session.session_id.clone(),
            game,
            final_score,
            difficulty,
        })
    }

    /// Live snapshot params for one session, for advisory endpoints.
    pub async fn session_parameters(
        &self,
        session_id: &str,
    ) -> Result<(GameKind, f64, BehaviorParams), AppError> {
        let slot = self
            .registry
            .get(session_id)
            .await
            .ok_or_else(AppError::session_not_found)?;
        let session = slot.lock().await;
        Ok((session.game, session.difficulty_snapshot, session.params))
    }

    pub async fn ai_stats(&self, game: GameKind) -> AgentStats {
        let snapshot = self.model(game).snapshot().await;
        let config = self.config.read().await;
        let behavior_parameters = params_for(game, snapshot.level, &config);
        drop(config);
        AgentStats {
            game,
            difficulty: snapshot.level,
            games_in_memory: snapshot.games_in_memory,
            recent_outcomes: snapshot.recent_outcomes,
            behavior_parameters,
            active_sessions: self.registry.count_for(game).await,
        }
    }

    /// Sweeps sessions idle past the cutoff and closes their persisted
    /// rows. Returns how many were expired.
    pub async fn expire_idle_sessions(&self, cutoff: chrono::DateTime<Utc>) -> usize {
        let removed = self.registry.remove_idle(cutoff).await;
        let count = removed.len();
        for slot in removed {
            let session = slot.lock().await;
            let difficulty = self.model(session.game).level();
            if let Err(e) =
                self.store
                    .close_game_session(&session.session_id, None, difficulty, None)
            {
                tracing::error!(error=%e, session_id=%session.session_id, "failed to close expired session");
            }
            tracing::info!(session_id=%session.session_id, game=%session.game, "session expired");
        }
        self.metrics
            .sessions_expired
            .fetch_add(count as u64, Ordering::Relaxed);
        count
    }
}
