use chrono::Utc;

use crate::agent::engine::AgentEngine;

pub async fn run(engine: &AgentEngine, ttl_secs: u64) {
    tracing::debug!("session_cleanup: start");
    let cutoff = Utc::now() - chrono::Duration::seconds(ttl_secs as i64);
    let expired = engine.expire_idle_sessions(cutoff).await;
    tracing::info!(expired, "session_cleanup: done");
}
