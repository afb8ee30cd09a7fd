use std::sync::Arc;

use axum::Router;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::TempDir;
use tokio::sync::broadcast;

use arcade_backend::agent::config::AgentConfig;
use arcade_backend::agent::engine::AgentEngine;
use arcade_backend::config::Config;
use arcade_backend::routes::build_router;
use arcade_backend::state::AppState;
use arcade_backend::store::Store;

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub config: Config,
    _temp_dir: TempDir,
}

async fn spawn_with_limits(api_limit: u64) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("tempdir");
    let sled_path = temp_dir.path().join("arcade-test.sled");

    // 直接构造 Config，避免使用 set_var 造成多线程测试环境变量竞态
    let config = Config {
        host: std::net::IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
        port: 3000,
        log_level: "info".to_string(),
        enable_file_logs: false,
        log_dir: "./logs".to_string(),
        sled_path: sled_path.to_string_lossy().to_string(),
        cors_origin: "http://localhost:5173".to_string(),
        trust_proxy: false,
        rate_limit: arcade_backend::config::RateLimitConfig {
            window_secs: 60,
            max_requests: api_limit,
        },
        worker: arcade_backend::config::WorkerConfig {
            is_leader: false,
            enable_session_cleanup: false,
            enable_metrics_flush: false,
            session_ttl_secs: 600,
        },
        agent: arcade_backend::config::AgentEnvConfig {
            learning_rate: 0.01,
            memory_size: 100,
            noise_sigma: 50.0,
        },
    };

    let store = Arc::new(Store::open(&config.sled_path).expect("open store"));
    store.run_migrations().expect("run migrations");

    let engine = Arc::new(AgentEngine::with_rng(
        AgentConfig::from_env(&config.agent),
        store.clone(),
        StdRng::seed_from_u64(17),
    ));
    let (shutdown_tx, _) = broadcast::channel::<()>(8);

    let state = AppState::new(store, engine, &config, shutdown_tx);

    let app = build_router(state.clone());

    TestApp {
        app,
        state,
        config,
        _temp_dir: temp_dir,
    }
}

pub async fn spawn_test_server() -> TestApp {
    spawn_with_limits(200).await
}

pub async fn spawn_test_server_with_limits(api_limit: u64) -> TestApp {
    spawn_with_limits(api_limit).await
}
