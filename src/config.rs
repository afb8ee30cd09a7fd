use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub enable_file_logs: bool,
    pub log_dir: String,
    pub sled_path: String,
    pub cors_origin: String,
    pub trust_proxy: bool,
    pub rate_limit: RateLimitConfig,
    pub worker: WorkerConfig,
    pub agent: AgentEnvConfig,
}

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub window_secs: u64,
    pub max_requests: u64,
}

#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub is_leader: bool,
    pub enable_session_cleanup: bool,
    pub enable_metrics_flush: bool,
    pub session_ttl_secs: u64,
}

/// Agent knobs that operators are expected to tune. Everything else
/// about the models is fixed in `agent::config`.
#[derive(Debug, Clone)]
pub struct AgentEnvConfig {
    pub learning_rate: f64,
    pub memory_size: usize,
    pub noise_sigma: f64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            host: env_or_parse("HOST", IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))),
            port: env_or_parse("PORT", 3000_u16),
            log_level: env_or("RUST_LOG", "info"),
            enable_file_logs: env_or_bool("ENABLE_FILE_LOGS", false),
            log_dir: env_or("LOG_DIR", "./logs"),
            sled_path: env_or("SLED_PATH", "./data/arcade.sled"),
            cors_origin: env_or("CORS_ORIGIN", "http://localhost:5173"),
            trust_proxy: env_or_bool("TRUST_PROXY", false),
            rate_limit: RateLimitConfig {
                window_secs: env_or_parse("RATE_LIMIT_WINDOW_SECS", 60_u64),
                max_requests: env_or_parse("RATE_LIMIT_MAX", 300_u64),
            },
            worker: WorkerConfig {
                is_leader: env_or_bool("WORKER_LEADER", true),
                enable_session_cleanup: env_or_bool("ENABLE_SESSION_CLEANUP_WORKER", true),
                enable_metrics_flush: env_or_bool("ENABLE_METRICS_FLUSH_WORKER", true),
                session_ttl_secs: env_or_parse("SESSION_TTL_SECS", 600_u64),
            },
            agent: AgentEnvConfig {
                learning_rate: env_or_parse("AGENT_LEARNING_RATE", 0.01_f64),
                memory_size: env_or_parse("AGENT_MEMORY_SIZE", 100_usize),
                noise_sigma: env_or_parse("AGENT_NOISE_SIGMA", 50.0_f64),
            },
        }
    }
}

pub fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

pub fn env_or_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    match env::var(key) {
        Ok(raw) => match raw.parse::<T>() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(
                    key,
                    value = %raw,
                    "Failed to parse env var, using default"
                );
                default
            }
        },
        Err(_) => default,
    }
}

pub fn env_or_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}
