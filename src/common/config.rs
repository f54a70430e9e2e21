//! Runtime configuration loaded from the process environment.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use super::error::ConfigError;

/// Output format of the log subscriber.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => LogFormat::Pretty,
            _ => LogFormat::Json,
        }
    }
}

/// Snapshot of configuration values consumed by the service.
#[derive(Clone, Debug)]
pub struct AppCfg {
    pub model_path: PathBuf,
    pub bind_addr: SocketAddr,
    pub log_filter: String,
    pub log_format: LogFormat,
}

pub const DEFAULT_MODEL_PATH: &str = "model/salary_model.json";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";

impl AppCfg {
    /// Create a configuration snapshot from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a snapshot from an arbitrary key lookup. Missing keys take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let raw_addr = env_or("SALARY_BIND_ADDR", DEFAULT_BIND_ADDR);
        let bind_addr = raw_addr
            .trim()
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::BindAddr(raw_addr.clone()))?;

        Ok(Self {
            model_path: PathBuf::from(env_or("SALARY_MODEL_PATH", DEFAULT_MODEL_PATH)),
            bind_addr,
            log_filter: env_or("SALARY_LOG", "info"),
            log_format: LogFormat::parse(&env_or("SALARY_LOG_FORMAT", "json")),
        })
    }
}
