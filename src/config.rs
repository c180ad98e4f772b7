//! Application configuration
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::store::Latency;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Frontend assets directory
    pub frontend_dir: String,
    /// Directory holding the persisted session record
    pub data_dir: PathBuf,
    /// Maximum request body size in bytes
    pub max_body_size: usize,
    /// CORS allowed origins
    pub cors_origins: Vec<String>,
    /// Environment (development/production)
    pub environment: Environment,
    /// Simulated latency of issue loads
    pub fetch_latency_ms: u64,
    /// Simulated latency of issue reports and status changes
    pub write_latency_ms: u64,
    pub upvote_latency_ms: u64,
    pub comment_latency_ms: u64,
    /// Simulated latency of login and registration
    pub auth_latency_ms: u64,
    /// Fixed seed for the demo dataset; random when unset
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Development,
    Production,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let environment = match var("ENVIRONMENT")
            .unwrap_or_else(|| "development".to_string())
            .to_lowercase()
            .as_str()
        {
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        };

        Ok(Config {
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_var(&var, "PORT", 8080)?,
            frontend_dir: var("FRONTEND_DIR").unwrap_or_else(|| "./frontend".to_string()),
            data_dir: var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./data")),
            max_body_size: parse_var(&var, "MAX_BODY_SIZE", 1024 * 1024)?, // 1MB default
            cors_origins: var("CORS_ORIGINS")
                .map(|s| s.split(',').map(|o| o.trim().to_string()).collect())
                .unwrap_or_else(|| vec!["http://localhost:8080".to_string()]),
            environment,
            fetch_latency_ms: parse_var(&var, "FETCH_LATENCY_MS", 800)?,
            write_latency_ms: parse_var(&var, "WRITE_LATENCY_MS", 1000)?,
            upvote_latency_ms: parse_var(&var, "UPVOTE_LATENCY_MS", 300)?,
            comment_latency_ms: parse_var(&var, "COMMENT_LATENCY_MS", 500)?,
            auth_latency_ms: parse_var(&var, "AUTH_LATENCY_MS", 1000)?,
            seed: match var("SEED") {
                Some(_) => Some(parse_var(&var, "SEED", 0)?),
                None => None,
            },
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Get the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Issue store latencies
    pub fn latency(&self) -> Latency {
        Latency {
            fetch: Duration::from_millis(self.fetch_latency_ms),
            write: Duration::from_millis(self.write_latency_ms),
            upvote: Duration::from_millis(self.upvote_latency_ms),
            comment: Duration::from_millis(self.comment_latency_ms),
        }
    }

    pub fn auth_latency(&self) -> Duration {
        Duration::from_millis(self.auth_latency_ms)
    }
}

fn parse_var<T: FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError> {
    match var(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("{} = '{}'", key, value))),
        None => Ok(default),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
