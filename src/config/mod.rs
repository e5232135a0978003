//! Configuration system
//!
//! Settings are layered: built-in defaults, an optional YAML file in the
//! platform config directory, environment variables, then command-line
//! flags.

pub mod loader;
pub mod paths;
pub mod schema;

use std::path::PathBuf;

pub use loader::{ConfigLoader, ConfigOverrides};
pub use schema::{Config, OutputFormat};

/// Invalid or unreadable configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid output format, only '' and 'json' are supported: {0}")]
    InvalidOutput(String),

    #[error("invalid qps {0}, must be >= 0 or -1 to disable rate limiting")]
    InvalidQps(f32),

    #[error("invalid burst rate, must be > 0")]
    InvalidBurst,

    #[error("invalid page size, must be > 0")]
    InvalidPageSize,

    #[error("invalid fetch concurrency, must be > 0")]
    InvalidFetchConcurrency,

    #[error("invalid value for {key}: {value}")]
    InvalidEnv { key: String, value: String },

    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Get a configuration value by key
pub fn get_config_value(config: &Config, key: &str) -> Result<String, ConfigError> {
    match key {
        "output" => Ok(config.output.to_string()),
        "qps" => Ok(config.qps.to_string()),
        "burst" => Ok(config.burst.to_string()),
        "pageSize" => Ok(config.page_size.to_string()),
        "fetchConcurrency" => Ok(config.fetch_concurrency.to_string()),
        _ => Err(ConfigError::UnknownKey(key.to_string())),
    }
}
