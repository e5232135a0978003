//! Configuration loading and merging logic
//!
//! Precedence order (highest to lowest):
//! 1. Command-line flags
//! 2. Environment variable overrides
//! 3. Root config file
//! 4. Built-in defaults

use std::path::Path;

use super::schema::{Config, OutputFormat};
use super::{ConfigError, paths};

pub const ENV_OUTPUT: &str = "CHECK_OWNERREFS_OUTPUT";
pub const ENV_QPS: &str = "CHECK_OWNERREFS_QPS";
pub const ENV_BURST: &str = "CHECK_OWNERREFS_BURST";
pub const ENV_PAGE_SIZE: &str = "CHECK_OWNERREFS_PAGE_SIZE";
pub const ENV_FETCH_CONCURRENCY: &str = "CHECK_OWNERREFS_FETCH_CONCURRENCY";

/// Values given on the command line; `None` keeps the lower layer's value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub output: Option<String>,
    pub qps: Option<f32>,
    pub burst: Option<u32>,
    pub page_size: Option<u32>,
    pub fetch_concurrency: Option<usize>,
}

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with file and environment layers merged
    ///
    /// A missing config file is not an error; an unreadable or malformed
    /// one is.
    pub fn load() -> Result<Config, ConfigError> {
        let config = Self::load_file(&paths::root_config_path())?.unwrap_or_default();
        Self::apply_env_overrides(config, |key| std::env::var(key).ok())
    }

    /// Load configuration from a file, `None` when it does not exist
    pub fn load_file(path: &Path) -> Result<Option<Config>, ConfigError> {
        if !path.exists() {
            tracing::debug!("No config file at {}", path.display());
            return Ok(None);
        }

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!("Loaded config file {}", path.display());
        Ok(Some(config))
    }

    /// Apply environment variable overrides
    ///
    /// `lookup` resolves a variable name to its value.
    pub fn apply_env_overrides<F>(mut config: Config, lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(output) = lookup(ENV_OUTPUT) {
            config.output = output.parse()?;
        }
        if let Some(qps) = lookup(ENV_QPS) {
            config.qps = parse_env(ENV_QPS, &qps)?;
        }
        if let Some(burst) = lookup(ENV_BURST) {
            config.burst = parse_env(ENV_BURST, &burst)?;
        }
        if let Some(page_size) = lookup(ENV_PAGE_SIZE) {
            config.page_size = parse_env(ENV_PAGE_SIZE, &page_size)?;
        }
        if let Some(concurrency) = lookup(ENV_FETCH_CONCURRENCY) {
            config.fetch_concurrency = parse_env(ENV_FETCH_CONCURRENCY, &concurrency)?;
        }
        Ok(config)
    }

    /// Apply command-line overrides and validate the result
    pub fn apply_overrides(
        mut config: Config,
        overrides: &ConfigOverrides,
    ) -> Result<Config, ConfigError> {
        if let Some(output) = &overrides.output {
            config.output = output.parse::<OutputFormat>()?;
        }
        if let Some(qps) = overrides.qps {
            config.qps = qps;
        }
        if let Some(burst) = overrides.burst {
            config.burst = burst;
        }
        if let Some(page_size) = overrides.page_size {
            config.page_size = page_size;
        }
        if let Some(concurrency) = overrides.fetch_concurrency {
            config.fetch_concurrency = concurrency;
        }
        config.validate()?;
        Ok(config)
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        key: key.to_string(),
        value: value.to_string(),
    })
}
