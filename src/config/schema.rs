//! Configuration schema definitions
//!
//! Defines the structure of the configuration file using serde for
//! serialization.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ConfigError;

pub const DEFAULT_QPS: f32 = 25.0;
pub const DEFAULT_BURST: u32 = 100;
pub const DEFAULT_PAGE_SIZE: u32 = crate::index::DEFAULT_PAGE_SIZE;
pub const DEFAULT_FETCH_CONCURRENCY: usize = 1;

/// QPS value that turns client-side rate limiting off
pub const QPS_UNLIMITED: f32 = -1.0;

/// How findings are written to stdout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Aligned table with a header row
    #[default]
    #[serde(rename = "")]
    Table,
    /// One JSON object per line
    #[serde(rename = "json")]
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Table => "",
            OutputFormat::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            other => Err(ConfigError::InvalidOutput(other.to_string())),
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    /// Output format: '' for a table, 'json' for JSON lines
    #[serde(default)]
    pub output: OutputFormat,

    /// Client-side request rate; -1 disables rate limiting
    #[serde(default = "default_qps")]
    pub qps: f32,

    /// Requests allowed above the steady rate
    #[serde(default = "default_burst")]
    pub burst: u32,

    /// Items requested per list call
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Resource types listed at the same time
    #[serde(default = "default_fetch_concurrency")]
    pub fetch_concurrency: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: OutputFormat::default(),
            qps: default_qps(),
            burst: default_burst(),
            page_size: default_page_size(),
            fetch_concurrency: default_fetch_concurrency(),
        }
    }
}

impl Config {
    /// Reject values the check cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.qps >= 0.0 || self.qps == QPS_UNLIMITED) {
            return Err(ConfigError::InvalidQps(self.qps));
        }
        if self.burst == 0 {
            return Err(ConfigError::InvalidBurst);
        }
        if self.page_size == 0 {
            return Err(ConfigError::InvalidPageSize);
        }
        if self.fetch_concurrency == 0 {
            return Err(ConfigError::InvalidFetchConcurrency);
        }
        Ok(())
    }
}

fn default_qps() -> f32 {
    DEFAULT_QPS
}

fn default_burst() -> u32 {
    DEFAULT_BURST
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_fetch_concurrency() -> usize {
    DEFAULT_FETCH_CONCURRENCY
}
