use std::env;
use std::time::Duration;
use thiserror::Error;

use crate::coingecko::DEFAULT_URL;
use crate::range::Range;
use crate::range::RangeError;

const DEFAULT_LOG_FILTER: &str = "btcchart=info";
const DEFAULT_LOG_FILE: &str = "btcchart.log";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("invalid BTCCHART_RANGE: {0}")]
    Range(#[from] RangeError),
    #[error("invalid BTCCHART_TIMEOUT_SECS: {0}")]
    Timeout(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// CoinGecko coin endpoint
    pub api_url: String,
    /// Range shown at startup
    pub initial_range: Range,
    /// Tracing env filter directives
    pub log_filter: String,
    pub log_file: String,
    /// HTTP request timeout
    pub timeout: Duration,
}

impl Config {
    /// Configuration from `BTCCHART_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Configuration from variables looked up with `var`.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let initial_range = match var("BTCCHART_RANGE") {
            Some(s) => s.parse()?,
            None => Range::default(),
        };
        let timeout = match var("BTCCHART_TIMEOUT_SECS") {
            Some(s) => match s.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::Timeout(s)),
            },
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };
        Ok(Self {
            api_url: var("BTCCHART_API_URL").unwrap_or(String::from(DEFAULT_URL)),
            initial_range,
            log_filter: var("BTCCHART_LOG").unwrap_or(String::from(DEFAULT_LOG_FILTER)),
            log_file: var("BTCCHART_LOG_FILE").unwrap_or(String::from(DEFAULT_LOG_FILE)),
            timeout,
        })
    }
}
