use std::time::Duration;

use studio_core::lifecycle::{MAX_POLL_ATTEMPTS, POLL_INTERVAL};

use crate::conversion::PollConfig;

/// Backend origin used when `STUDIO_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Per-request timeout used when `STUDIO_REQUEST_TIMEOUT_SECS` is not set.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Logo generation timeout used when `STUDIO_GENERATE_TIMEOUT_SECS` is not
/// set. The backend renders every image before it replies, each one
/// waiting up to 30 s upstream.
pub const DEFAULT_GENERATE_TIMEOUT_SECS: u64 = 900;

/// Client configuration loaded from environment variables.
///
/// All fields have defaults matching a locally running backend.
#[derive(Debug, Clone)]
pub struct StudioConfig {
    /// Backend origin (default: `http://localhost:8000`).
    pub api_url: String,
    /// Delay between conversion status checks (default: 30 s).
    pub poll_interval: Duration,
    /// Status checks before a conversion times out (default: `20`).
    pub max_poll_attempts: u32,
    /// HTTP request timeout for conversion calls (default: 120 s).
    pub request_timeout: Duration,
    /// HTTP request timeout for logo generation (default: 900 s).
    pub generate_timeout: Duration,
}

/// An environment variable held a value that could not be parsed.
#[derive(Debug, thiserror::Error)]
#[error("{var} must be {expected}, got '{value}'")]
pub struct ConfigError {
    pub var: &'static str,
    pub expected: &'static str,
    pub value: String,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            poll_interval: POLL_INTERVAL,
            max_poll_attempts: MAX_POLL_ATTEMPTS,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            generate_timeout: Duration::from_secs(DEFAULT_GENERATE_TIMEOUT_SECS),
        }
    }
}

impl StudioConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                       | Default                 |
    /// |-------------------------------|-------------------------|
    /// | `STUDIO_API_URL`              | `http://localhost:8000` |
    /// | `STUDIO_POLL_INTERVAL_SECS`   | `30`                    |
    /// | `STUDIO_POLL_MAX_ATTEMPTS`    | `20`                    |
    /// | `STUDIO_REQUEST_TIMEOUT_SECS` | `120`                   |
    /// | `STUDIO_GENERATE_TIMEOUT_SECS`| `900`                   |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_url = lookup("STUDIO_API_URL")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.api_url);

        let poll_interval = match lookup("STUDIO_POLL_INTERVAL_SECS") {
            Some(v) => Duration::from_secs(parse_positive("STUDIO_POLL_INTERVAL_SECS", &v)?),
            None => defaults.poll_interval,
        };

        let max_poll_attempts = match lookup("STUDIO_POLL_MAX_ATTEMPTS") {
            Some(v) => {
                let n = parse_positive("STUDIO_POLL_MAX_ATTEMPTS", &v)?;
                u32::try_from(n).map_err(|_| ConfigError {
                    var: "STUDIO_POLL_MAX_ATTEMPTS",
                    expected: "a positive 32-bit integer",
                    value: v.clone(),
                })?
            }
            None => defaults.max_poll_attempts,
        };

        let request_timeout = match lookup("STUDIO_REQUEST_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(parse_positive("STUDIO_REQUEST_TIMEOUT_SECS", &v)?),
            None => defaults.request_timeout,
        };

        let generate_timeout = match lookup("STUDIO_GENERATE_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(parse_positive("STUDIO_GENERATE_TIMEOUT_SECS", &v)?),
            None => defaults.generate_timeout,
        };

        Ok(Self {
            api_url,
            poll_interval,
            max_poll_attempts,
            request_timeout,
            generate_timeout,
        })
    }

    pub fn poll_config(&self) -> PollConfig {
        PollConfig {
            interval: self.poll_interval,
            max_attempts: self.max_poll_attempts,
        }
    }
}

fn parse_positive(var: &'static str, value: &str) -> Result<u64, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError {
            var,
            expected: "a positive integer",
            value: value.to_string(),
        }),
    }
}
