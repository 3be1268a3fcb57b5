//! Client configuration.
//!
//! # Design
//! The defaults reproduce the plain blocking client: 1024-byte reads, no
//! timeouts, and GET args silently ignored. Timeouts and the GET args policy
//! are opt-in. `from_env` mirrors how the mock server picks up `PORT`, so the
//! CLI and test harnesses can tune a client without code changes.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_CHUNK_SIZE: usize = 1024;

pub const ENV_CHUNK_SIZE: &str = "SOCKHTTP_CHUNK_SIZE";
pub const ENV_TIMEOUT_MS: &str = "SOCKHTTP_TIMEOUT_MS";
pub const ENV_GET_ARGS: &str = "SOCKHTTP_GET_ARGS";

/// What a GET request does with caller-supplied args.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GetArgsPolicy {
    /// Args are dropped; the request goes out unchanged.
    #[default]
    Ignore,
    /// Non-empty args fail the request before a connection is opened.
    Reject,
}

/// Socket-level settings for one connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Size of each read while draining the response.
    pub chunk_size: usize,
    pub connect_timeout: Option<Duration>,
    pub read_timeout: Option<Duration>,
    pub write_timeout: Option<Duration>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            connect_timeout: None,
            read_timeout: None,
            write_timeout: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub transport: TransportConfig,
    pub get_args: GetArgsPolicy,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero is clamped to one byte per read.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.transport.chunk_size = chunk_size.max(1);
        self
    }

    /// Apply the same timeout to connect, read and write. A zero duration
    /// clears the timeouts, so the socket blocks indefinitely.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        let timeout = (!timeout.is_zero()).then_some(timeout);
        self.transport.connect_timeout = timeout;
        self.transport.read_timeout = timeout;
        self.transport.write_timeout = timeout;
        self
    }

    pub fn with_get_args(mut self, policy: GetArgsPolicy) -> Self {
        self.get_args = policy;
        self
    }

    /// Build a config from `SOCKHTTP_*` environment variables.
    ///
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as `from_env`, reading values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_CHUNK_SIZE) {
            config.transport.chunk_size = parse_positive(ENV_CHUNK_SIZE, &value)?;
        }
        if let Some(value) = lookup(ENV_TIMEOUT_MS) {
            let millis = parse_positive(ENV_TIMEOUT_MS, &value)?;
            config = config.with_timeout(Duration::from_millis(millis as u64));
        }
        if let Some(value) = lookup(ENV_GET_ARGS) {
            config.get_args = match value.trim().to_ascii_lowercase().as_str() {
                "ignore" => GetArgsPolicy::Ignore,
                "reject" => GetArgsPolicy::Reject,
                _ => {
                    return Err(ConfigError::InvalidChoice {
                        name: ENV_GET_ARGS,
                        expected: "ignore, reject",
                        value,
                    })
                }
            };
        }

        Ok(config)
    }
}

fn parse_positive(name: &'static str, value: &str) -> Result<usize, ConfigError> {
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidNumber {
            name,
            value: value.to_string(),
        }),
    }
}
