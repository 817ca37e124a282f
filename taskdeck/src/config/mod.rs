//! Configuration system for the `TaskDeck` client.
//!
//! Supports layered configuration with the following priority (highest first):
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attribute)
//! 3. TOML config file (`~/.config/taskdeck/config.toml`)
//! 4. Compiled defaults
//!
//! Missing config file is not an error (defaults are used). An explicit
//! `--config` path that doesn't exist is an error.

use std::path::PathBuf;
use std::time::Duration;

use taskdeck_proto::task::UserId;

use crate::poll::{DEFAULT_POLL_INTERVAL, PollerConfig};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),

    /// A user id was present but not a valid UUID.
    #[error("invalid user id: {0}")]
    InvalidUserId(String),
}

// ---------------------------------------------------------------------------
// TOML file structs (all fields Option for partial overrides)
// ---------------------------------------------------------------------------

/// Top-level TOML config file structure.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ConfigFile {
    store: StoreFileConfig,
    poll: PollFileConfig,
}

/// `[store]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct StoreFileConfig {
    url: Option<String>,
    user_id: Option<String>,
}

/// `[poll]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct PollFileConfig {
    interval_secs: Option<u64>,
    channel_capacity: Option<usize>,
}

// ---------------------------------------------------------------------------
// CLI arguments
// ---------------------------------------------------------------------------

/// CLI arguments for the client.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "TaskDeck client")]
pub struct CliArgs {
    /// Base URL of the task store.
    #[arg(short = 's', long, env = "TASKDECK_STORE_URL")]
    pub store_url: Option<String>,

    /// The user whose tasks to track.
    #[arg(short, long, env = "TASKDECK_USER_ID")]
    pub user_id: Option<String>,

    /// Seconds between polls of the task store.
    #[arg(long)]
    pub poll_interval_secs: Option<u64>,

    /// Path to config file (default: `~/.config/taskdeck/config.toml`).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", env = "TASKDECK_LOG")]
    pub log_level: String,
}

// ---------------------------------------------------------------------------
// Resolved configuration
// ---------------------------------------------------------------------------

/// Fully resolved client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the task store.
    pub store_url: String,
    /// The user whose tasks to track; required at runtime, but optional in
    /// every single layer.
    pub user_id: Option<UserId>,
    /// Interval between polls.
    pub poll_interval: Duration,
    /// Channel capacity for the poller's command/event channels.
    pub channel_capacity: usize,
    /// Log level filter string.
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            store_url: "http://127.0.0.1:7070".to_string(),
            user_id: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            channel_capacity: 256,
            log_level: "info".to_string(),
        }
    }
}

impl ClientConfig {
    /// Load configuration by merging CLI args, env vars, and a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the explicit config file cannot be read
    /// or parsed, or if a provided user id is not a valid UUID.
    pub fn load(cli: &CliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        Self::resolve(cli, &file)
    }

    /// Resolve a `ClientConfig` from CLI args and a parsed config file.
    ///
    /// Priority: CLI > file > default.
    fn resolve(cli: &CliArgs, file: &ConfigFile) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let raw_user = cli.user_id.clone().or_else(|| file.store.user_id.clone());
        let user_id = match raw_user {
            Some(raw) => Some(
                raw.parse()
                    .map_err(|_| ConfigError::InvalidUserId(raw.clone()))?,
            ),
            None => None,
        };

        Ok(Self {
            store_url: cli
                .store_url
                .clone()
                .or_else(|| file.store.url.clone())
                .unwrap_or(defaults.store_url),
            user_id,
            poll_interval: cli
                .poll_interval_secs
                .or(file.poll.interval_secs)
                .map_or(defaults.poll_interval, Duration::from_secs),
            channel_capacity: file
                .poll
                .channel_capacity
                .unwrap_or(defaults.channel_capacity),
            log_level: cli.log_level.clone(),
        })
    }

    /// Builds the poller configuration from the resolved settings.
    #[must_use]
    pub const fn to_poller_config(&self) -> PollerConfig {
        PollerConfig {
            interval: self.poll_interval,
            channel_capacity: self.channel_capacity,
        }
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Load and parse a TOML config file for the client.
fn load_config_file(explicit_path: Option<&std::path::Path>) -> Result<ConfigFile, ConfigError> {
    let path = if let Some(p) = explicit_path {
        let contents = std::fs::read_to_string(p).map_err(|e| ConfigError::ReadFile {
            path: p.to_path_buf(),
            source: e,
        })?;
        return Ok(toml::from_str(&contents)?);
    } else {
        let Some(config_dir) = dirs::config_dir() else {
            return Ok(ConfigFile::default());
        };
        config_dir.join("taskdeck").join("config.toml")
    };

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(e) => Err(ConfigError::ReadFile { path, source: e }),
    }
}
