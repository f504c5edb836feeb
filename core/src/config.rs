//! Netplay session configuration
//!
//! Provides the session parameters handed to the rollback engine at start,
//! plus the TOML loading helpers used by hosts that keep netplay settings on
//! disk (`netplay.toml` in the platform configuration directory).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Maximum number of players (local + remote) in a session
pub const MAX_PLAYERS: u8 = 16;

/// Default UDP port the transport binds to
pub const DEFAULT_PORT: u16 = 7000;

/// Default prediction window (frames the engine may simulate ahead of confirmed input)
pub const DEFAULT_PREDICTION_WINDOW: u8 = 8;

/// File name used by [`default_config_path`]
pub const CONFIG_FILE_NAME: &str = "netplay.toml";

/// Parameters for a rollback netplay session.
///
/// Everything here is forwarded to the rollback engine at start; the session
/// itself only uses `num_players`, `input_size`, `state_size` and `port`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Player capacity (local + remote actors)
    #[serde(default = "default_num_players")]
    pub num_players: u8,
    /// Maximum number of spectators
    #[serde(default)]
    pub max_spectators: u8,
    /// Frames the engine may predict ahead of confirmed remote input
    #[serde(default = "default_prediction_window")]
    pub input_prediction_window: u8,
    /// Delay (frames) applied to spectator streams
    #[serde(default)]
    pub spectator_delay: u8,
    /// Size of one frame's input blob in bytes
    #[serde(default = "default_input_size")]
    pub input_size: usize,
    /// Upper bound for a serialized state snapshot in bytes
    #[serde(default = "default_state_size")]
    pub state_size: usize,
    /// Local UDP port (0 = ephemeral)
    #[serde(default = "default_port")]
    pub port: u16,
    /// Ask the engine to save only when needed instead of every frame
    #[serde(default)]
    pub limited_saving: bool,
    /// Allow players to join after the session synchronized
    #[serde(default)]
    pub post_sync_joining: bool,
    /// Exchange state checksums to detect desyncs
    #[serde(default = "default_true")]
    pub desync_detection: bool,
    /// Register unknown datagram senders as remote actors while below capacity
    #[serde(default = "default_true")]
    pub auto_discovery: bool,
}

fn default_num_players() -> u8 {
    2
}
fn default_prediction_window() -> u8 {
    DEFAULT_PREDICTION_WINDOW
}
fn default_input_size() -> usize {
    16
}
fn default_state_size() -> usize {
    4 * 1024 * 1024
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_true() -> bool {
    true
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            num_players: default_num_players(),
            max_spectators: 0,
            input_prediction_window: default_prediction_window(),
            spectator_delay: 0,
            input_size: default_input_size(),
            state_size: default_state_size(),
            port: default_port(),
            limited_saving: false,
            post_sync_joining: false,
            desync_detection: true,
            auto_discovery: true,
        }
    }
}

impl SessionConfig {
    /// Create a config with the given capacity and blob sizes, other fields default
    pub fn new(num_players: u8, input_size: usize, state_size: usize) -> Self {
        Self {
            num_players,
            input_size,
            state_size,
            ..Default::default()
        }
    }

    /// Builder-style port override
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Check the values the session relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_players == 0 || self.num_players > MAX_PLAYERS {
            return Err(ConfigError::PlayerCount(self.num_players));
        }
        if self.input_size == 0 {
            return Err(ConfigError::ZeroInputSize);
        }
        if self.state_size == 0 {
            return Err(ConfigError::ZeroStateSize);
        }
        Ok(())
    }

    /// Parse a config from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML config file
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Serialize to pretty TOML
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Location of the per-user netplay config (`<config dir>/netplay.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("org", "netplay", "netplay")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// Load the per-user config, falling back to defaults when absent or invalid
pub fn load() -> SessionConfig {
    match default_config_path() {
        Some(path) => load_or_default(&path),
        None => SessionConfig::default(),
    }
}

/// Load `path`, falling back to defaults when it is absent or invalid
pub fn load_or_default(path: &Path) -> SessionConfig {
    if !path.exists() {
        return SessionConfig::default();
    }
    match SessionConfig::load_from_path(path) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Ignoring invalid netplay config");
            SessionConfig::default()
        }
    }
}

/// Errors from loading or validating a [`SessionConfig`]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Player capacity outside 1..=MAX_PLAYERS
    #[error("num_players must be 1-{max}, got {0}", max = MAX_PLAYERS)]
    PlayerCount(u8),
    /// Input blobs must carry at least one byte
    #[error("input_size must be greater than zero")]
    ZeroInputSize,
    /// State snapshots must have room for at least one byte
    #[error("state_size must be greater than zero")]
    ZeroStateSize,
    /// Config file could not be read
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// TOML could not be parsed
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    /// TOML could not be produced
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}
