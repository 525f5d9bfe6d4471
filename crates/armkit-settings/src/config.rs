//! Configuration file handling for ArmKit
//!
//! Supports JSON and TOML files, chosen by extension. Every section and
//! field has a default, so a file only needs the values it changes.
//!
//! Sections:
//! - Connection settings (port, link parameters)
//! - Response wait (reply timeout, poll interval)
//! - Motion defaults (feed speed, motion prefix)

use crate::error::{SettingsError, SettingsResult};
use armkit_communication::communication::{
    DEFAULT_BAUD_RATE, DEFAULT_LINK_TIMEOUT_MS, DEFAULT_POLL_INTERVAL_MS,
    DEFAULT_RESPONSE_TIMEOUT_MS,
};
use armkit_communication::{
    ArmController, ConnectionParams, ResponseWait, DEFAULT_COMMAND_PREFIX, DEFAULT_SPEED,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Port value that requests discovery instead of a fixed device
pub const AUTO_PORT: &str = "Auto";

/// Port used when no config names one
pub const DEFAULT_PORT: &str = "COM3";

/// Connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionSettings {
    /// Serial port name, or "Auto" to pick the first candidate port
    pub port: String,
    /// Baud rate
    pub baud_rate: u32,
    /// Link read/write timeout in milliseconds
    pub timeout_ms: u64,
    /// Assert DTR after opening
    pub assert_dtr: bool,
    /// Assert RTS after opening
    pub assert_rts: bool,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT.to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            timeout_ms: DEFAULT_LINK_TIMEOUT_MS,
            assert_dtr: true,
            assert_rts: true,
        }
    }
}

/// How long to wait for the device after each command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseSettings {
    /// Reply timeout in milliseconds
    pub timeout_ms: u64,
    /// Interval between readiness polls in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for ResponseSettings {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_RESPONSE_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

/// Motion defaults applied to a new controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionSettings {
    /// Feed speed
    pub speed: f64,
    /// Motion prefix for formatted lines
    pub command_prefix: String,
}

impl Default for MotionSettings {
    fn default() -> Self {
        Self {
            speed: DEFAULT_SPEED,
            command_prefix: DEFAULT_COMMAND_PREFIX.to_string(),
        }
    }
}

/// Complete ArmKit configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Connection settings
    pub connection: ConnectionSettings,
    /// Response wait settings
    pub response: ResponseSettings,
    /// Motion defaults
    pub motion: MotionSettings,
}

impl Config {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config file location (`<config dir>/armkit/config.toml`)
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("armkit").join("config.toml"))
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SettingsError::LoadError(format!("{}: {}", path.display(), e))
        })?;

        let config: Self = match Format::of(path)? {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!("Loaded settings from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match Format::of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content).map_err(|e| {
            SettingsError::SaveError(format!("{}: {}", path.display(), e))
        })?;

        Ok(())
    }

    /// Check values no link or wait can work with
    ///
    /// Motion values are not checked; they go to the firmware verbatim.
    pub fn validate(&self) -> SettingsResult<()> {
        if self.connection.port.trim().is_empty() {
            return Err(SettingsError::invalid("connection.port", "must not be empty"));
        }
        if self.connection.baud_rate == 0 {
            return Err(SettingsError::invalid("connection.baud_rate", "must be positive"));
        }
        if self.connection.timeout_ms == 0 {
            return Err(SettingsError::invalid("connection.timeout_ms", "must be positive"));
        }
        if self.response.timeout_ms == 0 {
            return Err(SettingsError::invalid("response.timeout_ms", "must be positive"));
        }
        if self.response.poll_interval_ms == 0 {
            return Err(SettingsError::invalid(
                "response.poll_interval_ms",
                "must be positive",
            ));
        }
        Ok(())
    }

    /// Whether the port should be discovered rather than used by name
    pub fn wants_discovery(&self) -> bool {
        self.connection.port.eq_ignore_ascii_case(AUTO_PORT)
    }

    /// Link parameters for `port`, using the configured link settings
    pub fn connection_params(&self, port: impl Into<String>) -> ConnectionParams {
        let mut params = ConnectionParams::new(port);
        params.baud_rate = self.connection.baud_rate;
        params.timeout_ms = self.connection.timeout_ms;
        params.assert_dtr = self.connection.assert_dtr;
        params.assert_rts = self.connection.assert_rts;
        params
    }

    /// Wait policy for device replies
    pub fn response_wait(&self) -> ResponseWait {
        ResponseWait::new(Duration::from_millis(self.response.timeout_ms))
            .with_poll_interval(Duration::from_millis(self.response.poll_interval_ms))
    }

    /// Apply link, wait and motion settings to a controller
    ///
    /// The controller's port name is kept.
    pub fn apply_to(&self, arm: &mut ArmController) {
        let params = self.connection_params(arm.port().to_string());
        arm.set_connection_params(params);
        arm.set_response_wait(self.response_wait());
        arm.set_speed(self.motion.speed);
        arm.set_command_prefix(self.motion.command_prefix.clone());
    }
}

enum Format {
    Json,
    Toml,
}

impl Format {
    fn of(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("toml") => Ok(Format::Toml),
            other => Err(SettingsError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}
