//! ArmKit Settings Crate
//!
//! Loads and saves the configuration file that supplies the port, link
//! parameters, reply wait policy and motion defaults.

pub mod config;
pub mod error;

pub use config::{
    Config, ConnectionSettings, MotionSettings, ResponseSettings, AUTO_PORT, DEFAULT_PORT,
};
pub use error::{SettingsError, SettingsResult};
