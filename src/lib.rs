//! # ArmKit
//!
//! Serial G-code controller for 6-axis desktop robot arms.
//!
//! ## Architecture
//!
//! ArmKit is organized as a workspace with multiple crates:
//!
//! 1. **armkit-core** - Arm data model, error types, transport listeners
//! 2. **armkit-communication** - Serial link, transport session, arm protocol
//! 3. **armkit-settings** - Configuration file handling
//! 4. **armkit** - Logging setup and the demo binary

use std::path::{Path, PathBuf};
use std::time::Duration;

pub use armkit_communication::{
    discover_port, list_ports, motion_line, ArmCommand, ArmController, ArmState,
    ConnectionParams, ResponseWait, SerialParity, SerialPortInfo, TransportSession,
};
pub use armkit_core::{
    ArmPosition, Axis, ConnectionError, ControllerError, Error, GripperState, Result,
    TransportListener, TransportListenerHandle,
};
pub use armkit_settings::{Config, SettingsError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "ARMKIT_CONFIG";

/// Environment variable selecting `json` log output
pub const LOG_FORMAT_ENV: &str = "ARMKIT_LOG_FORMAT";

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting, or JSON lines when
///   `ARMKIT_LOG_FORMAT=json`
/// - RUST_LOG environment variable support (default `info`)
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var(LOG_FORMAT_ENV).is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    if json {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stdout)
            .with_target(true)
            .json();

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    } else {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stdout)
            .with_target(true)
            .with_level(true)
            .with_thread_names(true)
            .with_line_number(true)
            .pretty();

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    }

    Ok(())
}

/// Locate the config file: `explicit`, else the default path if it exists
pub fn config_path(explicit: Option<PathBuf>) -> Option<PathBuf> {
    explicit.or_else(|| Config::default_config_path().filter(|p| p.exists()))
}

/// Load the config at `path`, or defaults when there is none
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => {
            tracing::info!("Using config {}", path.display());
            Ok(Config::load_from_file(path)?)
        }
        None => {
            tracing::info!("No config file, using defaults");
            Ok(Config::default())
        }
    }
}

/// Build a controller from `config`, discovering the port when it is "Auto"
pub fn build_controller(config: &Config) -> Result<ArmController> {
    let mut arm = if config.wants_discovery() {
        let arm = ArmController::discover()?;
        tracing::info!("Port discovery selected {}", arm.port());
        arm
    } else {
        ArmController::new(config.connection.port.clone())
    };
    config.apply_to(&mut arm);
    Ok(arm)
}

/// Move to the ready pose, then open and close the gripper
///
/// `pause` separates the moves so the arm can finish each one. The link
/// is closed on every path out of this function once it has been opened.
pub fn run_demo(arm: &mut ArmController, pause: Duration) -> anyhow::Result<()> {
    if !arm.connect()? {
        anyhow::bail!("Cannot open port {}", arm.port());
    }

    let result = demo_moves(arm, pause);
    arm.close()?;
    result
}

fn demo_moves(arm: &mut ArmController, pause: Duration) -> anyhow::Result<()> {
    arm.send(ArmCommand::InitPosition)?;
    std::thread::sleep(pause);
    let state = arm.switch_gripper()?;
    tracing::info!("Gripper {}", state);
    std::thread::sleep(pause);
    let state = arm.switch_gripper()?;
    tracing::info!("Gripper {}", state);
    Ok(())
}
