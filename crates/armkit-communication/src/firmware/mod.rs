//! Firmware implementations
//!
//! Supported controllers:
//! - arm: 6-axis desktop robot arm speaking a GRBL-derived G-code dialect

pub mod arm;

pub use arm::{ArmCommand, ArmController, ArmState};
