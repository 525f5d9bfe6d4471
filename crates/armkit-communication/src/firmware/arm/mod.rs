//! 6-axis arm firmware protocol
//!
//! A G-code dialect over a serial link: fixed opcodes for homing, reset,
//! presets and the gripper, plus formatted absolute motion lines. Replies
//! are only detected, never parsed.

pub mod commands;
pub mod controller;
pub mod state;

pub use commands::ArmCommand;
pub use controller::ArmController;
pub use state::{motion_line, ArmState, DEFAULT_COMMAND_PREFIX, DEFAULT_SPEED};
