//! Arm state and motion line formatting

use armkit_core::{fixed2, ArmPosition, Axis, GripperState};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Motion-mode prefix used when none is configured (absolute, linear)
pub const DEFAULT_COMMAND_PREFIX: &str = "G90 G01";

/// Feed speed used when none is configured
pub const DEFAULT_SPEED: f64 = 2000.0;

/// Build a motion line
///
/// `"<prefix> X.. Y.. Z.. A.. B.. C.. F..\r\n"` with two decimals per value,
/// each rounded by [`fixed2`]. The decimal separator is always `.`.
pub fn motion_line(prefix: &str, position: &ArmPosition, speed: f64) -> String {
    let mut line = String::from(prefix);
    for axis in Axis::ALL {
        line.push(' ');
        line.push(axis.letter());
        line.push_str(&fixed2(position.get(axis)));
    }
    line.push_str(" F");
    line.push_str(&fixed2(speed));
    line.push_str("\r\n");
    line
}

/// Host-side model of the arm
///
/// Axis and speed fields are free-form; only the gripper has a transition
/// function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmState {
    /// Last commanded axis values
    pub position: ArmPosition,
    /// Feed speed
    pub speed: f64,
    /// Active motion prefix
    pub command_prefix: String,
    /// Gripper state
    pub gripper: GripperState,
}

impl Default for ArmState {
    fn default() -> Self {
        Self {
            position: ArmPosition::default(),
            speed: DEFAULT_SPEED,
            command_prefix: DEFAULT_COMMAND_PREFIX.to_string(),
            gripper: GripperState::Closed,
        }
    }
}

impl ArmState {
    /// Create a state with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore every field to its default
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Get one axis
    pub fn axis(&self, axis: Axis) -> f64 {
        self.position.get(axis)
    }

    /// Set one axis
    pub fn set_axis(&mut self, axis: Axis, value: f64) {
        self.position.set(axis, value);
    }

    /// Flip the gripper and return the new state
    pub fn toggle_gripper(&mut self) -> GripperState {
        self.gripper = self.gripper.toggled();
        self.gripper
    }

    /// Format the stored position with the stored prefix
    pub fn format_current(&self) -> String {
        motion_line(&self.command_prefix, &self.position, self.speed)
    }

    /// Format the stored position with an explicit prefix
    pub fn format_with(&self, command: &str) -> String {
        motion_line(command, &self.position, self.speed)
    }

    /// Format an explicit position and prefix with the stored speed
    pub fn format_position(&self, command: &str, position: &ArmPosition) -> String {
        motion_line(command, position, self.speed)
    }
}

impl fmt::Display for ArmState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ArmState {{ {} F:{} prefix:'{}' gripper:{} }}",
            self.position,
            fixed2(self.speed),
            self.command_prefix,
            self.gripper
        )
    }
}
