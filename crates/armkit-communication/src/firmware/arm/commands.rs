//! Fixed firmware opcodes
//!
//! These lines are sent verbatim; none of them is computed from arm state.

use std::fmt;

/// Fixed command understood by the arm firmware
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArmCommand {
    /// Run the full homing cycle
    Homing,
    /// Home each axis individually
    SingleAxisHoming,
    /// Soft reset / stop motion
    Reset,
    /// Move to the ready pose
    InitPosition,
    /// Move every axis to zero
    ZeroPosition,
    /// Close the gripper jaws
    GripperClose,
    /// Open the gripper jaws
    GripperOpen,
}

impl ArmCommand {
    /// Every command, in declaration order
    pub const ALL: [ArmCommand; 7] = [
        ArmCommand::Homing,
        ArmCommand::SingleAxisHoming,
        ArmCommand::Reset,
        ArmCommand::InitPosition,
        ArmCommand::ZeroPosition,
        ArmCommand::GripperClose,
        ArmCommand::GripperOpen,
    ];

    /// The CRLF-terminated line sent on the wire
    pub const fn wire(&self) -> &'static str {
        match self {
            ArmCommand::Homing => "$h\r\n",
            ArmCommand::SingleAxisHoming => "$HH\r\n",
            ArmCommand::Reset => "!\r\n",
            ArmCommand::InitPosition => {
                "G90 G01 X105.00 Y25.00 Z-55.00 A170.00 B30.00 C0.00 F2000.00\r\n"
            }
            ArmCommand::ZeroPosition => "M21G90G01X0Y0Z0A0B0C0\r\n",
            ArmCommand::GripperClose => "M3S1000M4E65\r\n",
            ArmCommand::GripperOpen => "M3S0M4E40\r\n",
        }
    }

    /// Upper-case protocol name
    pub fn name(&self) -> &'static str {
        match self {
            ArmCommand::Homing => "HOMING",
            ArmCommand::SingleAxisHoming => "SINGLE_AXIS_HOMING",
            ArmCommand::Reset => "RESET",
            ArmCommand::InitPosition => "INIT_POSITION",
            ArmCommand::ZeroPosition => "ZERO_POSITION",
            ArmCommand::GripperClose => "GRIPPER_CLOSE",
            ArmCommand::GripperOpen => "GRIPPER_OPEN",
        }
    }
}

impl fmt::Display for ArmCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
