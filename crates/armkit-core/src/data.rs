//! Data models for arm position and gripper state
//!
//! This module provides:
//! - A 6-axis arm coordinate (X, Y, Z linear; A, B, C angular)
//! - Per-axis addressing through [`Axis`]
//! - The two-state gripper model
//! - Two-decimal value formatting shared by every motion line

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the six arm axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// X linear axis
    X,
    /// Y linear axis
    Y,
    /// Z linear axis
    Z,
    /// A rotary axis
    A,
    /// B rotary axis
    B,
    /// C rotary axis
    C,
}

impl Axis {
    /// All axes in wire order
    pub const ALL: [Axis; 6] = [Axis::X, Axis::Y, Axis::Z, Axis::A, Axis::B, Axis::C];

    /// The G-code word letter for this axis
    pub fn letter(&self) -> char {
        match self {
            Axis::X => 'X',
            Axis::Y => 'Y',
            Axis::Z => 'Z',
            Axis::A => 'A',
            Axis::B => 'B',
            Axis::C => 'C',
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// 6-axis arm coordinate
///
/// Values are passed to the firmware verbatim; no range or finiteness
/// checks are applied.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ArmPosition {
    /// X-axis position
    pub x: f64,
    /// Y-axis position
    pub y: f64,
    /// Z-axis position
    pub z: f64,
    /// A-axis orientation
    pub a: f64,
    /// B-axis orientation
    pub b: f64,
    /// C-axis orientation
    pub c: f64,
}

impl ArmPosition {
    /// Create a position from all six axes
    pub fn new(x: f64, y: f64, z: f64, a: f64, b: f64, c: f64) -> Self {
        Self { x, y, z, a, b, c }
    }

    /// Get the value of one axis
    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
            Axis::A => self.a,
            Axis::B => self.b,
            Axis::C => self.c,
        }
    }

    /// Set the value of one axis
    pub fn set(&mut self, axis: Axis, value: f64) {
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
            Axis::Z => self.z = value,
            Axis::A => self.a = value,
            Axis::B => self.b = value,
            Axis::C => self.c = value,
        }
    }
}

impl fmt::Display for ArmPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, axis) in Axis::ALL.into_iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}:{}", axis, fixed2(self.get(axis)))?;
        }
        Ok(())
    }
}

/// Format `value` with exactly two decimals, rounding half away from zero
///
/// Rounding works on the shortest decimal form of the value, so `1.005`
/// becomes `1.01` even though its binary value is slightly below the tie.
/// Non-finite values print as `NaN`, `Infinity` and `-Infinity`.
pub fn fixed2(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    // f64 Display never uses exponent notation
    let shortest = value.abs().to_string();
    let (int_part, frac_part) = shortest
        .split_once('.')
        .unwrap_or((shortest.as_str(), ""));

    let mut digits: Vec<u8> = int_part.bytes().collect();
    let mut frac = frac_part.bytes();
    digits.push(frac.next().unwrap_or(b'0'));
    digits.push(frac.next().unwrap_or(b'0'));

    if frac.next().is_some_and(|d| d >= b'5') {
        let mut carry = true;
        for d in digits.iter_mut().rev() {
            if *d == b'9' {
                *d = b'0';
            } else {
                *d += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, b'1');
        }
    }

    let split = digits.len() - 2;
    let mut out = String::with_capacity(digits.len() + 2);
    if value.is_sign_negative() {
        out.push('-');
    }
    out.extend(digits[..split].iter().map(|&d| d as char));
    out.push('.');
    out.extend(digits[split..].iter().map(|&d| d as char));
    out
}

/// Gripper state
///
/// Two-state machine with no terminal state; it only changes through
/// [`GripperState::toggled`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GripperState {
    /// Gripper jaws closed
    #[default]
    Closed,
    /// Gripper jaws open
    Open,
}

impl GripperState {
    /// The opposite state
    pub fn toggled(self) -> Self {
        match self {
            GripperState::Closed => GripperState::Open,
            GripperState::Open => GripperState::Closed,
        }
    }

    /// Check if the gripper is open
    pub fn is_open(&self) -> bool {
        matches!(self, GripperState::Open)
    }
}

impl fmt::Display for GripperState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GripperState::Closed => write!(f, "closed"),
            GripperState::Open => write!(f, "open"),
        }
    }
}
