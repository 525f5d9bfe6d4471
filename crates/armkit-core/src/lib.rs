//! # ArmKit Core
//!
//! Core types, traits, and errors for ArmKit.
//! Provides the arm data model, the error taxonomy shared by every crate,
//! and the listener interface used to observe link activity.

pub mod data;
pub mod error;
pub mod listener;

pub use data::{fixed2, ArmPosition, Axis, GripperState};

pub use error::{ConnectionError, ControllerError, Error, Result};

pub use listener::{ListenerRegistry, TransportListener, TransportListenerHandle, WriteLogger};
