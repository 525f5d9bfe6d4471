//! # ArmKit Communication
//!
//! Serial transport and firmware protocol for ArmKit.
//! The transport layer opens and configures the link and provides the
//! blocking write / wait-for-reply primitives; the firmware layer builds
//! command lines and sequences the arm protocol on top of it.

pub mod communication;
pub mod firmware;

pub use communication::{
    discover_port, list_ports, ConnectionParams, LinkOpener, RealSerialPort, ResponseWait,
    SerialLink, SerialOpener, SerialParity, SerialPortInfo, TransportSession,
};

pub use firmware::arm::{
    motion_line, ArmCommand, ArmController, ArmState, DEFAULT_COMMAND_PREFIX, DEFAULT_SPEED,
};
