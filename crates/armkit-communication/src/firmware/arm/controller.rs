//! Arm controller
//!
//! Sequences the arm protocol on top of a [`TransportSession`]:
//! connect (open, wait for the boot banner, home), then any number of
//! synchronous commands, then close. Every command is one write followed
//! by one wait for the device to answer.

use crate::communication::{
    discover_port, ConnectionParams, LinkOpener, ResponseWait, SerialOpener, TransportSession,
};
use crate::firmware::arm::commands::ArmCommand;
use crate::firmware::arm::state::ArmState;
use armkit_core::{
    ArmPosition, Axis, Error, GripperState, Result, TransportListener, TransportListenerHandle,
    WriteLogger,
};
use std::sync::Arc;

/// Controller for a 6-axis arm on a serial link
pub struct ArmController {
    session: TransportSession,
    state: ArmState,
    wait: ResponseWait,
    write_logger: Option<TransportListenerHandle>,
}

impl ArmController {
    /// Bind to a serial port by name; nothing is opened yet
    pub fn new(port: impl Into<String>) -> Self {
        Self::with_opener(ConnectionParams::new(port), Arc::new(SerialOpener))
    }

    /// Bind to `params`, opening links through `opener`
    pub fn with_opener(params: ConnectionParams, opener: Arc<dyn LinkOpener>) -> Self {
        Self {
            session: TransportSession::new(params, opener),
            state: ArmState::default(),
            wait: ResponseWait::default(),
            write_logger: None,
        }
    }

    /// Bind to the first serial port that looks like a controller board
    pub fn discover() -> Result<Self> {
        let port = discover_port()?;
        Ok(Self::new(port.port_name))
    }

    /// Open the link and home the arm
    ///
    /// Returns `Ok(false)` without writing anything when the port cannot be
    /// opened. A previously open link is closed first. The in-memory axis
    /// state is left untouched.
    pub fn connect(&mut self) -> Result<bool> {
        match self.try_connect() {
            Ok(()) => Ok(true),
            Err(Error::Connection(e)) => {
                tracing::warn!("Connect failed: {}", e);
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Like [`connect`](Self::connect) but reports open failures as errors
    pub fn try_connect(&mut self) -> Result<()> {
        if self.session.is_open() {
            self.session.close()?;
        }

        self.session.open()?;

        if self.write_logger.is_none() {
            self.write_logger = Some(self.session.add_listener(Arc::new(WriteLogger)));
        }

        let available = self.session.await_response_ready(&self.wait)?;
        let banner = self.session.read_response(available)?;
        tracing::debug!(banner = banner.trim_end(), "Device ready");

        self.send(ArmCommand::Homing)?;
        tracing::info!("Homing issued on {}", self.session.params().port);
        Ok(())
    }

    /// Check if a live link exists
    pub fn is_open(&self) -> bool {
        self.session.is_open()
    }

    /// Close the link; `Ok(false)` if it was not open
    pub fn close(&mut self) -> Result<bool> {
        self.session.close()
    }

    /// Send a raw command line and wait for the device to answer
    ///
    /// Returns whatever the device sent back; the content is not
    /// interpreted.
    pub fn send_command(&mut self, command: &str) -> Result<String> {
        let wait = self.wait;
        self.send_with_wait(command, &wait)
    }

    /// [`send_command`](Self::send_command) with a one-off wait policy
    pub fn send_with_wait(&mut self, command: &str, wait: &ResponseWait) -> Result<String> {
        tracing::debug!(command = command.trim_end(), "Sending");
        self.session.write(command.as_bytes())?;

        let available = self.session.await_response_ready(wait)?;
        let reply = self.session.read_response(available)?;
        tracing::debug!(reply = reply.trim_end(), "Reply");
        Ok(reply)
    }

    /// Send one of the fixed firmware commands
    pub fn send(&mut self, command: ArmCommand) -> Result<String> {
        tracing::info!(%command, "Sending firmware command");
        self.send_command(command.wire())
    }

    /// Store `position` and send it as a motion line
    pub fn move_to(&mut self, position: ArmPosition) -> Result<String> {
        self.state.position = position;
        self.move_current()
    }

    /// Send the stored position as a motion line
    pub fn move_current(&mut self) -> Result<String> {
        let line = self.state.format_current();
        self.send_command(&line)
    }

    /// Open a closed gripper or close an open one
    ///
    /// The stored state flips only after the command was acknowledged.
    pub fn switch_gripper(&mut self) -> Result<GripperState> {
        let command = match self.state.gripper {
            GripperState::Open => ArmCommand::GripperClose,
            GripperState::Closed => ArmCommand::GripperOpen,
        };
        self.send(command)?;
        Ok(self.state.toggle_gripper())
    }

    /// Motion line for the stored state and prefix
    pub fn format_current(&self) -> String {
        self.state.format_current()
    }

    /// Motion line for the stored state with `command` as prefix
    pub fn format_with(&self, command: &str) -> String {
        self.state.format_with(command)
    }

    /// Motion line for explicit axes with `command` as prefix
    pub fn format_position(&self, command: &str, position: &ArmPosition) -> String {
        self.state.format_position(command, position)
    }

    pub fn state(&self) -> &ArmState {
        &self.state
    }

    /// Restore axes, speed, prefix and gripper to their defaults
    ///
    /// Connecting never does this; the device homes but the model is kept.
    pub fn reset_state(&mut self) {
        self.state.reset();
    }

    pub fn axis(&self, axis: Axis) -> f64 {
        self.state.axis(axis)
    }

    pub fn set_axis(&mut self, axis: Axis, value: f64) {
        self.state.set_axis(axis, value);
    }

    pub fn position(&self) -> ArmPosition {
        self.state.position
    }

    pub fn set_position(&mut self, position: ArmPosition) {
        self.state.position = position;
    }

    pub fn speed(&self) -> f64 {
        self.state.speed
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.state.speed = speed;
    }

    pub fn command_prefix(&self) -> &str {
        &self.state.command_prefix
    }

    pub fn set_command_prefix(&mut self, prefix: impl Into<String>) {
        self.state.command_prefix = prefix.into();
    }

    pub fn gripper(&self) -> GripperState {
        self.state.gripper
    }

    pub fn is_gripper_open(&self) -> bool {
        self.state.gripper.is_open()
    }

    /// Port name used by the next connect
    pub fn port(&self) -> &str {
        &self.session.params().port
    }

    /// Change the port name; takes effect on the next connect
    pub fn set_port(&mut self, port: impl Into<String>) {
        let mut params = self.session.params().clone();
        params.port = port.into();
        self.session.set_params(params);
    }

    pub fn connection_params(&self) -> &ConnectionParams {
        self.session.params()
    }

    /// Replace link parameters; takes effect on the next connect
    pub fn set_connection_params(&mut self, params: ConnectionParams) {
        self.session.set_params(params);
    }

    pub fn response_wait(&self) -> ResponseWait {
        self.wait
    }

    /// Default wait policy for every command and for connect
    pub fn set_response_wait(&mut self, wait: ResponseWait) {
        self.wait = wait;
    }

    /// Observe link activity
    pub fn add_listener(&self, listener: Arc<dyn TransportListener>) -> TransportListenerHandle {
        self.session.add_listener(listener)
    }

    pub fn remove_listener(&self, handle: &TransportListenerHandle) -> bool {
        self.session.remove_listener(handle)
    }
}

impl std::fmt::Debug for ArmController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArmController")
            .field("session", &self.session)
            .field("state", &self.state)
            .field("wait", &self.wait)
            .finish()
    }
}
