//! Link abstraction for talking to the arm
//!
//! A [`LinkOpener`] turns [`ConnectionParams`] into a live [`SerialLink`].
//! The [`session::TransportSession`] owns at most one live link and adds
//! the write / wait-for-response primitives the arm protocol is built on.

pub mod serial;
pub mod session;

use armkit_core::{ConnectionError, Result};
use std::io;
use std::time::Duration;

pub use serial::{discover_port, list_ports, RealSerialPort, SerialOpener, SerialPortInfo};
pub use session::TransportSession;

/// Default baud rate expected by the arm firmware
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Default read/write timeout of the link in milliseconds
pub const DEFAULT_LINK_TIMEOUT_MS: u64 = 3000;

/// Default upper bound on waiting for a device reply in milliseconds
pub const DEFAULT_RESPONSE_TIMEOUT_MS: u64 = 30_000;

/// Default interval between "bytes available" polls in milliseconds
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 20;

/// Serial parity setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SerialParity {
    /// No parity bit
    #[default]
    None,
    /// Even parity
    Even,
    /// Odd parity
    Odd,
}

/// Parameters used to open a link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionParams {
    /// Port name (e.g., "/dev/ttyUSB0", "COM3")
    pub port: String,
    /// Baud rate
    pub baud_rate: u32,
    /// Data bits (5-8)
    pub data_bits: u8,
    /// Stop bits (1 or 2)
    pub stop_bits: u8,
    /// Parity
    pub parity: SerialParity,
    /// Read/write timeout in milliseconds
    pub timeout_ms: u64,
    /// Assert DTR after opening
    pub assert_dtr: bool,
    /// Assert RTS after opening
    pub assert_rts: bool,
}

impl ConnectionParams {
    /// Parameters for `port` with the arm's link settings (115200 8-N-1,
    /// 3000 ms timeout, DTR and RTS asserted)
    pub fn new(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            baud_rate: DEFAULT_BAUD_RATE,
            data_bits: 8,
            stop_bits: 1,
            parity: SerialParity::None,
            timeout_ms: DEFAULT_LINK_TIMEOUT_MS,
            assert_dtr: true,
            assert_rts: true,
        }
    }

    /// Reject parameters no serial driver can honour
    pub fn validate(&self) -> Result<()> {
        let reason = if self.port.trim().is_empty() {
            Some("port name is empty".to_string())
        } else if self.baud_rate == 0 {
            Some("baud rate must be non-zero".to_string())
        } else if !(5..=8).contains(&self.data_bits) {
            Some(format!("invalid data bits: {}", self.data_bits))
        } else if !(1..=2).contains(&self.stop_bits) {
            Some(format!("invalid stop bits: {}", self.stop_bits))
        } else {
            None
        };

        match reason {
            Some(reason) => Err(ConnectionError::InvalidParameters { reason }.into()),
            None => Ok(()),
        }
    }

    /// Link timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// How long to wait for the device to signal a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseWait {
    /// Give up after this long
    pub timeout: Duration,
    /// Sleep between polls
    pub poll_interval: Duration,
}

impl ResponseWait {
    /// Wait bounded by `timeout`, polling at the default interval
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }

    /// Override the poll interval
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

impl Default for ResponseWait {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_RESPONSE_TIMEOUT_MS))
    }
}

/// A live, configured byte link to the device
pub trait SerialLink: Send {
    /// Write data to the link, returning the number of bytes accepted
    fn write(&mut self, data: &[u8]) -> io::Result<usize>;

    /// Read available data into `buf`
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Number of bytes the device has sent that are waiting to be read
    fn bytes_available(&mut self) -> io::Result<u32>;

    /// Get the port name
    fn name(&self) -> String;

    /// Release the link
    fn close(&mut self) -> io::Result<()>;
}

/// Opens links for a given set of parameters
pub trait LinkOpener: Send + Sync {
    /// Open and configure a link, failing with
    /// [`ConnectionError::PortUnavailable`] when the port cannot be used
    fn open(&self, params: &ConnectionParams) -> Result<Box<dyn SerialLink>>;
}
