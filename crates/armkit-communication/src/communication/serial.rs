//! Serial port communication implementation
//!
//! Provides the hardware link to the arm controller board over USB or
//! RS-232.
//!
//! Supports:
//! - Port enumeration and discovery
//! - Baud rate, data bits, parity and stop bit configuration
//! - DTR/RTS assertion at open
//! - Blocking read/write operations with a link timeout

use crate::communication::{ConnectionParams, LinkOpener, SerialLink, SerialParity};
use armkit_core::{ConnectionError, Result};
use std::io::{self, Read, Write};

/// Information about an available serial port
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialPortInfo {
    /// Port name (e.g., "/dev/ttyUSB0", "COM3")
    pub port_name: String,

    /// Port description (e.g., "USB Serial Port")
    pub description: String,

    /// Manufacturer name if available
    pub manufacturer: Option<String>,

    /// Serial number if available
    pub serial_number: Option<String>,

    /// USB vendor ID if applicable
    pub vid: Option<u16>,

    /// USB product ID if applicable
    pub pid: Option<u16>,
}

impl SerialPortInfo {
    /// Create a new port info
    pub fn new(port_name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            port_name: port_name.into(),
            description: description.into(),
            manufacturer: None,
            serial_number: None,
            vid: None,
            pid: None,
        }
    }

    /// Set manufacturer
    pub fn with_manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = Some(manufacturer.into());
        self
    }

    /// Set serial number
    pub fn with_serial_number(mut self, serial_number: impl Into<String>) -> Self {
        self.serial_number = Some(serial_number.into());
        self
    }

    /// Set USB IDs
    pub fn with_usb_ids(mut self, vid: u16, pid: u16) -> Self {
        self.vid = Some(vid);
        self.pid = Some(pid);
        self
    }
}

/// List serial ports that look like an arm controller board
///
/// Filters the system's ports to:
/// - Windows: COM* (e.g., COM1, COM3)
/// - Linux: /dev/ttyUSB*, /dev/ttyACM*
/// - macOS: /dev/cu.usbserial-*, /dev/cu.usbmodem*
pub fn list_ports() -> Result<Vec<SerialPortInfo>> {
    let ports = serialport::available_ports().map_err(|e| {
        tracing::error!("Failed to enumerate serial ports: {}", e);
        ConnectionError::Enumeration {
            reason: e.to_string(),
        }
    })?;

    let mut infos: Vec<SerialPortInfo> = ports
        .iter()
        .filter(|port| is_candidate_port(&port.port_name))
        .map(|port| {
            let info = SerialPortInfo::new(&port.port_name, get_port_description(port));

            match &port.port_type {
                serialport::SerialPortType::UsbPort(usb_info) => {
                    let mut info = info.with_usb_ids(usb_info.vid, usb_info.pid);
                    if let Some(ref mfg) = usb_info.manufacturer {
                        info = info.with_manufacturer(mfg);
                    }
                    if let Some(ref serial) = usb_info.serial_number {
                        info = info.with_serial_number(serial);
                    }
                    info
                }
                _ => info,
            }
        })
        .collect();

    // Enumeration order is platform dependent; sort so discovery is stable.
    infos.sort_by(|a, b| a.port_name.cmp(&b.port_name));
    Ok(infos)
}

/// Pick the first candidate port reported by [`list_ports`]
///
/// Discovery is never performed implicitly; callers opt in by calling this
/// (or `ArmController::discover`).
pub fn discover_port() -> Result<SerialPortInfo> {
    let port = list_ports()?
        .into_iter()
        .next()
        .ok_or(ConnectionError::NoPortsAvailable)?;
    tracing::info!("Discovered serial port {} ({})", port.port_name, port.description);
    Ok(port)
}

/// Check if a port name matches controller board patterns
fn is_candidate_port(port_name: &str) -> bool {
    if let Some(num) = port_name.strip_prefix("COM") {
        return !num.is_empty() && num.chars().all(|c| c.is_ascii_digit());
    }

    if port_name.starts_with("/dev/ttyUSB") || port_name.starts_with("/dev/ttyACM") {
        return true;
    }

    port_name.starts_with("/dev/cu.usbserial-") || port_name.starts_with("/dev/cu.usbmodem")
}

/// Get a user-friendly description for a port
fn get_port_description(port: &serialport::SerialPortInfo) -> String {
    match &port.port_type {
        serialport::SerialPortType::UsbPort(usb_info) => {
            format!(
                "USB {} {}",
                usb_info.manufacturer.as_deref().unwrap_or("Device"),
                usb_info.product.as_deref().unwrap_or("Serial Port")
            )
        }
        serialport::SerialPortType::BluetoothPort => "Bluetooth Serial".to_string(),
        serialport::SerialPortType::PciPort => "PCI Serial".to_string(),
        _ => "Serial Port".to_string(),
    }
}

/// Convert a parity setting to serialport format
fn to_serialport_parity(parity: SerialParity) -> serialport::Parity {
    match parity {
        SerialParity::None => serialport::Parity::None,
        SerialParity::Even => serialport::Parity::Even,
        SerialParity::Odd => serialport::Parity::Odd,
    }
}

fn to_serialport_data_bits(bits: u8) -> serialport::DataBits {
    match bits {
        5 => serialport::DataBits::Five,
        6 => serialport::DataBits::Six,
        7 => serialport::DataBits::Seven,
        _ => serialport::DataBits::Eight,
    }
}

fn to_serialport_stop_bits(bits: u8) -> serialport::StopBits {
    match bits {
        2 => serialport::StopBits::Two,
        _ => serialport::StopBits::One,
    }
}

/// Real serial port implementation using serialport crate
pub struct RealSerialPort {
    port: Box<dyn serialport::SerialPort>,
    name: String,
}

impl RealSerialPort {
    /// Open a serial port with the given parameters
    pub fn open(params: &ConnectionParams) -> Result<Self> {
        params.validate()?;

        let unavailable = |e: serialport::Error| {
            tracing::warn!("Failed to open serial port {}: {}", params.port, e);
            ConnectionError::PortUnavailable {
                port: params.port.clone(),
                reason: e.to_string(),
            }
        };

        let mut port = serialport::new(&params.port, params.baud_rate)
            .data_bits(to_serialport_data_bits(params.data_bits))
            .stop_bits(to_serialport_stop_bits(params.stop_bits))
            .parity(to_serialport_parity(params.parity))
            .flow_control(serialport::FlowControl::None)
            .timeout(params.timeout())
            .open()
            .map_err(unavailable)?;

        if params.assert_dtr {
            port.write_data_terminal_ready(true).map_err(unavailable)?;
        }
        if params.assert_rts {
            port.write_request_to_send(true).map_err(unavailable)?;
        }

        tracing::info!(
            "Opened {} at {} baud ({}{}{})",
            params.port,
            params.baud_rate,
            params.data_bits,
            match params.parity {
                SerialParity::None => 'N',
                SerialParity::Even => 'E',
                SerialParity::Odd => 'O',
            },
            params.stop_bits
        );

        Ok(Self {
            port,
            name: params.port.clone(),
        })
    }
}

impl SerialLink for RealSerialPort {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let written = self.port.write(data)?;
        self.port.flush()?;
        Ok(written)
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.port.read(buf)
    }

    fn bytes_available(&mut self) -> io::Result<u32> {
        self.port.bytes_to_read().map_err(io::Error::from)
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn close(&mut self) -> io::Result<()> {
        // The OS handle is released when the port is dropped.
        self.port.flush()
    }
}

/// [`LinkOpener`] backed by the system's serial ports
#[derive(Debug, Default, Clone, Copy)]
pub struct SerialOpener;

impl LinkOpener for SerialOpener {
    fn open(&self, params: &ConnectionParams) -> Result<Box<dyn SerialLink>> {
        Ok(Box::new(RealSerialPort::open(params)?))
    }
}
