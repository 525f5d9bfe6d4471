//! In-memory stand-in for an arm on a serial link
//!
//! The simulated firmware sends a boot banner when the link opens and
//! answers every write with `ok`. Every link call is recorded so tests can
//! assert on ordering.

#![allow(dead_code)]

use armkit_communication::{ConnectionParams, LinkOpener, ResponseWait, SerialLink};
use armkit_core::ConnectionError;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const BANNER: &str = "Qinnew Robot\r\n";
pub const OK: &str = "ok\r\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOp {
    Open(String),
    Write(String),
    Poll,
    Read(usize),
    Close(String),
}

#[derive(Default)]
struct DeviceState {
    ops: Vec<LinkOp>,
    live: usize,
    max_live: usize,
    pending: Vec<u8>,
    fail_open: bool,
    no_banner: bool,
    no_reply: bool,
    short_write: bool,
}

#[derive(Clone, Default)]
pub struct MockDevice {
    inner: Arc<Mutex<DeviceState>>,
}

impl MockDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_open() -> Self {
        let device = Self::new();
        device.inner.lock().unwrap().fail_open = true;
        device
    }

    pub fn set_no_banner(&self, value: bool) {
        self.inner.lock().unwrap().no_banner = value;
    }

    pub fn set_no_reply(&self, value: bool) {
        self.inner.lock().unwrap().no_reply = value;
    }

    pub fn set_short_write(&self, value: bool) {
        self.inner.lock().unwrap().short_write = value;
    }

    pub fn ops(&self) -> Vec<LinkOp> {
        self.inner.lock().unwrap().ops.clone()
    }

    pub fn clear_ops(&self) {
        self.inner.lock().unwrap().ops.clear();
    }

    pub fn writes(&self) -> Vec<String> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                LinkOp::Write(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&LinkOp) -> bool) -> usize {
        self.ops().iter().filter(|op| pred(op)).count()
    }

    pub fn max_live(&self) -> usize {
        self.inner.lock().unwrap().max_live
    }

    pub fn live(&self) -> usize {
        self.inner.lock().unwrap().live
    }

    pub fn opener(&self) -> Arc<dyn LinkOpener> {
        Arc::new(MockOpener {
            device: self.clone(),
        })
    }
}

struct MockOpener {
    device: MockDevice,
}

impl LinkOpener for MockOpener {
    fn open(&self, params: &ConnectionParams) -> armkit_core::Result<Box<dyn SerialLink>> {
        let mut state = self.device.inner.lock().unwrap();
        if state.fail_open {
            return Err(ConnectionError::PortUnavailable {
                port: params.port.clone(),
                reason: "no such device".to_string(),
            }
            .into());
        }

        state.ops.push(LinkOp::Open(params.port.clone()));
        state.live += 1;
        state.max_live = state.max_live.max(state.live);
        state.pending.clear();
        if !state.no_banner {
            state.pending.extend_from_slice(BANNER.as_bytes());
        }

        Ok(Box::new(MockLink {
            device: self.device.clone(),
            name: params.port.clone(),
        }))
    }
}

struct MockLink {
    device: MockDevice,
    name: String,
}

impl SerialLink for MockLink {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let mut state = self.device.inner.lock().unwrap();
        let accepted = if state.short_write && data.len() > 1 {
            data.len() / 2
        } else {
            data.len()
        };
        state
            .ops
            .push(LinkOp::Write(String::from_utf8_lossy(data).to_string()));
        if !state.no_reply {
            state.pending.extend_from_slice(OK.as_bytes());
        }
        Ok(accepted)
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut state = self.device.inner.lock().unwrap();
        let n = buf.len().min(state.pending.len());
        buf[..n].copy_from_slice(&state.pending[..n]);
        state.pending.drain(..n);
        state.ops.push(LinkOp::Read(n));
        Ok(n)
    }

    fn bytes_available(&mut self) -> io::Result<u32> {
        let mut state = self.device.inner.lock().unwrap();
        state.ops.push(LinkOp::Poll);
        Ok(state.pending.len() as u32)
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn close(&mut self) -> io::Result<()> {
        let mut state = self.device.inner.lock().unwrap();
        state.ops.push(LinkOp::Close(self.name.clone()));
        state.live -= 1;
        Ok(())
    }
}

/// Short wait so timeouts resolve quickly in tests
pub fn fast_wait() -> ResponseWait {
    ResponseWait::new(Duration::from_millis(60)).with_poll_interval(Duration::from_millis(2))
}
