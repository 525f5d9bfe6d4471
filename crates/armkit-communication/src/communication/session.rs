//! Transport session
//!
//! Owns the binding between a port name and at most one live link. All
//! operations block the calling thread.

use crate::communication::{ConnectionParams, LinkOpener, ResponseWait, SerialLink};
use armkit_core::{
    ControllerError, ListenerRegistry, Result, TransportListener, TransportListenerHandle,
};
use std::io;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

/// A port binding plus its optional live link
pub struct TransportSession {
    params: ConnectionParams,
    opener: Arc<dyn LinkOpener>,
    link: Option<Box<dyn SerialLink>>,
    listeners: ListenerRegistry,
}

impl TransportSession {
    /// Bind to `params` without opening anything
    pub fn new(params: ConnectionParams, opener: Arc<dyn LinkOpener>) -> Self {
        Self {
            params,
            opener,
            link: None,
            listeners: ListenerRegistry::new(),
        }
    }

    /// Connection parameters used by the next `open`
    pub fn params(&self) -> &ConnectionParams {
        &self.params
    }

    /// Replace the connection parameters; a live link is not affected
    pub fn set_params(&mut self, params: ConnectionParams) {
        self.params = params;
    }

    /// Open the link
    ///
    /// Fails with `AlreadyConnected` while a link is live; close it first.
    pub fn open(&mut self) -> Result<()> {
        if self.link.is_some() {
            return Err(ControllerError::AlreadyConnected.into());
        }

        let link = self.opener.open(&self.params)?;
        let name = link.name();
        self.link = Some(link);

        tracing::info!("Link {} open", name);
        self.listeners.notify(|l| l.on_opened(&name));
        Ok(())
    }

    /// Check if a live link exists
    pub fn is_open(&self) -> bool {
        self.link.is_some()
    }

    /// Release the live link
    ///
    /// Returns `Ok(false)` when there was nothing to close. The handle is
    /// released even if the link reports an error while closing.
    pub fn close(&mut self) -> Result<bool> {
        let Some(mut link) = self.link.take() else {
            tracing::debug!("Close requested with no live link");
            return Ok(false);
        };

        let name = link.name();
        let result = link.close();
        drop(link);

        tracing::info!("Link {} closed", name);
        self.listeners.notify(|l| l.on_closed(&name));
        result?;
        Ok(true)
    }

    /// Write `data` with a single call on the link
    ///
    /// A short write is reported as `PartialWrite` and never retried.
    pub fn write(&mut self, data: &[u8]) -> Result<usize> {
        let link = self.link.as_mut().ok_or(ControllerError::NotConnected)?;

        let written = link
            .write(data)
            .map_err(|e| ControllerError::WriteFailed {
                reason: e.to_string(),
            })?;

        if written < data.len() {
            return Err(ControllerError::PartialWrite {
                written,
                expected: data.len(),
            }
            .into());
        }

        self.listeners.notify(|l| l.on_write_complete(written));
        Ok(written)
    }

    /// Number of bytes waiting to be read
    pub fn bytes_available(&mut self) -> Result<u32> {
        let link = self.link.as_mut().ok_or(ControllerError::NotConnected)?;
        Ok(link.bytes_available()?)
    }

    /// Block until the device has sent something, or `wait.timeout` elapses
    ///
    /// Returns the number of bytes available.
    pub fn await_response_ready(&mut self, wait: &ResponseWait) -> Result<u32> {
        let link = self.link.as_mut().ok_or(ControllerError::NotConnected)?;
        let started = Instant::now();

        loop {
            let available = link.bytes_available()?;
            if available > 0 {
                self.listeners.notify(|l| l.on_response_ready(available));
                return Ok(available);
            }

            if started.elapsed() >= wait.timeout {
                tracing::warn!(
                    "No response on {} within {:?}",
                    self.params.port,
                    wait.timeout
                );
                return Err(ControllerError::Timeout {
                    timeout_ms: wait.timeout.as_millis() as u64,
                }
                .into());
            }

            thread::sleep(wait.poll_interval);
        }
    }

    /// Drain up to `available` bytes with one read and return them as text
    pub fn read_response(&mut self, available: u32) -> Result<String> {
        let link = self.link.as_mut().ok_or(ControllerError::NotConnected)?;

        let mut buf = vec![0u8; available as usize];
        let read = match link.read(&mut buf) {
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::TimedOut => 0,
            Err(e) => return Err(e.into()),
        };
        buf.truncate(read);

        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Register a listener for link activity
    pub fn add_listener(&self, listener: Arc<dyn TransportListener>) -> TransportListenerHandle {
        self.listeners.add(listener)
    }

    /// Unregister a listener
    pub fn remove_listener(&self, handle: &TransportListenerHandle) -> bool {
        self.listeners.remove(handle)
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl std::fmt::Debug for TransportSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportSession")
            .field("params", &self.params)
            .field("open", &self.is_open())
            .field("listeners", &self.listeners)
            .finish()
    }
}
