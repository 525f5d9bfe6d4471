//! Transport listener interface
//!
//! Listeners observe link activity for diagnostics. Notifications are
//! fire-and-forget: a listener can neither veto nor delay the protocol.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Handle for a registered transport listener.
///
/// Uniquely identifies a listener subscription. Can be used to unsubscribe
/// from transport events.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransportListenerHandle(pub String);

impl TransportListenerHandle {
    fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

/// Listener trait for transport events
///
/// Implement this trait to receive notifications of link activity.
/// All methods have empty default bodies.
pub trait TransportListener: Send + Sync {
    /// Called after a link has been opened and configured
    fn on_opened(&self, _port: &str) {}

    /// Called once every byte of an outbound write has been handed to the link
    fn on_write_complete(&self, _bytes: usize) {}

    /// Called when the device has bytes waiting to be read
    fn on_response_ready(&self, _bytes_available: u32) {}

    /// Called after a link has been closed
    fn on_closed(&self, _port: &str) {}
}

/// Listener that reports completed writes to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct WriteLogger;

impl TransportListener for WriteLogger {
    fn on_write_complete(&self, bytes: usize) {
        tracing::info!(bytes, "All bytes were successfully transmitted");
    }
}

/// Registry of transport listeners keyed by handle
#[derive(Default, Clone)]
pub struct ListenerRegistry {
    listeners: Arc<RwLock<HashMap<String, Arc<dyn TransportListener>>>>,
}

impl ListenerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener and return its handle
    pub fn add(&self, listener: Arc<dyn TransportListener>) -> TransportListenerHandle {
        let handle = TransportListenerHandle::generate();
        self.listeners.write().insert(handle.0.clone(), listener);
        handle
    }

    /// Unregister a listener; returns false if the handle was unknown
    pub fn remove(&self, handle: &TransportListenerHandle) -> bool {
        self.listeners.write().remove(&handle.0).is_some()
    }

    /// Number of registered listeners
    pub fn len(&self) -> usize {
        self.listeners.read().len()
    }

    /// Check if no listeners are registered
    pub fn is_empty(&self) -> bool {
        self.listeners.read().is_empty()
    }

    /// Invoke `f` on every registered listener
    ///
    /// The lock is released before listeners run, so a listener may
    /// register or remove listeners without deadlocking.
    pub fn notify(&self, f: impl Fn(&dyn TransportListener)) {
        let snapshot: Vec<Arc<dyn TransportListener>> =
            self.listeners.read().values().cloned().collect();
        for listener in snapshot {
            f(listener.as_ref());
        }
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.len())
            .finish()
    }
}
