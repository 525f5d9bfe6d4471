mod common;

use armkit_communication::{ConnectionParams, ResponseWait, TransportSession};
use armkit_core::{ControllerError, Error, TransportListener};
use common::{fast_wait, LinkOp, MockDevice, BANNER, OK};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

fn session(device: &MockDevice) -> TransportSession {
    TransportSession::new(ConnectionParams::new("/dev/ttyUSB0"), device.opener())
}

#[derive(Default)]
struct EventLog {
    events: Mutex<Vec<String>>,
}

impl TransportListener for EventLog {
    fn on_opened(&self, port: &str) {
        self.events.lock().unwrap().push(format!("opened {}", port));
    }

    fn on_write_complete(&self, bytes: usize) {
        self.events.lock().unwrap().push(format!("wrote {}", bytes));
    }

    fn on_response_ready(&self, bytes_available: u32) {
        self.events
            .lock()
            .unwrap()
            .push(format!("ready {}", bytes_available));
    }

    fn on_closed(&self, port: &str) {
        self.events.lock().unwrap().push(format!("closed {}", port));
    }
}

#[test]
fn test_open_close_lifecycle() {
    let device = MockDevice::new();
    let mut session = session(&device);
    assert!(!session.is_open());

    session.open().unwrap();
    assert!(session.is_open());

    assert!(session.close().unwrap());
    assert!(!session.is_open());
    assert!(!session.close().unwrap());
    assert_eq!(device.live(), 0);
}

#[test]
fn test_open_twice_is_rejected() {
    let device = MockDevice::new();
    let mut session = session(&device);
    session.open().unwrap();

    let err = session.open().unwrap_err();
    assert!(matches!(
        err,
        Error::Controller(ControllerError::AlreadyConnected)
    ));
    assert_eq!(device.max_live(), 1);
}

#[test]
fn test_operations_require_live_link() {
    let device = MockDevice::new();
    let mut session = session(&device);

    assert!(matches!(
        session.write(b"$h\r\n"),
        Err(Error::Controller(ControllerError::NotConnected))
    ));
    assert!(matches!(
        session.bytes_available(),
        Err(Error::Controller(ControllerError::NotConnected))
    ));
    assert!(matches!(
        session.await_response_ready(&fast_wait()),
        Err(Error::Controller(ControllerError::NotConnected))
    ));
    assert!(matches!(
        session.read_response(4),
        Err(Error::Controller(ControllerError::NotConnected))
    ));
}

#[test]
fn test_await_then_drain() {
    let device = MockDevice::new();
    let mut session = session(&device);
    session.open().unwrap();

    let available = session.await_response_ready(&fast_wait()).unwrap();
    assert_eq!(available as usize, BANNER.len());
    assert_eq!(session.read_response(available).unwrap(), BANNER);
    assert_eq!(session.bytes_available().unwrap(), 0);

    session.write(b"$h\r\n").unwrap();
    let available = session.await_response_ready(&fast_wait()).unwrap();
    assert_eq!(session.read_response(available).unwrap(), OK);
}

#[test]
fn test_await_is_bounded() {
    let device = MockDevice::new();
    device.set_no_banner(true);
    let mut session = session(&device);
    session.open().unwrap();

    let wait = ResponseWait::new(Duration::from_millis(50))
        .with_poll_interval(Duration::from_millis(10));
    let started = Instant::now();
    let err = session.await_response_ready(&wait).unwrap_err();

    assert!(err.is_timeout());
    assert!(started.elapsed() >= Duration::from_millis(50));
    let polls = device.count(|op| *op == LinkOp::Poll);
    assert!(polls >= 2, "only {} polls", polls);
}

#[test]
fn test_listeners_observe_activity() {
    let device = MockDevice::new();
    let mut session = session(&device);
    let log = Arc::new(EventLog::default());
    session.add_listener(log.clone());
    assert_eq!(session.listener_count(), 1);

    session.open().unwrap();
    session.await_response_ready(&fast_wait()).unwrap();
    session.write(b"!\r\n").unwrap();
    session.close().unwrap();

    let events = log.events.lock().unwrap().clone();
    assert_eq!(
        events,
        vec![
            "opened /dev/ttyUSB0".to_string(),
            format!("ready {}", BANNER.len()),
            "wrote 3".to_string(),
            "closed /dev/ttyUSB0".to_string(),
        ]
    );
}

#[test]
fn test_failed_write_is_not_notified() {
    let device = MockDevice::new();
    device.set_short_write(true);
    let mut session = session(&device);
    let log = Arc::new(EventLog::default());
    session.add_listener(log.clone());
    session.open().unwrap();

    let err = session.write(b"M3S0M4E40\r\n").unwrap_err();
    assert!(matches!(
        err,
        Error::Controller(ControllerError::PartialWrite {
            written: 5,
            expected: 11
        })
    ));
    let events = log.events.lock().unwrap().clone();
    assert_eq!(events, vec!["opened /dev/ttyUSB0".to_string()]);
}

#[test]
fn test_set_params_changes_next_open() {
    let device = MockDevice::new();
    let mut session = session(&device);
    let mut params = session.params().clone();
    params.port = "COM7".to_string();
    session.set_params(params);

    session.open().unwrap();
    assert_eq!(device.ops()[0], LinkOp::Open("COM7".to_string()));
}
