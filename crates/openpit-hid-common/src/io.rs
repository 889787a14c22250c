//! HID transport capability
//!
//! Peripheral crates are generic over [`HidDeviceIo`] so the same decoding
//! and polling code runs against real hardware and the scripted mock below.

use crate::{HidDeviceInfo, HidError, HidResult};
use std::time::Duration;

/// Blocking HID transport boundary.
///
/// `is_connected` is derived from the error code of the most recent
/// operation on the transport, not from a live probe; a device that stops
/// answering reads flips to disconnected only once a read fails.
pub trait HidDeviceIo: Send + Sync {
    /// Open the device at its instance path.
    ///
    /// # Errors
    ///
    /// Fails when the path cannot be opened by the HID backend. Opening an
    /// already-open device succeeds without side effects.
    fn open(&self) -> HidResult<()>;

    /// Close the device. No-op when not open.
    fn close(&self);

    /// Opened state only; says nothing about connectivity.
    fn is_open(&self) -> bool;

    /// Connectivity derived from the last operation's outcome.
    fn is_connected(&self) -> bool;

    /// Block until one input report arrives or `timeout` elapses.
    ///
    /// # Errors
    ///
    /// `ReadTimeout` when no report arrived in time, `NotOpen` on a closed
    /// transport, `ReadError` when the backend read fails.
    fn read_report(&self, timeout: Duration) -> HidResult<Vec<u8>>;

    /// Drain queued input reports without blocking and return the newest.
    ///
    /// # Errors
    ///
    /// `ReadTimeout` when nothing is queued; otherwise as [`Self::read_report`].
    fn read_latest_report(&self) -> HidResult<Vec<u8>>;

    /// Identity of the device behind this transport.
    fn info(&self) -> &HidDeviceInfo;
}

pub mod mock {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Scripted in-memory transport for tests.
    ///
    /// Cloning yields a handle to the same queue and flags, so a test can
    /// keep feeding reports while a device owns the other handle.
    #[derive(Clone)]
    pub struct MockDeviceIo {
        info: Arc<HidDeviceInfo>,
        reports: Arc<Mutex<VecDeque<Vec<u8>>>>,
        open: Arc<AtomicBool>,
        connected: Arc<AtomicBool>,
    }

    impl MockDeviceIo {
        pub fn new(vendor_id: u16, product_id: u16, path: impl Into<String>) -> Self {
            Self {
                info: Arc::new(HidDeviceInfo::new(vendor_id, product_id, path)),
                reports: Arc::new(Mutex::new(VecDeque::new())),
                open: Arc::new(AtomicBool::new(false)),
                connected: Arc::new(AtomicBool::new(true)),
            }
        }

        pub fn queue_report(&self, data: Vec<u8>) {
            self.reports.lock().push_back(data);
        }

        pub fn queued_len(&self) -> usize {
            self.reports.lock().len()
        }

        pub fn disconnect(&self) {
            self.connected.store(false, Ordering::SeqCst);
        }

        pub fn reconnect(&self) {
            self.connected.store(true, Ordering::SeqCst);
        }
    }

    impl HidDeviceIo for MockDeviceIo {
        fn open(&self) -> HidResult<()> {
            if !self.connected.load(Ordering::SeqCst) {
                return Err(HidError::OpenError("mock device unplugged".to_string()));
            }
            self.open.store(true, Ordering::SeqCst);
            Ok(())
        }

        fn close(&self) {
            self.open.store(false, Ordering::SeqCst);
        }

        fn is_open(&self) -> bool {
            self.open.load(Ordering::SeqCst)
        }

        fn is_connected(&self) -> bool {
            self.connected.load(Ordering::SeqCst)
        }

        fn read_report(&self, timeout: Duration) -> HidResult<Vec<u8>> {
            if !self.open.load(Ordering::SeqCst) {
                return Err(HidError::NotOpen);
            }
            if !self.connected.load(Ordering::SeqCst) {
                return Err(HidError::Disconnected);
            }
            if let Some(report) = self.reports.lock().pop_front() {
                return Ok(report);
            }
            // Emulate a quiet device: block for the timeout, then give up.
            std::thread::sleep(timeout);
            Err(HidError::ReadTimeout)
        }

        fn read_latest_report(&self) -> HidResult<Vec<u8>> {
            if !self.open.load(Ordering::SeqCst) {
                return Err(HidError::NotOpen);
            }
            if !self.connected.load(Ordering::SeqCst) {
                return Err(HidError::Disconnected);
            }
            let mut queue = self.reports.lock();
            let mut latest = None;
            while let Some(report) = queue.pop_front() {
                latest = Some(report);
            }
            latest.ok_or(HidError::ReadTimeout)
        }

        fn info(&self) -> &HidDeviceInfo {
            &self.info
        }
    }
}
