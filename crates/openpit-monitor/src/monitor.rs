//! Device monitor: polling lifecycle and change notifications

use openpit_hid_common::{HidDeviceInfo, PolledDevice};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

/// Notification target for state transitions.
///
/// Receives only the new value; invoked on the worker thread, never on the
/// caller's.
pub type ValueCallback<V> = Arc<dyn Fn(&V) + Send + Sync + 'static>;

/// Owns one polled device and bridges its blocking reads into a stream of
/// change callbacks.
///
/// Exactly one worker thread exists per monitor while running. The worker
/// is the only code touching the transport; every method here except
/// [`Self::set_device`] takes `&self` and is safe from any thread.
/// Dropping the monitor stops the worker and closes the device.
///
/// Disconnection is session-ending but not fatal: the worker exits,
/// `is_running()` turns false, and the caller may re-enumerate, hand over a
/// fresh device with [`Self::set_device`], and start again.
pub struct DeviceMonitor<D: PolledDevice + 'static> {
    device: Option<Arc<D>>,
    running: Arc<AtomicBool>,
    worker: Mutex<Option<JoinHandle<()>>>,
    callback: Arc<Mutex<Option<ValueCallback<D::Value>>>>,
    current: Arc<RwLock<Option<D::Value>>>,
}

impl<D: PolledDevice + 'static> DeviceMonitor<D> {
    pub fn new() -> Self {
        Self {
            device: None,
            running: Arc::new(AtomicBool::new(false)),
            worker: Mutex::new(None),
            callback: Arc::new(Mutex::new(None)),
            current: Arc::new(RwLock::new(None)),
        }
    }

    pub fn with_device(device: D) -> Self {
        let mut monitor = Self::new();
        monitor.set_device(device);
        monitor
    }

    /// Transfer ownership of a new device into the monitor.
    ///
    /// The previous device, if any, is dropped (and thereby closed).
    /// Precondition: no worker thread is active. Calling this while running
    /// leaves the worker polling the old device; call
    /// [`Self::stop_worker_thread`] first.
    pub fn set_device(&mut self, device: D) {
        self.device = Some(Arc::new(device));
    }

    pub fn device_info(&self) -> Option<&HidDeviceInfo> {
        self.device.as_ref().map(|d| d.info())
    }

    /// True iff a worker thread exists and its running flag is set.
    ///
    /// Turns false on its own when the device disconnects mid-poll.
    pub fn is_running(&self) -> bool {
        self.worker.lock().is_some() && self.running.load(Ordering::SeqCst)
    }

    /// Replace the notification target.
    ///
    /// Last writer wins. Replacement is not atomic with an in-flight
    /// invocation: a callback already being delivered to the old target
    /// completes there.
    pub fn set_callback(&self, callback: impl Fn(&D::Value) + Send + Sync + 'static) {
        *self.callback.lock() = Some(Arc::new(callback));
    }

    /// Last value delivered to the callback; `Default` before the first
    /// transition.
    ///
    /// A snapshot only: the next pending transition may already be in
    /// flight on the worker.
    pub fn current_value(&self) -> D::Value {
        self.current.read().clone().unwrap_or_default()
    }

    pub fn is_open(&self) -> bool {
        self.device.as_ref().is_some_and(|d| d.is_open())
    }

    /// Open the owned device. False when no device is owned or the
    /// transport rejects the open.
    pub fn open(&self) -> bool {
        let Some(device) = &self.device else {
            return false;
        };
        match device.open() {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(error = %e, "device open failed");
                false
            }
        }
    }

    /// Close the owned device. No-op without a device or when already
    /// closed.
    pub fn close(&self) {
        if let Some(device) = &self.device {
            device.close();
        }
    }

    /// Spawn the polling worker.
    ///
    /// No-op when no device is owned or a worker already exists. After a
    /// disconnect-triggered exit the finished worker still holds its slot;
    /// call [`Self::stop_worker_thread`] to reap it before starting again.
    pub fn start_worker_thread(&self) {
        let Some(device) = &self.device else {
            return;
        };
        let mut worker = self.worker.lock();
        if worker.is_some() {
            return;
        }
        self.running.store(true, Ordering::SeqCst);
        let device = Arc::clone(device);
        let running = Arc::clone(&self.running);
        let callback = Arc::clone(&self.callback);
        let current = Arc::clone(&self.current);
        let spawned = thread::Builder::new()
            .name("openpit-poll".to_string())
            .spawn(move || poll_loop(&*device, &running, &callback, &current));
        match spawned {
            Ok(handle) => *worker = Some(handle),
            Err(e) => {
                self.running.store(false, Ordering::SeqCst);
                tracing::error!(error = %e, "failed to spawn poll worker");
            }
        }
    }

    /// Stop the polling worker and wait for it to exit.
    ///
    /// Blocks until the worker has finished its current blocking read, so
    /// when this returns no read is in flight and no further callback will
    /// fire. Idempotent, and safe to call from a different thread than the
    /// ones observing `current_value()`.
    pub fn stop_worker_thread(&self) {
        self.running.store(false, Ordering::SeqCst);
        let handle = self.worker.lock().take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                tracing::error!("poll worker panicked");
            }
        }
    }
}

impl<D: PolledDevice + 'static> Default for DeviceMonitor<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: PolledDevice + 'static> Drop for DeviceMonitor<D> {
    fn drop(&mut self) {
        self.stop_worker_thread();
        self.close();
    }
}

/// One polling session. Runs until the flag clears or the device reports
/// disconnected.
fn poll_loop<D: PolledDevice>(
    device: &D,
    running: &AtomicBool,
    callback: &Mutex<Option<ValueCallback<D::Value>>>,
    current: &RwLock<Option<D::Value>>,
) {
    while running.load(Ordering::SeqCst) && device.is_connected() {
        let value = match device.read_value() {
            Ok(value) => value,
            Err(e) => {
                // Timeouts and corrupt reports; connectivity is re-checked
                // at the top of the loop.
                tracing::trace!(error = %e, "poll read yielded no value");
                continue;
            }
        };
        if current.read().as_ref() == Some(&value) {
            continue;
        }
        // Notify first, then publish: readers of `current_value` only ever
        // see values whose callback has already returned.
        let notify = callback.lock().clone();
        if let Some(notify) = notify {
            notify(&value);
        }
        *current.write() = Some(value);
    }
    if !device.is_connected() {
        tracing::warn!(path = %device.info().path, "device disconnected, polling stopped");
        running.store(false, Ordering::SeqCst);
    }
}
