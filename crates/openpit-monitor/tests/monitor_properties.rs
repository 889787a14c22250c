//! Lifecycle and notification-ordering tests for `DeviceMonitor`, driven by
//! a scripted device whose reports are fed through a channel.

use openpit_hid_common::{HidDeviceInfo, HidError, HidResult, PolledDevice};
use openpit_monitor::DeviceMonitor;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::ThreadId;
use std::time::{Duration, Instant};

/// Test-side handle to the scripted device's knobs.
struct ScriptHandle {
    tx: Sender<i32>,
    connected: Arc<AtomicBool>,
    open: Arc<AtomicBool>,
    reads: Arc<AtomicUsize>,
    reader_threads: Arc<Mutex<HashSet<ThreadId>>>,
}

/// A device whose "reports" are integers sent over a channel. An empty
/// channel behaves like a quiet device: the read blocks for its bounded
/// interval, then times out.
struct ScriptedDevice {
    info: HidDeviceInfo,
    feed: Mutex<Receiver<i32>>,
    connected: Arc<AtomicBool>,
    open: Arc<AtomicBool>,
    reads: Arc<AtomicUsize>,
    reader_threads: Arc<Mutex<HashSet<ThreadId>>>,
}

fn scripted() -> (ScriptedDevice, ScriptHandle) {
    let (tx, rx) = channel();
    let connected = Arc::new(AtomicBool::new(true));
    let open = Arc::new(AtomicBool::new(false));
    let reads = Arc::new(AtomicUsize::new(0));
    let reader_threads = Arc::new(Mutex::new(HashSet::new()));
    let device = ScriptedDevice {
        info: HidDeviceInfo::new(0x346e, 0x0010, "scripted-0"),
        feed: Mutex::new(rx),
        connected: Arc::clone(&connected),
        open: Arc::clone(&open),
        reads: Arc::clone(&reads),
        reader_threads: Arc::clone(&reader_threads),
    };
    let handle = ScriptHandle {
        tx,
        connected,
        open,
        reads,
        reader_threads,
    };
    (device, handle)
}

impl PolledDevice for ScriptedDevice {
    type Value = i32;

    fn read_value(&self) -> HidResult<i32> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.reader_threads
            .lock()
            .expect("reader set")
            .insert(std::thread::current().id());
        if !self.connected.load(Ordering::SeqCst) {
            return Err(HidError::Disconnected);
        }
        match self
            .feed
            .lock()
            .expect("feed receiver")
            .recv_timeout(Duration::from_millis(20))
        {
            Ok(value) => Ok(value),
            Err(_) => Err(HidError::ReadTimeout),
        }
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    fn open(&self) -> HidResult<()> {
        self.open.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn close(&self) {
        self.open.store(false, Ordering::SeqCst);
    }

    fn info(&self) -> &HidDeviceInfo {
        &self.info
    }
}

fn wait_for(mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    false
}

#[test]
fn callback_fires_once_per_transition() {
    let (device, handle) = scripted();
    let monitor = DeviceMonitor::with_device(device);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    monitor.set_callback(move |gear: &i32| sink.lock().expect("seen").push(*gear));

    monitor.start_worker_thread();
    for gear in [0, 0, 1, 1, 2, 0, -1] {
        handle.tx.send(gear).expect("feed gear");
    }
    assert!(wait_for(|| monitor.current_value() == -1));
    monitor.stop_worker_thread();

    assert_eq!(*seen.lock().expect("seen"), vec![0, 1, 2, 0, -1]);
    assert_eq!(monitor.current_value(), -1);
}

#[test]
fn value_publishes_only_after_callback_returns() {
    let (device, handle) = scripted();
    let monitor = DeviceMonitor::with_device(device);

    let (entered_tx, entered_rx) = channel();
    let gate = Arc::new((Mutex::new(false), Condvar::new()));
    let gate_cb = Arc::clone(&gate);
    monitor.set_callback(move |gear: &i32| {
        entered_tx.send(*gear).expect("notify test thread");
        let (lock, cvar) = &*gate_cb;
        let mut released = lock.lock().expect("gate");
        while !*released {
            released = cvar.wait(released).expect("gate wait");
        }
    });

    monitor.start_worker_thread();
    handle.tx.send(5).expect("feed gear");

    let delivered = entered_rx
        .recv_timeout(Duration::from_secs(2))
        .expect("callback entered");
    assert_eq!(delivered, 5);
    // The callback has not returned yet, so the public value is still the
    // pre-transition one.
    assert_eq!(monitor.current_value(), 0);

    let (lock, cvar) = &*gate;
    *lock.lock().expect("gate") = true;
    cvar.notify_all();
    assert!(wait_for(|| monitor.current_value() == 5));
    monitor.stop_worker_thread();
}

#[test]
fn stop_joins_and_silences_callbacks() {
    let (device, handle) = scripted();
    let monitor = DeviceMonitor::with_device(device);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    monitor.set_callback(move |gear: &i32| sink.lock().expect("seen").push(*gear));

    monitor.start_worker_thread();
    handle.tx.send(1).expect("feed gear");
    assert!(wait_for(|| monitor.current_value() == 1));

    monitor.stop_worker_thread();
    assert!(!monitor.is_running());

    let reads_after_stop = handle.reads.load(Ordering::SeqCst);
    let callbacks_after_stop = seen.lock().expect("seen").len();
    handle.tx.send(2).expect("feed gear");
    std::thread::sleep(Duration::from_millis(100));

    // Join completed: nothing reads, nothing fires, the value holds.
    assert_eq!(handle.reads.load(Ordering::SeqCst), reads_after_stop);
    assert_eq!(seen.lock().expect("seen").len(), callbacks_after_stop);
    assert_eq!(monitor.current_value(), 1);
}

#[test]
fn double_start_spawns_exactly_one_worker() {
    let (device, handle) = scripted();
    let monitor = DeviceMonitor::with_device(device);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    monitor.set_callback(move |gear: &i32| sink.lock().expect("seen").push(*gear));

    monitor.start_worker_thread();
    monitor.start_worker_thread();
    assert!(monitor.is_running());

    handle.tx.send(3).expect("feed gear");
    assert!(wait_for(|| monitor.current_value() == 3));
    handle.tx.send(4).expect("feed gear");
    assert!(wait_for(|| monitor.current_value() == 4));
    monitor.stop_worker_thread();

    assert_eq!(handle.reader_threads.lock().expect("reader set").len(), 1);
    assert_eq!(*seen.lock().expect("seen"), vec![3, 4]);
}

#[test]
fn disconnect_stops_polling_without_explicit_stop() {
    let (device, handle) = scripted();
    let monitor = DeviceMonitor::with_device(device);

    monitor.start_worker_thread();
    handle.tx.send(2).expect("feed gear");
    assert!(wait_for(|| monitor.current_value() == 2));

    handle.connected.store(false, Ordering::SeqCst);
    assert!(wait_for(|| !monitor.is_running()));

    // Reap the finished worker, then a fresh session works again.
    monitor.stop_worker_thread();
    handle.connected.store(true, Ordering::SeqCst);
    monitor.start_worker_thread();
    assert!(monitor.is_running());
    handle.tx.send(4).expect("feed gear");
    assert!(wait_for(|| monitor.current_value() == 4));
    monitor.stop_worker_thread();
}

#[test]
fn replaced_callback_receives_the_next_transition() {
    let (device, handle) = scripted();
    let monitor = DeviceMonitor::with_device(device);

    let old_seen = Arc::new(Mutex::new(Vec::new()));
    let old_sink = Arc::clone(&old_seen);
    monitor.set_callback(move |gear: &i32| old_sink.lock().expect("old").push(*gear));

    monitor.start_worker_thread();
    handle.tx.send(1).expect("feed gear");
    assert!(wait_for(|| monitor.current_value() == 1));

    let new_seen = Arc::new(Mutex::new(Vec::new()));
    let new_sink = Arc::clone(&new_seen);
    monitor.set_callback(move |gear: &i32| new_sink.lock().expect("new").push(*gear));

    handle.tx.send(2).expect("feed gear");
    assert!(wait_for(|| monitor.current_value() == 2));
    monitor.stop_worker_thread();

    assert_eq!(*old_seen.lock().expect("old"), vec![1]);
    assert_eq!(*new_seen.lock().expect("new"), vec![2]);
}

#[test]
fn stop_on_quiet_device_returns_within_the_read_timeout() {
    let (device, _handle) = scripted();
    let monitor = DeviceMonitor::with_device(device);
    monitor.start_worker_thread();
    std::thread::sleep(Duration::from_millis(30));

    let begin = Instant::now();
    monitor.stop_worker_thread();
    assert!(begin.elapsed() < Duration::from_millis(500));
    assert!(!monitor.is_running());
}

#[test]
fn drop_stops_worker_and_closes_device() {
    let (device, handle) = scripted();
    let monitor = DeviceMonitor::with_device(device);
    assert!(monitor.open());
    monitor.start_worker_thread();
    handle.tx.send(1).expect("feed gear");
    assert!(wait_for(|| handle.reads.load(Ordering::SeqCst) > 0));

    drop(monitor);

    assert!(!handle.open.load(Ordering::SeqCst));
    let reads = handle.reads.load(Ordering::SeqCst);
    std::thread::sleep(Duration::from_millis(60));
    assert_eq!(handle.reads.load(Ordering::SeqCst), reads);
}
