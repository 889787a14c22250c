//! Monitor the first connected shifter and print gear changes.
//!
//! Run with: cargo run -p openpit-monitor --example shifter_monitor

use openpit_hid_common::hid_api;
use openpit_monitor::DeviceMonitor;
use openpit_shifter::enumerate_shifters;
use std::time::{Duration, Instant};

fn main() {
    tracing_subscriber::fmt::init();

    let api = match hid_api() {
        Ok(api) => api,
        Err(e) => {
            eprintln!("HID backend unavailable: {e}");
            return;
        }
    };

    let (mut devices, code) = enumerate_shifters(&api);
    if devices.is_empty() {
        eprintln!("No shifter device found ({code})");
        return;
    }
    println!("Number of shifter devices: {}", devices.len());

    let monitor = DeviceMonitor::with_device(devices.remove(0));
    if !monitor.is_open() && !monitor.open() {
        eprintln!("Device open failed");
        return;
    }

    // Runs on the worker thread; keep it short so gear updates stay fresh.
    monitor.set_callback(|gear: &i32| {
        println!("current gear changed: {gear}");
    });
    monitor.start_worker_thread();

    println!("Monitoring gear changes for 30 s (unplug to stop early)...");
    let deadline = Instant::now() + Duration::from_secs(30);
    while Instant::now() < deadline && monitor.is_running() {
        std::thread::sleep(Duration::from_millis(100));
    }
    if !monitor.is_running() {
        println!("The device has been disconnected.");
    }

    monitor.stop_worker_thread();
    monitor.close();
}
