//! Worker-thread polling and change-event bridge
//!
//! [`DeviceMonitor`] owns one polled device, runs a dedicated worker thread
//! that blocks on device reads, and invokes a user callback exactly once per
//! observed state transition. Callers read the last-known value
//! synchronously and detect disconnection by watching `is_running()`.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod monitor;

pub use monitor::*;
