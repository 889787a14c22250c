//! Gear shifter support for the OpenPit peripherals SDK
//!
//! Decodes shifter input reports into gear positions (-1 reverse, 0 neutral,
//! 1-7 forward) and exposes [`ShifterDevice`] over any transport implementing
//! the common HID boundary.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod device;
pub mod report;
pub mod types;

pub use device::*;
pub use report::*;
pub use types::*;

use openpit_hid_common::HidError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShifterError {
    #[error("Invalid gear: {0}")]
    InvalidGear(i32),

    #[error("Invalid report: {0}")]
    InvalidReport(String),
}

pub type ShifterResult<T> = Result<T, ShifterError>;

impl From<ShifterError> for HidError {
    fn from(err: ShifterError) -> Self {
        HidError::InvalidReport(err.to_string())
    }
}
