//! Common HID plumbing for OpenPit peripheral crates
//!
//! This crate provides the transport boundary (open/close/read over a HID
//! report channel), device enumeration, and the shared types the shifter and
//! switch-panel crates build on.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod device_info;
pub mod device_kind;
pub mod enumerate;
pub mod error_code;
pub mod io;
pub mod poll;
pub mod report_parser;
pub mod transport;

// Re-exported so peripheral crates can take a backend handle without
// depending on hidapi directly.
pub use hidapi::HidApi;

pub use device_info::*;
pub use device_kind::*;
pub use enumerate::*;
pub use error_code::*;
pub use io::*;
pub use poll::*;
pub use report_parser::*;
pub use transport::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HidError {
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("Failed to open device: {0}")]
    OpenError(String),

    #[error("Device is not open")]
    NotOpen,

    #[error("Failed to read from device: {0}")]
    ReadError(String),

    #[error("Read timed out before a report arrived")]
    ReadTimeout,

    #[error("Invalid report format: {0}")]
    InvalidReport(String),

    #[error("Device disconnected")]
    Disconnected,

    #[error("HID backend unavailable: {0}")]
    BackendUnavailable(String),
}

pub type HidResult<T> = Result<T, HidError>;

impl HidError {
    /// Informational code of the failed operation, in the transport taxonomy.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            HidError::DeviceNotFound(_) | HidError::Disconnected => ErrorCode::NoDevices,
            HidError::OpenError(_) | HidError::ReadError(_) => ErrorCode::NoDevices,
            HidError::NotOpen => ErrorCode::BadParameter,
            HidError::ReadTimeout => ErrorCode::CollectionCycleDataLoss,
            HidError::InvalidReport(_) => ErrorCode::EncodingFailed,
            HidError::BackendUnavailable(_) => ErrorCode::DriverNotInstalled,
        }
    }
}
