//! Transport error taxonomy
//!
//! Informational codes reported by the transport and enumeration layers.
//! Device-facing crates consume these; the polling core only ever surfaces
//! connectivity as a boolean.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ErrorCode {
    /// Last operation completed normally.
    #[default]
    Normal,
    /// No HID driver/runtime support is installed on this system.
    DriverNotInstalled,
    /// No matching device was found, or the device went away.
    NoDevices,
    /// An index or position argument was outside its valid range.
    OutOfRange,
    /// A parameter was malformed or an operation was misused.
    BadParameter,
    /// The collection cycle was too long and report data was lost.
    CollectionCycleDataLoss,
    /// A force-feedback effect could not be created.
    EffectCreation,
    /// Report or string data could not be encoded/decoded.
    EncodingFailed,
    /// A force-feedback operation failed.
    ForceFeedback,
    /// The device firmware is too old for the requested feature.
    FirmwareTooOld,
    /// The companion app has not finished establishing its data channel.
    CompanionNotReady,
}

impl ErrorCode {
    /// True only for [`ErrorCode::Normal`].
    pub fn is_normal(self) -> bool {
        self == ErrorCode::Normal
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ErrorCode::Normal => "normal",
            ErrorCode::DriverNotInstalled => "driver not installed",
            ErrorCode::NoDevices => "no devices found",
            ErrorCode::OutOfRange => "out of range",
            ErrorCode::BadParameter => "bad parameter",
            ErrorCode::CollectionCycleDataLoss => "data loss during collection cycle",
            ErrorCode::EffectCreation => "effect creation failed",
            ErrorCode::EncodingFailed => "encoding failed",
            ErrorCode::ForceFeedback => "force feedback error",
            ErrorCode::FirmwareTooOld => "firmware too old",
            ErrorCode::CompanionNotReady => "companion app not ready",
        };
        f.write_str(text)
    }
}
