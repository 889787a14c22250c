//! Multi-function switch panel support for the OpenPit peripherals SDK
//!
//! A panel mixes latching toggle switches, reported directly in HID input
//! reports, with multi-position rotary knobs whose resting positions arrive
//! through the slower companion-app feed. [`SwitchPanelDevice`] folds both
//! sources into one state array indexed by [`SwitchIndex`].

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod companion;
pub mod device;
pub mod index;
pub mod report;
pub mod state;

pub use companion::*;
pub use device::*;
pub use index::*;
pub use report::*;
pub use state::*;

use openpit_hid_common::HidError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SwitchesError {
    #[error("Rotary group index {0} is out of range")]
    InvalidGroup(usize),

    #[error("Switch {switch:?} is not a member of rotary group {group}")]
    NotInGroup { switch: SwitchIndex, group: usize },

    #[error("Invalid report: {0}")]
    InvalidReport(String),
}

pub type SwitchesResult<T> = Result<T, SwitchesError>;

impl From<SwitchesError> for HidError {
    fn from(err: SwitchesError) -> Self {
        HidError::InvalidReport(err.to_string())
    }
}
