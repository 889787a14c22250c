//! Product classification for enumerated devices
//!
//! Kinds are tagged at enumeration time; there is no device class hierarchy.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DeviceKind {
    Wheelbase,
    SteeringWheel,
    Pedals,
    Handbrake,
    GearShifter,
    SwitchPanel,
    #[default]
    Unknown,
}

impl DeviceKind {
    /// Kinds this SDK can open and poll for state changes.
    pub fn is_supported(self) -> bool {
        matches!(self, DeviceKind::GearShifter | DeviceKind::SwitchPanel)
    }
}
