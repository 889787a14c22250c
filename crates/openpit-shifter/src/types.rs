//! Gear position types

use crate::{ShifterError, ShifterResult};
use serde::{Deserialize, Serialize};

pub const MAX_FORWARD_GEARS: i32 = 7;
pub const NEUTRAL_GEAR: i32 = 0;
pub const REVERSE_GEAR: i32 = -1;

/// One observed shifter position.
///
/// While the stick travels between gates the device passes through neutral,
/// so transient `0` values are expected mid-shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GearPosition {
    pub gear: i32,
    pub is_neutral: bool,
    pub is_reverse: bool,
}

impl GearPosition {
    pub fn new(gear: i32) -> Self {
        Self {
            gear,
            is_neutral: gear == NEUTRAL_GEAR,
            is_reverse: gear < NEUTRAL_GEAR,
        }
    }

    pub fn neutral() -> Self {
        Self::new(NEUTRAL_GEAR)
    }

    pub fn reverse() -> Self {
        Self::new(REVERSE_GEAR)
    }

    /// Validating constructor for externally supplied gear numbers.
    ///
    /// # Errors
    ///
    /// `InvalidGear` outside `-1..=7`.
    pub fn try_new(gear: i32) -> ShifterResult<Self> {
        if (REVERSE_GEAR..=MAX_FORWARD_GEARS).contains(&gear) {
            Ok(Self::new(gear))
        } else {
            Err(ShifterError::InvalidGear(gear))
        }
    }

    pub fn is_forward(&self) -> bool {
        self.gear > NEUTRAL_GEAR
    }
}

impl Default for GearPosition {
    fn default() -> Self {
        Self::neutral()
    }
}
