//! Shifter input report decoding
//!
//! Layout: byte 0 is the report id, byte 1 is a one-hot gear selector.
//! Bits 0-6 select forward gears 1-7, bit 7 selects reverse, no bit set is
//! neutral. The selector is one-hot by construction of the gate mechanism;
//! anything else is a corrupt report.

use crate::{GearPosition, ShifterError, ShifterResult};

pub const SHIFTER_REPORT_LEN: usize = 2;
pub const REVERSE_BIT: u8 = 0x80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShifterReport {
    pub gear: GearPosition,
}

impl ShifterReport {
    /// Decode one raw input report.
    ///
    /// # Errors
    ///
    /// `InvalidReport` when the report is shorter than the selector byte or
    /// the selector has more than one gear engaged.
    pub fn parse(data: &[u8]) -> ShifterResult<Self> {
        let selector = *data.get(1).ok_or_else(|| {
            ShifterError::InvalidReport(format!("report too short: {} bytes", data.len()))
        })?;
        Ok(Self {
            gear: Self::decode_selector(selector)?,
        })
    }

    /// # Errors
    ///
    /// `InvalidReport` when more than one selector bit is set.
    pub fn decode_selector(selector: u8) -> ShifterResult<GearPosition> {
        match selector {
            0 => Ok(GearPosition::neutral()),
            REVERSE_BIT => Ok(GearPosition::reverse()),
            s if s.count_ones() == 1 => {
                let gear = i32::try_from(s.trailing_zeros()).unwrap_or(0) + 1;
                Ok(GearPosition::new(gear))
            }
            s => Err(ShifterError::InvalidReport(format!(
                "selector {s:#04x} has multiple gears engaged"
            ))),
        }
    }

    /// Selector byte for a gear, the inverse of [`Self::decode_selector`].
    pub fn encode_selector(gear: &GearPosition) -> u8 {
        if gear.is_reverse {
            REVERSE_BIT
        } else if gear.is_neutral {
            0
        } else {
            1u8.checked_shl(gear.gear.unsigned_abs().saturating_sub(1))
                .unwrap_or(0)
        }
    }
}
