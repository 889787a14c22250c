//! Switch panel input report decoding
//!
//! Layout: byte 0 is the report id, bytes 1-4 carry a little-endian bitfield
//! with one bit per switch line in [`SwitchIndex`] order. Toggle bits are
//! levels; rotary bits pulse while the knob passes a detent.

use crate::{SwitchStates, SwitchesError, SwitchesResult, SwitchIndex};
use openpit_hid_common::ReportParser;

pub const SWITCH_REPORT_LEN: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchPanelReport {
    pub states: SwitchStates,
}

impl SwitchPanelReport {
    /// Decode one raw input report.
    ///
    /// # Errors
    ///
    /// `InvalidReport` when the report is shorter than the bitfield.
    pub fn parse(data: &[u8]) -> SwitchesResult<Self> {
        if data.len() < SWITCH_REPORT_LEN {
            return Err(SwitchesError::InvalidReport(format!(
                "report too short: {} bytes",
                data.len()
            )));
        }
        let mut parser = ReportParser::new(data);
        parser.skip(1);
        let bits = parser
            .read_u32_le()
            .map_err(|e| SwitchesError::InvalidReport(e.to_string()))?;

        let mut states = SwitchStates::new();
        for switch in SwitchIndex::ALL {
            if bits & (1u32 << switch.index()) != 0 {
                states.set(switch, 1);
            }
        }
        Ok(Self { states })
    }

    /// Bitfield for a state array, the inverse of [`Self::parse`].
    pub fn encode_bits(states: &SwitchStates) -> u32 {
        let mut bits = 0u32;
        for switch in SwitchIndex::ALL {
            if states.is_active(switch) {
                bits |= 1u32 << switch.index();
            }
        }
        bits
    }
}
