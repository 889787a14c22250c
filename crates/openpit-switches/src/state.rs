//! Combined switch state array

use crate::{ROTARY_SWITCH_GROUPS, SWITCH_COUNT, SwitchIndex};
use serde::{Deserialize, Serialize};

/// State of every switch on the panel, indexed by [`SwitchIndex`].
///
/// Toggles hold their level; rotary detents are one-hot within their group.
/// Equality over the whole array is what the polling core uses for change
/// detection, so two states are "the same" only when every line matches.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SwitchStates([u8; SWITCH_COUNT]);

impl SwitchStates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, switch: SwitchIndex) -> u8 {
        self.0.get(switch.index()).copied().unwrap_or(0)
    }

    pub fn is_active(&self, switch: SwitchIndex) -> bool {
        self.get(switch) != 0
    }

    pub fn set(&mut self, switch: SwitchIndex, value: u8) {
        if let Some(slot) = self.0.get_mut(switch.index()) {
            *slot = value;
        }
    }

    pub fn as_array(&self) -> &[u8; SWITCH_COUNT] {
        &self.0
    }

    pub fn active(&self) -> impl Iterator<Item = SwitchIndex> + '_ {
        SwitchIndex::ALL.into_iter().filter(|s| self.is_active(*s))
    }

    /// Fold a freshly decoded HID report into this accumulated view.
    ///
    /// Toggle levels are copied through. Rotary lines only pulse when the
    /// knob moves, so a pulsing detent displaces its group's previous
    /// position and a silent group keeps whatever was known.
    pub fn apply_report(&mut self, report: &SwitchStates) {
        for switch in SwitchIndex::ALL {
            if !switch.is_rotary() {
                self.set(switch, report.get(switch));
            }
        }
        for group in ROTARY_SWITCH_GROUPS {
            if let Some(active) = group.iter().find(|s| report.is_active(**s)) {
                for member in group {
                    self.set(*member, 0);
                }
                self.set(*active, 1);
            }
        }
    }

    /// Replace every rotary line with the companion-fed positions.
    pub fn overlay_rotary(&mut self, positions: &[u8; SWITCH_COUNT]) {
        for switch in SwitchIndex::ALL {
            if switch.is_rotary() {
                self.set(switch, positions.get(switch.index()).copied().unwrap_or(0));
            }
        }
    }
}

impl From<[u8; SWITCH_COUNT]> for SwitchStates {
    fn from(raw: [u8; SWITCH_COUNT]) -> Self {
        Self(raw)
    }
}
