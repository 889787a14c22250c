//! Switch indices and the rotary group table
//!
//! Enum values are usable directly as indices into the switch state array.
//! Toggle switches latch (pressed once, they stay triggered); rotary
//! switches rest at one of several detents.

use serde::{Deserialize, Serialize};

pub const SWITCH_COUNT: usize = 28;
pub const ROTARY_GROUP_COUNT: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwitchIndex {
    HeadlightOff = 0,   /* rotary 1 */
    HeadlightPark,      /* rotary 1 */
    HeadlightHigh,      /* rotary 1 */
    HighBeam,           /* rotary 2 */
    FlasherOff,         /* rotary 2 */
    Flasher,            /* rotary 2 */
    FogLight,           /* toggle */
    TurnRight,          /* rotary 3 */
    TurnSignalOff,      /* rotary 3 */
    TurnLeft,           /* rotary 3 */
    RearWiperOff,       /* rotary 4 */
    RearWiperSpray,     /* rotary 4 */
    RearWiperWash,      /* rotary 4 */
    WiperSensitivity1,  /* rotary 5 */
    WiperSensitivity2,  /* rotary 5 */
    WiperSensitivity3,  /* rotary 5 */
    WiperSensitivity4,  /* rotary 5 */
    WiperSensitivity5,  /* rotary 5 */
    FrontWiperWash,     /* toggle */
    FrontWiperSingle,   /* rotary 6 */
    FrontWiperOff,      /* rotary 6 */
    FrontWiperInterval, /* rotary 6 */
    FrontWiperLow,      /* rotary 6 */
    FrontWiperHigh,     /* rotary 6 */
    CruiseOnOff,        /* toggle */
    CruiseDecrease,     /* toggle */
    CruiseIncrease,     /* toggle */
    CruiseCancel,       /* toggle */
}

use SwitchIndex::*;

/// The mutually-exclusive detents of each physical rotary knob.
///
/// Process-wide read-only data: initialized at startup, never mutated.
pub static ROTARY_SWITCH_GROUPS: [&[SwitchIndex]; ROTARY_GROUP_COUNT] = [
    &[HeadlightOff, HeadlightPark, HeadlightHigh],
    &[HighBeam, FlasherOff, Flasher],
    &[TurnRight, TurnSignalOff, TurnLeft],
    &[RearWiperOff, RearWiperSpray, RearWiperWash],
    &[
        WiperSensitivity1,
        WiperSensitivity2,
        WiperSensitivity3,
        WiperSensitivity4,
        WiperSensitivity5,
    ],
    &[
        FrontWiperSingle,
        FrontWiperOff,
        FrontWiperInterval,
        FrontWiperLow,
        FrontWiperHigh,
    ],
];

impl SwitchIndex {
    /// Every switch, in state-array order.
    pub const ALL: [SwitchIndex; SWITCH_COUNT] = [
        HeadlightOff,
        HeadlightPark,
        HeadlightHigh,
        HighBeam,
        FlasherOff,
        Flasher,
        FogLight,
        TurnRight,
        TurnSignalOff,
        TurnLeft,
        RearWiperOff,
        RearWiperSpray,
        RearWiperWash,
        WiperSensitivity1,
        WiperSensitivity2,
        WiperSensitivity3,
        WiperSensitivity4,
        WiperSensitivity5,
        FrontWiperWash,
        FrontWiperSingle,
        FrontWiperOff,
        FrontWiperInterval,
        FrontWiperLow,
        FrontWiperHigh,
        CruiseOnOff,
        CruiseDecrease,
        CruiseIncrease,
        CruiseCancel,
    ];

    /// Position in the switch state array.
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Rotary group this switch belongs to, if it is a rotary detent.
    pub fn rotary_group(self) -> Option<usize> {
        ROTARY_SWITCH_GROUPS
            .iter()
            .position(|group| group.contains(&self))
    }

    pub fn is_rotary(self) -> bool {
        self.rotary_group().is_some()
    }
}
