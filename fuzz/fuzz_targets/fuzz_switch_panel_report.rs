//! Fuzzes the switch panel input report decoder.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_switch_panel_report

#![no_main]

use libfuzzer_sys::fuzz_target;
use openpit_switches::{SwitchPanelReport, SwitchIndex};

fuzz_target!(|data: &[u8]| {
    // Must never panic on arbitrary bytes; reserved bits never surface.
    if let Ok(report) = SwitchPanelReport::parse(data) {
        for switch in SwitchIndex::ALL {
            assert!(report.states.get(switch) <= 1);
        }
    }
});
