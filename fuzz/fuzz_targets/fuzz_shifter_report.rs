//! Fuzzes the shifter input report decoder.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_shifter_report

#![no_main]

use libfuzzer_sys::fuzz_target;
use openpit_shifter::ShifterReport;

fuzz_target!(|data: &[u8]| {
    // Must never panic on arbitrary bytes; a decoded gear stays in range.
    if let Ok(report) = ShifterReport::parse(data) {
        assert!((-1..=7).contains(&report.gear.gear));
    }
});
