//! Shifter device over the common HID boundary

use crate::ShifterReport;
use openpit_hid_common::{
    DeviceFilter, DeviceKind, ErrorCode, HidApi, HidDeviceInfo, HidDeviceIo, HidError, HidResult,
    HidTransport, PolledDevice, enumerate_infos,
};
use std::sync::Arc;
use std::time::Duration;

pub const SHIFTER_VENDOR_ID: u16 = 0x346e;
pub const SHIFTER_PRODUCT_IDS: &[u16] = &[0x0010, 0x0011];
pub const SHIFTER_USAGE_PAGE: u16 = 0x0001;

pub const SHIFTER_FILTER: DeviceFilter = DeviceFilter {
    kind: DeviceKind::GearShifter,
    vendor_id: SHIFTER_VENDOR_ID,
    product_ids: SHIFTER_PRODUCT_IDS,
    usage_page: Some(SHIFTER_USAGE_PAGE),
};

/// Upper bound on one blocking read; a cancelled poll loop is guaranteed to
/// notice within this interval.
pub const READ_TIMEOUT: Duration = Duration::from_millis(100);

/// A gear shifter behind any [`HidDeviceIo`] transport.
pub struct ShifterDevice<T: HidDeviceIo> {
    io: T,
}

impl<T: HidDeviceIo> ShifterDevice<T> {
    pub fn new(io: T) -> Self {
        Self { io }
    }

    pub fn info(&self) -> &HidDeviceInfo {
        self.io.info()
    }

    /// Instance path, the identity to re-open this device by.
    pub fn path(&self) -> &str {
        &self.io.info().path
    }

    /// # Errors
    ///
    /// Fails when the transport rejects the open.
    pub fn open(&self) -> HidResult<()> {
        self.io.open()
    }

    pub fn close(&self) {
        self.io.close()
    }

    pub fn is_open(&self) -> bool {
        self.io.is_open()
    }

    pub fn is_connected(&self) -> bool {
        self.io.is_connected()
    }

    /// Current gear: -1 reverse, 0 neutral, 1-7 forward.
    ///
    /// Waits for input reports until one decodes or the transport fails, so
    /// the call can take arbitrarily long on a quiet device. Not suited to
    /// the caller's main thread; poll through a worker instead.
    ///
    /// # Errors
    ///
    /// Transport failures only; timeouts and corrupt reports keep waiting.
    pub fn current_gear(&self) -> HidResult<i32> {
        loop {
            match self.read_gear() {
                Ok(gear) => return Ok(gear),
                Err(HidError::ReadTimeout) => continue,
                Err(HidError::InvalidReport(reason)) => {
                    tracing::trace!(path = %self.path(), %reason, "skipping undecodable report");
                    continue;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn read_gear(&self) -> HidResult<i32> {
        let data = self.io.read_report(READ_TIMEOUT)?;
        let report = ShifterReport::parse(&data)?;
        Ok(report.gear.gear)
    }
}

impl<T: HidDeviceIo> PolledDevice for ShifterDevice<T> {
    type Value = i32;

    fn read_value(&self) -> HidResult<i32> {
        self.read_gear()
    }

    fn is_connected(&self) -> bool {
        self.io.is_connected()
    }

    fn is_open(&self) -> bool {
        self.io.is_open()
    }

    fn open(&self) -> HidResult<()> {
        self.io.open()
    }

    fn close(&self) {
        self.io.close()
    }

    fn info(&self) -> &HidDeviceInfo {
        self.io.info()
    }
}

/// Scan for connected shifters.
///
/// Returns one device per matching interface plus an error code: `Normal`
/// when at least one was found, `NoDevices` otherwise. Devices come back
/// closed; call `open()` before reading.
pub fn enumerate_shifters(api: &Arc<HidApi>) -> (Vec<ShifterDevice<HidTransport>>, ErrorCode) {
    let (infos, code) = enumerate_infos(api, &SHIFTER_FILTER);
    let devices = infos
        .into_iter()
        .map(|info| ShifterDevice::new(HidTransport::new(Arc::clone(api), info)))
        .collect();
    (devices, code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use openpit_hid_common::mock::MockDeviceIo;

    fn shifter() -> (ShifterDevice<MockDeviceIo>, MockDeviceIo) {
        let io = MockDeviceIo::new(SHIFTER_VENDOR_ID, 0x0010, "mock-shifter");
        let feeder = io.clone();
        (ShifterDevice::new(io), feeder)
    }

    #[test]
    fn test_current_gear_decodes_queued_report() {
        let (device, feeder) = shifter();
        device.open().expect("open mock");
        feeder.queue_report(vec![0x01, 0x04]);
        assert_eq!(device.current_gear().expect("gear"), 3);
    }

    #[test]
    fn test_current_gear_skips_corrupt_reports() {
        let (device, feeder) = shifter();
        device.open().expect("open mock");
        feeder.queue_report(vec![0x01, 0b0000_0110]);
        feeder.queue_report(vec![0x01, 0x80]);
        assert_eq!(device.current_gear().expect("gear"), -1);
    }

    #[test]
    fn test_current_gear_fails_on_disconnect() {
        let (device, feeder) = shifter();
        device.open().expect("open mock");
        feeder.disconnect();
        assert!(matches!(device.current_gear(), Err(HidError::Disconnected)));
        assert!(!device.is_connected());
    }

    #[test]
    fn test_read_value_is_single_attempt() {
        let (device, feeder) = shifter();
        device.open().expect("open mock");
        feeder.queue_report(vec![0x01, 0x01]);
        assert_eq!(device.read_value().expect("gear"), 1);
        // Quiet device: one bounded attempt, then a timeout.
        assert!(matches!(device.read_value(), Err(HidError::ReadTimeout)));
    }

    #[test]
    fn test_delegation() {
        let (device, _) = shifter();
        assert!(!device.is_open());
        device.open().expect("open mock");
        assert!(device.is_open());
        assert_eq!(device.path(), "mock-shifter");
        device.close();
        assert!(!device.is_open());
    }
}
