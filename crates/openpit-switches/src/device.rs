//! Switch panel device over the common HID boundary

use crate::{CompanionFeed, SwitchPanelReport, SwitchStates};
use openpit_hid_common::{
    DeviceFilter, DeviceKind, ErrorCode, HidApi, HidDeviceInfo, HidDeviceIo, HidError, HidResult,
    HidTransport, PolledDevice, enumerate_infos,
};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

pub const SWITCH_PANEL_VENDOR_ID: u16 = 0x346e;
pub const SWITCH_PANEL_PRODUCT_IDS: &[u16] = &[0x0021];
pub const SWITCH_PANEL_USAGE_PAGE: u16 = 0x0001;

pub const SWITCH_PANEL_FILTER: DeviceFilter = DeviceFilter {
    kind: DeviceKind::SwitchPanel,
    vendor_id: SWITCH_PANEL_VENDOR_ID,
    product_ids: SWITCH_PANEL_PRODUCT_IDS,
    usage_page: Some(SWITCH_PANEL_USAGE_PAGE),
};

/// Upper bound on one blocking read; a cancelled poll loop is guaranteed to
/// notice within this interval.
pub const READ_TIMEOUT: Duration = Duration::from_millis(100);

/// A multi-function switch panel behind any [`HidDeviceIo`] transport.
///
/// HID reports carry toggle levels and rotary movement pulses; resting
/// rotary positions arrive through the [`CompanionFeed`]. All state readers
/// see the combined view.
pub struct SwitchPanelDevice<T: HidDeviceIo> {
    io: T,
    companion: CompanionFeed,
    accumulated: Mutex<SwitchStates>,
}

impl<T: HidDeviceIo> SwitchPanelDevice<T> {
    pub fn new(io: T) -> Self {
        Self::with_companion(io, CompanionFeed::new())
    }

    pub fn with_companion(io: T, companion: CompanionFeed) -> Self {
        Self {
            io,
            companion,
            accumulated: Mutex::new(SwitchStates::new()),
        }
    }

    pub fn info(&self) -> &HidDeviceInfo {
        self.io.info()
    }

    /// Instance path, the identity to re-open this device by.
    pub fn path(&self) -> &str {
        &self.io.info().path
    }

    /// Handle for whatever drives the companion-app channel.
    pub fn companion_feed(&self) -> CompanionFeed {
        self.companion.clone()
    }

    /// Whether the slower companion-fed rotary positions have arrived yet.
    /// Non-blocking.
    pub fn is_rotary_state_ready(&self) -> bool {
        self.companion.is_ready()
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

    /// Current combined switch state, non-blocking.
    ///
    /// Drains any queued reports, folds them in, and overlays the
    /// companion-fed rotary positions. Until the companion feed is ready the
    /// rotary lines read as zero and the code is `CompanionNotReady`;
    /// toggles are live either way.
    pub fn state_info(&self) -> (SwitchStates, ErrorCode) {
        if let Some(code) = self.drain_latest() {
            return (self.merged(), code);
        }
        let code = if self.companion.is_ready() {
            ErrorCode::Normal
        } else {
            ErrorCode::CompanionNotReady
        };
        (self.merged(), code)
    }

    /// Combined state from HID reports alone, non-blocking.
    ///
    /// Cannot observe a rotary knob's initial resting position; useful when
    /// the companion app is unavailable or the firmware predates the feed.
    pub fn state_info_hid_only(&self) -> (SwitchStates, ErrorCode) {
        if let Some(code) = self.drain_latest() {
            return (self.accumulated.lock().clone(), code);
        }
        (self.accumulated.lock().clone(), ErrorCode::Normal)
    }

    /// Non-blocking drain of queued reports. Returns the failure code when
    /// the transport errored, `None` on success or an empty queue.
    fn drain_latest(&self) -> Option<ErrorCode> {
        match self.io.read_latest_report() {
            Ok(data) => {
                self.fold_report(&data);
                None
            }
            Err(HidError::ReadTimeout) => None,
            Err(e) => {
                tracing::debug!(path = %self.path(), error = %e, "switch state read failed");
                Some(e.error_code())
            }
        }
    }

    fn fold_report(&self, data: &[u8]) {
        match SwitchPanelReport::parse(data) {
            Ok(report) => self.accumulated.lock().apply_report(&report.states),
            Err(e) => {
                tracing::trace!(path = %self.path(), error = %e, "skipping undecodable report");
            }
        }
    }

    fn merged(&self) -> SwitchStates {
        let mut states = self.accumulated.lock().clone();
        if self.companion.is_ready() {
            states.overlay_rotary(&self.companion.rotary_positions());
        }
        states
    }
}

impl<T: HidDeviceIo> PolledDevice for SwitchPanelDevice<T> {
    type Value = SwitchStates;

    fn read_value(&self) -> HidResult<SwitchStates> {
        let data = self.io.read_report(READ_TIMEOUT)?;
        let report = SwitchPanelReport::parse(&data)?;
        self.accumulated.lock().apply_report(&report.states);
        Ok(self.merged())
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

/// Scan for connected switch panels.
///
/// Returns one device per matching interface plus an error code: `Normal`
/// when at least one was found, `NoDevices` otherwise. Devices come back
/// closed; call `open()` before reading.
pub fn enumerate_switch_panels(
    api: &Arc<HidApi>,
) -> (Vec<SwitchPanelDevice<HidTransport>>, ErrorCode) {
    let (infos, code) = enumerate_infos(api, &SWITCH_PANEL_FILTER);
    let devices = infos
        .into_iter()
        .map(|info| SwitchPanelDevice::new(HidTransport::new(Arc::clone(api), info)))
        .collect();
    (devices, code)
}
