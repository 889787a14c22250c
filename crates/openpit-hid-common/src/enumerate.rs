//! Device enumeration over the HID backend

use crate::{DeviceKind, ErrorCode, HidDeviceInfo, HidError, HidResult};
use hidapi::HidApi;
use std::sync::Arc;

/// Matching rule a peripheral crate registers for its hardware.
#[derive(Debug, Clone, Copy)]
pub struct DeviceFilter {
    pub kind: DeviceKind,
    pub vendor_id: u16,
    pub product_ids: &'static [u16],
    /// When set, only interfaces on this usage page match. Composite
    /// devices expose vendor pages next to their gamepad page.
    pub usage_page: Option<u16>,
}

impl DeviceFilter {
    pub fn matches(&self, vendor_id: u16, product_id: u16, usage_page: u16) -> bool {
        vendor_id == self.vendor_id
            && self.product_ids.contains(&product_id)
            && self.usage_page.is_none_or(|page| page == usage_page)
    }
}

/// Initialize the HID backend.
///
/// # Errors
///
/// `BackendUnavailable` when no HID runtime support is installed; callers
/// surface this as [`ErrorCode::DriverNotInstalled`].
pub fn hid_api() -> HidResult<Arc<HidApi>> {
    match HidApi::new() {
        Ok(api) => Ok(Arc::new(api)),
        Err(e) => {
            tracing::warn!(error = %e, "HID backend initialization failed");
            Err(HidError::BackendUnavailable(e.to_string()))
        }
    }
}

/// Scan the system for devices matching `filter`.
///
/// Returns the matching identities plus an error code: `Normal` when at
/// least one device matched, `NoDevices` otherwise. Never panics, never
/// returns a partial failure.
pub fn enumerate_infos(api: &HidApi, filter: &DeviceFilter) -> (Vec<HidDeviceInfo>, ErrorCode) {
    let mut found = Vec::new();
    for raw in api.device_list() {
        if !filter.matches(raw.vendor_id(), raw.product_id(), raw.usage_page()) {
            continue;
        }
        let mut info = HidDeviceInfo::new(
            raw.vendor_id(),
            raw.product_id(),
            raw.path().to_string_lossy().into_owned(),
        )
        .with_usage_page(raw.usage_page());
        if let Some(serial) = raw.serial_number() {
            info = info.with_serial(serial);
        }
        if let Some(manufacturer) = raw.manufacturer_string() {
            info = info.with_manufacturer(manufacturer);
        }
        if let Some(product) = raw.product_string() {
            info = info.with_product_name(product);
        }
        found.push(info);
    }
    let code = if found.is_empty() {
        ErrorCode::NoDevices
    } else {
        ErrorCode::Normal
    };
    tracing::debug!(kind = ?filter.kind, count = found.len(), "enumeration finished");
    (found, code)
}
