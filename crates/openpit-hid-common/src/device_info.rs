//! Device identity for enumerated HID peripherals

use serde::{Deserialize, Serialize};

/// Identity of one enumerated device.
///
/// `path` is an opaque instance path, stable for the lifetime of a physical
/// connection; it is the value to hold on to when re-opening a specific
/// device after a disconnect.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HidDeviceInfo {
    pub vendor_id: u16,
    pub product_id: u16,
    pub usage_page: Option<u16>,
    pub serial_number: Option<String>,
    pub manufacturer: Option<String>,
    pub product_name: Option<String>,
    pub path: String,
}

impl HidDeviceInfo {
    pub fn new(vendor_id: u16, product_id: u16, path: impl Into<String>) -> Self {
        Self {
            vendor_id,
            product_id,
            usage_page: None,
            serial_number: None,
            manufacturer: None,
            product_name: None,
            path: path.into(),
        }
    }

    pub fn with_usage_page(mut self, usage_page: u16) -> Self {
        self.usage_page = Some(usage_page);
        self
    }

    pub fn with_serial(mut self, serial: impl Into<String>) -> Self {
        self.serial_number = Some(serial.into());
        self
    }

    pub fn with_manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = Some(manufacturer.into());
        self
    }

    pub fn with_product_name(mut self, name: impl Into<String>) -> Self {
        self.product_name = Some(name.into());
        self
    }

    pub fn matches(&self, vendor_id: u16, product_id: u16) -> bool {
        self.vendor_id == vendor_id && self.product_id == product_id
    }

    pub fn display_name(&self) -> String {
        self.product_name
            .clone()
            .or_else(|| self.manufacturer.clone())
            .unwrap_or_else(|| format!("{:04x}:{:04x}", self.vendor_id, self.product_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_info_creation() {
        let info = HidDeviceInfo::new(0x346e, 0x0005, "/dev/hidraw0");
        assert_eq!(info.vendor_id, 0x346e);
        assert_eq!(info.product_id, 0x0005);
        assert!(info.matches(0x346e, 0x0005));
        assert!(!info.matches(0x346e, 0x9999));
    }

    #[test]
    fn test_display_name_fallbacks() {
        let info = HidDeviceInfo::new(0x346e, 0x0005, "/dev/hidraw0")
            .with_product_name("Sequential Shifter");
        assert_eq!(info.display_name(), "Sequential Shifter");

        let info = HidDeviceInfo::new(0x346e, 0x0005, "/dev/hidraw0").with_manufacturer("OpenPit");
        assert_eq!(info.display_name(), "OpenPit");

        let info = HidDeviceInfo::new(0x346e, 0x0005, "/dev/hidraw0");
        assert_eq!(info.display_name(), "346e:0005");
    }

    #[test]
    fn test_path_is_opaque_identity() {
        let info = HidDeviceInfo::new(1, 2, r"\\?\hid#vid_346e&pid_0005#7&2b{...}");
        assert_eq!(info.path, r"\\?\hid#vid_346e&pid_0005#7&2b{...}");
    }
}
