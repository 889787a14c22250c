//! hidapi-backed transport

use crate::{ErrorCode, HidDeviceInfo, HidDeviceIo, HidError, HidResult};
use hidapi::HidApi;
use parking_lot::Mutex;
use std::ffi::CString;
use std::sync::Arc;
use std::time::Duration;

/// Largest input report any supported peripheral sends.
pub const REPORT_BUFFER_LEN: usize = 64;

/// Transport over one HID instance path.
///
/// The handle is move-only and exclusively owned; dropping it closes the
/// device. All methods take `&self`: the open handle and the last-operation
/// error code live behind locks so a polling thread can read while another
/// thread inspects connectivity.
pub struct HidTransport {
    api: Arc<HidApi>,
    info: HidDeviceInfo,
    handle: Mutex<Option<hidapi::HidDevice>>,
    last_error: Mutex<ErrorCode>,
}

impl HidTransport {
    pub fn new(api: Arc<HidApi>, info: HidDeviceInfo) -> Self {
        Self {
            api,
            info,
            handle: Mutex::new(None),
            last_error: Mutex::new(ErrorCode::Normal),
        }
    }

    /// Error code of the most recent operation.
    pub fn last_error(&self) -> ErrorCode {
        *self.last_error.lock()
    }

    pub fn path(&self) -> &str {
        &self.info.path
    }

    fn record(&self, code: ErrorCode) {
        *self.last_error.lock() = code;
    }

    fn fail<T>(&self, err: HidError) -> HidResult<T> {
        self.record(err.error_code());
        Err(err)
    }
}

impl HidDeviceIo for HidTransport {
    fn open(&self) -> HidResult<()> {
        let mut handle = self.handle.lock();
        if handle.is_some() {
            return Ok(());
        }
        let path = match CString::new(self.info.path.as_bytes()) {
            Ok(path) => path,
            Err(_) => return self.fail(HidError::OpenError("instance path contains NUL".to_string())),
        };
        match self.api.open_path(&path) {
            Ok(device) => {
                tracing::debug!(path = %self.info.path, "opened HID device");
                *handle = Some(device);
                self.record(ErrorCode::Normal);
                Ok(())
            }
            Err(e) => {
                tracing::debug!(path = %self.info.path, error = %e, "HID open failed");
                self.fail(HidError::OpenError(e.to_string()))
            }
        }
    }

    fn close(&self) {
        if self.handle.lock().take().is_some() {
            tracing::debug!(path = %self.info.path, "closed HID device");
        }
    }

    fn is_open(&self) -> bool {
        self.handle.lock().is_some()
    }

    fn is_connected(&self) -> bool {
        self.is_open() && self.last_error().is_normal()
    }

    fn read_report(&self, timeout: Duration) -> HidResult<Vec<u8>> {
        let handle = self.handle.lock();
        let Some(device) = handle.as_ref() else {
            return self.fail(HidError::NotOpen);
        };
        let mut buf = [0u8; REPORT_BUFFER_LEN];
        let millis = i32::try_from(timeout.as_millis()).unwrap_or(i32::MAX);
        match device.read_timeout(&mut buf, millis) {
            // A timeout is not a device fault; connectivity is unaffected.
            Ok(0) => {
                self.record(ErrorCode::Normal);
                Err(HidError::ReadTimeout)
            }
            Ok(len) => {
                self.record(ErrorCode::Normal);
                Ok(buf.get(..len).unwrap_or(&buf).to_vec())
            }
            Err(e) => {
                tracing::debug!(path = %self.info.path, error = %e, "HID read failed");
                self.fail(HidError::ReadError(e.to_string()))
            }
        }
    }

    fn read_latest_report(&self) -> HidResult<Vec<u8>> {
        let handle = self.handle.lock();
        let Some(device) = handle.as_ref() else {
            return self.fail(HidError::NotOpen);
        };
        let mut buf = [0u8; REPORT_BUFFER_LEN];
        let mut latest = None;
        loop {
            match device.read_timeout(&mut buf, 0) {
                Ok(0) => break,
                Ok(len) => latest = Some(buf.get(..len).unwrap_or(&buf).to_vec()),
                Err(e) => {
                    tracing::debug!(path = %self.info.path, error = %e, "HID read failed");
                    return self.fail(HidError::ReadError(e.to_string()));
                }
            }
        }
        self.record(ErrorCode::Normal);
        latest.ok_or(HidError::ReadTimeout)
    }

    fn info(&self) -> &HidDeviceInfo {
        &self.info
    }
}
