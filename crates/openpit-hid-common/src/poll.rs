//! Boundary consumed by the polling core

use crate::{HidDeviceInfo, HidResult};

/// A device whose domain state can be polled by a worker loop.
///
/// `read_value` performs exactly one blocking report read, bounded by the
/// transport's read timeout, and decodes it into the domain value. The
/// polling core compares successive values with `==`, so `Value` equality
/// defines what counts as a state transition.
pub trait PolledDevice: Send + Sync {
    type Value: Clone + PartialEq + Default + Send + Sync + std::fmt::Debug + 'static;

    /// One bounded blocking read, decoded.
    ///
    /// # Errors
    ///
    /// `ReadTimeout` when the device stayed quiet for the whole interval;
    /// decode and transport failures otherwise. Callers polling in a loop
    /// treat any error as "skip this iteration and re-check connectivity".
    fn read_value(&self) -> HidResult<Self::Value>;

    /// Connectivity derived from the last transport operation.
    fn is_connected(&self) -> bool;

    fn is_open(&self) -> bool;

    /// # Errors
    ///
    /// Fails when the transport rejects the open.
    fn open(&self) -> HidResult<()>;

    fn close(&self);

    fn info(&self) -> &HidDeviceInfo;
}
