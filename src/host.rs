//! Trait definitions for accessing values from the host environment.
//!
//! NOTE: This is a power user API.

use crate::CalendarResult;

/// The `HostClock` trait defines an accessor to the host's clock.
pub trait HostClock {
    /// Returns the current time in milliseconds since the epoch.
    fn epoch_milliseconds(&self) -> CalendarResult<i64>;
}

// Implement an empty clock that is stuck at the epoch.

impl HostClock for () {
    fn epoch_milliseconds(&self) -> CalendarResult<i64> {
        Ok(0)
    }
}

impl<T: HostClock + ?Sized> HostClock for &T {
    fn epoch_milliseconds(&self) -> CalendarResult<i64> {
        (**self).epoch_milliseconds()
    }
}
