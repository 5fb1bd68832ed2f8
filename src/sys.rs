use core::time::Duration;

use num_traits::ToPrimitive;
use web_time::{SystemTime, UNIX_EPOCH};

use crate::host::HostClock;
use crate::{CalendarResult, CalendarUnwrap};

/// A host clock backed by [`std::time::SystemTime`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemClock;

impl HostClock for SystemClock {
    fn epoch_milliseconds(&self) -> CalendarResult<i64> {
        get_system_milliseconds()
    }
}

/// Returns the system time in milliseconds.
pub(crate) fn get_system_milliseconds() -> CalendarResult<i64> {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(elapsed) => elapsed.as_millis().to_i64().calendar_unwrap(),
        // The host clock is set before 1970.
        Err(error) => milliseconds_before_epoch(error.duration()),
    }
}

/// Negates a duration before the epoch, flooring to the millisecond that
/// contains it.
fn milliseconds_before_epoch(duration: Duration) -> CalendarResult<i64> {
    let millis = duration.as_millis().to_i64().calendar_unwrap()?;
    if duration.subsec_nanos() % 1_000_000 == 0 {
        Ok(-millis)
    } else {
        Ok(-millis - 1)
    }
}

#[cfg(test)]
mod tests {
    use core::time::Duration;

    use super::{milliseconds_before_epoch, SystemClock};
    use crate::{host::HostClock, Instant};

    #[test]
    fn system_clock_is_after_epoch() {
        let now = SystemClock.epoch_milliseconds().unwrap();
        assert!(now > 0);
        let instant = Instant::now().unwrap();
        assert!(instant.epoch_milliseconds() >= now);
        assert!(instant.year().unwrap() >= 124);
    }

    #[test]
    fn pre_epoch_host_time_floors() {
        assert_eq!(milliseconds_before_epoch(Duration::ZERO).unwrap(), 0);
        assert_eq!(milliseconds_before_epoch(Duration::from_millis(2)).unwrap(), -2);
        assert_eq!(milliseconds_before_epoch(Duration::from_micros(1_500)).unwrap(), -2);
        assert_eq!(milliseconds_before_epoch(Duration::from_nanos(1)).unwrap(), -1);
    }
}
