//! The time zone collaborator of the calendar engine.
//!
//! The engine does not resolve time zone rules itself. A `TimeZone`
//! reports the raw and daylight saving offsets in effect at an instant,
//! and the engine records them in `ZONE_OFFSET` and `DST_OFFSET`.

use crate::{CalendarError, CalendarResult, MS_PER_HOUR};

/// The smallest allowed raw offset, in milliseconds.
pub(crate) const MIN_RAW_OFFSET: i32 = -12 * MS_PER_HOUR as i32;
/// The largest allowed raw offset, in milliseconds.
pub(crate) const MAX_RAW_OFFSET: i32 = 12 * MS_PER_HOUR as i32;
/// The largest allowed daylight saving offset, in milliseconds.
pub(crate) const MAX_DST_OFFSET: i32 = MS_PER_HOUR as i32;

/// The offsets from UTC in effect at some instant.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ZoneOffsets {
    /// The raw, or standard, offset in milliseconds.
    pub raw: i32,
    /// The daylight saving offset in milliseconds.
    pub dst: i32,
}

impl ZoneOffsets {
    /// Creates new `ZoneOffsets`.
    #[inline]
    #[must_use]
    pub const fn new(raw: i32, dst: i32) -> Self {
        Self { raw, dst }
    }

    /// Returns the full offset from UTC in milliseconds.
    #[inline]
    #[must_use]
    pub const fn total(&self) -> i64 {
        self.raw as i64 + self.dst as i64
    }
}

/// A source of UTC offsets.
pub trait TimeZone {
    /// Returns the offsets in effect at the UTC instant `epoch_milliseconds`.
    fn offsets_at(&self, epoch_milliseconds: i64) -> ZoneOffsets;

    /// Returns the offsets in effect at the local wall-clock time
    /// `local_milliseconds`.
    ///
    /// The default implementation treats the local time as a standard time
    /// and asks for the offsets at the matching instant.
    fn offsets_for_local(&self, local_milliseconds: i64) -> ZoneOffsets {
        let standard = self.offsets_at(local_milliseconds);
        let instant = local_milliseconds.saturating_sub(i64::from(standard.raw));
        self.offsets_at(instant)
    }
}

impl<T: TimeZone + ?Sized> TimeZone for &T {
    fn offsets_at(&self, epoch_milliseconds: i64) -> ZoneOffsets {
        (**self).offsets_at(epoch_milliseconds)
    }

    fn offsets_for_local(&self, local_milliseconds: i64) -> ZoneOffsets {
        (**self).offsets_for_local(local_milliseconds)
    }
}

/// Coordinated Universal Time.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Utc;

impl TimeZone for Utc {
    #[inline]
    fn offsets_at(&self, _: i64) -> ZoneOffsets {
        ZoneOffsets::default()
    }

    #[inline]
    fn offsets_for_local(&self, _: i64) -> ZoneOffsets {
        ZoneOffsets::default()
    }
}

/// A time zone with constant offsets.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedOffset(ZoneOffsets);

impl FixedOffset {
    /// Creates a new `FixedOffset`.
    ///
    /// `raw` must lie within ±12 hours and `dst` within zero to one hour.
    pub fn try_new(raw: i32, dst: i32) -> CalendarResult<Self> {
        if !(MIN_RAW_OFFSET..=MAX_RAW_OFFSET).contains(&raw) {
            return Err(CalendarError::out_of_range()
                .with_message("raw offset must be within twelve hours of UTC."));
        }
        if !(0..=MAX_DST_OFFSET).contains(&dst) {
            return Err(CalendarError::out_of_range()
                .with_message("daylight saving offset must be within zero and one hour."));
        }
        Ok(Self(ZoneOffsets::new(raw, dst)))
    }

    /// Returns the offsets of this zone.
    #[inline]
    #[must_use]
    pub const fn offsets(&self) -> ZoneOffsets {
        self.0
    }
}

impl TimeZone for FixedOffset {
    #[inline]
    fn offsets_at(&self, _: i64) -> ZoneOffsets {
        self.0
    }

    #[inline]
    fn offsets_for_local(&self, _: i64) -> ZoneOffsets {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::{FixedOffset, TimeZone, Utc, ZoneOffsets};
    use crate::{ErrorKind, MS_PER_HOUR};

    const HOUR: i32 = MS_PER_HOUR as i32;

    /// Standard time of one hour east, with an hour of daylight saving
    /// from local midnight of day 10 on.
    struct SteppedZone;

    impl TimeZone for SteppedZone {
        fn offsets_at(&self, epoch_milliseconds: i64) -> ZoneOffsets {
            if epoch_milliseconds >= 10 * 24 * MS_PER_HOUR - MS_PER_HOUR {
                ZoneOffsets::new(HOUR, HOUR)
            } else {
                ZoneOffsets::new(HOUR, 0)
            }
        }
    }

    #[test]
    fn utc_is_zero() {
        assert_eq!(Utc.offsets_at(123_456), ZoneOffsets::default());
        assert_eq!(Utc.offsets_for_local(-123_456).total(), 0);
    }

    #[test]
    fn fixed_offset_bounds() {
        let zone = FixedOffset::try_new(-5 * HOUR, HOUR).unwrap();
        assert_eq!(zone.offsets_at(0), ZoneOffsets::new(-5 * HOUR, HOUR));
        assert_eq!(zone.offsets().total(), -4 * MS_PER_HOUR);

        assert!(FixedOffset::try_new(12 * HOUR, 0).is_ok());
        assert!(FixedOffset::try_new(-12 * HOUR, 0).is_ok());
        let err = FixedOffset::try_new(12 * HOUR + 1, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
        assert!(FixedOffset::try_new(0, -1).is_err());
        assert!(FixedOffset::try_new(0, HOUR + 1).is_err());
    }

    #[test]
    fn local_offsets_follow_transitions() {
        let day_ten = 10 * 24 * MS_PER_HOUR;
        assert_eq!(SteppedZone.offsets_for_local(day_ten - 1).dst, 0);
        assert_eq!(SteppedZone.offsets_for_local(day_ten).dst, HOUR);
        assert_eq!((&SteppedZone).offsets_at(0), ZoneOffsets::new(HOUR, 0));
    }
}
