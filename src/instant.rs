//! This module implements `Instant`, a millisecond instant with civil
//! field accessors.

use core::{
    cell::RefCell,
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
};

use writeable::{impl_display_with_writeable, LengthHint, Writeable};

use crate::{
    calendar::GregorianCalendar,
    host::HostClock,
    timezone::{TimeZone, Utc},
    CalendarField, CalendarResult, Month, Weekday, MS_PER_MINUTE,
};

/// A point in time with calendar field accessors in the time zone `Z`.
///
/// Field accessors delegate to a lenient [`GregorianCalendar`] that is
/// created on first use.
///
/// ```rust
/// use calendar_rs::Instant;
///
/// let date = Instant::try_from_date_time(96, 1, 14, 0, 0, 0).unwrap();
/// assert_eq!(date.epoch_milliseconds(), 824_256_000_000);
/// assert_eq!(date.to_string(), "Wed Feb 14 0:0:0   1996");
/// ```
pub struct Instant<Z: TimeZone = Utc> {
    epoch_milliseconds: i64,
    zone: Z,
    calendar: RefCell<Option<GregorianCalendar<Z>>>,
}

impl Instant<Utc> {
    /// Creates a new UTC `Instant`.
    #[must_use]
    pub fn new(epoch_milliseconds: i64) -> Self {
        Self::new_in(epoch_milliseconds, Utc)
    }

    /// Creates a UTC `Instant` from the date and time fields, where `year`
    /// counts from 1900.
    pub fn try_from_date_time(
        year: i32,
        month: i32,
        date: i32,
        hour: i32,
        minute: i32,
        second: i32,
    ) -> CalendarResult<Self> {
        Self::try_from_date_time_in(year, month, date, hour, minute, second, Utc)
    }

    /// Returns the current instant of the host system.
    #[cfg(feature = "sys")]
    pub fn now() -> CalendarResult<Self> {
        Self::now_with_clock(&crate::sys::SystemClock)
    }

    /// Returns the current instant of `clock`.
    pub fn now_with_clock(clock: &impl HostClock) -> CalendarResult<Self> {
        Ok(Self::new(clock.epoch_milliseconds()?))
    }
}

impl<Z: TimeZone> Instant<Z> {
    /// Creates a new `Instant` in `zone`.
    #[must_use]
    pub fn new_in(epoch_milliseconds: i64, zone: Z) -> Self {
        Self {
            epoch_milliseconds,
            zone,
            calendar: RefCell::new(None),
        }
    }

    /// Returns the milliseconds since the epoch.
    #[inline]
    #[must_use]
    pub fn epoch_milliseconds(&self) -> i64 {
        self.epoch_milliseconds
    }

    /// Sets the milliseconds since the epoch.
    #[inline]
    pub fn set_epoch_milliseconds(&mut self, epoch_milliseconds: i64) {
        self.epoch_milliseconds = epoch_milliseconds;
    }

    /// Returns the time zone of this instant.
    #[inline]
    #[must_use]
    pub fn zone(&self) -> &Z {
        &self.zone
    }

    /// Returns whether this instant is earlier than `other`.
    #[inline]
    #[must_use]
    pub fn before<Z2: TimeZone>(&self, other: &Instant<Z2>) -> bool {
        self.epoch_milliseconds < other.epoch_milliseconds
    }

    /// Returns whether this instant is later than `other`.
    #[inline]
    #[must_use]
    pub fn after<Z2: TimeZone>(&self, other: &Instant<Z2>) -> bool {
        self.epoch_milliseconds > other.epoch_milliseconds
    }

    /// Compares the instants of `self` and `other`.
    #[inline]
    #[must_use]
    pub fn compare<Z2: TimeZone>(&self, other: &Instant<Z2>) -> Ordering {
        self.epoch_milliseconds.cmp(&other.epoch_milliseconds)
    }

    /// Returns the 32-bit hash code, the exclusive or of the two halves of
    /// the millisecond value.
    #[inline]
    #[must_use]
    pub fn hash_code(&self) -> i32 {
        let ms = self.epoch_milliseconds;
        (ms as i32) ^ ((ms >> 32) as i32)
    }
}

impl<Z: TimeZone + Clone> Instant<Z> {
    /// Creates an `Instant` in `zone` from the date and time fields, where
    /// `year` counts from 1900. Out of range values carry into larger
    /// fields.
    pub fn try_from_date_time_in(
        year: i32,
        month: i32,
        date: i32,
        hour: i32,
        minute: i32,
        second: i32,
        zone: Z,
    ) -> CalendarResult<Self> {
        let mut calendar = GregorianCalendar::with_zone(zone.clone());
        calendar.clear();
        calendar.set_date_time_seconds(
            year.saturating_add(1900),
            month,
            date,
            hour,
            minute,
            second,
        )?;
        let epoch_milliseconds = calendar.epoch_milliseconds()?;
        Ok(Self {
            epoch_milliseconds,
            zone,
            calendar: RefCell::new(Some(calendar)),
        })
    }

    /// Runs `f` on the engine, positioned at this instant.
    fn with_calendar<T>(
        &self,
        f: impl FnOnce(&mut GregorianCalendar<Z>) -> CalendarResult<T>,
    ) -> CalendarResult<T> {
        let mut slot = self.calendar.borrow_mut();
        let calendar = slot.get_or_insert_with(|| GregorianCalendar::with_zone(self.zone.clone()));
        if !calendar.is_time_valid() || calendar.epoch_milliseconds()? != self.epoch_milliseconds {
            calendar.set_epoch_milliseconds(self.epoch_milliseconds);
        }
        f(calendar)
    }

    fn field(&self, field: CalendarField) -> CalendarResult<i32> {
        self.with_calendar(|calendar| calendar.get(field))
    }

    fn set_field(&mut self, field: CalendarField, value: i32) -> CalendarResult<()> {
        let epoch_milliseconds = self.with_calendar(|calendar| {
            calendar.set(field, value)?;
            calendar.epoch_milliseconds()
        })?;
        self.epoch_milliseconds = epoch_milliseconds;
        Ok(())
    }

    /// Returns the year within its era, counted from 1900.
    pub fn year(&self) -> CalendarResult<i32> {
        Ok(self.field(CalendarField::Year)? - 1900)
    }

    /// Returns the zero-based month.
    pub fn month(&self) -> CalendarResult<i32> {
        self.field(CalendarField::Month)
    }

    /// Returns the day of the month.
    pub fn date(&self) -> CalendarResult<i32> {
        self.field(CalendarField::DayOfMonth)
    }

    /// Returns the day of the week, Sunday is 1.
    pub fn day(&self) -> CalendarResult<i32> {
        self.field(CalendarField::DayOfWeek)
    }

    /// Returns the hour of the day.
    pub fn hours(&self) -> CalendarResult<i32> {
        self.field(CalendarField::HourOfDay)
    }

    /// Returns the minute of the hour.
    pub fn minutes(&self) -> CalendarResult<i32> {
        self.field(CalendarField::Minute)
    }

    /// Returns the second of the minute.
    pub fn seconds(&self) -> CalendarResult<i32> {
        self.field(CalendarField::Second)
    }

    /// Sets the year, counted from 1900. A February 29th moves to March 1st
    /// in a common year.
    pub fn set_year(&mut self, year: i32) -> CalendarResult<()> {
        self.set_field(CalendarField::Year, year.saturating_add(1900))
    }

    /// Sets the zero-based month. Out of range values carry into the year.
    pub fn set_month(&mut self, month: i32) -> CalendarResult<()> {
        self.set_field(CalendarField::Month, month)
    }

    /// Sets the day of the month, carrying into the month.
    pub fn set_date(&mut self, date: i32) -> CalendarResult<()> {
        self.set_field(CalendarField::DayOfMonth, date)
    }

    /// Sets the hour of the day, carrying into the date.
    pub fn set_hours(&mut self, hours: i32) -> CalendarResult<()> {
        self.set_field(CalendarField::HourOfDay, hours)
    }

    /// Sets the minute of the hour.
    pub fn set_minutes(&mut self, minutes: i32) -> CalendarResult<()> {
        self.set_field(CalendarField::Minute, minutes)
    }

    /// Sets the second of the minute.
    pub fn set_seconds(&mut self, seconds: i32) -> CalendarResult<()> {
        self.set_field(CalendarField::Second, seconds)
    }

    /// Returns the offset of UTC from local time in minutes, which is
    /// positive west of Greenwich.
    pub fn timezone_offset_minutes(&self) -> CalendarResult<i32> {
        self.with_calendar(|calendar| {
            let raw = i64::from(calendar.get(CalendarField::ZoneOffset)?);
            let dst = i64::from(calendar.get(CalendarField::DstOffset)?);
            Ok((-(raw + dst) / MS_PER_MINUTE) as i32)
        })
    }

    /// Returns the fields of the debug string.
    pub fn to_formattable(&self) -> CalendarResult<FormattableInstant> {
        self.with_calendar(|calendar| {
            Ok(FormattableInstant {
                weekday: Weekday::try_from(calendar.get(CalendarField::DayOfWeek)?)?,
                month: Month::try_from(calendar.get(CalendarField::Month)?)?,
                date: calendar.get(CalendarField::DayOfMonth)? as u8,
                hour: calendar.get(CalendarField::HourOfDay)? as u8,
                minute: calendar.get(CalendarField::Minute)? as u8,
                second: calendar.get(CalendarField::Second)? as u8,
                year: calendar.get(CalendarField::Year)?,
            })
        })
    }
}

impl<Z: TimeZone + Clone> Clone for Instant<Z> {
    fn clone(&self) -> Self {
        Self::new_in(self.epoch_milliseconds, self.zone.clone())
    }
}

impl<Z: TimeZone + fmt::Debug> fmt::Debug for Instant<Z> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instant")
            .field("epoch_milliseconds", &self.epoch_milliseconds)
            .field("zone", &self.zone)
            .finish()
    }
}

impl<Z: TimeZone> PartialEq for Instant<Z> {
    fn eq(&self, other: &Self) -> bool {
        self.epoch_milliseconds == other.epoch_milliseconds
    }
}

impl<Z: TimeZone> Eq for Instant<Z> {}

impl<Z: TimeZone> PartialOrd for Instant<Z> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<Z: TimeZone> Ord for Instant<Z> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl<Z: TimeZone> Hash for Instant<Z> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash_code().hash(state);
    }
}

impl<Z: TimeZone + Clone> fmt::Display for Instant<Z> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formattable = self.to_formattable().map_err(|_| fmt::Error)?;
        fmt::Display::fmt(&formattable, f)
    }
}

// ==== FormattableInstant ====

/// The fields of the `"Thu Jan 1 0:0:0   1970"` debug string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormattableInstant {
    /// The day of the week.
    pub weekday: Weekday,
    /// The month.
    pub month: Month,
    /// The day of the month.
    pub date: u8,
    /// The hour of the day, `0..=23`.
    pub hour: u8,
    /// The minute of the hour.
    pub minute: u8,
    /// The second of the minute.
    pub second: u8,
    /// The year within its era.
    pub year: i32,
}

impl Writeable for FormattableInstant {
    fn write_to<W: core::fmt::Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        sink.write_str(&self.weekday.abbreviation())?;
        sink.write_char(' ')?;
        sink.write_str(&self.month.abbreviation())?;
        sink.write_char(' ')?;
        self.date.write_to(sink)?;
        sink.write_char(' ')?;
        self.hour.write_to(sink)?;
        sink.write_char(':')?;
        self.minute.write_to(sink)?;
        sink.write_char(':')?;
        self.second.write_to(sink)?;
        sink.write_str("   ")?;
        self.year.write_to(sink)
    }

    fn writeable_length_hint(&self) -> LengthHint {
        // Abbreviations, separators and the three spaces before the year.
        LengthHint::exact(14)
            + self.date.writeable_length_hint()
            + self.hour.writeable_length_hint()
            + self.minute.writeable_length_hint()
            + self.second.writeable_length_hint()
            + self.year.writeable_length_hint()
    }
}

impl_display_with_writeable!(FormattableInstant);
