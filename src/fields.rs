//! This module implements the calendar field ids and the stamped field table.
//!
//! A `FieldTable` holds one slot per `CalendarField`. Every slot carries
//! a value and a `Stamp`, which records how recently the value was written:
//!
//! | Stamp               | Meaning                                        |
//! |---------------------|------------------------------------------------|
//! | `Stamp::UNSET`      | no value; resolution falls back to a default   |
//! | `Stamp::INTERNALLY_SET` | written by the engine while computing fields |
//! | `>= Stamp::MINIMUM_USER` | written by the user; larger is more recent |
//!
//! Field resolution always prefers the most recently stamped value of a
//! group of related fields.

use core::fmt;

use crate::CalendarError;

/// The number of fields in a `FieldTable`.
pub const FIELD_COUNT: usize = 17;

/// A field id naming one calendar quantity.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CalendarField {
    /// The era, `Era::BC` or `Era::AD`.
    Era = 0,
    /// The one-based year within the era.
    Year,
    /// The zero-based month, `Month::January` is 0.
    Month,
    /// The week number within the year.
    WeekOfYear,
    /// The week number within the month.
    WeekOfMonth,
    /// The one-based day of the month, also known as `DATE`.
    DayOfMonth,
    /// The one-based day within the year.
    DayOfYear,
    /// The day of the week, `Weekday::Sunday` is 1.
    DayOfWeek,
    /// The ordinal of the day of the week within the month.
    DayOfWeekInMonth,
    /// Whether the hour is before or after noon.
    AmPm,
    /// The hour on a 12-hour clock, 0..=11.
    Hour,
    /// The hour on a 24-hour clock, 0..=23.
    HourOfDay,
    /// The minute within the hour.
    Minute,
    /// The second within the minute.
    Second,
    /// The millisecond within the second.
    Millisecond,
    /// The raw offset from UTC in milliseconds.
    ZoneOffset,
    /// The daylight saving offset in milliseconds.
    DstOffset,
}

impl CalendarField {
    /// Every field, in field id order.
    pub const ALL: [Self; FIELD_COUNT] = [
        Self::Era,
        Self::Year,
        Self::Month,
        Self::WeekOfYear,
        Self::WeekOfMonth,
        Self::DayOfMonth,
        Self::DayOfYear,
        Self::DayOfWeek,
        Self::DayOfWeekInMonth,
        Self::AmPm,
        Self::Hour,
        Self::HourOfDay,
        Self::Minute,
        Self::Second,
        Self::Millisecond,
        Self::ZoneOffset,
        Self::DstOffset,
    ];

    /// Alias of `DayOfMonth`.
    pub const DATE: Self = Self::DayOfMonth;

    /// Returns the field id of this field.
    #[inline]
    #[must_use]
    pub const fn id(self) -> usize {
        self as usize
    }

    /// Returns the canonical upper snake case name of the field.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Era => "ERA",
            Self::Year => "YEAR",
            Self::Month => "MONTH",
            Self::WeekOfYear => "WEEK_OF_YEAR",
            Self::WeekOfMonth => "WEEK_OF_MONTH",
            Self::DayOfMonth => "DAY_OF_MONTH",
            Self::DayOfYear => "DAY_OF_YEAR",
            Self::DayOfWeek => "DAY_OF_WEEK",
            Self::DayOfWeekInMonth => "DAY_OF_WEEK_IN_MONTH",
            Self::AmPm => "AM_PM",
            Self::Hour => "HOUR",
            Self::HourOfDay => "HOUR_OF_DAY",
            Self::Minute => "MINUTE",
            Self::Second => "SECOND",
            Self::Millisecond => "MILLISECOND",
            Self::ZoneOffset => "ZONE_OFFSET",
            Self::DstOffset => "DST_OFFSET",
        }
    }

    /// Returns whether the field is one of the two time zone offset fields.
    #[inline]
    #[must_use]
    pub const fn is_offset(self) -> bool {
        matches!(self, Self::ZoneOffset | Self::DstOffset)
    }
}

impl TryFrom<i32> for CalendarField {
    type Error = CalendarError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        usize::try_from(value)
            .ok()
            .and_then(|id| Self::ALL.get(id).copied())
            .ok_or_else(|| {
                CalendarError::invalid_field()
                    .with_message(alloc::format!("{value} is not a valid field id."))
            })
    }
}

impl From<CalendarField> for i32 {
    fn from(value: CalendarField) -> Self {
        value as i32
    }
}

impl fmt::Display for CalendarField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.name().fmt(f)
    }
}

// ==== Stamp ====

/// A recency marker for a field write.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Stamp(u64);

impl Stamp {
    /// The field holds no value.
    pub const UNSET: Self = Self(0);
    /// The field was computed by the engine.
    pub const INTERNALLY_SET: Self = Self(1);
    /// The first stamp handed out for a user write.
    pub const MINIMUM_USER: Self = Self(2);

    /// Returns the raw stamp value.
    #[inline]
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Returns whether the stamp marks a value of any origin.
    #[inline]
    #[must_use]
    pub const fn is_set(self) -> bool {
        self.0 != Self::UNSET.0
    }

    /// Returns whether the stamp marks a value written by the user.
    #[inline]
    #[must_use]
    pub const fn is_user_set(self) -> bool {
        self.0 >= Self::MINIMUM_USER.0
    }

    /// Combines the stamps of two fields that are only meaningful together.
    ///
    /// The pair is unset if either member is unset, otherwise it is as
    /// recent as its most recent member.
    #[inline]
    #[must_use]
    pub(crate) fn aggregate(self, other: Self) -> Self {
        if !self.is_set() || !other.is_set() {
            return Self::UNSET;
        }
        self.max(other)
    }
}

// ==== FieldTable ====

/// A fixed-width table of stamped calendar field values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldTable {
    values: [i32; FIELD_COUNT],
    stamps: [Stamp; FIELD_COUNT],
    next_stamp: Stamp,
}

impl Default for FieldTable {
    fn default() -> Self {
        Self {
            values: [0; FIELD_COUNT],
            stamps: [Stamp::UNSET; FIELD_COUNT],
            next_stamp: Stamp::MINIMUM_USER,
        }
    }
}

impl FieldTable {
    /// Returns the value held for `field`.
    ///
    /// The value of an unset field is meaningless; see `value_or`.
    #[inline]
    #[must_use]
    pub fn value(&self, field: CalendarField) -> i32 {
        self.values[field.id()]
    }

    /// Returns the value held for `field`, or `default` if it is unset.
    #[inline]
    #[must_use]
    pub fn value_or(&self, field: CalendarField, default: i32) -> i32 {
        if self.is_set(field) {
            self.value(field)
        } else {
            default
        }
    }

    /// Returns the stamp of `field`.
    #[inline]
    #[must_use]
    pub fn stamp(&self, field: CalendarField) -> Stamp {
        self.stamps[field.id()]
    }

    /// Returns whether `field` holds a value.
    #[inline]
    #[must_use]
    pub fn is_set(&self, field: CalendarField) -> bool {
        self.stamp(field).is_set()
    }

    /// Assigns the value and stamp of `field` together.
    #[inline]
    pub fn set_value(&mut self, field: CalendarField, value: i32, stamp: Stamp) {
        self.values[field.id()] = value;
        self.stamps[field.id()] = stamp;
    }

    /// Assigns a value computed by the engine.
    #[inline]
    pub(crate) fn set_internal(&mut self, field: CalendarField, value: i32) {
        self.set_value(field, value, Stamp::INTERNALLY_SET);
    }

    /// Unsets `field`.
    #[inline]
    pub fn clear(&mut self, field: CalendarField) {
        self.set_value(field, 0, Stamp::UNSET);
    }

    /// Unsets every field. The stamp counter keeps counting.
    pub fn clear_all(&mut self) {
        self.values = [0; FIELD_COUNT];
        self.stamps = [Stamp::UNSET; FIELD_COUNT];
    }

    /// Returns a fresh user stamp, newer than every stamp handed out before.
    #[inline]
    pub fn next_stamp(&mut self) -> Stamp {
        let stamp = self.next_stamp;
        self.next_stamp = Stamp(self.next_stamp.0.saturating_add(1));
        stamp
    }
}

#[cfg(test)]
mod tests {
    use super::{CalendarField, FieldTable, Stamp, FIELD_COUNT};
    use crate::ErrorKind;

    #[test]
    fn field_ids_are_dense() {
        for (id, field) in CalendarField::ALL.iter().enumerate() {
            assert_eq!(field.id(), id);
            assert_eq!(CalendarField::try_from(id as i32).unwrap(), *field);
        }
        assert_eq!(CalendarField::DATE, CalendarField::DayOfMonth);
        assert_eq!(CalendarField::DstOffset.id(), FIELD_COUNT - 1);
    }

    #[test]
    fn invalid_field_ids() {
        for id in [-1, 17, i32::MAX, i32::MIN] {
            let err = CalendarField::try_from(id).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidFieldId);
        }
    }

    #[test]
    fn stamps_are_monotonic() {
        let mut table = FieldTable::default();
        let first = table.next_stamp();
        assert_eq!(first, Stamp::MINIMUM_USER);
        let second = table.next_stamp();
        assert!(second > first);

        table.clear_all();
        let third = table.next_stamp();
        assert!(third > second);
    }

    #[test]
    fn set_and_clear() {
        let mut table = FieldTable::default();
        assert!(!table.is_set(CalendarField::Year));
        assert_eq!(table.value_or(CalendarField::Year, 1970), 1970);

        let stamp = table.next_stamp();
        table.set_value(CalendarField::Year, 2024, stamp);
        assert!(table.is_set(CalendarField::Year));
        assert!(table.stamp(CalendarField::Year).is_user_set());
        assert_eq!(table.value_or(CalendarField::Year, 1970), 2024);

        table.set_internal(CalendarField::Month, 3);
        assert!(table.is_set(CalendarField::Month));
        assert!(!table.stamp(CalendarField::Month).is_user_set());

        table.clear(CalendarField::Year);
        assert!(!table.is_set(CalendarField::Year));
        assert_eq!(table.value(CalendarField::Year), 0);
    }

    #[test]
    fn aggregate_stamps() {
        let user = Stamp::MINIMUM_USER;
        assert_eq!(Stamp::UNSET.aggregate(user), Stamp::UNSET);
        assert_eq!(user.aggregate(Stamp::UNSET), Stamp::UNSET);
        assert_eq!(Stamp::INTERNALLY_SET.aggregate(user), user);
    }
}
