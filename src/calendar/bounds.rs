//! Static field bounds of the Gregorian kernel.

use crate::{
    fields::FIELD_COUNT,
    timezone::{MAX_DST_OFFSET, MAX_RAW_OFFSET, MIN_RAW_OFFSET},
    CalendarField,
};

/// The largest `YEAR` value in either era.
pub(crate) const MAX_YEAR: i32 = 292_278_994;

/// The range a field may hold.
///
/// `minimum` and `maximum` are the absolute bounds. `greatest_minimum` and
/// `least_maximum` are the bounds that hold at every calendar position,
/// e.g. `DAY_OF_MONTH` is always at most 31 but only guaranteed up to 28.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldBounds {
    /// The smallest value the field can take.
    pub minimum: i32,
    /// The largest minimum over all calendar positions.
    pub greatest_minimum: i32,
    /// The smallest maximum over all calendar positions.
    pub least_maximum: i32,
    /// The largest value the field can take.
    pub maximum: i32,
}

impl FieldBounds {
    const fn new(minimum: i32, greatest_minimum: i32, least_maximum: i32, maximum: i32) -> Self {
        Self {
            minimum,
            greatest_minimum,
            least_maximum,
            maximum,
        }
    }

    /// Returns whether `value` lies within the absolute bounds.
    #[inline]
    #[must_use]
    pub const fn contains(&self, value: i32) -> bool {
        self.minimum <= value && value <= self.maximum
    }
}

const GREGORIAN_BOUNDS: [FieldBounds; FIELD_COUNT] = [
    // ERA
    FieldBounds::new(0, 0, 1, 1),
    // YEAR
    FieldBounds::new(1, 1, 292_269_054, MAX_YEAR),
    // MONTH
    FieldBounds::new(0, 0, 11, 11),
    // WEEK_OF_YEAR
    FieldBounds::new(1, 1, 52, 53),
    // WEEK_OF_MONTH
    FieldBounds::new(0, 0, 4, 6),
    // DAY_OF_MONTH
    FieldBounds::new(1, 1, 28, 31),
    // DAY_OF_YEAR
    FieldBounds::new(1, 1, 365, 366),
    // DAY_OF_WEEK
    FieldBounds::new(1, 1, 7, 7),
    // DAY_OF_WEEK_IN_MONTH
    FieldBounds::new(-1, -1, 4, 6),
    // AM_PM
    FieldBounds::new(0, 0, 1, 1),
    // HOUR
    FieldBounds::new(0, 0, 11, 11),
    // HOUR_OF_DAY
    FieldBounds::new(0, 0, 23, 23),
    // MINUTE
    FieldBounds::new(0, 0, 59, 59),
    // SECOND
    FieldBounds::new(0, 0, 59, 59),
    // MILLISECOND
    FieldBounds::new(0, 0, 999, 999),
    // ZONE_OFFSET
    FieldBounds::new(MIN_RAW_OFFSET, MIN_RAW_OFFSET, MAX_RAW_OFFSET, MAX_RAW_OFFSET),
    // DST_OFFSET
    FieldBounds::new(0, 0, MAX_DST_OFFSET, MAX_DST_OFFSET),
];

/// Returns the Gregorian bounds of `field`.
#[inline]
pub(crate) const fn gregorian_bounds(field: CalendarField) -> FieldBounds {
    GREGORIAN_BOUNDS[field.id()]
}
