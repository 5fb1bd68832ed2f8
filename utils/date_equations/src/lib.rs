//! # Date Equations
//!
//! Date Equations is a library focused on implementing small,
//! allocation-free calendar calculations for the proleptic Gregorian
//! and proleptic Julian calendars.
//!
//! Both calendars share the same computational layout: the year is
//! shifted to begin on March 1st so that the leap day falls on the
//! last day of the computational year, and the remaining months follow
//! a fixed 153-day / 5-month rhythm. The calendars only differ in how
//! many days a cycle of years contains.
//!
//! All values are `i64` so that the full range of signed millisecond
//! instants maps onto a valid year.
//!
//! ``` rust
//! use date_equations::{gregorian, julian};
//!
//! assert_eq!(gregorian::ymd_from_epoch_days(0), (1970, 1, 1));
//! // Thirteen days separated the two calendars in 1970.
//! assert_eq!(julian::ymd_from_epoch_days(13), (1970, 1, 1));
//! ```

#![no_std]

pub mod gregorian;
pub mod julian;

/// Returns the March-based computational year and the zero-based day within it.
///
/// NOTE: `month` is expected to be in the range 1..=12.
#[inline]
pub(crate) const fn computational_year_and_day(year: i64, month: u8, day: u8) -> (i64, i64) {
    let j = (month <= 2) as i64;
    let computational_month = month as i64 + 12 * j - 3;
    (
        year - j,
        (153 * computational_month + 2) / 5 + day as i64 - 1,
    )
}

/// Maps a computational year and zero-based day of that year back onto a civil date.
#[inline]
pub(crate) const fn civil_from_computational(year: i64, day_of_year: i64) -> (i64, u8, u8) {
    let computational_month = (5 * day_of_year + 2) / 153;
    let day = day_of_year - (153 * computational_month + 2) / 5 + 1;
    let j = (computational_month >= 10) as i64;
    let month = computational_month + 3 - 12 * j;
    (year + j, month as u8, day as u8)
}

/// Returns the length of a month, given whether its year is a leap year.
#[inline]
pub(crate) const fn month_length(month: u8, leap: bool) -> u8 {
    match month {
        2 if leap => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}
