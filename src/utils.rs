//! Utility equations for the Julian/Gregorian hybrid calendar.
//!
//! Years are extended years (1 BC is year 0) and months are zero-based, as
//! stored in the field table. Days are counted from 1970-01-01.

use date_equations::{gregorian, julian};

use crate::MS_PER_DAY;

/// The epoch day of 1582-10-15, the first Gregorian day.
pub(crate) const GREGORIAN_CUTOVER_DAY: i64 = -141_427;

/// The year in which the cutover happens.
pub(crate) const CUTOVER_YEAR: i64 = 1582;

/// Epoch day 0 is a Thursday.
const EPOCH_DAY_OF_WEEK_INDEX: i64 = 4;

/// The outcome of resolving a civil date to an epoch day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CivilDay {
    /// The date exists.
    Exact(i64),
    /// The date falls into the cutover gap. The payload is the day the date
    /// lands on when counting forward through the Julian calendar.
    Gap(i64),
}

/// Returns the number of date labels of the month, which is also the
/// largest valid `DATE`. October 1582 runs to 31 even though ten of its
/// labels are skipped.
#[inline]
pub(crate) const fn days_in_month(year: i64, month: u8) -> u8 {
    if year > CUTOVER_YEAR {
        gregorian::days_in_month(year, month + 1)
    } else {
        julian::days_in_month(year, month + 1)
    }
}

/// Returns the epoch day of the first day of `month` in `year`.
pub(crate) const fn month_start(year: i64, month: u8) -> i64 {
    let julian = julian::epoch_days_from_ymd(year, month + 1, 1);
    if julian < GREGORIAN_CUTOVER_DAY {
        julian
    } else {
        gregorian::epoch_days_from_ymd(year, month + 1, 1)
    }
}

/// Returns the epoch day of January 1st of `year`.
#[inline]
pub(crate) const fn year_start(year: i64) -> i64 {
    month_start(year, 0)
}

/// Returns the number of days in `year`. 1582 has 355 days.
#[inline]
pub(crate) const fn year_length(year: i64) -> i64 {
    year_start(year + 1) - year_start(year)
}

/// Resolves the one-based `date` of `month` in `year` to an epoch day.
///
/// `date` may lie outside the month, in which case it counts into the
/// neighbouring months.
pub(crate) const fn resolve_civil_day(year: i64, month: u8, date: i64) -> CivilDay {
    let julian = julian::epoch_days_from_ymd(year, month + 1, 1) + date - 1;
    if julian < GREGORIAN_CUTOVER_DAY {
        return CivilDay::Exact(julian);
    }
    let gregorian = gregorian::epoch_days_from_ymd(year, month + 1, 1) + date - 1;
    if gregorian >= GREGORIAN_CUTOVER_DAY {
        return CivilDay::Exact(gregorian);
    }
    CivilDay::Gap(julian)
}

/// Returns `(extended year, zero-based month, date)` of an epoch day.
#[inline]
pub(crate) const fn civil_from_epoch_days(epoch_days: i64) -> (i64, u8, u8) {
    let (year, month, day) = if epoch_days >= GREGORIAN_CUTOVER_DAY {
        gregorian::ymd_from_epoch_days(epoch_days)
    } else {
        julian::ymd_from_epoch_days(epoch_days)
    };
    (year, month - 1, day)
}

/// Returns the `DAY_OF_WEEK` value of an epoch day, Sunday is 1.
#[inline]
pub(crate) const fn day_of_week(epoch_days: i64) -> i32 {
    (epoch_days + EPOCH_DAY_OF_WEEK_INDEX).rem_euclid(7) as i32 + 1
}

/// Splits epoch milliseconds into an epoch day and a millisecond of day.
#[inline]
pub(crate) const fn split_epoch_milliseconds(epoch_milliseconds: i64) -> (i64, i64) {
    (
        epoch_milliseconds.div_euclid(MS_PER_DAY),
        epoch_milliseconds.rem_euclid(MS_PER_DAY),
    )
}

/// Splits a possibly out of range zero-based month into a year carry and
/// a month in `0..12`.
#[inline]
pub(crate) const fn balance_month(year: i64, month: i64) -> (i64, u8) {
    (year + month.div_euclid(12), month.rem_euclid(12) as u8)
}

#[cfg(test)]
mod tests {
    use super::{
        balance_month, civil_from_epoch_days, day_of_week, days_in_month, month_start,
        resolve_civil_day, split_epoch_milliseconds, year_length, CivilDay,
        GREGORIAN_CUTOVER_DAY,
    };

    #[test]
    fn cutover_boundary() {
        // 1582-10-04 (Julian) is the day before 1582-10-15 (Gregorian).
        assert_eq!(
            resolve_civil_day(1582, 9, 4),
            CivilDay::Exact(GREGORIAN_CUTOVER_DAY - 1)
        );
        assert_eq!(
            resolve_civil_day(1582, 9, 15),
            CivilDay::Exact(GREGORIAN_CUTOVER_DAY)
        );
        assert_eq!(civil_from_epoch_days(GREGORIAN_CUTOVER_DAY - 1), (1582, 9, 4));
        assert_eq!(civil_from_epoch_days(GREGORIAN_CUTOVER_DAY), (1582, 9, 15));
        // Thursday followed by Friday.
        assert_eq!(day_of_week(GREGORIAN_CUTOVER_DAY - 1), 5);
        assert_eq!(day_of_week(GREGORIAN_CUTOVER_DAY), 6);
    }

    #[test]
    fn gap_dates_snap_forward() {
        for date in 5..15 {
            let resolved = resolve_civil_day(1582, 9, date);
            assert_eq!(resolved, CivilDay::Gap(GREGORIAN_CUTOVER_DAY + date - 5));
        }
        let CivilDay::Gap(day) = resolve_civil_day(1582, 9, 10) else {
            panic!("1582-10-10 is in the gap");
        };
        assert_eq!(civil_from_epoch_days(day), (1582, 9, 20));
    }

    #[test]
    fn year_lengths() {
        assert_eq!(year_length(1582), 355);
        assert_eq!(year_length(1500), 366);
        assert_eq!(year_length(1700), 365);
        assert_eq!(year_length(1900), 365);
        assert_eq!(year_length(2000), 366);
        assert_eq!(year_length(2100), 365);
        assert_eq!(year_length(0), 366);
        assert_eq!(year_length(-4), 366);
    }

    #[test]
    fn month_lengths() {
        assert_eq!(days_in_month(1582, 9), 31);
        assert_eq!(days_in_month(2024, 1), 29);
        assert_eq!(days_in_month(2023, 1), 28);
        assert_eq!(days_in_month(1900, 1), 28);
        assert_eq!(days_in_month(1500, 1), 29);
        assert_eq!(month_start(1582, 10) - month_start(1582, 9), 21);
    }

    #[test]
    fn epoch() {
        assert_eq!(civil_from_epoch_days(0), (1970, 0, 1));
        assert_eq!(day_of_week(0), 5);
        assert_eq!(day_of_week(-1), 4);
        assert_eq!(split_epoch_milliseconds(-1), (-1, 86_399_999));
        assert_eq!(balance_month(2024, 13), (2025, 1));
        assert_eq!(balance_month(2024, -1), (2023, 11));
    }
}
