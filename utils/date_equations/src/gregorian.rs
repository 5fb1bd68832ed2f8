//! Proleptic Gregorian date calculations.
//!
//! A Gregorian cycle repeats every 400 years (146,097 days). Epoch days are
//! counted from 1970-01-01, which lies 719,468 days after the computational
//! origin 0000-03-01.

use crate::{civil_from_computational, computational_year_and_day, month_length};

const DAYS_IN_A_400Y_CYCLE: i64 = 146_097;
const EPOCH_COMPUTATIONAL_DAYS: i64 = 719_468;

/// Returns whether `year` is a Gregorian leap year.
#[inline]
pub const fn is_leap_year(year: i64) -> bool {
    year.rem_euclid(4) == 0 && (year.rem_euclid(100) != 0 || year.rem_euclid(400) == 0)
}

/// Returns the number of days in `month` (1..=12) of `year`.
#[inline]
pub const fn days_in_month(year: i64, month: u8) -> u8 {
    month_length(month, is_leap_year(year))
}

/// Returns the number of days in `year`.
#[inline]
pub const fn days_in_year(year: i64) -> u16 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

/// Returns the epoch days for a Gregorian year, month (1..=12), and day.
pub const fn epoch_days_from_ymd(year: i64, month: u8, day: u8) -> i64 {
    let (year, day_of_year) = computational_year_and_day(year, month, day);
    let cycle = year.div_euclid(400);
    let year_of_cycle = year - cycle * 400;
    let day_of_cycle =
        year_of_cycle * 365 + year_of_cycle / 4 - year_of_cycle / 100 + day_of_year;
    cycle * DAYS_IN_A_400Y_CYCLE + day_of_cycle - EPOCH_COMPUTATIONAL_DAYS
}

/// Returns the Gregorian year, month (1..=12), and day for the given epoch days.
pub const fn ymd_from_epoch_days(epoch_days: i64) -> (i64, u8, u8) {
    let shifted = epoch_days + EPOCH_COMPUTATIONAL_DAYS;
    let cycle = shifted.div_euclid(DAYS_IN_A_400Y_CYCLE);
    let day_of_cycle = shifted - cycle * DAYS_IN_A_400Y_CYCLE;
    // Removes the leap days of the cycle so that every year is 365 days long.
    let year_of_cycle = (day_of_cycle - day_of_cycle / 1460 + day_of_cycle / 36_524
        - day_of_cycle / (DAYS_IN_A_400Y_CYCLE - 1))
        / 365;
    let day_of_year = day_of_cycle - (365 * year_of_cycle + year_of_cycle / 4 - year_of_cycle / 100);
    civil_from_computational(cycle * 400 + year_of_cycle, day_of_year)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_is_day_zero() {
        assert_eq!(epoch_days_from_ymd(1970, 1, 1), 0);
        assert_eq!(ymd_from_epoch_days(0), (1970, 1, 1));
        assert_eq!(ymd_from_epoch_days(-1), (1969, 12, 31));
    }

    #[test]
    fn known_dates() {
        assert_eq!(epoch_days_from_ymd(2000, 3, 1), 11_017);
        assert_eq!(epoch_days_from_ymd(1996, 2, 14), 9_540);
        assert_eq!(epoch_days_from_ymd(1582, 10, 15), -141_427);
        assert_eq!(ymd_from_epoch_days(-141_427), (1582, 10, 15));
        assert_eq!(ymd_from_epoch_days(19_782), (2024, 2, 29));
    }

    #[test]
    fn century_leap_years() {
        assert!(!is_leap_year(1900));
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(2100));
        assert!(is_leap_year(0));
        assert!(is_leap_year(-4));
        assert!(!is_leap_year(-100));
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_year(2100), 365);
    }

    #[test]
    fn days_roundtrip_across_cycles() {
        for days in (-1_000_000i64..1_000_000).step_by(997) {
            let (y, m, d) = ymd_from_epoch_days(days);
            assert_eq!(epoch_days_from_ymd(y, m, d), days);
        }
    }

    #[test]
    fn extreme_years() {
        // Epoch days of the millisecond extremes.
        let max_days = i64::MAX.div_euclid(86_400_000);
        let min_days = i64::MIN.div_euclid(86_400_000);
        let (max_year, _, _) = ymd_from_epoch_days(max_days);
        let (min_year, _, _) = ymd_from_epoch_days(min_days);
        assert_eq!(max_year, 292_278_994);
        assert!(min_year < -292_000_000);
        let (y, m, d) = ymd_from_epoch_days(min_days);
        assert_eq!(epoch_days_from_ymd(y, m, d), min_days);
    }
}
