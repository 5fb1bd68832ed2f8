//! Proleptic Julian date calculations.
//!
//! A Julian cycle repeats every 4 years (1,461 days). Julian 0000-03-01
//! lies two days before its Gregorian namesake, so the epoch shift is
//! 719,470 days.

use crate::{civil_from_computational, computational_year_and_day, month_length};

const DAYS_IN_A_4Y_CYCLE: i64 = 1_461;
const EPOCH_COMPUTATIONAL_DAYS: i64 = 719_470;

/// Returns whether `year` is a Julian leap year.
#[inline]
pub const fn is_leap_year(year: i64) -> bool {
    year.rem_euclid(4) == 0
}

/// Returns the number of days in `month` (1..=12) of `year`.
#[inline]
pub const fn days_in_month(year: i64, month: u8) -> u8 {
    month_length(month, is_leap_year(year))
}

/// Returns the epoch days for a Julian year, month (1..=12), and day.
pub const fn epoch_days_from_ymd(year: i64, month: u8, day: u8) -> i64 {
    let (year, day_of_year) = computational_year_and_day(year, month, day);
    let cycle = year.div_euclid(4);
    let year_of_cycle = year - cycle * 4;
    cycle * DAYS_IN_A_4Y_CYCLE + year_of_cycle * 365 + day_of_year - EPOCH_COMPUTATIONAL_DAYS
}

/// Returns the Julian year, month (1..=12), and day for the given epoch days.
pub const fn ymd_from_epoch_days(epoch_days: i64) -> (i64, u8, u8) {
    let shifted = epoch_days + EPOCH_COMPUTATIONAL_DAYS;
    let cycle = shifted.div_euclid(DAYS_IN_A_4Y_CYCLE);
    let day_of_cycle = shifted - cycle * DAYS_IN_A_4Y_CYCLE;
    // The last day of the cycle is the leap day of its fourth year.
    let year_of_cycle = (day_of_cycle - day_of_cycle / (DAYS_IN_A_4Y_CYCLE - 1)) / 365;
    let day_of_year = day_of_cycle - year_of_cycle * 365;
    civil_from_computational(cycle * 4 + year_of_cycle, day_of_year)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reform_boundary() {
        // Julian 1582-10-04 was followed by Gregorian 1582-10-15.
        assert_eq!(epoch_days_from_ymd(1582, 10, 4), -141_428);
        assert_eq!(epoch_days_from_ymd(1582, 10, 5), -141_427);
        assert_eq!(ymd_from_epoch_days(-141_428), (1582, 10, 4));
    }

    #[test]
    fn epoch_offset() {
        assert_eq!(epoch_days_from_ymd(1970, 1, 1), 13);
        assert_eq!(ymd_from_epoch_days(0), (1969, 12, 19));
    }

    #[test]
    fn every_fourth_year_is_leap() {
        assert!(is_leap_year(1500));
        assert!(is_leap_year(1900));
        assert!(is_leap_year(0));
        assert!(is_leap_year(-4));
        assert!(!is_leap_year(-1));
        assert_eq!(days_in_month(1500, 2), 29);
        assert_eq!(ymd_from_epoch_days(epoch_days_from_ymd(1500, 2, 28) + 1), (1500, 2, 29));
    }

    #[test]
    fn days_roundtrip_across_cycles() {
        for days in (-2_000_000i64..0).step_by(991) {
            let (y, m, d) = ymd_from_epoch_days(days);
            assert_eq!(epoch_days_from_ymd(y, m, d), days);
        }
    }
}
