//! Week numbering rules.
//!
//! A week numbering policy is made of two parameters: the day that starts
//! a week and the minimum number of days the first week of a period must
//! contain. A short leading week that does not meet the minimum belongs to
//! the last week of the previous period.

use alloc::string::ToString;

use icu_calendar::{types::Weekday as IcuWeekday, week::WeekInformation};
use icu_locale::Locale;

use crate::{CalendarError, CalendarResult, Weekday};

/// Regions whose first week needs four days, per CLDR `weekData`.
const MIN_DAYS_FOUR_REGIONS: &[&str] = &[
    "AD", "AT", "AX", "BE", "BG", "CH", "CZ", "DE", "DK", "EE", "ES", "FI", "FJ", "FO", "FR",
    "GB", "GF", "GG", "GI", "GP", "GR", "HU", "IE", "IM", "IS", "IT", "JE", "LI", "LT", "LU",
    "MC", "MQ", "NL", "NO", "PL", "RE", "RU", "SE", "SJ", "SK", "SM", "VA",
];

impl From<IcuWeekday> for Weekday {
    fn from(value: IcuWeekday) -> Self {
        match value {
            IcuWeekday::Monday => Self::Monday,
            IcuWeekday::Tuesday => Self::Tuesday,
            IcuWeekday::Wednesday => Self::Wednesday,
            IcuWeekday::Thursday => Self::Thursday,
            IcuWeekday::Friday => Self::Friday,
            IcuWeekday::Saturday => Self::Saturday,
            IcuWeekday::Sunday => Self::Sunday,
        }
    }
}

/// The week numbering policy of a calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeekRules {
    first_day_of_week: Weekday,
    minimal_days_in_first_week: u8,
}

impl Default for WeekRules {
    fn default() -> Self {
        Self {
            first_day_of_week: Weekday::Sunday,
            minimal_days_in_first_week: 1,
        }
    }
}

impl WeekRules {
    /// ISO 8601 weeks: Monday start, four days in the first week.
    pub const ISO: Self = Self {
        first_day_of_week: Weekday::Monday,
        minimal_days_in_first_week: 4,
    };

    /// Creates new `WeekRules` from raw field values.
    ///
    /// Both values must lie in `1..=7`.
    pub fn try_new(first_day_of_week: i32, minimal_days_in_first_week: i32) -> CalendarResult<Self> {
        let first_day_of_week = Weekday::try_from(first_day_of_week)?;
        let minimal_days_in_first_week = Self::validate_minimal_days(minimal_days_in_first_week)?;
        Ok(Self {
            first_day_of_week,
            minimal_days_in_first_week,
        })
    }

    /// Derives week rules from the region of `locale`.
    ///
    /// The first day of the week comes from the compiled CLDR week data of
    /// `icu_calendar`. A locale without a region gets the default rules.
    ///
    /// ```rust
    /// use calendar_rs::{WeekRules, Weekday};
    /// use icu_locale::Locale;
    /// use core::str::FromStr;
    ///
    /// let german = WeekRules::for_locale(&Locale::from_str("de-DE").unwrap()).unwrap();
    /// assert_eq!(german, WeekRules::ISO);
    ///
    /// let american = WeekRules::for_locale(&Locale::from_str("en-US").unwrap()).unwrap();
    /// assert_eq!(american.first_day_of_week(), Weekday::Sunday);
    /// assert_eq!(american.minimal_days_in_first_week(), 1);
    /// ```
    pub fn for_locale(locale: &Locale) -> CalendarResult<Self> {
        let Some(region) = locale.id.region else {
            return Ok(Self::default());
        };
        let info = WeekInformation::try_new(locale.into())
            .map_err(|err| CalendarError::out_of_range().with_message(err.to_string()))?;

        let minimal_days_in_first_week = if MIN_DAYS_FOUR_REGIONS.contains(&region.as_str()) {
            4
        } else {
            1
        };

        Ok(Self {
            first_day_of_week: info.first_weekday.into(),
            minimal_days_in_first_week,
        })
    }

    /// Returns the day that starts a week.
    #[inline]
    #[must_use]
    pub const fn first_day_of_week(&self) -> Weekday {
        self.first_day_of_week
    }

    /// Returns the minimum number of days in the first week of a period.
    #[inline]
    #[must_use]
    pub const fn minimal_days_in_first_week(&self) -> u8 {
        self.minimal_days_in_first_week
    }

    /// Returns these rules with a different first day of the week.
    #[inline]
    #[must_use]
    pub const fn with_first_day_of_week(mut self, day: Weekday) -> Self {
        self.first_day_of_week = day;
        self
    }

    /// Returns these rules with a different minimum first week length.
    pub fn with_minimal_days_in_first_week(mut self, days: i32) -> CalendarResult<Self> {
        self.minimal_days_in_first_week = Self::validate_minimal_days(days)?;
        Ok(self)
    }

    fn validate_minimal_days(days: i32) -> CalendarResult<u8> {
        if !(1..=7).contains(&days) {
            return Err(CalendarError::out_of_range().with_message(alloc::format!(
                "minimal days in first week must be in 1..=7, got {days}."
            )));
        }
        Ok(days as u8)
    }

    /// Returns the position of `day_of_week` within a week, `0..=6`.
    #[inline]
    pub(crate) fn relative_day_of_week(&self, day_of_week: i32) -> i32 {
        // Lenient engines accept any `DAY_OF_WEEK`, so widen before subtracting.
        (i64::from(day_of_week) - self.first_day_of_week as i64).rem_euclid(7) as i32
    }

    /// Returns the offset, relative to day 1 of a period, of the first day
    /// of week 1 of that period. `first_day_dow` is the weekday of day 1.
    ///
    /// The result lies in `-5..=7`.
    pub(crate) fn first_week_start(&self, first_day_dow: i32) -> i32 {
        let relative = self.relative_day_of_week(first_day_dow);
        let mut start = 1 - relative;
        if 7 - relative < i32::from(self.minimal_days_in_first_week) {
            start += 7;
        }
        start
    }

    /// Returns the week number of `day_of_period` within its period.
    ///
    /// Week 0 holds the leading days before the first week.
    pub(crate) fn week_number(&self, day_of_period: i32, day_of_week: i32) -> i32 {
        // Weekday of day 1 of the period, relative to the first day of the week.
        let period_start = (day_of_week - self.first_day_of_week as i32 - day_of_period + 1)
            .rem_euclid(7);
        let mut week = (day_of_period + period_start - 1) / 7;
        if 7 - period_start >= i32::from(self.minimal_days_in_first_week) {
            week += 1;
        }
        week
    }

    /// Returns the week of the year, folding leading days into the last
    /// week of the previous year and trailing days into week 1 of the next.
    pub(crate) fn week_of_year(
        &self,
        day_of_year: i32,
        day_of_week: i32,
        year_length: i32,
        previous_year_length: i32,
    ) -> i32 {
        let week = self.week_number(day_of_year, day_of_week);
        if week == 0 {
            return self.week_number(day_of_year + previous_year_length, day_of_week);
        }
        if week >= 52 {
            let week_end = day_of_year + 6 - self.relative_day_of_week(day_of_week);
            if week_end > year_length
                && week_end - year_length >= i32::from(self.minimal_days_in_first_week)
            {
                return 1;
            }
        }
        week
    }
}
