//! Typed constants for the enumerated calendar fields.

use core::fmt;

use tinystr::{tinystr, TinyAsciiStr};

use crate::{CalendarError, CalendarResult};

macro_rules! field_enum_try_from {
    ($ty:ident, $name:literal, $($variant:ident),+ $(,)?) => {
        impl TryFrom<i32> for $ty {
            type Error = CalendarError;

            fn try_from(value: i32) -> CalendarResult<Self> {
                $(
                    if value == Self::$variant as i32 {
                        return Ok(Self::$variant);
                    }
                )+
                Err(CalendarError::out_of_range()
                    .with_message(alloc::format!("{value} is not a valid {} value.", $name)))
            }
        }

        impl From<$ty> for i32 {
            fn from(value: $ty) -> Self {
                value as i32
            }
        }
    };
}

/// A day of the week, numbered the way `DAY_OF_WEEK` stores it.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Weekday {
    /// Sunday, `1`.
    Sunday = 1,
    /// Monday, `2`.
    Monday,
    /// Tuesday, `3`.
    Tuesday,
    /// Wednesday, `4`.
    Wednesday,
    /// Thursday, `5`.
    Thursday,
    /// Friday, `6`.
    Friday,
    /// Saturday, `7`.
    Saturday,
}

impl Weekday {
    /// Returns the three letter English abbreviation.
    #[must_use]
    pub const fn abbreviation(self) -> TinyAsciiStr<3> {
        match self {
            Self::Sunday => tinystr!(3, "Sun"),
            Self::Monday => tinystr!(3, "Mon"),
            Self::Tuesday => tinystr!(3, "Tue"),
            Self::Wednesday => tinystr!(3, "Wed"),
            Self::Thursday => tinystr!(3, "Thu"),
            Self::Friday => tinystr!(3, "Fri"),
            Self::Saturday => tinystr!(3, "Sat"),
        }
    }

    /// Returns the weekday `days` after this one.
    #[must_use]
    pub fn add_days(self, days: i64) -> Self {
        let index = (self as i64 - 1 + days).rem_euclid(7);
        Self::from_index(index as u8)
    }

    // `index` is reduced modulo 7
    pub(crate) const fn from_index(index: u8) -> Self {
        match index % 7 {
            0 => Self::Sunday,
            1 => Self::Monday,
            2 => Self::Tuesday,
            3 => Self::Wednesday,
            4 => Self::Thursday,
            5 => Self::Friday,
            _ => Self::Saturday,
        }
    }
}

field_enum_try_from!(
    Weekday, "DAY_OF_WEEK", Sunday, Monday, Tuesday, Wednesday, Thursday, Friday, Saturday
);

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.abbreviation())
    }
}

/// A month of the year, numbered the way `MONTH` stores it.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Month {
    /// January, `0`.
    January = 0,
    /// February, `1`.
    February,
    /// March, `2`.
    March,
    /// April, `3`.
    April,
    /// May, `4`.
    May,
    /// June, `5`.
    June,
    /// July, `6`.
    July,
    /// August, `7`.
    August,
    /// September, `8`.
    September,
    /// October, `9`.
    October,
    /// November, `10`.
    November,
    /// December, `11`.
    December,
}

impl Month {
    /// Returns the three letter English abbreviation.
    #[must_use]
    pub const fn abbreviation(self) -> TinyAsciiStr<3> {
        match self {
            Self::January => tinystr!(3, "Jan"),
            Self::February => tinystr!(3, "Feb"),
            Self::March => tinystr!(3, "Mar"),
            Self::April => tinystr!(3, "Apr"),
            Self::May => tinystr!(3, "May"),
            Self::June => tinystr!(3, "Jun"),
            Self::July => tinystr!(3, "Jul"),
            Self::August => tinystr!(3, "Aug"),
            Self::September => tinystr!(3, "Sep"),
            Self::October => tinystr!(3, "Oct"),
            Self::November => tinystr!(3, "Nov"),
            Self::December => tinystr!(3, "Dec"),
        }
    }

    /// Returns the one-based month number.
    #[inline]
    #[must_use]
    pub const fn ordinal(self) -> u8 {
        self as u8 + 1
    }
}

field_enum_try_from!(
    Month,
    "MONTH",
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
);

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.abbreviation())
    }
}

/// The era of a year.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Era {
    /// Before Christ; year 1 BC is extended year 0.
    BC = 0,
    /// Anno Domini.
    AD = 1,
}

impl Era {
    /// Returns the two letter abbreviation.
    #[must_use]
    pub const fn abbreviation(self) -> TinyAsciiStr<2> {
        match self {
            Self::BC => tinystr!(2, "BC"),
            Self::AD => tinystr!(2, "AD"),
        }
    }
}

field_enum_try_from!(Era, "ERA", BC, AD);

/// Morning or afternoon.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AmPm {
    /// Before noon.
    AM = 0,
    /// Noon and after.
    PM = 1,
}

impl AmPm {
    /// Returns the two letter abbreviation.
    #[must_use]
    pub const fn abbreviation(self) -> TinyAsciiStr<2> {
        match self {
            Self::AM => tinystr!(2, "AM"),
            Self::PM => tinystr!(2, "PM"),
        }
    }
}

field_enum_try_from!(AmPm, "AM_PM", AM, PM);

#[cfg(test)]
mod tests {
    use super::{AmPm, Era, Month, Weekday};
    use crate::ErrorKind;

    #[test]
    fn weekday_values() {
        assert_eq!(Weekday::Sunday as i32, 1);
        assert_eq!(Weekday::Saturday as i32, 7);
        assert_eq!(Weekday::try_from(5).unwrap(), Weekday::Thursday);
        assert_eq!(
            Weekday::try_from(0).unwrap_err().kind(),
            ErrorKind::OutOfRange
        );
        assert_eq!(Weekday::try_from(8).unwrap_err().kind(), ErrorKind::OutOfRange);
        assert_eq!(Weekday::Saturday.add_days(1), Weekday::Sunday);
        assert_eq!(Weekday::Sunday.add_days(-1), Weekday::Saturday);
        assert_eq!(Weekday::Wednesday.add_days(14), Weekday::Wednesday);
    }

    #[test]
    fn abbreviations() {
        assert_eq!(Weekday::Thursday.abbreviation().as_str(), "Thu");
        assert_eq!(Month::January.abbreviation().as_str(), "Jan");
        assert_eq!(Month::December.abbreviation().as_str(), "Dec");
        assert_eq!(Era::BC.abbreviation().as_str(), "BC");
        assert_eq!(AmPm::PM.abbreviation().as_str(), "PM");
    }

    #[test]
    fn month_values() {
        assert_eq!(Month::try_from(11).unwrap(), Month::December);
        assert_eq!(Month::December.ordinal(), 12);
        assert!(Month::try_from(12).is_err());
        assert!(Month::try_from(-1).is_err());
        assert_eq!(Era::try_from(0).unwrap(), Era::BC);
        assert_eq!(AmPm::try_from(1).unwrap(), AmPm::PM);
    }
}
