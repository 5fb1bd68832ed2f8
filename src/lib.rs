//! The `calendar_rs` crate is a Gregorian/Julian hybrid calendar engine
//! that converts between millisecond instants and civil calendar fields.
//!
//! ```rust
//! use calendar_rs::{CalendarField, GregorianCalendar, Weekday};
//!
//! let mut calendar = GregorianCalendar::utc();
//! calendar.set_date(1996, 1, 14).unwrap();
//!
//! assert_eq!(calendar.epoch_milliseconds().unwrap(), 824_256_000_000);
//! assert_eq!(
//!     calendar.get(CalendarField::DayOfWeek).unwrap(),
//!     Weekday::Wednesday as i32
//! );
//! ```
//!
//! The engine keeps two representations of the same moment: a count of
//! milliseconds since 1970-01-01T00:00:00Z and a table of 17 stamped
//! calendar fields. Writes to one side invalidate the other, and reads
//! recompute whichever side is stale.
//!
//! Dates on or after 1582-10-15 follow the Gregorian rules. Earlier
//! dates follow the Julian rules, and the ten days between 1582-10-04
//! and 1582-10-15 do not exist.
//!
//! The [`Instant`] type wraps a millisecond value with convenience
//! accessors in the manner of a classic date object.
//!
//! ```rust
//! use calendar_rs::Instant;
//!
//! let epoch = Instant::new(0);
//! assert_eq!(epoch.to_string(), "Thu Jan 1 0:0:0   1970");
//! ```
#![no_std]
#![cfg_attr(not(test), forbid(clippy::unwrap_used))]
#![allow(
    clippy::module_name_repetitions,
    clippy::redundant_pub_crate,
    clippy::too_many_lines,
    clippy::missing_errors_doc,
    clippy::option_if_let_else,

    // Field values are `i32` while day and millisecond arithmetic is `i64`.
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
)]

extern crate alloc;
extern crate core;

#[cfg(feature = "std")]
extern crate std;

pub mod calendar;
pub mod error;
pub mod fields;
pub mod host;
pub mod timezone;
pub mod week;

mod calendar_types;
mod instant;

#[cfg(feature = "sys")]
pub(crate) mod sys;

#[doc(hidden)]
pub(crate) mod utils;

/// Re-export of `TinyAsciiStr` from `tinystr`.
pub use tinystr::TinyAsciiStr;

#[doc(inline)]
pub use error::{CalendarError, ErrorKind};

/// The `calendar_rs` result type
pub type CalendarResult<T> = Result<T, CalendarError>;

pub use crate::{
    calendar::{Calendar, CalendarKernel, Gregorian, GregorianCalendar},
    calendar_types::{AmPm, Era, Month, Weekday},
    fields::{CalendarField, FieldTable, Stamp, FIELD_COUNT},
    instant::{FormattableInstant, Instant},
    timezone::{FixedOffset, TimeZone, Utc, ZoneOffsets},
    week::WeekRules,
};

#[cfg(feature = "sys")]
pub use crate::sys::SystemClock;

/// A library specific trait for unwrapping assertions.
pub(crate) trait CalendarUnwrap {
    type Output;

    /// `calendar_rs` based assertion for unwrapping. This will panic in
    /// debug builds, but throws error during runtime.
    fn calendar_unwrap(self) -> CalendarResult<Self::Output>;
}

impl<T> CalendarUnwrap for Option<T> {
    type Output = T;

    fn calendar_unwrap(self) -> CalendarResult<Self::Output> {
        debug_assert!(self.is_some());
        self.ok_or(CalendarError::assert())
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! calendar_assert {
    ($condition:expr $(,)*) => {
        if !$condition {
            return Err($crate::CalendarError::assert());
        }
    };
    ($condition:expr, $($args:tt)+) => {
        if !$condition {
            #[cfg(feature = "log")]
            log::error!($($args)+);
            return Err($crate::CalendarError::assert());
        }
    };
}

// Relevant numeric constants
/// Milliseconds per second constant: 1e+3
pub const MS_PER_SECOND: i64 = 1_000;
/// Milliseconds per minute constant: 6e+4
pub const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
/// Milliseconds per hour constant: 3.6e+6
pub const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
/// Milliseconds per day constant: 8.64e+7
pub const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;
