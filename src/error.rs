//! This module implements `CalendarError`.

use alloc::borrow::Cow;
use core::fmt;

/// `CalendarError`'s error type.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A field value lies outside of the range allowed at the current
    /// calendar position.
    #[default]
    OutOfRange,
    /// The fields name a civil date that does not exist, such as a day
    /// inside the Julian to Gregorian cutover gap.
    NonExistentDate,
    /// The fields resolve to an instant outside of the signed 64-bit
    /// millisecond range.
    OverflowInstant,
    /// A field id outside of `0..FIELD_COUNT`.
    InvalidFieldId,
    /// An internal invariant of the engine did not hold.
    Assert,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange => "OutOfRange",
            Self::NonExistentDate => "NonExistentDate",
            Self::OverflowInstant => "OverflowInstant",
            Self::InvalidFieldId => "InvalidFieldId",
            Self::Assert => "ImplementationError",
        }
        .fmt(f)
    }
}

/// The error type for `calendar_rs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarError {
    kind: ErrorKind,
    msg: Cow<'static, str>,
}

impl CalendarError {
    fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            msg: Cow::Borrowed(""),
        }
    }

    /// Create an out of range error.
    #[inline]
    #[must_use]
    pub fn out_of_range() -> Self {
        Self::new(ErrorKind::OutOfRange)
    }

    /// Create a non-existent date error.
    #[inline]
    #[must_use]
    pub fn non_existent_date() -> Self {
        Self::new(ErrorKind::NonExistentDate)
    }

    /// Create an instant overflow error.
    #[inline]
    #[must_use]
    pub fn overflow() -> Self {
        Self::new(ErrorKind::OverflowInstant)
            .with_message("instant exceeds the 64-bit millisecond range.")
    }

    /// Create an invalid field id error.
    #[inline]
    #[must_use]
    pub fn invalid_field() -> Self {
        Self::new(ErrorKind::InvalidFieldId)
    }

    /// Create an assertion error.
    #[inline]
    #[must_use]
    pub(crate) fn assert() -> Self {
        Self::new(ErrorKind::Assert).with_message("implementation error: invariant violated.")
    }

    /// Add a message to the error.
    #[inline]
    #[must_use]
    pub fn with_message<S>(mut self, msg: S) -> Self
    where
        S: Into<Cow<'static, str>>,
    {
        self.msg = msg.into();
        self
    }

    /// Returns this error's kind.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error message.
    #[inline]
    #[must_use]
    pub fn message(&self) -> &str {
        &self.msg
    }

    /// Extracts the error message.
    #[inline]
    #[must_use]
    pub fn into_message(self) -> Cow<'static, str> {
        self.msg
    }
}

impl fmt::Display for CalendarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;

        let msg = self.msg.trim();
        if !msg.is_empty() {
            write!(f, ": {msg}")?;
        }

        Ok(())
    }
}

impl core::error::Error for CalendarError {}
