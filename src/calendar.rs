//! This module implements the calendar engine and its kernel interface.
//!
//! A [`Calendar`] holds a UTC instant and a [`FieldTable`] describing the
//! same moment as local civil fields. Either side may be stale:
//!
//! - `set` writes a field, which invalidates both the instant and the
//!   computed fields.
//! - `set_epoch_milliseconds` writes the instant, which invalidates the
//!   fields.
//!
//! Reads call `complete`, which first resolves the instant from the fields
//! if needed and then regenerates every field from the instant.
//!
//! The calendar arithmetic itself lives in a [`CalendarKernel`]. The engine
//! owns the validity protocol, the time zone, and the week rules.

mod bounds;
mod gregorian;


use alloc::format;
use core::fmt;

use crate::{
    fields::{CalendarField, FieldTable, Stamp},
    instant::Instant,
    timezone::{TimeZone, Utc, ZoneOffsets},
    week::WeekRules,
    CalendarError, CalendarResult, Weekday,
};

pub use bounds::FieldBounds;
pub use gregorian::Gregorian;

/// A Gregorian calendar engine in the time zone `Z`.
pub type GregorianCalendar<Z = Utc> = Calendar<Gregorian, Z>;

/// A read-only view of a completed engine, handed to the kernel.
#[derive(Debug, Clone, Copy)]
pub struct FieldSnapshot<'a> {
    /// The normalized field table.
    pub fields: &'a FieldTable,
    /// The instant shifted by the zone offsets.
    pub local_milliseconds: i64,
    /// The week rules of the engine.
    pub rules: WeekRules,
    /// Whether the engine is lenient.
    pub lenient: bool,
}

/// The change an `add` applies to the engine's instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjustment {
    /// Elapsed milliseconds added to the UTC instant. Used by time of day
    /// fields, so that adding hours across an offset change counts real
    /// hours.
    Elapsed(i64),
    /// A new local wall-clock time that is resolved through the time zone.
    /// Used by calendar fields, so that adding days keeps the time of day.
    WallClock(i64),
}

/// The calendar specific arithmetic of an engine.
pub trait CalendarKernel {
    /// Resolves the field table to local milliseconds.
    ///
    /// The zone offset fields are ignored; the engine applies them.
    fn compute_time(
        &self,
        fields: &FieldTable,
        rules: WeekRules,
        lenient: bool,
    ) -> CalendarResult<i64>;

    /// Writes every field other than the zone offsets for the local time
    /// `local_milliseconds`.
    fn compute_fields(&self, local_milliseconds: i64, rules: WeekRules, fields: &mut FieldTable);

    /// Adds `amount` to `field`, carrying into larger fields.
    fn add(
        &self,
        snapshot: FieldSnapshot<'_>,
        field: CalendarField,
        amount: i32,
    ) -> CalendarResult<Adjustment>;

    /// Rolls `field` by a single unit without changing larger fields,
    /// returning the new local milliseconds.
    fn roll_once(
        &self,
        snapshot: FieldSnapshot<'_>,
        field: CalendarField,
        up: bool,
    ) -> CalendarResult<i64>;

    /// Rolls `field` by `amount` units, returning the new local milliseconds.
    ///
    /// The default implementation repeats `roll_once`.
    fn roll(
        &self,
        snapshot: FieldSnapshot<'_>,
        field: CalendarField,
        amount: i32,
    ) -> CalendarResult<i64> {
        let up = amount > 0;
        let mut fields = *snapshot.fields;
        let mut local = snapshot.local_milliseconds;
        for _ in 0..amount.unsigned_abs() {
            let step = FieldSnapshot {
                fields: &fields,
                local_milliseconds: local,
                rules: snapshot.rules,
                lenient: snapshot.lenient,
            };
            local = self.roll_once(step, field, up)?;
            self.compute_fields(local, snapshot.rules, &mut fields);
        }
        Ok(local)
    }

    /// Returns the static bounds of `field`.
    fn bounds(&self, field: CalendarField) -> FieldBounds;

    /// Returns the smallest value `field` can take at the snapshot's
    /// calendar position.
    fn actual_minimum(&self, snapshot: FieldSnapshot<'_>, field: CalendarField) -> i32 {
        let _ = snapshot;
        self.bounds(field).minimum
    }

    /// Returns the largest value `field` can take at the snapshot's
    /// calendar position.
    fn actual_maximum(&self, snapshot: FieldSnapshot<'_>, field: CalendarField) -> i32;
}

/// A calendar engine converting between an instant and calendar fields.
///
/// Reads may recompute cached state and therefore take `&mut self`.
///
/// ```rust
/// use calendar_rs::{CalendarField, GregorianCalendar};
///
/// let mut calendar = GregorianCalendar::utc();
/// calendar.set_date(2024, 0, 31).unwrap();
/// calendar.add(CalendarField::Month, 1).unwrap();
///
/// assert_eq!(calendar.get(CalendarField::Month).unwrap(), 1);
/// assert_eq!(calendar.get(CalendarField::DayOfMonth).unwrap(), 29);
/// ```
#[derive(Debug, Clone)]
pub struct Calendar<K: CalendarKernel = Gregorian, Z: TimeZone = Utc> {
    kernel: K,
    zone: Z,
    fields: FieldTable,
    time: i64,
    time_valid: bool,
    fields_valid: bool,
    all_fields_valid: bool,
    lenient: bool,
    rules: WeekRules,
}

impl<K: CalendarKernel + Default, Z: TimeZone + Default> Default for Calendar<K, Z> {
    fn default() -> Self {
        Self::new(K::default(), Z::default())
    }
}

impl Calendar<Gregorian, Utc> {
    /// Creates a lenient Gregorian engine in UTC, positioned at the epoch.
    #[must_use]
    pub fn utc() -> Self {
        Self::new(Gregorian, Utc)
    }
}

impl<Z: TimeZone> Calendar<Gregorian, Z> {
    /// Creates a lenient Gregorian engine in `zone`, positioned at the epoch.
    #[must_use]
    pub fn with_zone(zone: Z) -> Self {
        Self::new(Gregorian, zone)
    }
}

// ==== Construction and configuration ====

impl<K: CalendarKernel, Z: TimeZone> Calendar<K, Z> {
    /// Creates a lenient engine positioned at the epoch, with default
    /// week rules.
    #[must_use]
    pub fn new(kernel: K, zone: Z) -> Self {
        Self {
            kernel,
            zone,
            fields: FieldTable::default(),
            time: 0,
            time_valid: true,
            fields_valid: false,
            all_fields_valid: false,
            lenient: true,
            rules: WeekRules::default(),
        }
    }

    /// Returns this engine with different week rules.
    #[must_use]
    pub fn with_week_rules(mut self, rules: WeekRules) -> Self {
        self.set_week_rules(rules);
        self
    }

    /// Returns the kernel of this engine.
    #[inline]
    #[must_use]
    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    /// Returns the time zone of this engine.
    #[inline]
    #[must_use]
    pub fn zone(&self) -> &Z {
        &self.zone
    }

    /// Replaces the time zone. The instant is kept and the fields are
    /// recomputed in the new zone on the next read.
    pub fn set_zone(&mut self, zone: Z) {
        self.zone = zone;
        self.invalidate_fields();
    }

    /// Returns whether the engine normalizes out of range fields.
    #[inline]
    #[must_use]
    pub fn is_lenient(&self) -> bool {
        self.lenient
    }

    /// Sets whether the engine normalizes out of range fields.
    #[inline]
    pub fn set_lenient(&mut self, lenient: bool) {
        self.lenient = lenient;
    }

    /// Returns the week rules of the engine.
    #[inline]
    #[must_use]
    pub fn week_rules(&self) -> WeekRules {
        self.rules
    }

    /// Replaces the week rules.
    pub fn set_week_rules(&mut self, rules: WeekRules) {
        if self.rules != rules {
            self.rules = rules;
            self.invalidate_fields();
        }
    }

    /// Returns the `DAY_OF_WEEK` value that starts a week.
    #[inline]
    #[must_use]
    pub fn first_day_of_week(&self) -> i32 {
        self.rules.first_day_of_week() as i32
    }

    /// Sets the day that starts a week, `1..=7`.
    pub fn set_first_day_of_week(&mut self, day: i32) -> CalendarResult<()> {
        let day = Weekday::try_from(day)?;
        self.set_week_rules(self.rules.with_first_day_of_week(day));
        Ok(())
    }

    /// Returns the minimum number of days in the first week of a period.
    #[inline]
    #[must_use]
    pub fn minimal_days_in_first_week(&self) -> i32 {
        i32::from(self.rules.minimal_days_in_first_week())
    }

    /// Sets the minimum number of days in the first week, `1..=7`.
    pub fn set_minimal_days_in_first_week(&mut self, days: i32) -> CalendarResult<()> {
        let rules = self.rules.with_minimal_days_in_first_week(days)?;
        self.set_week_rules(rules);
        Ok(())
    }
}

// ==== Field access ====

impl<K: CalendarKernel, Z: TimeZone> Calendar<K, Z> {
    /// Returns the normalized value of `field`.
    pub fn get(&mut self, field: CalendarField) -> CalendarResult<i32> {
        self.complete()?;
        Ok(self.fields.value(field))
    }

    /// Sets `field` to `value`.
    ///
    /// A strict engine rejects values outside of the field's absolute
    /// bounds. Values that conflict with other fields are reported on the
    /// next read.
    pub fn set(&mut self, field: CalendarField, value: i32) -> CalendarResult<()> {
        self.check_bounds(field, value)?;
        self.materialize_fields()?;
        self.assign(field, value);
        Ok(())
    }

    /// Sets `YEAR`, `MONTH` and `DAY_OF_MONTH`.
    pub fn set_date(&mut self, year: i32, month: i32, date: i32) -> CalendarResult<()> {
        self.set_all(&[
            (CalendarField::Year, year),
            (CalendarField::Month, month),
            (CalendarField::DayOfMonth, date),
        ])
    }

    /// Sets `YEAR`, `MONTH`, `DAY_OF_MONTH`, `HOUR_OF_DAY` and `MINUTE`.
    pub fn set_date_time(
        &mut self,
        year: i32,
        month: i32,
        date: i32,
        hour: i32,
        minute: i32,
    ) -> CalendarResult<()> {
        self.set_all(&[
            (CalendarField::Year, year),
            (CalendarField::Month, month),
            (CalendarField::DayOfMonth, date),
            (CalendarField::HourOfDay, hour),
            (CalendarField::Minute, minute),
        ])
    }

    /// Sets `YEAR`, `MONTH`, `DAY_OF_MONTH`, `HOUR_OF_DAY`, `MINUTE` and
    /// `SECOND`.
    pub fn set_date_time_seconds(
        &mut self,
        year: i32,
        month: i32,
        date: i32,
        hour: i32,
        minute: i32,
        second: i32,
    ) -> CalendarResult<()> {
        self.set_all(&[
            (CalendarField::Year, year),
            (CalendarField::Month, month),
            (CalendarField::DayOfMonth, date),
            (CalendarField::HourOfDay, hour),
            (CalendarField::Minute, minute),
            (CalendarField::Second, second),
        ])
    }

    /// Unsets every field. The next read resolves the epoch date from
    /// defaults.
    pub fn clear(&mut self) {
        self.fields.clear_all();
        self.time_valid = false;
        self.fields_valid = false;
        self.all_fields_valid = false;
    }

    /// Unsets `field`.
    pub fn clear_field(&mut self, field: CalendarField) -> CalendarResult<()> {
        self.materialize_fields()?;
        self.fields.clear(field);
        self.time_valid = false;
        self.fields_valid = false;
        self.all_fields_valid = false;
        Ok(())
    }

    /// Returns whether `field` holds a value.
    #[inline]
    #[must_use]
    pub fn is_set(&self, field: CalendarField) -> bool {
        self.fields.is_set(field)
    }

    /// Returns the stamp of `field`.
    #[inline]
    #[must_use]
    pub fn stamp(&self, field: CalendarField) -> Stamp {
        self.fields.stamp(field)
    }

    /// Returns the field table as it currently stands, without
    /// recomputation.
    #[inline]
    #[must_use]
    pub fn fields(&self) -> &FieldTable {
        &self.fields
    }

    /// Returns whether the instant reflects the fields.
    #[inline]
    #[must_use]
    pub fn is_time_valid(&self) -> bool {
        self.time_valid
    }

    /// Returns whether the fields reflect the instant.
    #[inline]
    #[must_use]
    pub fn are_fields_valid(&self) -> bool {
        self.fields_valid
    }

    fn set_all(&mut self, values: &[(CalendarField, i32)]) -> CalendarResult<()> {
        for &(field, value) in values {
            self.check_bounds(field, value)?;
        }
        self.materialize_fields()?;
        for &(field, value) in values {
            self.assign(field, value);
        }
        Ok(())
    }

    fn check_bounds(&self, field: CalendarField, value: i32) -> CalendarResult<()> {
        if self.lenient || self.kernel.bounds(field).contains(value) {
            return Ok(());
        }
        #[cfg(feature = "log")]
        log::debug!("rejected {field}={value} in strict mode");
        Err(CalendarError::out_of_range().with_message(format!(
            "{field} value {value} is outside of its allowed range."
        )))
    }

    fn assign(&mut self, field: CalendarField, value: i32) {
        let stamp = self.fields.next_stamp();
        self.fields.set_value(field, value, stamp);
        self.time_valid = false;
        self.fields_valid = false;
        self.all_fields_valid = false;
    }

    /// Brings stale fields up to date with a valid instant, so that fields
    /// the user does not write keep the instant's values.
    fn materialize_fields(&mut self) -> CalendarResult<()> {
        if self.time_valid && !self.fields_valid {
            self.fields = self.fields_at(self.time)?;
        }
        Ok(())
    }

    fn invalidate_fields(&mut self) {
        if self.time_valid {
            self.fields_valid = false;
            self.all_fields_valid = false;
        }
    }
}

// ==== Instant access ====

impl<K: CalendarKernel, Z: TimeZone> Calendar<K, Z> {
    /// Returns the instant in milliseconds since the epoch, resolving it from
    /// the fields if needed.
    pub fn epoch_milliseconds(&mut self) -> CalendarResult<i64> {
        if !self.time_valid {
            self.update_time()?;
        }
        Ok(self.time)
    }

    /// Sets the instant. The fields are recomputed on the next read.
    pub fn set_epoch_milliseconds(&mut self, epoch_milliseconds: i64) {
        self.time = epoch_milliseconds;
        self.time_valid = true;
        self.fields_valid = false;
        self.all_fields_valid = false;
    }

    /// Returns the instant of this engine as an [`Instant`] in the same zone.
    pub fn to_instant(&mut self) -> CalendarResult<Instant<Z>>
    where
        Z: Clone,
    {
        let epoch_milliseconds = self.epoch_milliseconds()?;
        Ok(Instant::new_in(epoch_milliseconds, self.zone.clone()))
    }

    /// Sets the instant of this engine from an [`Instant`].
    pub fn set_instant<Z2: TimeZone>(&mut self, instant: &Instant<Z2>) {
        self.set_epoch_milliseconds(instant.epoch_milliseconds());
    }

    /// Returns whether this engine's instant is earlier than `other`'s.
    pub fn before<K2: CalendarKernel, Z2: TimeZone>(
        &mut self,
        other: &mut Calendar<K2, Z2>,
    ) -> CalendarResult<bool> {
        Ok(self.epoch_milliseconds()? < other.epoch_milliseconds()?)
    }

    /// Returns whether this engine's instant is later than `other`'s.
    pub fn after<K2: CalendarKernel, Z2: TimeZone>(
        &mut self,
        other: &mut Calendar<K2, Z2>,
    ) -> CalendarResult<bool> {
        Ok(self.epoch_milliseconds()? > other.epoch_milliseconds()?)
    }

    /// Returns whether both engines hold the same instant under the same
    /// configuration.
    pub fn equals(&mut self, other: &mut Self) -> CalendarResult<bool> {
        Ok(self.epoch_milliseconds()? == other.epoch_milliseconds()?
            && self.lenient == other.lenient
            && self.rules == other.rules)
    }

    /// Returns a hash of the configuration. Engines that are
    /// [`equals`](Self::equals) share a hash code.
    #[must_use]
    pub fn hash_code(&self) -> i32 {
        i32::from(self.lenient)
            | (self.rules.first_day_of_week() as i32) << 1
            | i32::from(self.rules.minimal_days_in_first_week()) << 4
    }
}

// ==== Arithmetic ====

impl<K: CalendarKernel, Z: TimeZone> Calendar<K, Z> {
    /// Adds `amount` to `field`, carrying into larger fields.
    ///
    /// Adding months or years pins the day of month to the length of the
    /// target month.
    pub fn add(&mut self, field: CalendarField, amount: i32) -> CalendarResult<()> {
        if amount == 0 {
            return Ok(());
        }
        self.complete()?;
        let adjustment = self.kernel.add(self.snapshot()?, field, amount)?;
        let time = self.apply(adjustment)?;
        self.set_epoch_milliseconds(time);
        Ok(())
    }

    /// Rolls `field` by one unit up or down without changing larger fields.
    pub fn roll(&mut self, field: CalendarField, up: bool) -> CalendarResult<()> {
        self.roll_by(field, if up { 1 } else { -1 })
    }

    /// Rolls `field` by `amount` units without changing larger fields.
    pub fn roll_by(&mut self, field: CalendarField, amount: i32) -> CalendarResult<()> {
        if amount == 0 {
            return Ok(());
        }
        self.complete()?;
        let local = self.kernel.roll(self.snapshot()?, field, amount)?;
        let time = self.apply(Adjustment::WallClock(local))?;
        self.set_epoch_milliseconds(time);
        Ok(())
    }

    fn apply(&self, adjustment: Adjustment) -> CalendarResult<i64> {
        match adjustment {
            Adjustment::Elapsed(delta) => self.time.checked_add(delta),
            Adjustment::WallClock(local) => {
                local.checked_sub(self.zone.offsets_for_local(local).total())
            }
        }
        .ok_or_else(CalendarError::overflow)
    }

    /// Builds the kernel view of a completed engine.
    fn snapshot(&self) -> CalendarResult<FieldSnapshot<'_>> {
        let offsets = ZoneOffsets::new(
            self.fields.value(CalendarField::ZoneOffset),
            self.fields.value(CalendarField::DstOffset),
        );
        let local_milliseconds = self
            .time
            .checked_add(offsets.total())
            .ok_or_else(CalendarError::overflow)?;
        Ok(FieldSnapshot {
            fields: &self.fields,
            local_milliseconds,
            rules: self.rules,
            lenient: self.lenient,
        })
    }
}

// ==== Bounds ====

impl<K: CalendarKernel, Z: TimeZone> Calendar<K, Z> {
    /// Returns the absolute minimum of `field`.
    #[inline]
    #[must_use]
    pub fn minimum(&self, field: CalendarField) -> i32 {
        self.kernel.bounds(field).minimum
    }

    /// Returns the absolute maximum of `field`.
    #[inline]
    #[must_use]
    pub fn maximum(&self, field: CalendarField) -> i32 {
        self.kernel.bounds(field).maximum
    }

    /// Returns the largest minimum of `field` over every calendar position.
    #[inline]
    #[must_use]
    pub fn greatest_minimum(&self, field: CalendarField) -> i32 {
        self.kernel.bounds(field).greatest_minimum
    }

    /// Returns the smallest maximum of `field` over every calendar position.
    #[inline]
    #[must_use]
    pub fn least_maximum(&self, field: CalendarField) -> i32 {
        self.kernel.bounds(field).least_maximum
    }

    /// Returns the minimum of `field` at the current calendar position.
    pub fn actual_minimum(&mut self, field: CalendarField) -> CalendarResult<i32> {
        self.complete()?;
        Ok(self.kernel.actual_minimum(self.snapshot()?, field))
    }

    /// Returns the maximum of `field` at the current calendar position.
    pub fn actual_maximum(&mut self, field: CalendarField) -> CalendarResult<i32> {
        self.complete()?;
        Ok(self.kernel.actual_maximum(self.snapshot()?, field))
    }
}

// ==== Consistency protocol ====

impl<K: CalendarKernel, Z: TimeZone> Calendar<K, Z> {
    /// Brings both the instant and the fields up to date.
    pub fn complete(&mut self) -> CalendarResult<()> {
        if !self.time_valid {
            self.update_time()?;
        }
        if !self.fields_valid {
            self.fields = self.fields_at(self.time)?;
            self.fields_valid = true;
            self.all_fields_valid = true;
        }
        Ok(())
    }

    fn update_time(&mut self) -> CalendarResult<()> {
        let time = self.compute_time()?;
        self.time = time;
        self.time_valid = true;
        if self.lenient || !self.all_fields_valid {
            self.fields_valid = false;
        }
        Ok(())
    }

    /// Resolves the fields to a UTC instant.
    fn compute_time(&self) -> CalendarResult<i64> {
        let local = self
            .kernel
            .compute_time(&self.fields, self.rules, self.lenient)?;
        let offsets = self.offsets_for_local(local);
        let time = local
            .checked_sub(offsets.total())
            .ok_or_else(CalendarError::overflow)?;
        if !self.lenient {
            self.verify_user_fields(time)?;
        }
        Ok(time)
    }

    /// Returns the offsets to subtract from `local`. User written offset
    /// fields win over the time zone.
    fn offsets_for_local(&self, local: i64) -> ZoneOffsets {
        let zone = self.zone.offsets_for_local(local);
        let pick = |field: CalendarField, fallback: i32| {
            if self.fields.stamp(field).is_user_set() {
                self.fields.value(field)
            } else {
                fallback
            }
        };
        ZoneOffsets::new(
            pick(CalendarField::ZoneOffset, zone.raw),
            pick(CalendarField::DstOffset, zone.dst),
        )
    }

    /// Computes a complete field table for the UTC instant `time`.
    fn fields_at(&self, time: i64) -> CalendarResult<FieldTable> {
        let offsets = self.zone.offsets_at(time);
        let local = time
            .checked_add(offsets.total())
            .ok_or_else(CalendarError::overflow)?;
        let mut fields = self.fields;
        self.kernel.compute_fields(local, self.rules, &mut fields);
        fields.set_internal(CalendarField::ZoneOffset, offsets.raw);
        fields.set_internal(CalendarField::DstOffset, offsets.dst);
        #[cfg(feature = "log")]
        log::trace!("computed fields for {time}");
        Ok(fields)
    }

    /// Checks that every field the user wrote survives normalization.
    fn verify_user_fields(&self, time: i64) -> CalendarResult<()> {
        let normalized = self.fields_at(time)?;
        for field in CalendarField::ALL {
            if field.is_offset() || !self.fields.stamp(field).is_user_set() {
                continue;
            }
            let value = self.fields.value(field);
            // Zero and negative ordinals count from the month boundaries.
            if field == CalendarField::DayOfWeekInMonth && value < 1 {
                continue;
            }
            let resolved = normalized.value(field);
            if resolved != value {
                #[cfg(feature = "log")]
                log::debug!("strict mode: {field} {value} resolved to {resolved}");
                return Err(CalendarError::out_of_range()
                    .with_message(format!("{field}: {value} -> {resolved}")));
            }
        }
        Ok(())
    }
}

impl<K: CalendarKernel, Z: TimeZone> fmt::Display for Calendar<K, Z> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[time=")?;
        if self.time_valid {
            write!(f, "{}", self.time)?;
        } else {
            f.write_str("?")?;
        }
        write!(
            f,
            ",fieldsValid={},allFieldsValid={},lenient={},firstDayOfWeek={},minimalDaysInFirstWeek={}",
            self.fields_valid,
            self.all_fields_valid,
            self.lenient,
            self.first_day_of_week(),
            self.minimal_days_in_first_week(),
        )?;
        for field in CalendarField::ALL {
            write!(f, ",{field}=")?;
            if self.fields.is_set(field) {
                write!(f, "{}", self.fields.value(field))?;
            } else {
                f.write_str("?")?;
            }
        }
        f.write_str("]")
    }
}
