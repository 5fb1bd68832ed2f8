//! The Gregorian kernel.
//!
//! Days on or after 1582-10-15 follow the Gregorian leap year rule and
//! earlier days follow the Julian rule. The ten labels 1582-10-05 through
//! 1582-10-14 name no day: a lenient engine snaps them forward, a strict
//! engine reports `NonExistentDate`.

use alloc::format;

use super::{
    bounds::{gregorian_bounds, MAX_YEAR},
    Adjustment, CalendarKernel, FieldBounds, FieldSnapshot,
};
use crate::{
    fields::{CalendarField, FieldTable, Stamp},
    utils::{self, CivilDay},
    week::WeekRules,
    AmPm, CalendarError, CalendarResult, Era, MS_PER_DAY, MS_PER_HOUR, MS_PER_MINUTE,
    MS_PER_SECOND,
};

/// The `YEAR` used when no year is set.
const EPOCH_YEAR: i32 = 1970;

/// The Gregorian calendar with a Julian calendar before the 1582 cutover.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Gregorian;

// ==== Field resolution ====

/// The field combinations that can pick a day within a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DaySelector {
    DayOfMonth,
    WeekOfMonth,
    DayOfWeekInMonth,
    DayOfYear,
    WeekOfYear,
}

impl DaySelector {
    /// Every selector, highest precedence first.
    const ALL: [Self; 5] = [
        Self::DayOfMonth,
        Self::WeekOfMonth,
        Self::DayOfWeekInMonth,
        Self::DayOfYear,
        Self::WeekOfYear,
    ];

    const MONTH_BASED: [Self; 3] = [Self::DayOfMonth, Self::WeekOfMonth, Self::DayOfWeekInMonth];

    const fn is_month_based(self) -> bool {
        matches!(
            self,
            Self::DayOfMonth | Self::WeekOfMonth | Self::DayOfWeekInMonth
        )
    }

    fn stamp(self, fields: &FieldTable) -> Stamp {
        let day_of_week = fields.stamp(CalendarField::DayOfWeek);
        match self {
            Self::DayOfMonth => fields.stamp(CalendarField::DayOfMonth),
            Self::WeekOfMonth => fields.stamp(CalendarField::WeekOfMonth).aggregate(day_of_week),
            Self::DayOfWeekInMonth => fields
                .stamp(CalendarField::DayOfWeekInMonth)
                .aggregate(day_of_week),
            Self::DayOfYear => fields.stamp(CalendarField::DayOfYear),
            Self::WeekOfYear => fields.stamp(CalendarField::WeekOfYear).aggregate(day_of_week),
        }
    }

    /// Returns the most recently stamped selector. Ties keep the selector
    /// listed first.
    fn most_recent(fields: &FieldTable, selectors: &[Self]) -> Option<(Self, Stamp)> {
        let mut best: Option<(Self, Stamp)> = None;
        for &selector in selectors {
            let stamp = selector.stamp(fields);
            if !stamp.is_set() {
                continue;
            }
            match best {
                Some((_, best_stamp)) if best_stamp >= stamp => {}
                _ => best = Some((selector, stamp)),
            }
        }
        best
    }

    fn resolve(fields: &FieldTable) -> Self {
        match Self::most_recent(fields, &Self::ALL) {
            // A month written after a year based selector asks for a
            // month based date.
            Some((selector, stamp))
                if !selector.is_month_based() && fields.stamp(CalendarField::Month) > stamp =>
            {
                Self::most_recent(fields, &Self::MONTH_BASED)
                    .map_or(Self::DayOfMonth, |(selector, _)| selector)
            }
            Some((selector, _)) => selector,
            None if fields.is_set(CalendarField::DayOfWeek) => Self::WeekOfMonth,
            None => Self::DayOfMonth,
        }
    }
}

/// Resolves the hour of day, preferring the most recently written of
/// `HOUR_OF_DAY` and the `HOUR` / `AM_PM` pair.
fn resolve_hour_of_day(fields: &FieldTable) -> i64 {
    let hour_of_day = fields.stamp(CalendarField::HourOfDay);
    let twelve_hour = fields
        .stamp(CalendarField::Hour)
        .max(fields.stamp(CalendarField::AmPm));
    if hour_of_day.is_set() && hour_of_day >= twelve_hour {
        i64::from(fields.value(CalendarField::HourOfDay))
    } else if twelve_hour.is_set() {
        let hour = i64::from(fields.value_or(CalendarField::Hour, 0));
        let am_pm = i64::from(fields.value_or(CalendarField::AmPm, AmPm::AM as i32));
        hour + 12 * am_pm
    } else {
        0
    }
}

fn resolve_millisecond_of_day(fields: &FieldTable) -> i64 {
    let minute = i64::from(fields.value_or(CalendarField::Minute, 0));
    let second = i64::from(fields.value_or(CalendarField::Second, 0));
    let millisecond = i64::from(fields.value_or(CalendarField::Millisecond, 0));
    resolve_hour_of_day(fields) * MS_PER_HOUR
        + minute * MS_PER_MINUTE
        + second * MS_PER_SECOND
        + millisecond
}

fn validate_user_fields(fields: &FieldTable) -> CalendarResult<()> {
    for field in CalendarField::ALL {
        if !fields.stamp(field).is_user_set() {
            continue;
        }
        let value = fields.value(field);
        if !gregorian_bounds(field).contains(value) {
            #[cfg(feature = "log")]
            log::debug!("strict mode: {field}={value} is out of bounds");
            return Err(CalendarError::out_of_range().with_message(format!(
                "{field} value {value} is outside of its allowed range."
            )));
        }
    }
    Ok(())
}

/// Resolves a civil date, snapping gap dates forward when lenient.
fn resolve_civil_day(year: i64, month: u8, date: i64, lenient: bool) -> CalendarResult<i64> {
    match utils::resolve_civil_day(year, month, date) {
        CivilDay::Exact(day) => Ok(day),
        CivilDay::Gap(day) if lenient => {
            #[cfg(feature = "log")]
            log::trace!("snapped {year}-{}-{date} forward across the cutover", month + 1);
            Ok(day)
        }
        CivilDay::Gap(_) => Err(CalendarError::non_existent_date().with_message(format!(
            "{year}-{}-{date} falls into the Julian to Gregorian cutover gap.",
            month + 1
        ))),
    }
}

fn to_local_milliseconds(epoch_days: i64, millisecond_of_day: i64) -> CalendarResult<i64> {
    let days = epoch_days.checked_add(millisecond_of_day.div_euclid(MS_PER_DAY));
    let millisecond_of_day = millisecond_of_day.rem_euclid(MS_PER_DAY);
    days.and_then(|days| {
        // Counted back from the following midnight so that the day holding
        // `i64::MIN` stays representable.
        if days < 0 && millisecond_of_day > 0 {
            (days + 1)
                .checked_mul(MS_PER_DAY)?
                .checked_add(millisecond_of_day - MS_PER_DAY)
        } else {
            days.checked_mul(MS_PER_DAY)?.checked_add(millisecond_of_day)
        }
    })
    .ok_or_else(CalendarError::overflow)
}

/// Cycles `value` within `min..=max`.
fn roll_range(value: i32, min: i32, max: i32, amount: i64) -> i32 {
    let range = i64::from(max) - i64::from(min) + 1;
    let offset = (i64::from(value) - i64::from(min) + amount).rem_euclid(range);
    (i64::from(min) + offset) as i32
}

// ==== LocalDate ====

/// The civil position of a local time.
#[derive(Debug, Clone, Copy)]
struct LocalDate {
    epoch_days: i64,
    millisecond_of_day: i64,
    year: i64,
    month: u8,
    date: u8,
}

impl LocalDate {
    fn new(local_milliseconds: i64) -> Self {
        let (epoch_days, millisecond_of_day) = utils::split_epoch_milliseconds(local_milliseconds);
        let (year, month, date) = utils::civil_from_epoch_days(epoch_days);
        Self {
            epoch_days,
            millisecond_of_day,
            year,
            month,
            date,
        }
    }

    fn month_start(&self) -> i64 {
        utils::month_start(self.year, self.month)
    }

    /// The number of days in the month, which is 21 for October 1582.
    fn month_length(&self) -> i64 {
        let (year, month) = utils::balance_month(self.year, i64::from(self.month) + 1);
        utils::month_start(year, month) - self.month_start()
    }

    fn year_start(&self) -> i64 {
        utils::year_start(self.year)
    }

    fn with_epoch_days(&self, epoch_days: i64) -> CalendarResult<i64> {
        to_local_milliseconds(epoch_days, self.millisecond_of_day)
    }

    fn with_millisecond_of_day(&self, millisecond_of_day: i64) -> CalendarResult<i64> {
        to_local_milliseconds(self.epoch_days, millisecond_of_day)
    }

    /// Moves to `month` of `year`, pinning the date to the month length.
    fn with_year_month(&self, year: i64, month: u8, lenient: bool) -> CalendarResult<i64> {
        let date = i64::from(self.date).min(i64::from(utils::days_in_month(year, month)));
        let epoch_days = resolve_civil_day(year, month, date, lenient)?;
        self.with_epoch_days(epoch_days)
    }
}

/// Converts a `YEAR` value in `era` to an extended year.
fn extended_year(era: i32, year_in_era: i64) -> i64 {
    if era == Era::BC as i32 {
        1 - year_in_era
    } else {
        year_in_era
    }
}

// ==== Kernel ====

impl Gregorian {
    fn resolve_epoch_days(
        fields: &FieldTable,
        rules: WeekRules,
        lenient: bool,
        year: i64,
        month: u8,
    ) -> CalendarResult<i64> {
        let relative_day_of_week =
            || i64::from(rules.relative_day_of_week(fields.value(CalendarField::DayOfWeek)));

        match DaySelector::resolve(fields) {
            DaySelector::DayOfMonth => {
                let date = i64::from(fields.value_or(CalendarField::DayOfMonth, 1));
                if !lenient && date > i64::from(utils::days_in_month(year, month)) {
                    return Err(CalendarError::out_of_range().with_message(format!(
                        "DAY_OF_MONTH value {date} exceeds the length of the month."
                    )));
                }
                resolve_civil_day(year, month, date, lenient)
            }
            DaySelector::WeekOfMonth => {
                let first = utils::month_start(year, month);
                let week = i64::from(fields.value_or(CalendarField::WeekOfMonth, 1));
                let start = i64::from(rules.first_week_start(utils::day_of_week(first)));
                Ok(first + start - 1 + 7 * (week - 1) + relative_day_of_week())
            }
            DaySelector::DayOfWeekInMonth => {
                let ordinal = i64::from(fields.value_or(CalendarField::DayOfWeekInMonth, 1));
                let day_of_week = i64::from(fields.value(CalendarField::DayOfWeek));
                if ordinal >= 0 {
                    // Ordinal `n` covers the dates `7n - 6..=7n`, which stay
                    // consecutive days even in the cutover month.
                    let week_start = 7 * (ordinal - 1) + 1;
                    let (CivilDay::Exact(first) | CivilDay::Gap(first)) =
                        utils::resolve_civil_day(year, month, week_start);
                    let offset = (day_of_week - i64::from(utils::day_of_week(first))).rem_euclid(7);
                    resolve_civil_day(year, month, week_start + offset, lenient)
                } else {
                    let (next_year, next_month) =
                        utils::balance_month(year, i64::from(month) + 1);
                    let last = utils::month_start(next_year, next_month) - 1;
                    let back = (i64::from(utils::day_of_week(last)) - day_of_week).rem_euclid(7);
                    Ok(last - back + 7 * (ordinal + 1))
                }
            }
            DaySelector::DayOfYear => {
                let day_of_year = i64::from(fields.value(CalendarField::DayOfYear));
                if !lenient && day_of_year > utils::year_length(year) {
                    return Err(CalendarError::out_of_range().with_message(format!(
                        "DAY_OF_YEAR value {day_of_year} exceeds the length of the year."
                    )));
                }
                Ok(utils::year_start(year) + day_of_year - 1)
            }
            DaySelector::WeekOfYear => {
                let first = utils::year_start(year);
                let week = i64::from(fields.value(CalendarField::WeekOfYear));
                let start = i64::from(rules.first_week_start(utils::day_of_week(first)));
                Ok(first + start - 1 + 7 * (week - 1) + relative_day_of_week())
            }
        }
    }

    fn last_week_of_year(rules: WeekRules, year: i64) -> i32 {
        let length = utils::year_length(year) as i32;
        let previous = utils::year_length(year - 1) as i32;
        let last_day = utils::year_start(year) + i64::from(length) - 1;
        let day_of_week = utils::day_of_week(last_day);
        let week = rules.week_of_year(length, day_of_week, length, previous);
        if week == 1 {
            // The trailing days belong to the next year.
            return rules.week_of_year(length - 7, day_of_week, length, previous);
        }
        week
    }
}

impl CalendarKernel for Gregorian {
    fn compute_time(
        &self,
        fields: &FieldTable,
        rules: WeekRules,
        lenient: bool,
    ) -> CalendarResult<i64> {
        if !lenient {
            validate_user_fields(fields)?;
        }

        // 1. Resolve the era and year, then carry an out of range month.
        let era = fields.value_or(CalendarField::Era, Era::AD as i32);
        let year = extended_year(
            era,
            i64::from(fields.value_or(CalendarField::Year, EPOCH_YEAR)),
        );
        let (year, month) =
            utils::balance_month(year, i64::from(fields.value_or(CalendarField::Month, 0)));

        // 2. Resolve the day through the most recent day selector.
        let epoch_days = Self::resolve_epoch_days(fields, rules, lenient, year, month)?;

        // 3. Add the time of day, which may itself carry into other days.
        to_local_milliseconds(epoch_days, resolve_millisecond_of_day(fields))
    }

    fn compute_fields(&self, local_milliseconds: i64, rules: WeekRules, fields: &mut FieldTable) {
        let local = LocalDate::new(local_milliseconds);
        let (era, year_in_era) = if local.year > 0 {
            (Era::AD, local.year)
        } else {
            (Era::BC, 1 - local.year)
        };

        let day_of_week = utils::day_of_week(local.epoch_days);
        let day_of_year = (local.epoch_days - local.year_start() + 1) as i32;
        let day_of_month = (local.epoch_days - local.month_start() + 1) as i32;
        let year_length = utils::year_length(local.year) as i32;
        let previous_year_length = utils::year_length(local.year - 1) as i32;

        fields.set_internal(CalendarField::Era, era as i32);
        fields.set_internal(CalendarField::Year, year_in_era as i32);
        fields.set_internal(CalendarField::Month, i32::from(local.month));
        fields.set_internal(CalendarField::DayOfMonth, i32::from(local.date));
        fields.set_internal(CalendarField::DayOfYear, day_of_year);
        fields.set_internal(CalendarField::DayOfWeek, day_of_week);
        fields.set_internal(
            CalendarField::DayOfWeekInMonth,
            (i32::from(local.date) - 1) / 7 + 1,
        );
        fields.set_internal(
            CalendarField::WeekOfMonth,
            rules.week_number(day_of_month, day_of_week),
        );
        fields.set_internal(
            CalendarField::WeekOfYear,
            rules.week_of_year(day_of_year, day_of_week, year_length, previous_year_length),
        );

        let millisecond_of_day = local.millisecond_of_day;
        let hour_of_day = (millisecond_of_day / MS_PER_HOUR) as i32;
        fields.set_internal(CalendarField::HourOfDay, hour_of_day);
        fields.set_internal(CalendarField::AmPm, hour_of_day / 12);
        fields.set_internal(CalendarField::Hour, hour_of_day % 12);
        fields.set_internal(
            CalendarField::Minute,
            (millisecond_of_day / MS_PER_MINUTE % 60) as i32,
        );
        fields.set_internal(
            CalendarField::Second,
            (millisecond_of_day / MS_PER_SECOND % 60) as i32,
        );
        fields.set_internal(
            CalendarField::Millisecond,
            (millisecond_of_day % MS_PER_SECOND) as i32,
        );
    }

    fn add(
        &self,
        snapshot: FieldSnapshot<'_>,
        field: CalendarField,
        amount: i32,
    ) -> CalendarResult<Adjustment> {
        let local = LocalDate::new(snapshot.local_milliseconds);
        let amount = i64::from(amount);

        let by_days = |days: i64| {
            days.checked_mul(MS_PER_DAY)
                .and_then(|delta| snapshot.local_milliseconds.checked_add(delta))
                .map(Adjustment::WallClock)
                .ok_or_else(CalendarError::overflow)
        };

        match field {
            CalendarField::Era => {
                let era = snapshot.fields.value(CalendarField::Era);
                let target = (i64::from(era) + amount).clamp(0, 1) as i32;
                if target == era {
                    return Ok(Adjustment::WallClock(snapshot.local_milliseconds));
                }
                let year_in_era = i64::from(snapshot.fields.value(CalendarField::Year));
                let year = extended_year(target, year_in_era);
                local
                    .with_year_month(year, local.month, snapshot.lenient)
                    .map(Adjustment::WallClock)
            }
            CalendarField::Year => local
                .with_year_month(local.year + amount, local.month, snapshot.lenient)
                .map(Adjustment::WallClock),
            CalendarField::Month => {
                let (year, month) = utils::balance_month(local.year, i64::from(local.month) + amount);
                local
                    .with_year_month(year, month, snapshot.lenient)
                    .map(Adjustment::WallClock)
            }
            CalendarField::WeekOfYear
            | CalendarField::WeekOfMonth
            | CalendarField::DayOfWeekInMonth => by_days(7 * amount),
            CalendarField::DayOfMonth | CalendarField::DayOfYear | CalendarField::DayOfWeek => {
                by_days(amount)
            }
            CalendarField::AmPm => Ok(Adjustment::Elapsed(amount * 12 * MS_PER_HOUR)),
            CalendarField::Hour | CalendarField::HourOfDay => {
                Ok(Adjustment::Elapsed(amount * MS_PER_HOUR))
            }
            CalendarField::Minute => Ok(Adjustment::Elapsed(amount * MS_PER_MINUTE)),
            CalendarField::Second => Ok(Adjustment::Elapsed(amount * MS_PER_SECOND)),
            CalendarField::Millisecond => Ok(Adjustment::Elapsed(amount)),
            CalendarField::ZoneOffset | CalendarField::DstOffset => Err(
                CalendarError::out_of_range().with_message(format!("{field} cannot be added to.")),
            ),
        }
    }

    fn roll_once(
        &self,
        snapshot: FieldSnapshot<'_>,
        field: CalendarField,
        up: bool,
    ) -> CalendarResult<i64> {
        self.roll(snapshot, field, if up { 1 } else { -1 })
    }

    fn roll(
        &self,
        snapshot: FieldSnapshot<'_>,
        field: CalendarField,
        amount: i32,
    ) -> CalendarResult<i64> {
        let fields = snapshot.fields;
        let rules = snapshot.rules;
        let local = LocalDate::new(snapshot.local_milliseconds);
        let amount = i64::from(amount);
        let day_of_week = utils::day_of_week(local.epoch_days);

        let roll_time_field = |field: CalendarField, unit: i64| {
            let bounds = gregorian_bounds(field);
            let value = fields.value(field);
            let rolled = roll_range(value, bounds.minimum, bounds.maximum, amount);
            let delta = i64::from(rolled - value) * unit;
            local.with_millisecond_of_day(local.millisecond_of_day + delta)
        };

        match field {
            CalendarField::Era => {
                let era = roll_range(fields.value(CalendarField::Era), 0, 1, amount);
                let year = extended_year(era, i64::from(fields.value(CalendarField::Year)));
                local.with_year_month(year, local.month, snapshot.lenient)
            }
            CalendarField::Year => {
                let year_in_era = roll_range(fields.value(CalendarField::Year), 1, MAX_YEAR, amount);
                let year = extended_year(fields.value(CalendarField::Era), i64::from(year_in_era));
                local.with_year_month(year, local.month, snapshot.lenient)
            }
            CalendarField::Month => {
                let month = roll_range(i32::from(local.month), 0, 11, amount) as u8;
                local.with_year_month(local.year, month, snapshot.lenient)
            }
            CalendarField::DayOfMonth => {
                let start = local.month_start();
                let index = (local.epoch_days - start + amount).rem_euclid(local.month_length());
                local.with_epoch_days(start + index)
            }
            CalendarField::DayOfYear => {
                let start = local.year_start();
                let length = utils::year_length(local.year);
                let index = (local.epoch_days - start + amount).rem_euclid(length);
                local.with_epoch_days(start + index)
            }
            CalendarField::DayOfWeek => {
                let relative = i64::from(rules.relative_day_of_week(day_of_week));
                let rolled = (relative + amount).rem_euclid(7);
                local.with_epoch_days(local.epoch_days - relative + rolled)
            }
            CalendarField::DayOfWeekInMonth => {
                let start = local.month_start();
                let length = local.month_length();
                let day_of_month = local.epoch_days - start + 1;
                let weeks_before = (day_of_month - 1) / 7;
                let weeks_after = (length - day_of_month) / 7;
                let count = weeks_before + weeks_after + 1;
                let rolled = (weeks_before + amount).rem_euclid(count);
                let first_occurrence = day_of_month - 7 * weeks_before;
                local.with_epoch_days(start + first_occurrence - 1 + 7 * rolled)
            }
            CalendarField::WeekOfMonth => {
                let start_day = local.month_start();
                let length = local.month_length();
                let day_of_month = local.epoch_days - start_day + 1;
                let start = i64::from(rules.first_week_start(utils::day_of_week(start_day)));
                let last_relative = i64::from(
                    rules.relative_day_of_week(utils::day_of_week(start_day + length - 1)),
                );
                let limit = length + 7 - last_relative;
                crate::calendar_assert!(limit > start, "empty week of month range");
                let rolled = (day_of_month + 7 * amount - start).rem_euclid(limit - start) + start;
                local.with_epoch_days(start_day + rolled.clamp(1, length) - 1)
            }
            CalendarField::WeekOfYear => {
                let start_day = local.year_start();
                let length = utils::year_length(local.year);
                let day_of_year = local.epoch_days - start_day + 1;
                let start = i64::from(rules.first_week_start(utils::day_of_week(start_day)));
                let last_relative = i64::from(
                    rules.relative_day_of_week(utils::day_of_week(start_day + length - 1)),
                );
                let mut limit = length + 7 - last_relative;
                // A trailing week that counts as week 1 of the next year.
                if 6 - last_relative >= i64::from(rules.minimal_days_in_first_week()) {
                    limit -= 7;
                }
                crate::calendar_assert!(limit > start, "empty week of year range");
                let rolled = (day_of_year + 7 * amount - start).rem_euclid(limit - start) + start;
                local.with_epoch_days(start_day + rolled.clamp(1, length) - 1)
            }
            CalendarField::AmPm => roll_time_field(field, 12 * MS_PER_HOUR),
            CalendarField::Hour | CalendarField::HourOfDay => roll_time_field(field, MS_PER_HOUR),
            CalendarField::Minute => roll_time_field(field, MS_PER_MINUTE),
            CalendarField::Second => roll_time_field(field, MS_PER_SECOND),
            CalendarField::Millisecond => roll_time_field(field, 1),
            CalendarField::ZoneOffset | CalendarField::DstOffset => Err(
                CalendarError::out_of_range().with_message(format!("{field} cannot be rolled.")),
            ),
        }
    }

    fn bounds(&self, field: CalendarField) -> FieldBounds {
        gregorian_bounds(field)
    }

    fn actual_maximum(&self, snapshot: FieldSnapshot<'_>, field: CalendarField) -> i32 {
        let local = LocalDate::new(snapshot.local_milliseconds);
        match field {
            CalendarField::DayOfMonth => i32::from(utils::days_in_month(local.year, local.month)),
            CalendarField::DayOfYear => utils::year_length(local.year) as i32,
            CalendarField::WeekOfYear => Self::last_week_of_year(snapshot.rules, local.year),
            CalendarField::WeekOfMonth => {
                let length = local.month_length();
                let last_day = local.month_start() + length - 1;
                snapshot
                    .rules
                    .week_number(length as i32, utils::day_of_week(last_day))
            }
            CalendarField::DayOfWeekInMonth => {
                (i32::from(utils::days_in_month(local.year, local.month)) - 1) / 7 + 1
            }
            _ => gregorian_bounds(field).maximum,
        }
    }
}
