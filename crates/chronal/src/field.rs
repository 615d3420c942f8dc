//! Date-time fields: accessor/mutator objects for single calendrical units.
//!
//! A [`DateTimeFieldType`] is a symbolic, closed identifier for one unit
//! (year, monthOfYear, dayOfWeek, ...). A [`DateTimeField`] binds a type to
//! a [`Chronology`] and exposes the get/set/add/round/range operations for
//! it. All fourteen fields are interpreted by the shared algorithms below,
//! dispatching on the type tag; there is one code path per operation, not
//! one type per unit.
//!
//! Operations work in zone-local milliseconds: an instant is converted to
//! local time, the field arithmetic runs on the local value, and the result
//! converts back with the original instant as a disambiguation hint so that
//! value-preserving operations are exact even inside a DST overlap.

use serde::{Deserialize, Serialize};

use crate::calendar::{day_of_week, floor_div, floor_mod};
use crate::chronology::Chronology;
use crate::duration::{
    add_months, add_weekyears, add_years, check_weekyear, DurationField, DurationFieldType,
};
use crate::error::{ChronalError, Result};
use crate::instant::{
    Instant, MILLIS_PER_DAY, MILLIS_PER_HOUR, MILLIS_PER_MINUTE, MILLIS_PER_SECOND,
};

// ── DateTimeFieldType ───────────────────────────────────────────────────────

/// Symbolic identifier for a calendrical unit.
///
/// Identity is the camelCase name: `name()` and `FromStr` round-trip, and
/// two types with the same name are the same type. Each type knows its own
/// duration unit and the next larger (range) unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DateTimeFieldType {
    Year,
    Weekyear,
    MonthOfYear,
    WeekOfWeekyear,
    DayOfYear,
    DayOfMonth,
    DayOfWeek,
    HourOfDay,
    MinuteOfDay,
    MinuteOfHour,
    SecondOfDay,
    SecondOfMinute,
    MillisOfDay,
    MillisOfSecond,
}

impl DateTimeFieldType {
    /// Every supported field type, largest unit first.
    pub fn all() -> [DateTimeFieldType; 14] {
        use DateTimeFieldType::*;
        [
            Year,
            Weekyear,
            MonthOfYear,
            WeekOfWeekyear,
            DayOfYear,
            DayOfMonth,
            DayOfWeek,
            HourOfDay,
            MinuteOfDay,
            MinuteOfHour,
            SecondOfDay,
            SecondOfMinute,
            MillisOfDay,
            MillisOfSecond,
        ]
    }

    pub fn name(self) -> &'static str {
        match self {
            DateTimeFieldType::Year => "year",
            DateTimeFieldType::Weekyear => "weekyear",
            DateTimeFieldType::MonthOfYear => "monthOfYear",
            DateTimeFieldType::WeekOfWeekyear => "weekOfWeekyear",
            DateTimeFieldType::DayOfYear => "dayOfYear",
            DateTimeFieldType::DayOfMonth => "dayOfMonth",
            DateTimeFieldType::DayOfWeek => "dayOfWeek",
            DateTimeFieldType::HourOfDay => "hourOfDay",
            DateTimeFieldType::MinuteOfDay => "minuteOfDay",
            DateTimeFieldType::MinuteOfHour => "minuteOfHour",
            DateTimeFieldType::SecondOfDay => "secondOfDay",
            DateTimeFieldType::SecondOfMinute => "secondOfMinute",
            DateTimeFieldType::MillisOfDay => "millisOfDay",
            DateTimeFieldType::MillisOfSecond => "millisOfSecond",
        }
    }

    /// The unit this field counts in.
    pub fn duration_type(self) -> DurationFieldType {
        match self {
            DateTimeFieldType::Year => DurationFieldType::Years,
            DateTimeFieldType::Weekyear => DurationFieldType::Weekyears,
            DateTimeFieldType::MonthOfYear => DurationFieldType::Months,
            DateTimeFieldType::WeekOfWeekyear => DurationFieldType::Weeks,
            DateTimeFieldType::DayOfYear
            | DateTimeFieldType::DayOfMonth
            | DateTimeFieldType::DayOfWeek => DurationFieldType::Days,
            DateTimeFieldType::HourOfDay => DurationFieldType::Hours,
            DateTimeFieldType::MinuteOfDay | DateTimeFieldType::MinuteOfHour => {
                DurationFieldType::Minutes
            }
            DateTimeFieldType::SecondOfDay | DateTimeFieldType::SecondOfMinute => {
                DurationFieldType::Seconds
            }
            DateTimeFieldType::MillisOfDay | DateTimeFieldType::MillisOfSecond => {
                DurationFieldType::Millis
            }
        }
    }

    /// The next larger unit, over which this field cycles; `None` for the
    /// open-ended year fields.
    pub fn range_duration_type(self) -> Option<DurationFieldType> {
        match self {
            DateTimeFieldType::Year | DateTimeFieldType::Weekyear => None,
            DateTimeFieldType::MonthOfYear => Some(DurationFieldType::Years),
            DateTimeFieldType::WeekOfWeekyear => Some(DurationFieldType::Weekyears),
            DateTimeFieldType::DayOfYear => Some(DurationFieldType::Years),
            DateTimeFieldType::DayOfMonth => Some(DurationFieldType::Months),
            DateTimeFieldType::DayOfWeek => Some(DurationFieldType::Weeks),
            DateTimeFieldType::HourOfDay => Some(DurationFieldType::Days),
            DateTimeFieldType::MinuteOfDay => Some(DurationFieldType::Days),
            DateTimeFieldType::MinuteOfHour => Some(DurationFieldType::Hours),
            DateTimeFieldType::SecondOfDay => Some(DurationFieldType::Days),
            DateTimeFieldType::SecondOfMinute => Some(DurationFieldType::Minutes),
            DateTimeFieldType::MillisOfDay => Some(DurationFieldType::Days),
            DateTimeFieldType::MillisOfSecond => Some(DurationFieldType::Seconds),
        }
    }
}

impl std::str::FromStr for DateTimeFieldType {
    type Err = ChronalError;

    fn from_str(s: &str) -> Result<Self> {
        DateTimeFieldType::all()
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| ChronalError::InvalidArgument(format!("unknown field type '{s}'")))
    }
}

impl std::fmt::Display for DateTimeFieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ── DateTimeField ───────────────────────────────────────────────────────────

/// One calendrical unit's accessor/mutator, bound to a chronology.
///
/// Stateless besides the binding; cheap to clone. Obtained from
/// [`Chronology::field`].
#[derive(Debug, Clone)]
pub struct DateTimeField {
    chronology: Chronology,
    field_type: DateTimeFieldType,
}

impl DateTimeField {
    pub(crate) fn new(chronology: Chronology, field_type: DateTimeFieldType) -> DateTimeField {
        DateTimeField {
            chronology,
            field_type,
        }
    }

    pub fn field_type(&self) -> DateTimeFieldType {
        self.field_type
    }

    pub fn chronology(&self) -> &Chronology {
        &self.chronology
    }

    pub fn duration_field(&self) -> DurationField {
        self.chronology
            .duration_field(self.field_type.duration_type())
    }

    pub fn range_duration_field(&self) -> Option<DurationField> {
        self.field_type
            .range_duration_type()
            .map(|t| self.chronology.duration_field(t))
    }

    /// This field's value at `instant`, under the chronology's zone and
    /// calendar rules.
    ///
    /// # Examples
    ///
    /// ```
    /// use chronal::{Chronology, DateTimeFieldType};
    ///
    /// let c = Chronology::iso_utc();
    /// let instant = c.datetime(2005, 7, 5, 12, 0, 0, 0).unwrap();
    /// assert_eq!(c.field(DateTimeFieldType::DayOfWeek).get(instant), 2); // Tuesday
    /// ```
    pub fn get(&self, instant: Instant) -> i32 {
        let local = self.chronology.local_millis(instant);
        let days = floor_div(local, MILLIS_PER_DAY);
        let millis_of_day = floor_mod(local, MILLIS_PER_DAY);
        let kind = self.chronology.kind();
        match self.field_type {
            DateTimeFieldType::Year => kind.ymd_from_days(days).0,
            DateTimeFieldType::Weekyear => kind.weekyear(days),
            DateTimeFieldType::MonthOfYear => kind.ymd_from_days(days).1,
            DateTimeFieldType::WeekOfWeekyear => kind.week_of_weekyear(days),
            DateTimeFieldType::DayOfYear => kind.day_of_year(days),
            DateTimeFieldType::DayOfMonth => kind.ymd_from_days(days).2,
            DateTimeFieldType::DayOfWeek => day_of_week(days),
            DateTimeFieldType::HourOfDay => (millis_of_day / MILLIS_PER_HOUR) as i32,
            DateTimeFieldType::MinuteOfDay => (millis_of_day / MILLIS_PER_MINUTE) as i32,
            DateTimeFieldType::MinuteOfHour => ((millis_of_day / MILLIS_PER_MINUTE) % 60) as i32,
            DateTimeFieldType::SecondOfDay => (millis_of_day / MILLIS_PER_SECOND) as i32,
            DateTimeFieldType::SecondOfMinute => {
                ((millis_of_day / MILLIS_PER_SECOND) % 60) as i32
            }
            DateTimeFieldType::MillisOfDay => millis_of_day as i32,
            DateTimeFieldType::MillisOfSecond => (millis_of_day % 1000) as i32,
        }
    }

    /// Replace this field's value at `instant`.
    ///
    /// Strictly larger fields are preserved; strictly smaller fields are
    /// re-derived consistently. Setting a month or year clamps the day of
    /// month into the target month's valid range instead of overflowing
    /// into the next month. A result landing in a DST gap resolves to the
    /// nearest later valid instant; a result in an overlap keeps the
    /// original instant's offset when it is still valid.
    ///
    /// # Errors
    ///
    /// [`ChronalError::Range`] when `value` is outside the field's legal
    /// bounds given the currently-fixed larger fields (setting day 30 while
    /// the month is February), detected before any result is produced.
    pub fn set(&self, instant: Instant, value: i32) -> Result<Instant> {
        let local = self.chronology.local_millis(instant);
        let days = floor_div(local, MILLIS_PER_DAY);
        let millis_of_day = floor_mod(local, MILLIS_PER_DAY);
        let kind = self.chronology.kind();
        let v = value as i64;

        let new_local = match self.field_type {
            DateTimeFieldType::Year => {
                self.range_check(v, kind.min_year() as i64, kind.max_year() as i64)?;
                let (_, m, d) = kind.ymd_from_days(days);
                let day = d.min(kind.days_in_month(value, m));
                kind.days_from_ymd(value, m, day) * MILLIS_PER_DAY + millis_of_day
            }
            DateTimeFieldType::Weekyear => {
                check_weekyear(kind, v)?;
                kind.weekyear_set_days(days, value) * MILLIS_PER_DAY + millis_of_day
            }
            DateTimeFieldType::MonthOfYear => {
                self.range_check(v, 1, kind.months_in_year() as i64)?;
                let (y, _, d) = kind.ymd_from_days(days);
                let day = d.min(kind.days_in_month(y, value));
                kind.days_from_ymd(y, value, day) * MILLIS_PER_DAY + millis_of_day
            }
            DateTimeFieldType::WeekOfWeekyear => {
                let weekyear = kind.weekyear(days);
                self.range_check(v, 1, kind.weeks_in_weekyear(weekyear) as i64)?;
                let dow = day_of_week(days) as i64;
                let new_days =
                    kind.weekyear_start_days(weekyear) + (v - 1) * 7 + (dow - 1);
                new_days * MILLIS_PER_DAY + millis_of_day
            }
            DateTimeFieldType::DayOfYear => {
                let (y, _, _) = kind.ymd_from_days(days);
                self.range_check(v, 1, kind.days_in_year(y) as i64)?;
                (kind.year_start_days(y) + v - 1) * MILLIS_PER_DAY + millis_of_day
            }
            DateTimeFieldType::DayOfMonth => {
                let (y, m, _) = kind.ymd_from_days(days);
                self.range_check(v, 1, kind.days_in_month(y, m) as i64)?;
                kind.days_from_ymd(y, m, value) * MILLIS_PER_DAY + millis_of_day
            }
            DateTimeFieldType::DayOfWeek => {
                self.range_check(v, 1, 7)?;
                let dow = day_of_week(days) as i64;
                (days + v - dow) * MILLIS_PER_DAY + millis_of_day
            }
            DateTimeFieldType::HourOfDay => {
                self.range_check(v, 0, 23)?;
                days * MILLIS_PER_DAY + millis_of_day % MILLIS_PER_HOUR + v * MILLIS_PER_HOUR
            }
            DateTimeFieldType::MinuteOfDay => {
                self.range_check(v, 0, 1439)?;
                days * MILLIS_PER_DAY + millis_of_day % MILLIS_PER_MINUTE + v * MILLIS_PER_MINUTE
            }
            DateTimeFieldType::MinuteOfHour => {
                self.range_check(v, 0, 59)?;
                let old = (millis_of_day / MILLIS_PER_MINUTE) % 60;
                days * MILLIS_PER_DAY + millis_of_day + (v - old) * MILLIS_PER_MINUTE
            }
            DateTimeFieldType::SecondOfDay => {
                self.range_check(v, 0, 86_399)?;
                days * MILLIS_PER_DAY + millis_of_day % MILLIS_PER_SECOND + v * MILLIS_PER_SECOND
            }
            DateTimeFieldType::SecondOfMinute => {
                self.range_check(v, 0, 59)?;
                let old = (millis_of_day / MILLIS_PER_SECOND) % 60;
                days * MILLIS_PER_DAY + millis_of_day + (v - old) * MILLIS_PER_SECOND
            }
            DateTimeFieldType::MillisOfDay => {
                self.range_check(v, 0, MILLIS_PER_DAY - 1)?;
                days * MILLIS_PER_DAY + v
            }
            DateTimeFieldType::MillisOfSecond => {
                self.range_check(v, 0, 999)?;
                days * MILLIS_PER_DAY + millis_of_day - millis_of_day % 1000 + v
            }
        };
        Ok(self.chronology.instant_from_local_with_hint(new_local, instant))
    }

    /// Calendar-aware addition of `amount` units of this field.
    ///
    /// Precise-unit fields (days, hours, ...) add fixed milliseconds;
    /// month, year and weekyear fields shift the calendar position with
    /// end-of-month clamping, like their duration fields.
    ///
    /// # Errors
    ///
    /// [`ChronalError::Overflow`] or [`ChronalError::Range`] as for
    /// [`DurationField::add`].
    pub fn add(&self, instant: Instant, amount: i64) -> Result<Instant> {
        match self.field_type {
            DateTimeFieldType::Year => add_years(&self.chronology, instant, amount),
            DateTimeFieldType::Weekyear => add_weekyears(&self.chronology, instant, amount),
            DateTimeFieldType::MonthOfYear => add_months(&self.chronology, instant, amount),
            _ => self.duration_field().add(instant, amount),
        }
    }

    /// Project `instant` onto this field's boundary at or before it.
    pub fn round_floor(&self, instant: Instant) -> Instant {
        match self.floor_local(instant) {
            Some(local) => self
                .chronology
                .instant_from_local_with_hint(local, instant),
            None => instant,
        }
    }

    /// Project `instant` onto this field's boundary at or after it.
    pub fn round_ceiling(&self, instant: Instant) -> Instant {
        let local = self.chronology.local_millis(instant);
        let floored = match self.floor_local(instant) {
            Some(f) => f,
            None => return instant,
        };
        if floored == local {
            return instant;
        }
        let days = floor_div(local, MILLIS_PER_DAY);
        let kind = self.chronology.kind();
        let ceil = match self.field_type {
            DateTimeFieldType::Year => {
                let (y, _, _) = kind.ymd_from_days(days);
                kind.year_start_days(y + 1) * MILLIS_PER_DAY
            }
            DateTimeFieldType::Weekyear => {
                kind.weekyear_start_days(kind.weekyear(days) + 1) * MILLIS_PER_DAY
            }
            DateTimeFieldType::MonthOfYear => {
                let (y, m, _) = kind.ymd_from_days(days);
                let (y2, m2) = if m == kind.months_in_year() {
                    (y + 1, 1)
                } else {
                    (y, m + 1)
                };
                kind.days_from_ymd(y2, m2, 1) * MILLIS_PER_DAY
            }
            DateTimeFieldType::WeekOfWeekyear => floored + 7 * MILLIS_PER_DAY,
            DateTimeFieldType::DayOfYear
            | DateTimeFieldType::DayOfMonth
            | DateTimeFieldType::DayOfWeek => floored + MILLIS_PER_DAY,
            DateTimeFieldType::HourOfDay => floored + MILLIS_PER_HOUR,
            DateTimeFieldType::MinuteOfDay | DateTimeFieldType::MinuteOfHour => {
                floored + MILLIS_PER_MINUTE
            }
            DateTimeFieldType::SecondOfDay | DateTimeFieldType::SecondOfMinute => {
                floored + MILLIS_PER_SECOND
            }
            DateTimeFieldType::MillisOfDay | DateTimeFieldType::MillisOfSecond => {
                return instant;
            }
        };
        self.chronology.instant_from_local_with_hint(ceil, instant)
    }

    /// Local-time floor for this field, or `None` when every instant is on
    /// a boundary (the millisecond fields).
    fn floor_local(&self, instant: Instant) -> Option<i64> {
        let local = self.chronology.local_millis(instant);
        let days = floor_div(local, MILLIS_PER_DAY);
        let millis_of_day = floor_mod(local, MILLIS_PER_DAY);
        let kind = self.chronology.kind();
        let floored = match self.field_type {
            DateTimeFieldType::Year => {
                let (y, _, _) = kind.ymd_from_days(days);
                kind.year_start_days(y) * MILLIS_PER_DAY
            }
            DateTimeFieldType::Weekyear => {
                kind.weekyear_start_days(kind.weekyear(days)) * MILLIS_PER_DAY
            }
            DateTimeFieldType::MonthOfYear => {
                let (y, m, _) = kind.ymd_from_days(days);
                kind.days_from_ymd(y, m, 1) * MILLIS_PER_DAY
            }
            DateTimeFieldType::WeekOfWeekyear => {
                (days - (day_of_week(days) - 1) as i64) * MILLIS_PER_DAY
            }
            DateTimeFieldType::DayOfYear
            | DateTimeFieldType::DayOfMonth
            | DateTimeFieldType::DayOfWeek => days * MILLIS_PER_DAY,
            DateTimeFieldType::HourOfDay => {
                days * MILLIS_PER_DAY + (millis_of_day / MILLIS_PER_HOUR) * MILLIS_PER_HOUR
            }
            DateTimeFieldType::MinuteOfDay | DateTimeFieldType::MinuteOfHour => {
                days * MILLIS_PER_DAY + (millis_of_day / MILLIS_PER_MINUTE) * MILLIS_PER_MINUTE
            }
            DateTimeFieldType::SecondOfDay | DateTimeFieldType::SecondOfMinute => {
                days * MILLIS_PER_DAY + (millis_of_day / MILLIS_PER_SECOND) * MILLIS_PER_SECOND
            }
            DateTimeFieldType::MillisOfDay | DateTimeFieldType::MillisOfSecond => return None,
        };
        Some(floored)
    }

    // ── Range queries ───────────────────────────────────────────────────

    pub fn minimum_value(&self) -> i32 {
        let kind = self.chronology.kind();
        match self.field_type {
            DateTimeFieldType::Year => kind.min_year(),
            DateTimeFieldType::Weekyear => kind.min_year() + 1,
            DateTimeFieldType::MonthOfYear
            | DateTimeFieldType::WeekOfWeekyear
            | DateTimeFieldType::DayOfYear
            | DateTimeFieldType::DayOfMonth
            | DateTimeFieldType::DayOfWeek => 1,
            _ => 0,
        }
    }

    /// Largest value the field can ever take under this chronology,
    /// regardless of context.
    pub fn maximum_value(&self) -> i32 {
        let kind = self.chronology.kind();
        match self.field_type {
            DateTimeFieldType::Year => kind.max_year(),
            DateTimeFieldType::Weekyear => kind.max_year() - 1,
            DateTimeFieldType::MonthOfYear => kind.months_in_year(),
            DateTimeFieldType::WeekOfWeekyear => 53,
            DateTimeFieldType::DayOfYear => 366,
            DateTimeFieldType::DayOfMonth => kind.max_day_of_month(),
            DateTimeFieldType::DayOfWeek => 7,
            DateTimeFieldType::HourOfDay => 23,
            DateTimeFieldType::MinuteOfDay => 1439,
            DateTimeFieldType::MinuteOfHour => 59,
            DateTimeFieldType::SecondOfDay => 86_399,
            DateTimeFieldType::SecondOfMinute => 59,
            DateTimeFieldType::MillisOfDay => (MILLIS_PER_DAY - 1) as i32,
            DateTimeFieldType::MillisOfSecond => 999,
        }
    }

    /// Largest value at the calendar position of `instant` (days in that
    /// month, weeks in that weekyear, ...).
    pub fn maximum_value_at(&self, instant: Instant) -> i32 {
        let local = self.chronology.local_millis(instant);
        let days = floor_div(local, MILLIS_PER_DAY);
        let kind = self.chronology.kind();
        match self.field_type {
            DateTimeFieldType::DayOfMonth => {
                let (y, m, _) = kind.ymd_from_days(days);
                kind.days_in_month(y, m)
            }
            DateTimeFieldType::DayOfYear => {
                let (y, _, _) = kind.ymd_from_days(days);
                kind.days_in_year(y)
            }
            DateTimeFieldType::WeekOfWeekyear => kind.weeks_in_weekyear(kind.weekyear(days)),
            _ => self.maximum_value(),
        }
    }

    /// Largest value given the (larger) fields fixed in `known`, for
    /// validating partials that have no anchoring instant.
    pub(crate) fn maximum_value_in_context(
        &self,
        known: &[(DateTimeFieldType, i32)],
    ) -> i32 {
        let kind = self.chronology.kind();
        let lookup = |t: DateTimeFieldType| known.iter().find(|(k, _)| *k == t).map(|(_, v)| *v);
        match self.field_type {
            DateTimeFieldType::DayOfMonth => {
                match (lookup(DateTimeFieldType::Year), lookup(DateTimeFieldType::MonthOfYear)) {
                    (Some(y), Some(m)) => kind.days_in_month(y, m),
                    (None, Some(m)) => kind.max_days_in_month(m),
                    _ => self.maximum_value(),
                }
            }
            DateTimeFieldType::DayOfYear => match lookup(DateTimeFieldType::Year) {
                Some(y) => kind.days_in_year(y),
                None => self.maximum_value(),
            },
            DateTimeFieldType::WeekOfWeekyear => match lookup(DateTimeFieldType::Weekyear) {
                Some(wy) => kind.weeks_in_weekyear(wy),
                None => self.maximum_value(),
            },
            _ => self.maximum_value(),
        }
    }

    fn range_check(&self, value: i64, lower: i64, upper: i64) -> Result<()> {
        if value < lower || value > upper {
            return Err(ChronalError::Range {
                field: self.field_type.name(),
                value,
                lower,
                upper,
            });
        }
        Ok(())
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::CalendarKind;
    use crate::zone::{TimeZone, Transition, ZoneRecord};

    fn iso_utc() -> Chronology {
        Chronology::iso_utc()
    }

    /// Northern-hemisphere style DST zone: +1h standard, +2h between the
    /// transitions at +100h and +200h from the epoch.
    fn dst_chronology() -> Chronology {
        let h = MILLIS_PER_HOUR;
        let zone = TimeZone::from_transitions(
            "Test/Dst",
            ZoneRecord {
                standard_offset: h as i32,
                total_offset: h as i32,
                name_key: "TST".into(),
            },
            vec![
                Transition {
                    at: Instant::from_millis(100 * h),
                    standard_offset: h as i32,
                    total_offset: 2 * h as i32,
                    name_key: "TDT".into(),
                },
                Transition {
                    at: Instant::from_millis(200 * h),
                    standard_offset: h as i32,
                    total_offset: h as i32,
                    name_key: "TST".into(),
                },
            ],
        )
        .unwrap();
        Chronology::get(CalendarKind::Iso, zone)
    }

    // ── get ─────────────────────────────────────────────────────────────

    #[test]
    fn test_get_decomposes_fixture() {
        let c = iso_utc();
        let i = c.datetime(2010, 6, 30, 2, 30, 50, 678).unwrap();
        let get = |t| c.field(t).get(i);
        assert_eq!(get(DateTimeFieldType::Year), 2010);
        assert_eq!(get(DateTimeFieldType::MonthOfYear), 6);
        assert_eq!(get(DateTimeFieldType::DayOfMonth), 30);
        assert_eq!(get(DateTimeFieldType::DayOfWeek), 3); // Wednesday
        assert_eq!(get(DateTimeFieldType::DayOfYear), 181);
        assert_eq!(get(DateTimeFieldType::HourOfDay), 2);
        assert_eq!(get(DateTimeFieldType::MinuteOfHour), 30);
        assert_eq!(get(DateTimeFieldType::MinuteOfDay), 150);
        assert_eq!(get(DateTimeFieldType::SecondOfMinute), 50);
        assert_eq!(get(DateTimeFieldType::SecondOfDay), 9050);
        assert_eq!(get(DateTimeFieldType::MillisOfSecond), 678);
        assert_eq!(get(DateTimeFieldType::MillisOfDay), 9_050_678);
    }

    #[test]
    fn test_get_respects_zone_offset() {
        // 2010-06-30T02:30:50.678+02:00 is 00:30:50.678Z.
        let zone = TimeZone::fixed("+02:00", 2 * MILLIS_PER_HOUR as i32);
        let c = Chronology::get(CalendarKind::Iso, zone);
        let i = Instant::from_millis(1_277_857_850_678);
        assert_eq!(c.field(DateTimeFieldType::HourOfDay).get(i), 2);
        assert_eq!(c.field(DateTimeFieldType::DayOfMonth).get(i), 30);
        assert_eq!(iso_utc().field(DateTimeFieldType::HourOfDay).get(i), 0);
    }

    // ── set ─────────────────────────────────────────────────────────────

    #[test]
    fn test_set_preserves_larger_and_clamps_smaller() {
        let c = iso_utc();
        let jan31 = c.datetime(2005, 1, 31, 10, 20, 30, 400).unwrap();
        // Setting February clamps the day but keeps the year and time.
        let feb = c.field(DateTimeFieldType::MonthOfYear).set(jan31, 2).unwrap();
        assert_eq!(feb, c.datetime(2005, 2, 28, 10, 20, 30, 400).unwrap());
        // Setting a leap year from Feb 29 keeps the day.
        let feb29 = c.datetime(2008, 2, 29, 0, 0, 0, 0).unwrap();
        let clamped = c.field(DateTimeFieldType::Year).set(feb29, 2009).unwrap();
        assert_eq!(clamped, c.datetime(2009, 2, 28, 0, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_set_out_of_context_day_is_range_error() {
        let c = iso_utc();
        let feb = c.datetime(2005, 2, 10, 0, 0, 0, 0).unwrap();
        let err = c.field(DateTimeFieldType::DayOfMonth).set(feb, 30).unwrap_err();
        assert!(
            matches!(err, ChronalError::Range { field: "dayOfMonth", value: 30, .. }),
            "got: {err}"
        );
        assert!(c.field(DateTimeFieldType::MonthOfYear).set(feb, 13).is_err());
        assert!(c.field(DateTimeFieldType::HourOfDay).set(feb, 24).is_err());
    }

    #[test]
    fn test_set_day_of_week_moves_within_week() {
        let c = iso_utc();
        // 2005-07-05 was a Tuesday; Monday of that week is the 4th.
        let tue = c.datetime(2005, 7, 5, 9, 0, 0, 0).unwrap();
        let mon = c.field(DateTimeFieldType::DayOfWeek).set(tue, 1).unwrap();
        assert_eq!(mon, c.datetime(2005, 7, 4, 9, 0, 0, 0).unwrap());
        let sun = c.field(DateTimeFieldType::DayOfWeek).set(tue, 7).unwrap();
        assert_eq!(sun, c.datetime(2005, 7, 10, 9, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_set_time_fields() {
        let c = iso_utc();
        let i = c.datetime(2010, 6, 30, 2, 30, 50, 678).unwrap();
        let at = |h, m, s, ms| c.datetime(2010, 6, 30, h, m, s, ms).unwrap();
        assert_eq!(c.field(DateTimeFieldType::HourOfDay).set(i, 23).unwrap(), at(23, 30, 50, 678));
        assert_eq!(c.field(DateTimeFieldType::MinuteOfHour).set(i, 0).unwrap(), at(2, 0, 50, 678));
        assert_eq!(c.field(DateTimeFieldType::SecondOfMinute).set(i, 7).unwrap(), at(2, 30, 7, 678));
        assert_eq!(c.field(DateTimeFieldType::MillisOfSecond).set(i, 0).unwrap(), at(2, 30, 50, 0));
        assert_eq!(c.field(DateTimeFieldType::MillisOfDay).set(i, 0).unwrap(), at(0, 0, 0, 0));
        assert_eq!(c.field(DateTimeFieldType::MinuteOfDay).set(i, 61).unwrap(), at(1, 1, 50, 678));
        assert_eq!(c.field(DateTimeFieldType::SecondOfDay).set(i, 3601).unwrap(), at(1, 0, 1, 678));
    }

    #[test]
    fn test_set_weekyear_fields() {
        let c = iso_utc();
        // 2005-01-01 is week 53 of weekyear 2004, a Saturday.
        let i = c.datetime(2005, 1, 1, 12, 0, 0, 0).unwrap();
        let f = c.field(DateTimeFieldType::WeekOfWeekyear);
        let week1 = f.set(i, 1).unwrap();
        // Week 1 of 2004 started Mon 2003-12-29; its Saturday is Jan 3.
        assert_eq!(week1, c.datetime(2004, 1, 3, 12, 0, 0, 0).unwrap());
        // Weekyear 2005 has only 52 weeks: setting it clamps week 53 to 52.
        let wy = c.field(DateTimeFieldType::Weekyear).set(i, 2005).unwrap();
        assert_eq!(c.field(DateTimeFieldType::Weekyear).get(wy), 2005);
        assert_eq!(c.field(DateTimeFieldType::WeekOfWeekyear).get(wy), 52);
        assert_eq!(c.field(DateTimeFieldType::DayOfWeek).get(wy), 6);
    }

    #[test]
    fn test_set_roundtrip_is_identity() {
        let c = iso_utc();
        let i = c.datetime(2010, 6, 30, 2, 30, 50, 678).unwrap();
        for t in DateTimeFieldType::all() {
            let f = c.field(t);
            assert_eq!(f.set(i, f.get(i)).unwrap(), i, "field {t}");
        }
    }

    // ── DST interaction ─────────────────────────────────────────────────

    #[test]
    fn test_set_into_dst_gap_lands_after_gap() {
        let c = dst_chronology();
        // Local times [101h, 102h) do not exist. An instant at local 100h30
        // (= 99h30 UTC) set to hour-of-day of the gap shifts forward.
        let before = Instant::from_millis(99 * MILLIS_PER_HOUR + 30 * MILLIS_PER_MINUTE);
        let local_hour = c.field(DateTimeFieldType::HourOfDay).get(before);
        let gap_hour = (local_hour + 1) % 24;
        let shifted = c.field(DateTimeFieldType::HourOfDay).set(before, gap_hour).unwrap();
        // The requested local hour does not exist; the result is one hour
        // later in local terms, right after the transition.
        assert_eq!(
            c.field(DateTimeFieldType::HourOfDay).get(shifted),
            (gap_hour + 1) % 24
        );
        assert_eq!(shifted.millis(), 100 * MILLIS_PER_HOUR + 30 * MILLIS_PER_MINUTE);
    }

    #[test]
    fn test_set_roundtrip_inside_overlap() {
        let c = dst_chronology();
        // Both sides of the fall-back overlap must round-trip through set.
        let early = Instant::from_millis(199 * MILLIS_PER_HOUR + 30 * MILLIS_PER_MINUTE);
        let late = Instant::from_millis(200 * MILLIS_PER_HOUR + 30 * MILLIS_PER_MINUTE);
        for i in [early, late] {
            for t in DateTimeFieldType::all() {
                let f = c.field(t);
                assert_eq!(f.set(i, f.get(i)).unwrap(), i, "field {t} at {i}");
            }
        }
    }

    // ── add ─────────────────────────────────────────────────────────────

    #[test]
    fn test_add_precise_fields_use_fixed_millis() {
        let c = iso_utc();
        let i = c.datetime(2005, 7, 5, 23, 0, 0, 0).unwrap();
        let next = c.field(DateTimeFieldType::HourOfDay).add(i, 2).unwrap();
        assert_eq!(next, c.datetime(2005, 7, 6, 1, 0, 0, 0).unwrap());
        let next_week = c.field(DateTimeFieldType::WeekOfWeekyear).add(i, 1).unwrap();
        assert_eq!(next_week, c.datetime(2005, 7, 12, 23, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_add_month_field_clamps_like_duration() {
        let c = iso_utc();
        let jan31 = c.datetime(2005, 1, 31, 0, 0, 0, 0).unwrap();
        let feb28 = c.field(DateTimeFieldType::MonthOfYear).add(jan31, 1).unwrap();
        assert_eq!(feb28, c.datetime(2005, 2, 28, 0, 0, 0, 0).unwrap());
    }

    // ── rounding ────────────────────────────────────────────────────────

    #[test]
    fn test_round_floor_and_ceiling() {
        let c = iso_utc();
        let i = c.datetime(2010, 6, 30, 2, 30, 50, 678).unwrap();
        let floor = |t: DateTimeFieldType| c.field(t).round_floor(i);
        let ceil = |t: DateTimeFieldType| c.field(t).round_ceiling(i);
        assert_eq!(floor(DateTimeFieldType::Year), c.datetime(2010, 1, 1, 0, 0, 0, 0).unwrap());
        assert_eq!(ceil(DateTimeFieldType::Year), c.datetime(2011, 1, 1, 0, 0, 0, 0).unwrap());
        assert_eq!(
            floor(DateTimeFieldType::MonthOfYear),
            c.datetime(2010, 6, 1, 0, 0, 0, 0).unwrap()
        );
        assert_eq!(
            ceil(DateTimeFieldType::MonthOfYear),
            c.datetime(2010, 7, 1, 0, 0, 0, 0).unwrap()
        );
        assert_eq!(
            floor(DateTimeFieldType::DayOfMonth),
            c.datetime(2010, 6, 30, 0, 0, 0, 0).unwrap()
        );
        assert_eq!(
            floor(DateTimeFieldType::HourOfDay),
            c.datetime(2010, 6, 30, 2, 0, 0, 0).unwrap()
        );
        assert_eq!(
            ceil(DateTimeFieldType::HourOfDay),
            c.datetime(2010, 6, 30, 3, 0, 0, 0).unwrap()
        );
        // 2010-06-30 is a Wednesday; the week floor is Monday the 28th.
        assert_eq!(
            floor(DateTimeFieldType::WeekOfWeekyear),
            c.datetime(2010, 6, 28, 0, 0, 0, 0).unwrap()
        );
        // Millis fields treat every instant as a boundary.
        assert_eq!(floor(DateTimeFieldType::MillisOfSecond), i);
        assert_eq!(ceil(DateTimeFieldType::MillisOfDay), i);
    }

    #[test]
    fn test_round_is_idempotent_on_boundary() {
        let c = iso_utc();
        let boundary = c.datetime(2010, 6, 1, 0, 0, 0, 0).unwrap();
        let f = c.field(DateTimeFieldType::MonthOfYear);
        assert_eq!(f.round_floor(boundary), boundary);
        assert_eq!(f.round_ceiling(boundary), boundary);
    }

    // ── range queries ───────────────────────────────────────────────────

    #[test]
    fn test_maximum_value_at_context() {
        let c = iso_utc();
        let feb_leap = c.datetime(2008, 2, 10, 0, 0, 0, 0).unwrap();
        let feb_common = c.datetime(2009, 2, 10, 0, 0, 0, 0).unwrap();
        let day = c.field(DateTimeFieldType::DayOfMonth);
        assert_eq!(day.maximum_value(), 31);
        assert_eq!(day.maximum_value_at(feb_leap), 29);
        assert_eq!(day.maximum_value_at(feb_common), 28);
        let doy = c.field(DateTimeFieldType::DayOfYear);
        assert_eq!(doy.maximum_value_at(feb_leap), 366);
        assert_eq!(doy.maximum_value_at(feb_common), 365);
    }

    #[test]
    fn test_coptic_month_range() {
        let c = Chronology::get(CalendarKind::Coptic, TimeZone::utc());
        let month = c.field(DateTimeFieldType::MonthOfYear);
        assert_eq!(month.maximum_value(), 13);
        let day = c.field(DateTimeFieldType::DayOfMonth);
        assert_eq!(day.maximum_value(), 30);
    }

    #[test]
    fn test_field_type_names_roundtrip() {
        for t in DateTimeFieldType::all() {
            assert_eq!(t.name().parse::<DateTimeFieldType>().unwrap(), t);
        }
        assert!("centuryOfEra".parse::<DateTimeFieldType>().is_err());
        assert_eq!(
            DateTimeFieldType::MonthOfYear.duration_type(),
            DurationFieldType::Months
        );
        assert_eq!(
            DateTimeFieldType::MonthOfYear.range_duration_type(),
            Some(DurationFieldType::Years)
        );
        assert_eq!(DateTimeFieldType::Year.range_duration_type(), None);
    }
}
