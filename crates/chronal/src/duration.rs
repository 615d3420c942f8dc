//! Duration units and their arithmetic.
//!
//! A [`DurationFieldType`] names a unit of elapsed time. Precise units have
//! a fixed millisecond length (days and weeks in the standard 24-hour
//! sense); imprecise units — months, weekyears, years — depend on where on
//! the calendar the arithmetic is anchored, so a [`DurationField`] for them
//! is bound to a chronology and walks actual calendar structure instead of
//! dividing by an average length.
//!
//! All arithmetic detects signed 64-bit overflow at the operation whose
//! result would wrap.

use serde::{Deserialize, Serialize};

use crate::calendar::{floor_div, floor_mod, CalendarKind};
use crate::chronology::Chronology;
use crate::error::{ChronalError, Result};
use crate::instant::{
    Instant, MILLIS_PER_DAY, MILLIS_PER_HOUR, MILLIS_PER_MINUTE, MILLIS_PER_SECOND,
    MILLIS_PER_WEEK,
};

/// Average Gregorian year in milliseconds, used only to seed the
/// estimate-then-correct walk for imprecise differences.
const AVERAGE_MILLIS_PER_YEAR: i64 = 31_556_952_000;
const AVERAGE_MILLIS_PER_MONTH: i64 = AVERAGE_MILLIS_PER_YEAR / 12;

// ── DurationFieldType ───────────────────────────────────────────────────────

/// A unit of elapsed time, ordered smallest to largest.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum DurationFieldType {
    Millis,
    Seconds,
    Minutes,
    Hours,
    Days,
    Weeks,
    Months,
    Weekyears,
    Years,
}

impl DurationFieldType {
    pub fn name(self) -> &'static str {
        match self {
            DurationFieldType::Millis => "millis",
            DurationFieldType::Seconds => "seconds",
            DurationFieldType::Minutes => "minutes",
            DurationFieldType::Hours => "hours",
            DurationFieldType::Days => "days",
            DurationFieldType::Weeks => "weeks",
            DurationFieldType::Months => "months",
            DurationFieldType::Weekyears => "weekyears",
            DurationFieldType::Years => "years",
        }
    }

    /// Fixed unit length in milliseconds; `None` for calendar-variable
    /// units.
    pub fn unit_millis(self) -> Option<i64> {
        match self {
            DurationFieldType::Millis => Some(1),
            DurationFieldType::Seconds => Some(MILLIS_PER_SECOND),
            DurationFieldType::Minutes => Some(MILLIS_PER_MINUTE),
            DurationFieldType::Hours => Some(MILLIS_PER_HOUR),
            DurationFieldType::Days => Some(MILLIS_PER_DAY),
            DurationFieldType::Weeks => Some(MILLIS_PER_WEEK),
            DurationFieldType::Months
            | DurationFieldType::Weekyears
            | DurationFieldType::Years => None,
        }
    }

    pub fn is_precise(self) -> bool {
        self.unit_millis().is_some()
    }

    /// Unit length for size comparison and difference estimation; exact for
    /// precise units, the Gregorian average otherwise.
    pub(crate) fn average_millis(self) -> i64 {
        match self {
            DurationFieldType::Months => AVERAGE_MILLIS_PER_MONTH,
            DurationFieldType::Weekyears | DurationFieldType::Years => AVERAGE_MILLIS_PER_YEAR,
            precise => precise.unit_millis().unwrap_or(1),
        }
    }
}

impl std::fmt::Display for DurationFieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ── DurationField ───────────────────────────────────────────────────────────

/// Arithmetic in one duration unit, bound to a chronology.
///
/// Obtained from [`Chronology::duration_field`]. The binding only matters
/// for imprecise units, but every field carries it so the object is
/// self-contained.
#[derive(Debug, Clone)]
pub struct DurationField {
    chronology: Chronology,
    field_type: DurationFieldType,
}

impl DurationField {
    pub(crate) fn new(chronology: Chronology, field_type: DurationFieldType) -> DurationField {
        DurationField {
            chronology,
            field_type,
        }
    }

    pub fn field_type(&self) -> DurationFieldType {
        self.field_type
    }

    pub fn chronology(&self) -> &Chronology {
        &self.chronology
    }

    pub fn is_precise(&self) -> bool {
        self.field_type.is_precise()
    }

    /// Fixed unit length; `None` for imprecise units.
    pub fn unit_millis(&self) -> Option<i64> {
        self.field_type.unit_millis()
    }

    /// Add `amount` of this unit to `instant`.
    ///
    /// Precise units add a fixed millisecond count. Imprecise units shift
    /// the calendar position and clamp the day of month when the target
    /// month is shorter (adding one month to January 31 gives the last day
    /// of February).
    ///
    /// # Errors
    ///
    /// [`ChronalError::Overflow`] when the result would leave the 64-bit
    /// timeline, [`ChronalError::Range`] when a calendar shift would leave
    /// the supported year range.
    pub fn add(&self, instant: Instant, amount: i64) -> Result<Instant> {
        match self.field_type {
            DurationFieldType::Months => add_months(&self.chronology, instant, amount),
            DurationFieldType::Weekyears => add_weekyears(&self.chronology, instant, amount),
            DurationFieldType::Years => add_years(&self.chronology, instant, amount),
            precise => {
                let unit = precise.unit_millis().unwrap_or(1);
                let delta = amount.checked_mul(unit).ok_or_else(|| {
                    ChronalError::Overflow(format!("{amount} {} in millis", precise.name()))
                })?;
                instant.checked_add_millis(delta)
            }
        }
    }

    /// Subtract `amount` of this unit from `instant`.
    ///
    /// # Errors
    ///
    /// As [`add`](DurationField::add); additionally, an `amount` of
    /// `i64::MIN` is an [`ChronalError::Overflow`] because the implied
    /// negation has no 64-bit representation.
    ///
    /// # Examples
    ///
    /// ```
    /// use chronal::{Chronology, DurationFieldType, Instant};
    ///
    /// let millis = Chronology::iso_utc().duration_field(DurationFieldType::Millis);
    /// let result = millis.subtract(Instant::from_millis(1000), 100).unwrap();
    /// assert_eq!(result.millis(), 900);
    /// assert!(millis.subtract(Instant::from_millis(-1000), i64::MIN).is_err());
    /// ```
    pub fn subtract(&self, instant: Instant, amount: i64) -> Result<Instant> {
        let negated = amount
            .checked_neg()
            .ok_or_else(|| ChronalError::Overflow(format!("negating amount {amount}")))?;
        self.add(instant, negated)
    }

    /// Whole units of this field between two instants, `minuend -
    /// subtrahend`, truncated toward zero.
    ///
    /// Precise units divide the millisecond distance. Imprecise units count
    /// how many whole calendar steps fit: the average-length estimate is
    /// corrected against [`add`](DurationField::add) until it lies exactly
    /// on the boundary.
    ///
    /// # Errors
    ///
    /// [`ChronalError::Overflow`] when the millisecond distance itself
    /// overflows, or any error of the underlying calendar walk.
    pub fn difference(&self, minuend: Instant, subtrahend: Instant) -> Result<i64> {
        if let Some(unit) = self.field_type.unit_millis() {
            return Ok(minuend.checked_since(subtrahend)? / unit);
        }
        if minuend < subtrahend {
            return Ok(-self.difference(subtrahend, minuend)?);
        }
        let mut diff = minuend.checked_since(subtrahend)? / self.field_type.average_millis();
        while self.add(subtrahend, diff + 1)? <= minuend {
            diff += 1;
        }
        while self.add(subtrahend, diff)? > minuend {
            diff -= 1;
        }
        Ok(diff)
    }
}

// ── Imprecise calendar shifts ───────────────────────────────────────────────
//
// Shared by DurationField and the month/year/weekyear DateTimeFields. Each
// works in zone-local time and converts back with the original instant as
// hint, so a shift of zero is the identity even inside a DST overlap.

pub(crate) fn add_months(chronology: &Chronology, instant: Instant, months: i64) -> Result<Instant> {
    if months == 0 {
        return Ok(instant);
    }
    let kind = chronology.kind();
    let local = chronology.local_millis(instant);
    let days = floor_div(local, MILLIS_PER_DAY);
    let millis_of_day = floor_mod(local, MILLIS_PER_DAY);
    let (y, m, d) = kind.ymd_from_days(days);
    let months_per_year = kind.months_in_year() as i64;
    let index = (y as i64) * months_per_year + (m as i64 - 1);
    let index = index
        .checked_add(months)
        .ok_or_else(|| ChronalError::Overflow(format!("{months} months from {instant}")))?;
    let year = check_year(kind, floor_div(index, months_per_year))?;
    let month = (floor_mod(index, months_per_year) + 1) as i32;
    let day = d.min(kind.days_in_month(year, month));
    compose(chronology, kind.days_from_ymd(year, month, day), millis_of_day, instant)
}

pub(crate) fn add_years(chronology: &Chronology, instant: Instant, years: i64) -> Result<Instant> {
    if years == 0 {
        return Ok(instant);
    }
    let kind = chronology.kind();
    let local = chronology.local_millis(instant);
    let days = floor_div(local, MILLIS_PER_DAY);
    let millis_of_day = floor_mod(local, MILLIS_PER_DAY);
    let (y, m, d) = kind.ymd_from_days(days);
    let year = (y as i64)
        .checked_add(years)
        .ok_or_else(|| ChronalError::Overflow(format!("{years} years from {instant}")))?;
    let year = check_year(kind, year)?;
    let day = d.min(kind.days_in_month(year, m));
    compose(chronology, kind.days_from_ymd(year, m, day), millis_of_day, instant)
}

pub(crate) fn add_weekyears(
    chronology: &Chronology,
    instant: Instant,
    weekyears: i64,
) -> Result<Instant> {
    if weekyears == 0 {
        return Ok(instant);
    }
    let kind = chronology.kind();
    let local = chronology.local_millis(instant);
    let days = floor_div(local, MILLIS_PER_DAY);
    let millis_of_day = floor_mod(local, MILLIS_PER_DAY);
    let weekyear = (kind.weekyear(days) as i64)
        .checked_add(weekyears)
        .ok_or_else(|| ChronalError::Overflow(format!("{weekyears} weekyears from {instant}")))?;
    let weekyear = check_weekyear(kind, weekyear)?;
    compose(
        chronology,
        kind.weekyear_set_days(days, weekyear),
        millis_of_day,
        instant,
    )
}

fn compose(
    chronology: &Chronology,
    days: i64,
    millis_of_day: i64,
    hint: Instant,
) -> Result<Instant> {
    let local = days
        .checked_mul(MILLIS_PER_DAY)
        .and_then(|v| v.checked_add(millis_of_day))
        .ok_or_else(|| ChronalError::Overflow(format!("day {days} in millis")))?;
    Ok(chronology.instant_from_local_with_hint(local, hint))
}

fn check_year(kind: CalendarKind, year: i64) -> Result<i32> {
    let (lower, upper) = (kind.min_year() as i64, kind.max_year() as i64);
    if year < lower || year > upper {
        return Err(ChronalError::Range {
            field: "year",
            value: year,
            lower,
            upper,
        });
    }
    Ok(year as i32)
}

pub(crate) fn check_weekyear(kind: CalendarKind, weekyear: i64) -> Result<i32> {
    // One year of margin keeps the week-grid lookups for the neighbouring
    // years representable.
    let (lower, upper) = (kind.min_year() as i64 + 1, kind.max_year() as i64 - 1);
    if weekyear < lower || weekyear > upper {
        return Err(ChronalError::Range {
            field: "weekyear",
            value: weekyear,
            lower,
            upper,
        });
    }
    Ok(weekyear as i32)
}

// ── Tests ───────────────────────────────────────────────────────────────────
