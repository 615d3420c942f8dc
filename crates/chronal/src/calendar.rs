//! Calendar systems and their day arithmetic.
//!
//! A [`CalendarKind`] is the calendar half of a chronology: it knows how the
//! year/month/day grid of one calendar system maps onto a continuous count of
//! days since the 1970-01-01 epoch. Everything here is pure integer
//! arithmetic over that day count; zones and milliseconds are layered on by
//! the chronology.
//!
//! Week-based fields use the ISO rule evaluated against each calendar's own
//! year structure: weeks start on Monday and the first week of a year is the
//! one containing at least four of its days.

use serde::{Deserialize, Serialize};

use crate::error::{ChronalError, Result};

/// Proleptic year bounds for the ISO grid. Chosen so that any in-bounds
/// local date-time fits a signed 64-bit millisecond value with room for the
/// largest legal zone offset.
pub(crate) const ISO_MIN_YEAR: i32 = -292_000_000;
pub(crate) const ISO_MAX_YEAR: i32 = 292_000_000;

/// Thai solar years run 543 ahead of the ISO year.
const BUDDHIST_YEAR_OFFSET: i32 = 543;

/// Days from 1970-01-01 back to Coptic 0001-01-01 (Julian 284-08-29).
const COPTIC_EPOCH_DAYS: i64 = -615_558;

// ── Shared integer helpers ──────────────────────────────────────────────────

/// Floored division (rounds toward negative infinity).
pub(crate) fn floor_div(a: i64, b: i64) -> i64 {
    a.div_euclid(b)
}

/// Floored remainder, always in `[0, b)` for positive `b`.
pub(crate) fn floor_mod(a: i64, b: i64) -> i64 {
    a.rem_euclid(b)
}

/// ISO day of week for an epoch day number: 1 = Monday .. 7 = Sunday.
///
/// Day zero (1970-01-01) was a Thursday. The week grid is shared by every
/// calendar system.
pub(crate) fn day_of_week(days: i64) -> i32 {
    (floor_mod(days + 3, 7) + 1) as i32
}

// ── CalendarKind ────────────────────────────────────────────────────────────

/// A supported calendar system.
///
/// The set is closed and dispatched by value: each operation below matches on
/// the kind and runs the shared algorithm with that calendar's constants,
/// rather than hiding the arithmetic behind per-calendar types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarKind {
    /// Proleptic Gregorian calendar with ISO week rules.
    Iso,
    /// Thai solar calendar: the ISO grid with years numbered from 543 BCE.
    Buddhist,
    /// Coptic calendar: twelve 30-day months plus a 5- or 6-day thirteenth,
    /// leap when `year % 4 == 3`.
    Coptic,
}

impl CalendarKind {
    /// Symbolic lowercase name, round-tripped by [`FromStr`](std::str::FromStr).
    pub fn name(self) -> &'static str {
        match self {
            CalendarKind::Iso => "iso",
            CalendarKind::Buddhist => "buddhist",
            CalendarKind::Coptic => "coptic",
        }
    }

    /// Number of months in every year of this calendar.
    pub fn months_in_year(self) -> i32 {
        match self {
            CalendarKind::Iso | CalendarKind::Buddhist => 12,
            CalendarKind::Coptic => 13,
        }
    }

    pub fn is_leap_year(self, year: i32) -> bool {
        match self {
            CalendarKind::Iso => iso_is_leap(year),
            CalendarKind::Buddhist => iso_is_leap(year - BUDDHIST_YEAR_OFFSET),
            CalendarKind::Coptic => floor_mod(year as i64, 4) == 3,
        }
    }

    pub fn days_in_year(self, year: i32) -> i32 {
        if self.is_leap_year(year) {
            366
        } else {
            365
        }
    }

    pub fn days_in_month(self, year: i32, month: i32) -> i32 {
        match self {
            CalendarKind::Iso => iso_days_in_month(year, month),
            CalendarKind::Buddhist => iso_days_in_month(year - BUDDHIST_YEAR_OFFSET, month),
            CalendarKind::Coptic => {
                if month == 13 {
                    if self.is_leap_year(year) {
                        6
                    } else {
                        5
                    }
                } else {
                    30
                }
            }
        }
    }

    /// Largest value `days_in_month` can take for `month` over all years.
    /// Used when a day value must be validated without a year in context.
    pub(crate) fn max_days_in_month(self, month: i32) -> i32 {
        match self {
            CalendarKind::Iso | CalendarKind::Buddhist => {
                if month == 2 {
                    29
                } else {
                    iso_days_in_month(1, month)
                }
            }
            CalendarKind::Coptic => {
                if month == 13 {
                    6
                } else {
                    30
                }
            }
        }
    }

    /// Largest `days_in_month` over all months and years.
    pub(crate) fn max_day_of_month(self) -> i32 {
        match self {
            CalendarKind::Iso | CalendarKind::Buddhist => 31,
            CalendarKind::Coptic => 30,
        }
    }

    /// Epoch day number of a (valid) calendar date.
    pub fn days_from_ymd(self, year: i32, month: i32, day: i32) -> i64 {
        match self {
            CalendarKind::Iso => iso_days_from_ymd(year, month, day),
            CalendarKind::Buddhist => iso_days_from_ymd(year - BUDDHIST_YEAR_OFFSET, month, day),
            CalendarKind::Coptic => coptic_days_from_ymd(year, month, day),
        }
    }

    /// Calendar date of an epoch day number.
    pub fn ymd_from_days(self, days: i64) -> (i32, i32, i32) {
        match self {
            CalendarKind::Iso => iso_ymd_from_days(days),
            CalendarKind::Buddhist => {
                let (y, m, d) = iso_ymd_from_days(days);
                (y + BUDDHIST_YEAR_OFFSET, m, d)
            }
            CalendarKind::Coptic => coptic_ymd_from_days(days),
        }
    }

    pub(crate) fn year_start_days(self, year: i32) -> i64 {
        self.days_from_ymd(year, 1, 1)
    }

    pub(crate) fn day_of_year(self, days: i64) -> i32 {
        let (year, _, _) = self.ymd_from_days(days);
        (days - self.year_start_days(year) + 1) as i32
    }

    pub fn min_year(self) -> i32 {
        match self {
            CalendarKind::Iso | CalendarKind::Coptic => ISO_MIN_YEAR,
            CalendarKind::Buddhist => ISO_MIN_YEAR + BUDDHIST_YEAR_OFFSET,
        }
    }

    pub fn max_year(self) -> i32 {
        match self {
            CalendarKind::Iso | CalendarKind::Coptic => ISO_MAX_YEAR,
            CalendarKind::Buddhist => ISO_MAX_YEAR + BUDDHIST_YEAR_OFFSET,
        }
    }

    // ── Week-based years ────────────────────────────────────────────────

    /// Epoch day of the Monday starting week 1 of `weekyear`.
    pub(crate) fn weekyear_start_days(self, weekyear: i32) -> i64 {
        let jan1 = self.year_start_days(weekyear);
        let dow = day_of_week(jan1);
        if dow <= 4 {
            // Week 1 contains the calendar year start.
            jan1 - (dow - 1) as i64
        } else {
            jan1 + (8 - dow) as i64
        }
    }

    /// Week-based year containing an epoch day.
    pub(crate) fn weekyear(self, days: i64) -> i32 {
        let (year, _, _) = self.ymd_from_days(days);
        if days < self.weekyear_start_days(year) {
            year - 1
        } else if year < self.max_year() && days >= self.weekyear_start_days(year + 1) {
            year + 1
        } else {
            year
        }
    }

    pub(crate) fn week_of_weekyear(self, days: i64) -> i32 {
        let start = self.weekyear_start_days(self.weekyear(days));
        ((days - start) / 7 + 1) as i32
    }

    /// 52 or 53, depending on where the week grid falls.
    pub(crate) fn weeks_in_weekyear(self, weekyear: i32) -> i32 {
        ((self.weekyear_start_days(weekyear + 1) - self.weekyear_start_days(weekyear)) / 7) as i32
    }

    /// Move an epoch day into another weekyear, keeping its week number and
    /// day of week; the week clamps when the target weekyear is shorter.
    pub(crate) fn weekyear_set_days(self, days: i64, weekyear: i32) -> i64 {
        let week = self.week_of_weekyear(days).min(self.weeks_in_weekyear(weekyear));
        let dow = day_of_week(days);
        self.weekyear_start_days(weekyear) + ((week - 1) * 7 + (dow - 1)) as i64
    }
}

impl std::str::FromStr for CalendarKind {
    type Err = ChronalError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "iso" => Ok(CalendarKind::Iso),
            "buddhist" => Ok(CalendarKind::Buddhist),
            "coptic" => Ok(CalendarKind::Coptic),
            other => Err(ChronalError::InvalidArgument(format!(
                "unknown calendar system '{other}'"
            ))),
        }
    }
}

impl std::fmt::Display for CalendarKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ── ISO (proleptic Gregorian) arithmetic ────────────────────────────────────

fn iso_is_leap(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

fn iso_days_in_month(year: i32, month: i32) -> i32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if iso_is_leap(year) {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

/// Civil date to epoch day, era-decomposed over 400-year cycles.
fn iso_days_from_ymd(year: i32, month: i32, day: i32) -> i64 {
    let y = year as i64 - if month <= 2 { 1 } else { 0 };
    let era = floor_div(y, 400);
    let yoe = y - era * 400;
    let mp = floor_mod(month as i64 + 9, 12);
    let doy = (153 * mp + 2) / 5 + day as i64 - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

/// Epoch day to civil date, inverse of [`iso_days_from_ymd`].
fn iso_ymd_from_days(days: i64) -> (i32, i32, i32) {
    let z = days + 719_468;
    let era = floor_div(z, 146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = y + if m <= 2 { 1 } else { 0 };
    (year as i32, m as i32, d as i32)
}

// ── Coptic arithmetic ───────────────────────────────────────────────────────
//
// Fixed-day formulas after Reingold & Dershowitz. Every month is 30 days
// except the epagomenal thirteenth, and the leap day falls in the year
// preceding the Julian leap year, hence `year % 4 == 3`.

fn coptic_days_from_ymd(year: i32, month: i32, day: i32) -> i64 {
    COPTIC_EPOCH_DAYS - 1
        + 365 * (year as i64 - 1)
        + floor_div(year as i64, 4)
        + 30 * (month as i64 - 1)
        + day as i64
}

fn coptic_ymd_from_days(days: i64) -> (i32, i32, i32) {
    let delta = days - COPTIC_EPOCH_DAYS;
    let year = floor_div(4 * delta + 1463, 1461) as i32;
    let month = (floor_div(days - coptic_days_from_ymd(year, 1, 1), 30) + 1) as i32;
    let day = (days - coptic_days_from_ymd(year, month, 1) + 1) as i32;
    (year, month, day)
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── ISO grid ────────────────────────────────────────────────────────

    #[test]
    fn test_iso_epoch_is_day_zero() {
        assert_eq!(CalendarKind::Iso.days_from_ymd(1970, 1, 1), 0);
        assert_eq!(CalendarKind::Iso.ymd_from_days(0), (1970, 1, 1));
    }

    #[test]
    fn test_iso_known_days() {
        // 2000-03-01 is day 11017; 2024-09-11 is day 19977.
        assert_eq!(CalendarKind::Iso.days_from_ymd(2000, 3, 1), 11_017);
        assert_eq!(CalendarKind::Iso.days_from_ymd(2024, 9, 11), 19_977);
        assert_eq!(CalendarKind::Iso.ymd_from_days(19_977), (2024, 9, 11));
    }

    #[test]
    fn test_iso_roundtrip_through_leap_boundaries() {
        for &(y, m, d) in &[
            (2000, 2, 29),
            (1900, 2, 28),
            (1970, 1, 1),
            (1969, 12, 31),
            (-44, 3, 15),
            (292_000_000, 12, 31),
            (-292_000_000, 1, 1),
        ] {
            let days = CalendarKind::Iso.days_from_ymd(y, m, d);
            assert_eq!(CalendarKind::Iso.ymd_from_days(days), (y, m, d), "{y}-{m}-{d}");
        }
    }

    #[test]
    fn test_iso_leap_rules() {
        assert!(CalendarKind::Iso.is_leap_year(2000));
        assert!(!CalendarKind::Iso.is_leap_year(1900));
        assert!(CalendarKind::Iso.is_leap_year(2024));
        assert!(!CalendarKind::Iso.is_leap_year(2023));
        assert_eq!(CalendarKind::Iso.days_in_month(2024, 2), 29);
        assert_eq!(CalendarKind::Iso.days_in_month(2023, 2), 28);
    }

    #[test]
    fn test_day_of_week_epoch_was_thursday() {
        assert_eq!(day_of_week(0), 4);
        // 2005-07-05 was a Tuesday.
        assert_eq!(day_of_week(CalendarKind::Iso.days_from_ymd(2005, 7, 5)), 2);
        // 1969-12-31 was a Wednesday.
        assert_eq!(day_of_week(-1), 3);
    }

    // ── Week-based years ────────────────────────────────────────────────

    #[test]
    fn test_weekyear_edges() {
        let iso = CalendarKind::Iso;
        // 2004-01-01 was a Thursday: week 1 of 2004.
        let jan1_2004 = iso.days_from_ymd(2004, 1, 1);
        assert_eq!(iso.weekyear(jan1_2004), 2004);
        assert_eq!(iso.week_of_weekyear(jan1_2004), 1);
        // 2005-01-01 was a Saturday: still week 53 of weekyear 2004.
        let jan1_2005 = iso.days_from_ymd(2005, 1, 1);
        assert_eq!(iso.weekyear(jan1_2005), 2004);
        assert_eq!(iso.week_of_weekyear(jan1_2005), 53);
        // 2005-01-03, a Monday, opens weekyear 2005.
        let jan3_2005 = iso.days_from_ymd(2005, 1, 3);
        assert_eq!(iso.weekyear(jan3_2005), 2005);
        assert_eq!(iso.week_of_weekyear(jan3_2005), 1);
    }

    #[test]
    fn test_weeks_in_weekyear() {
        assert_eq!(CalendarKind::Iso.weeks_in_weekyear(2004), 53);
        assert_eq!(CalendarKind::Iso.weeks_in_weekyear(2005), 52);
        assert_eq!(CalendarKind::Iso.weeks_in_weekyear(2015), 53);
    }

    // ── Buddhist ────────────────────────────────────────────────────────

    #[test]
    fn test_buddhist_shares_the_iso_grid() {
        let days = CalendarKind::Buddhist.days_from_ymd(2548, 7, 5);
        assert_eq!(days, CalendarKind::Iso.days_from_ymd(2005, 7, 5));
        assert_eq!(CalendarKind::Buddhist.ymd_from_days(days), (2548, 7, 5));
        assert!(CalendarKind::Buddhist.is_leap_year(2543)); // ISO 2000
        assert!(!CalendarKind::Buddhist.is_leap_year(2443)); // ISO 1900
    }

    // ── Coptic ──────────────────────────────────────────────────────────

    #[test]
    fn test_coptic_new_year_1741() {
        // 1 Thout 1741 A.M. fell on 2024-09-11.
        let days = CalendarKind::Coptic.days_from_ymd(1741, 1, 1);
        assert_eq!(days, CalendarKind::Iso.days_from_ymd(2024, 9, 11));
        assert_eq!(CalendarKind::Coptic.ymd_from_days(days), (1741, 1, 1));
    }

    #[test]
    fn test_coptic_month_structure() {
        let coptic = CalendarKind::Coptic;
        assert_eq!(coptic.months_in_year(), 13);
        assert_eq!(coptic.days_in_month(1740, 12), 30);
        assert_eq!(coptic.days_in_month(1740, 13), 5);
        // 1739 % 4 == 3: leap, so the epagomenal month has six days.
        assert!(coptic.is_leap_year(1739));
        assert_eq!(coptic.days_in_month(1739, 13), 6);
        assert_eq!(coptic.days_in_year(1739), 366);
        assert_eq!(coptic.days_in_year(1740), 365);
    }

    #[test]
    fn test_coptic_roundtrip_across_epagomenal_days() {
        let coptic = CalendarKind::Coptic;
        for &(y, m, d) in &[(1739, 13, 6), (1740, 13, 5), (1741, 1, 1), (1, 1, 1), (-100, 7, 30)] {
            let days = coptic.days_from_ymd(y, m, d);
            assert_eq!(coptic.ymd_from_days(days), (y, m, d), "{y}-{m}-{d}");
        }
    }

    #[test]
    fn test_coptic_successive_days_are_contiguous() {
        let coptic = CalendarKind::Coptic;
        // Across the epagomenal month into the new year.
        let last = coptic.days_from_ymd(1740, 13, 5);
        assert_eq!(coptic.ymd_from_days(last + 1), (1741, 1, 1));
    }

    // ── Parsing ─────────────────────────────────────────────────────────

    #[test]
    fn test_calendar_name_roundtrip() {
        for kind in [CalendarKind::Iso, CalendarKind::Buddhist, CalendarKind::Coptic] {
            assert_eq!(kind.name().parse::<CalendarKind>().unwrap(), kind);
        }
        assert!("julian".parse::<CalendarKind>().is_err());
    }
}
