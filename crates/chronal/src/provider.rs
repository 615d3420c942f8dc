//! Zone data providers.
//!
//! The zone engine only consumes transition tables; this module is where
//! they come from. Three sources:
//!
//! - fixed-offset strings (`"Z"`, `"+05:30"`, `"-09:30:30"`),
//! - explicit record lists via [`TimeZone::from_transitions`],
//! - IANA zones tabulated from `chrono-tz` over a year range: the rule
//!   database is scanned at day granularity and each offset change is
//!   bisected to the exact second, yielding the ordered table the engine
//!   binary searches.

use chrono::{DateTime, TimeZone as _};
use chrono_tz::{OffsetComponents, OffsetName, Tz};

use crate::calendar::{floor_div, CalendarKind};
use crate::error::{ChronalError, Result};
use crate::instant::{Instant, MILLIS_PER_DAY};
use crate::zone::{TimeZone, Transition, ZoneRecord};

/// Tabulation is limited to years chrono-tz data meaningfully covers.
const MIN_TABLE_YEAR: i32 = -9999;
const MAX_TABLE_YEAR: i32 = 9999;

// ── Name resolution ─────────────────────────────────────────────────────────

/// Resolve a zone name: `"UTC"`, a fixed-offset string, or an IANA name
/// tabulated over `[start_year, end_year)`.
///
/// # Errors
///
/// [`ChronalError::UnknownZone`] when the name is neither, or
/// [`ChronalError::InvalidArgument`] for a malformed year range.
pub fn zone(name: &str, start_year: i32, end_year: i32) -> Result<TimeZone> {
    if name == "UTC" || name == "Z" || name == "z" {
        return Ok(TimeZone::utc());
    }
    if name.starts_with('+') || name.starts_with('-') {
        return fixed_offset_zone(name);
    }
    let tz: Tz = name
        .parse()
        .map_err(|_| ChronalError::UnknownZone(name.to_string()))?;
    zone_from_tz(tz, start_year, end_year)
}

/// A fixed zone from an offset string (`"+HH"`, `"+HH:MM"`, `"-HH:MM:SS"`).
/// The zone id is the normalized offset form.
///
/// # Errors
///
/// [`ChronalError::InvalidArgument`] for a malformed offset.
pub fn fixed_offset_zone(s: &str) -> Result<TimeZone> {
    let offset = parse_offset(s)?;
    Ok(TimeZone::fixed(&format_offset(offset), offset))
}

/// Parse an offset string to signed milliseconds.
///
/// # Errors
///
/// [`ChronalError::InvalidArgument`] for anything but `Z`/`UTC` or a signed
/// `HH[:MM[:SS]]` within a day of UTC.
pub fn parse_offset(s: &str) -> Result<i32> {
    if s == "Z" || s == "z" || s == "UTC" {
        return Ok(0);
    }
    let malformed = || ChronalError::InvalidArgument(format!("malformed offset '{s}'"));
    let (sign, rest) = match s.as_bytes().first() {
        Some(b'+') => (1, &s[1..]),
        Some(b'-') => (-1, &s[1..]),
        _ => return Err(malformed()),
    };
    let mut parts = rest.split(':');
    let mut fields = [0i32; 3];
    let limits = [23, 59, 59];
    for (i, limit) in limits.iter().enumerate() {
        match parts.next() {
            Some(part) if !part.is_empty() => {
                let value: i32 = part.parse().map_err(|_| malformed())?;
                if value > *limit {
                    return Err(malformed());
                }
                fields[i] = value;
            }
            Some(_) => return Err(malformed()),
            None if i == 0 => return Err(malformed()),
            None => break,
        }
    }
    if parts.next().is_some() {
        return Err(malformed());
    }
    Ok(sign * (fields[0] * 3600 + fields[1] * 60 + fields[2]) * 1000)
}

fn format_offset(offset_millis: i32) -> String {
    let sign = if offset_millis < 0 { '-' } else { '+' };
    let total_seconds = offset_millis.unsigned_abs() / 1000;
    let (hours, minutes, seconds) =
        (total_seconds / 3600, (total_seconds / 60) % 60, total_seconds % 60);
    if seconds == 0 {
        format!("{sign}{hours:02}:{minutes:02}")
    } else {
        format!("{sign}{hours:02}:{minutes:02}:{seconds:02}")
    }
}

// ── IANA tabulation ─────────────────────────────────────────────────────────

#[derive(Clone, PartialEq, Eq)]
struct OffsetState {
    standard: i32,
    total: i32,
    name: String,
}

/// Tabulate a chrono-tz zone into an engine zone covering
/// `[start_year, end_year)`.
///
/// The scan probes the rule database one day at a time and bisects each
/// change to the exact transition second; transitions outside the year
/// range do not appear, so the table is only authoritative inside it.
///
/// # Errors
///
/// [`ChronalError::InvalidArgument`] for an empty or out-of-bounds range.
pub fn zone_from_tz(tz: Tz, start_year: i32, end_year: i32) -> Result<TimeZone> {
    if start_year >= end_year || start_year < MIN_TABLE_YEAR || end_year > MAX_TABLE_YEAR {
        return Err(ChronalError::InvalidArgument(format!(
            "year range [{start_year}, {end_year}) cannot be tabulated"
        )));
    }
    let start = CalendarKind::Iso.days_from_ymd(start_year, 1, 1) * MILLIS_PER_DAY;
    let end = CalendarKind::Iso.days_from_ymd(end_year, 1, 1) * MILLIS_PER_DAY;

    let base = probe(tz, start)?;
    let mut transitions = Vec::new();
    let mut current = base.clone();
    let mut t = start;
    while t < end {
        let step_end = t + MILLIS_PER_DAY;
        let state = probe(tz, step_end)?;
        if state == current {
            t = step_end;
            continue;
        }
        let at = bisect(tz, t, step_end, &current)?;
        let at_state = probe(tz, at)?;
        transitions.push(Transition {
            at: Instant::from_millis(at),
            standard_offset: at_state.standard,
            total_offset: at_state.total,
            name_key: at_state.name.clone(),
        });
        current = at_state;
        // Resume from the transition so a second change in the same day is
        // still caught.
        t = at;
    }

    TimeZone::from_transitions(
        tz.name(),
        ZoneRecord {
            standard_offset: base.standard,
            total_offset: base.total,
            name_key: base.name,
        },
        transitions,
    )
}

/// Offset state of a chrono-tz zone at a raw millisecond instant.
fn probe(tz: Tz, millis: i64) -> Result<OffsetState> {
    let seconds = floor_div(millis, 1000);
    let utc = DateTime::from_timestamp(seconds, 0).ok_or_else(|| {
        ChronalError::InvalidArgument(format!("instant {millis}ms outside tabulation bounds"))
    })?;
    let offset = tz.offset_from_utc_datetime(&utc.naive_utc());
    let standard = offset.base_utc_offset().num_milliseconds() as i32;
    let saving = offset.dst_offset().num_milliseconds() as i32;
    let name = match offset.abbreviation() {
        Some(abbreviation) => abbreviation.to_string(),
        None => tz.name().to_string(),
    };
    Ok(OffsetState {
        standard,
        total: standard + saving,
        name,
    })
}

/// Smallest second-aligned instant in `(lo, hi]` whose state differs from
/// `before`. `lo` and `hi` stay second-aligned throughout.
fn bisect(tz: Tz, mut lo: i64, mut hi: i64, before: &OffsetState) -> Result<i64> {
    while hi - lo > 1000 {
        let mid = lo + ((hi - lo) / 2 / 1000) * 1000;
        if probe(tz, mid)? == *before {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    Ok(hi)
}

// ── Tests ───────────────────────────────────────────────────────────────────
