//! The absolute millisecond timeline.
//!
//! An [`Instant`] is a signed 64-bit count of milliseconds since
//! 1970-01-01T00:00:00Z. It carries no calendar semantics of its own: all
//! decomposition into fields goes through a
//! [`Chronology`](crate::chronology::Chronology).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::calendar::{floor_div, floor_mod, CalendarKind};
use crate::error::{ChronalError, Result};

pub const MILLIS_PER_SECOND: i64 = 1000;
pub const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;
pub const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;
pub const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;
pub const MILLIS_PER_WEEK: i64 = 7 * MILLIS_PER_DAY;

/// A point on the UTC millisecond timeline.
///
/// Totally ordered, immutable, `Copy`. The `Display` form is the ISO-8601
/// UTC date-time with millisecond precision (`2010-06-30T02:30:50.678Z`).
///
/// # Examples
///
/// ```
/// use chronal::Instant;
///
/// let i = Instant::from_millis(1_277_865_050_678);
/// assert_eq!(i.to_string(), "2010-06-30T02:30:50.678Z");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Instant(i64);

impl Instant {
    /// 1970-01-01T00:00:00Z.
    pub const EPOCH: Instant = Instant(0);
    pub const MIN: Instant = Instant(i64::MIN);
    pub const MAX: Instant = Instant(i64::MAX);

    pub const fn from_millis(millis: i64) -> Instant {
        Instant(millis)
    }

    pub const fn millis(self) -> i64 {
        self.0
    }

    /// Millisecond addition with overflow detection.
    ///
    /// # Errors
    ///
    /// Returns [`ChronalError::Overflow`] when the result would leave the
    /// signed 64-bit timeline.
    pub fn checked_add_millis(self, millis: i64) -> Result<Instant> {
        self.0
            .checked_add(millis)
            .map(Instant)
            .ok_or_else(|| ChronalError::Overflow(format!("{} + {millis}ms", self.0)))
    }

    /// Millisecond subtraction with overflow detection.
    ///
    /// # Errors
    ///
    /// Returns [`ChronalError::Overflow`] when the result would leave the
    /// signed 64-bit timeline.
    pub fn checked_sub_millis(self, millis: i64) -> Result<Instant> {
        self.0
            .checked_sub(millis)
            .map(Instant)
            .ok_or_else(|| ChronalError::Overflow(format!("{} - {millis}ms", self.0)))
    }

    /// Signed millisecond distance `self - other`, overflow-checked.
    ///
    /// # Errors
    ///
    /// Returns [`ChronalError::Overflow`] when the distance exceeds `i64`.
    pub fn checked_since(self, other: Instant) -> Result<i64> {
        self.0
            .checked_sub(other.0)
            .ok_or_else(|| ChronalError::Overflow(format!("{} - {}", self.0, other.0)))
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let days = floor_div(self.0, MILLIS_PER_DAY);
        let millis_of_day = floor_mod(self.0, MILLIS_PER_DAY);
        let (year, month, day) = CalendarKind::Iso.ymd_from_days(days);
        let hour = millis_of_day / MILLIS_PER_HOUR;
        let minute = (millis_of_day / MILLIS_PER_MINUTE) % 60;
        let second = (millis_of_day / MILLIS_PER_SECOND) % 60;
        let millis = millis_of_day % 1000;
        if year < 0 {
            write!(f, "-{:04}", -(year as i64))?;
        } else {
            write!(f, "{year:04}")?;
        }
        write!(
            f,
            "-{month:02}-{day:02}T{hour:02}:{minute:02}:{second:02}.{millis:03}Z"
        )
    }
}

impl fmt::Debug for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Instant({self})")
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_is_by_millis() {
        assert!(Instant::from_millis(-1) < Instant::EPOCH);
        assert!(Instant::from_millis(1) > Instant::EPOCH);
        assert_eq!(Instant::from_millis(42).millis(), 42);
    }

    #[test]
    fn test_display_iso_form() {
        assert_eq!(Instant::EPOCH.to_string(), "1970-01-01T00:00:00.000Z");
        // 2010-06-30T02:30:50.678Z, a round-trip fixture.
        let i = Instant::from_millis(1_277_865_050_678);
        assert_eq!(i.to_string(), "2010-06-30T02:30:50.678Z");
        // Pre-epoch values floor into the previous day.
        assert_eq!(
            Instant::from_millis(-1).to_string(),
            "1969-12-31T23:59:59.999Z"
        );
    }

    #[test]
    fn test_checked_arithmetic_detects_overflow() {
        assert_eq!(
            Instant::from_millis(1000).checked_add_millis(-100).unwrap(),
            Instant::from_millis(900)
        );
        assert!(Instant::MAX.checked_add_millis(1).is_err());
        assert!(Instant::MIN.checked_sub_millis(1).is_err());
        assert!(Instant::from_millis(-2)
            .checked_since(Instant::MAX)
            .is_err());
    }

    #[test]
    fn test_serde_transparent_millis() {
        let i = Instant::from_millis(1_277_865_050_678);
        let json = serde_json::to_string(&i).unwrap();
        assert_eq!(json, "1277865050678");
        let back: Instant = serde_json::from_str(&json).unwrap();
        assert_eq!(back, i);
    }
}
