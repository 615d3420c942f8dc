//! Chronologies: a calendar system bound to a time zone.
//!
//! A [`Chronology`] is the factory for every [`DateTimeField`] and
//! [`DurationField`], and owns the local-time conversion both build on. Its
//! identity is the `(CalendarKind, TimeZone)` pair: instances are canonical
//! singletons served from a process-wide registry, so two requests for the
//! same pair yield the same shared value and compare equal.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock, RwLock};

use crate::calendar::CalendarKind;
use crate::duration::{DurationField, DurationFieldType};
use crate::error::{ChronalError, Result};
use crate::field::{DateTimeField, DateTimeFieldType};
use crate::instant::{Instant, MILLIS_PER_DAY, MILLIS_PER_HOUR, MILLIS_PER_MINUTE, MILLIS_PER_SECOND};
use crate::zone::TimeZone;

#[derive(Debug)]
struct Inner {
    kind: CalendarKind,
    zone: TimeZone,
}

/// A calendar system bound to a zone; source of all field objects.
///
/// Cheap to clone (`Arc`-shared), immutable, safe to share across threads.
#[derive(Clone)]
pub struct Chronology {
    inner: Arc<Inner>,
}

type RegistryKey = (CalendarKind, TimeZone);

fn registry() -> &'static RwLock<HashMap<RegistryKey, Chronology>> {
    static REGISTRY: OnceLock<RwLock<HashMap<RegistryKey, Chronology>>> = OnceLock::new();
    REGISTRY.get_or_init(|| RwLock::new(HashMap::new()))
}

impl Chronology {
    /// The canonical chronology for a calendar kind and zone.
    ///
    /// Lookups are read-mostly; the first request for a pair inserts under
    /// the write lock with a re-check, so at most one canonical instance is
    /// ever observable per key.
    pub fn get(kind: CalendarKind, zone: TimeZone) -> Chronology {
        let registry = registry();
        if let Some(found) = registry
            .read()
            .expect("chronology registry poisoned")
            .get(&(kind, zone.clone()))
        {
            return found.clone();
        }
        let mut map = registry.write().expect("chronology registry poisoned");
        map.entry((kind, zone.clone()))
            .or_insert_with(|| Chronology {
                inner: Arc::new(Inner { kind, zone }),
            })
            .clone()
    }

    /// ISO chronology in UTC, the common case.
    pub fn iso_utc() -> Chronology {
        Chronology::get(CalendarKind::Iso, TimeZone::utc())
    }

    /// ISO chronology in the given zone.
    pub fn iso(zone: TimeZone) -> Chronology {
        Chronology::get(CalendarKind::Iso, zone)
    }

    pub fn kind(&self) -> CalendarKind {
        self.inner.kind
    }

    pub fn zone(&self) -> &TimeZone {
        &self.inner.zone
    }

    /// The same calendar system bound to another zone (canonical).
    pub fn with_zone(&self, zone: TimeZone) -> Chronology {
        Chronology::get(self.inner.kind, zone)
    }

    /// The accessor/mutator for one field under this chronology.
    pub fn field(&self, field_type: DateTimeFieldType) -> DateTimeField {
        DateTimeField::new(self.clone(), field_type)
    }

    /// The arithmetic object for one duration unit under this chronology.
    pub fn duration_field(&self, field_type: DurationFieldType) -> DurationField {
        DurationField::new(self.clone(), field_type)
    }

    pub fn is_leap_year(&self, year: i32) -> bool {
        self.inner.kind.is_leap_year(year)
    }

    /// Compose an instant from calendar fields, validating each against the
    /// fields already accepted (day against the given year and month).
    ///
    /// # Errors
    ///
    /// [`ChronalError::Range`] naming the first offending field.
    ///
    /// # Examples
    ///
    /// ```
    /// use chronal::Chronology;
    ///
    /// let c = Chronology::iso_utc();
    /// let i = c.datetime(2010, 6, 30, 2, 30, 50, 678).unwrap();
    /// assert_eq!(i.to_string(), "2010-06-30T02:30:50.678Z");
    /// assert!(c.datetime(2010, 2, 30, 0, 0, 0, 0).is_err());
    /// ```
    #[allow(clippy::too_many_arguments)]
    pub fn datetime(
        &self,
        year: i32,
        month: i32,
        day: i32,
        hour: i32,
        minute: i32,
        second: i32,
        millis: i32,
    ) -> Result<Instant> {
        check_range("hourOfDay", hour, 0, 23)?;
        check_range("minuteOfHour", minute, 0, 59)?;
        check_range("secondOfMinute", second, 0, 59)?;
        check_range("millisOfSecond", millis, 0, 999)?;
        let millis_of_day = hour as i64 * MILLIS_PER_HOUR
            + minute as i64 * MILLIS_PER_MINUTE
            + second as i64 * MILLIS_PER_SECOND
            + millis as i64;
        self.datetime_millis(year, month, day, millis_of_day)
    }

    /// Compose an instant from a date plus a millisecond-of-day value.
    ///
    /// # Errors
    ///
    /// [`ChronalError::Range`] naming the first offending field.
    pub fn datetime_millis(
        &self,
        year: i32,
        month: i32,
        day: i32,
        millis_of_day: i64,
    ) -> Result<Instant> {
        let kind = self.inner.kind;
        check_range("year", year, kind.min_year(), kind.max_year())?;
        check_range("monthOfYear", month, 1, kind.months_in_year())?;
        check_range("dayOfMonth", day, 1, kind.days_in_month(year, month))?;
        if millis_of_day < 0 || millis_of_day >= MILLIS_PER_DAY {
            return Err(ChronalError::Range {
                field: "millisOfDay",
                value: millis_of_day,
                lower: 0,
                upper: MILLIS_PER_DAY - 1,
            });
        }
        let local = kind.days_from_ymd(year, month, day) * MILLIS_PER_DAY + millis_of_day;
        Ok(self.instant_from_local(local))
    }

    // ── Local-time conversion ───────────────────────────────────────────

    /// Instant to zone-local milliseconds. Saturates at the rim of the
    /// 64-bit timeline, which in-range years never reach.
    pub(crate) fn local_millis(&self, instant: Instant) -> i64 {
        instant
            .millis()
            .saturating_add(self.inner.zone.offset(instant) as i64)
    }

    /// Local milliseconds back to an instant under the zone's gap/overlap
    /// policy: gaps shift forward, overlaps take the earlier instant.
    pub(crate) fn instant_from_local(&self, local: i64) -> Instant {
        let offset = self.inner.zone.offset_from_local(local);
        Instant::from_millis(local.saturating_sub(offset as i64))
    }

    /// Like [`instant_from_local`](Chronology::instant_from_local), but an
    /// operation anchored at `hint` keeps the hint's offset whenever that
    /// offset still reproduces `local`, so value-preserving operations are
    /// exact inside an overlap.
    pub(crate) fn instant_from_local_with_hint(&self, local: i64, hint: Instant) -> Instant {
        let offset = self
            .inner
            .zone
            .offset_from_local_with_hint(local, hint.millis());
        Instant::from_millis(local.saturating_sub(offset as i64))
    }
}

fn check_range(field: &'static str, value: i32, lower: i32, upper: i32) -> Result<()> {
    if value < lower || value > upper {
        return Err(ChronalError::Range {
            field,
            value: value as i64,
            lower: lower as i64,
            upper: upper as i64,
        });
    }
    Ok(())
}

impl PartialEq for Chronology {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
            || (self.inner.kind == other.inner.kind && self.inner.zone == other.inner.zone)
    }
}

impl Eq for Chronology {}

impl Hash for Chronology {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.kind.hash(state);
        self.inner.zone.hash(state);
    }
}

impl fmt::Display for Chronology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.inner.kind, self.inner.zone)
    }
}

impl fmt::Debug for Chronology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Chronology({self})")
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
