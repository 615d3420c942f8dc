//! The zone engine: UTC offsets and transition search.
//!
//! A [`TimeZone`] maps instants to UTC offsets through a precomputed table
//! of [`Transition`] records sorted by instant. Offset resolution binary
//! searches the table for the enclosing interval; a fixed zone is the
//! distinguished zero-transition case and short-circuits every query.
//!
//! Where the transition data comes from is an external concern: see
//! [`provider`](crate::provider) for fixed-offset strings, explicit record
//! lists and IANA tabulation.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};

use crate::error::{ChronalError, Result};
use crate::instant::Instant;

/// Offsets must stay within a day of UTC.
const MAX_OFFSET_MILLIS: i32 = 86_400_000;

/// Offset state in force before the first transition (or forever, for a
/// fixed zone): standard offset, total offset, and the name key an external
/// localization layer would resolve.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZoneRecord {
    pub standard_offset: i32,
    pub total_offset: i32,
    pub name_key: String,
}

/// One row of a zone's transition table: from `at` (inclusive) onward the
/// given offsets and name key are in force, until the next row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transition {
    pub at: Instant,
    pub standard_offset: i32,
    pub total_offset: i32,
    pub name_key: String,
}

#[derive(Debug, PartialEq, Eq, Hash)]
struct ZoneData {
    id: String,
    base: ZoneRecord,
    transitions: Vec<Transition>,
}

/// A time zone: an identifier plus an ordered offset-transition table.
///
/// Cheap to clone (`Arc`-shared). Equality and hashing are structural over
/// the id, the base record and the full table, never object identity: two
/// zones built from identical data compare equal.
#[derive(Clone)]
pub struct TimeZone {
    inner: Arc<ZoneData>,
}

impl TimeZone {
    /// The fixed zero-offset zone.
    pub fn utc() -> TimeZone {
        static UTC: OnceLock<TimeZone> = OnceLock::new();
        UTC.get_or_init(|| TimeZone::fixed("UTC", 0)).clone()
    }

    /// A zone whose offset never changes. No transition table is built and
    /// every transition query returns its sentinel.
    pub fn fixed(id: &str, offset_millis: i32) -> TimeZone {
        TimeZone {
            inner: Arc::new(ZoneData {
                id: id.to_string(),
                base: ZoneRecord {
                    standard_offset: offset_millis,
                    total_offset: offset_millis,
                    name_key: id.to_string(),
                },
                transitions: Vec::new(),
            }),
        }
    }

    /// Build a zone from an explicit transition table.
    ///
    /// `base` describes the state before the first transition. Transitions
    /// must be strictly ordered by instant.
    ///
    /// # Errors
    ///
    /// Returns [`ChronalError::InvalidArgument`] when the table is unsorted
    /// or holds duplicate instants, or when any offset exceeds a day.
    pub fn from_transitions(
        id: &str,
        base: ZoneRecord,
        transitions: Vec<Transition>,
    ) -> Result<TimeZone> {
        check_offsets(&base.standard_offset, &base.total_offset)?;
        for pair in transitions.windows(2) {
            if pair[1].at <= pair[0].at {
                return Err(ChronalError::InvalidArgument(format!(
                    "transition table for '{id}' is not strictly ordered at {}",
                    pair[1].at
                )));
            }
        }
        for t in &transitions {
            check_offsets(&t.standard_offset, &t.total_offset)?;
        }
        Ok(TimeZone {
            inner: Arc::new(ZoneData {
                id: id.to_string(),
                base,
                transitions,
            }),
        })
    }

    pub fn id(&self) -> &str {
        &self.inner.id
    }

    /// True when the offset is constant for all instants.
    pub fn is_fixed(&self) -> bool {
        self.inner.transitions.is_empty()
    }

    /// Total UTC offset (standard plus any active saving) at `instant`.
    pub fn offset(&self, instant: Instant) -> i32 {
        self.inner.record_at(instant.millis()).1
    }

    /// Standard offset at `instant`, ignoring daylight saving.
    pub fn standard_offset(&self, instant: Instant) -> i32 {
        self.inner.record_at(instant.millis()).0
    }

    /// Name key in force at `instant`, for an external text layer.
    pub fn name_key(&self, instant: Instant) -> &str {
        self.inner.record_at(instant.millis()).2
    }

    /// First transition instant strictly after `instant`.
    ///
    /// A fixed zone, or a zone with no later transition, signals "no more
    /// transitions" by returning `instant` unchanged.
    pub fn next_transition(&self, instant: Instant) -> Instant {
        Instant::from_millis(self.inner.next_transition_millis(instant.millis()))
    }

    /// Last transition instant strictly before `instant`, with the same
    /// sentinel convention as [`next_transition`](TimeZone::next_transition).
    pub fn previous_transition(&self, instant: Instant) -> Instant {
        Instant::from_millis(self.inner.previous_transition_millis(instant.millis()))
    }

    /// Offset to subtract from a local-time millisecond value to reach the
    /// instant it denotes.
    ///
    /// Local times inside a daylight-saving gap resolve with the offset in
    /// force before the transition, which lands the result after the gap
    /// (the nearest later valid instant). Local times inside an overlap
    /// resolve to the earlier of the two instants.
    pub(crate) fn offset_from_local(&self, local: i64) -> i32 {
        let data = &self.inner;
        if data.transitions.is_empty() {
            return data.base.total_offset;
        }
        // First guess: the offset at the local value read as an instant.
        let offset_local = data.record_at(local).1;
        let adjusted = local.saturating_sub(offset_local as i64);
        let offset_adjusted = data.record_at(adjusted).1;
        if offset_local != offset_adjusted {
            // The two guesses straddle a transition. If they disagree on
            // which transition comes next, the local time is in a gap:
            // keep the pre-transition offset.
            if offset_local < offset_adjusted {
                let next_local = data.next_transition_millis(adjusted);
                let next_adjusted =
                    data.next_transition_millis(local.saturating_sub(offset_adjusted as i64));
                if next_local != next_adjusted {
                    return offset_local;
                }
            }
        } else if offset_local >= 0 {
            // A just-passed cutback can make the naive guess skip the
            // earlier of two valid readings; prefer it.
            if let Some(prev) = data.latest_transition_at_or_before(adjusted) {
                let offset_prev = data.record_at(prev.saturating_sub(1)).1;
                let diff = (offset_prev - offset_local) as i64;
                if adjusted - prev < diff {
                    return offset_prev;
                }
            }
        }
        offset_adjusted
    }

    /// Like [`offset_from_local`](TimeZone::offset_from_local), but prefers
    /// the offset in force at `hint` when that offset still reproduces
    /// `local`. Keeps operations anchored inside an overlap on their own
    /// side of the transition.
    pub(crate) fn offset_from_local_with_hint(&self, local: i64, hint: i64) -> i32 {
        let offset_hint = self.inner.record_at(hint).1;
        let candidate = local.saturating_sub(offset_hint as i64);
        if self.inner.record_at(candidate).1 == offset_hint {
            return offset_hint;
        }
        self.offset_from_local(local)
    }
}

impl ZoneData {
    /// (standard, total, name) in force at a raw millisecond instant.
    fn record_at(&self, millis: i64) -> (i32, i32, &str) {
        let idx = self
            .transitions
            .partition_point(|t| t.at.millis() <= millis);
        if idx == 0 {
            (
                self.base.standard_offset,
                self.base.total_offset,
                &self.base.name_key,
            )
        } else {
            let t = &self.transitions[idx - 1];
            (t.standard_offset, t.total_offset, &t.name_key)
        }
    }

    fn next_transition_millis(&self, millis: i64) -> i64 {
        let idx = self
            .transitions
            .partition_point(|t| t.at.millis() <= millis);
        match self.transitions.get(idx) {
            Some(t) => t.at.millis(),
            None => millis,
        }
    }

    fn previous_transition_millis(&self, millis: i64) -> i64 {
        let idx = self.transitions.partition_point(|t| t.at.millis() < millis);
        if idx == 0 {
            millis
        } else {
            self.transitions[idx - 1].at.millis()
        }
    }

    fn latest_transition_at_or_before(&self, millis: i64) -> Option<i64> {
        let idx = self
            .transitions
            .partition_point(|t| t.at.millis() <= millis);
        idx.checked_sub(1).map(|i| self.transitions[i].at.millis())
    }
}

fn check_offsets(standard: &i32, total: &i32) -> Result<()> {
    for offset in [standard, total] {
        if offset.abs() >= MAX_OFFSET_MILLIS {
            return Err(ChronalError::InvalidArgument(format!(
                "offset {offset}ms exceeds a day"
            )));
        }
    }
    Ok(())
}

impl PartialEq for TimeZone {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner) || *self.inner == *other.inner
    }
}

impl Eq for TimeZone {}

impl Hash for TimeZone {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.hash(state);
    }
}

impl fmt::Display for TimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl fmt::Debug for TimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TimeZone({}, {} transitions)",
            self.id(),
            self.inner.transitions.len()
        )
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
