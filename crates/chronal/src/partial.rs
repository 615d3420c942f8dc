//! Partials: incomplete date-times without an anchoring instant.
//!
//! A [`Partial`] holds an ordered subset of field types with their values,
//! bound to a chronology — year plus month, say, or year, month and day of
//! week. It supports recurring-rule matching ("every Tuesday in July 2005")
//! without ever constructing a full date: [`Partial::is_match_instant`]
//! decomposes candidate instants through the partial's own chronology and
//! compares fields.
//!
//! Invariants, enforced at construction and on every single-value update:
//! field types are unique, sorted largest unit first, and every value is
//! legal for its type given the larger fields fixed in the same partial.

use std::fmt;

use crate::chronology::Chronology;
use crate::duration::DurationFieldType;
use crate::error::{ChronalError, Result};
use crate::field::DateTimeFieldType;
use crate::instant::Instant;

/// An ordered, chronology-bound subset of field values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partial {
    chronology: Chronology,
    fields: Vec<(DateTimeFieldType, i32)>,
}

/// Sort key for the largest-first ordering: unit size, then range size,
/// both descending. `None` ranges (the open-ended year fields) sort as
/// largest.
fn size_key(field_type: DateTimeFieldType) -> (i64, i64) {
    let unit = field_type.duration_type().average_millis();
    let range = field_type
        .range_duration_type()
        .map(DurationFieldType::average_millis)
        .unwrap_or(i64::MAX);
    (unit, range)
}

impl Partial {
    /// Build a partial from parallel arrays of field types and values.
    ///
    /// Validation happens in order: the arrays must be the same length, the
    /// types pairwise distinct and sorted largest unit first, and then each
    /// value is checked against the legal range its type has given the
    /// larger fields already accepted (day 30 is rejected when the month
    /// before it is February). On failure nothing is constructed.
    ///
    /// # Errors
    ///
    /// [`ChronalError::InvalidArgument`] for structural problems,
    /// [`ChronalError::Range`] for an out-of-range value.
    ///
    /// # Examples
    ///
    /// ```
    /// use chronal::{Chronology, DateTimeFieldType, Partial};
    ///
    /// let every_tuesday_in_july = Partial::new(
    ///     Chronology::iso_utc(),
    ///     &[
    ///         DateTimeFieldType::Year,
    ///         DateTimeFieldType::MonthOfYear,
    ///         DateTimeFieldType::DayOfWeek,
    ///     ],
    ///     &[2005, 7, 2],
    /// )
    /// .unwrap();
    /// assert_eq!(every_tuesday_in_july.size(), 3);
    /// ```
    pub fn new(
        chronology: Chronology,
        types: &[DateTimeFieldType],
        values: &[i32],
    ) -> Result<Partial> {
        if types.len() != values.len() {
            return Err(ChronalError::InvalidArgument(format!(
                "types and values arrays must be the same length ({} vs {})",
                types.len(),
                values.len()
            )));
        }
        for (i, t) in types.iter().enumerate() {
            if types[..i].contains(t) {
                return Err(ChronalError::InvalidArgument(format!(
                    "duplicate field type '{t}'"
                )));
            }
        }
        for pair in types.windows(2) {
            if size_key(pair[0]) <= size_key(pair[1]) {
                return Err(ChronalError::InvalidArgument(format!(
                    "field types must be in order largest-smallest: '{}' before '{}'",
                    pair[0], pair[1]
                )));
            }
        }
        let mut accepted: Vec<(DateTimeFieldType, i32)> = Vec::with_capacity(types.len());
        for (&field_type, &value) in types.iter().zip(values) {
            check_value(&chronology, field_type, value, &accepted)?;
            accepted.push((field_type, value));
        }
        Ok(Partial {
            chronology,
            fields: accepted,
        })
    }

    pub fn chronology(&self) -> &Chronology {
        &self.chronology
    }

    pub fn size(&self) -> usize {
        self.fields.len()
    }

    /// The (type, value) pairs, largest unit first.
    pub fn fields(&self) -> &[(DateTimeFieldType, i32)] {
        &self.fields
    }

    /// Field type at `index`.
    ///
    /// # Errors
    ///
    /// [`ChronalError::InvalidIndex`] outside `[0, size)`.
    pub fn field_type(&self, index: usize) -> Result<DateTimeFieldType> {
        self.pair(index).map(|(t, _)| t)
    }

    /// Value at `index`.
    ///
    /// # Errors
    ///
    /// [`ChronalError::InvalidIndex`] outside `[0, size)`.
    pub fn value(&self, index: usize) -> Result<i32> {
        self.pair(index).map(|(_, v)| v)
    }

    /// The stored value for a field type, if the partial holds it.
    pub fn get(&self, field_type: DateTimeFieldType) -> Option<i32> {
        self.fields
            .iter()
            .find(|(t, _)| *t == field_type)
            .map(|(_, v)| *v)
    }

    /// A copy of this partial with the value at `index` replaced.
    ///
    /// Only the replaced value is re-validated, against the other
    /// currently-held values; the set of field types never changes.
    ///
    /// # Errors
    ///
    /// [`ChronalError::InvalidIndex`] for a bad index,
    /// [`ChronalError::Range`] for an out-of-range value.
    pub fn with_value(&self, index: usize, value: i32) -> Result<Partial> {
        let (field_type, current) = self.pair(index)?;
        if value == current {
            return Ok(self.clone());
        }
        let context: Vec<(DateTimeFieldType, i32)> = self
            .fields
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, pair)| *pair)
            .collect();
        check_value(&self.chronology, field_type, value, &context)?;
        let mut fields = self.fields.clone();
        fields[index].1 = value;
        Ok(Partial {
            chronology: self.chronology.clone(),
            fields,
        })
    }

    /// True when every stored field equals the value this partial's own
    /// chronology derives at `instant`.
    pub fn is_match_instant(&self, instant: Instant) -> bool {
        self.fields
            .iter()
            .all(|&(t, v)| self.chronology.field(t).get(instant) == v)
    }

    /// True when every stored field equals the other partial's value for
    /// the same type.
    ///
    /// # Errors
    ///
    /// [`ChronalError::MissingArgument`] when `other` is absent,
    /// [`ChronalError::InvalidArgument`] when `other` does not hold one of
    /// this partial's field types.
    pub fn is_match_partial(&self, other: Option<&Partial>) -> Result<bool> {
        let other = other.ok_or(ChronalError::MissingArgument("partial"))?;
        for &(t, v) in &self.fields {
            match other.get(t) {
                Some(theirs) => {
                    if theirs != v {
                        return Ok(false);
                    }
                }
                None => {
                    return Err(ChronalError::InvalidArgument(format!(
                        "partial does not support field '{t}'"
                    )))
                }
            }
        }
        Ok(true)
    }

    fn pair(&self, index: usize) -> Result<(DateTimeFieldType, i32)> {
        self.fields
            .get(index)
            .copied()
            .ok_or(ChronalError::InvalidIndex {
                index,
                size: self.fields.len(),
            })
    }
}

fn check_value(
    chronology: &Chronology,
    field_type: DateTimeFieldType,
    value: i32,
    context: &[(DateTimeFieldType, i32)],
) -> Result<()> {
    let field = chronology.field(field_type);
    let lower = field.minimum_value() as i64;
    let upper = field.maximum_value_in_context(context) as i64;
    if (value as i64) < lower || (value as i64) > upper {
        return Err(ChronalError::Range {
            field: field_type.name(),
            value: value as i64,
            lower,
            upper,
        });
    }
    Ok(())
}

impl fmt::Display for Partial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, (t, v)) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{t}={v}")?;
        }
        f.write_str("]")
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
