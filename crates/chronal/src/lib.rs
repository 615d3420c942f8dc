//! # chronal
//!
//! A core engine for converting between absolute millisecond instants and
//! structured calendar field values under pluggable calendar systems, with
//! calendar-aware field arithmetic that respects variable month lengths,
//! leap years and time-zone transitions.
//!
//! Formatting grammars, locale text and period/interval container types are
//! deliberately out of scope: external layers call into this engine to
//! obtain and validate exact field values.
//!
//! ## Modules
//!
//! - [`instant`] — the absolute millisecond timeline ([`Instant`])
//! - [`zone`] — UTC offsets and transition search ([`TimeZone`])
//! - [`provider`] — zone data sources: fixed offsets, explicit tables, IANA
//! - [`calendar`] — calendar systems and day arithmetic ([`CalendarKind`])
//! - [`chronology`] — calendar plus zone, canonical per pair ([`Chronology`])
//! - [`field`] — per-unit get/set/add/round ([`DateTimeField`])
//! - [`duration`] — elapsed-time unit arithmetic ([`DurationField`])
//! - [`partial`] — incomplete date-times and matching ([`Partial`])
//! - [`clock`] — the process/thread current-time source
//! - [`error`] — error types
//!
//! ## Example
//!
//! ```
//! use chronal::{Chronology, DateTimeFieldType};
//!
//! let chronology = Chronology::iso_utc();
//! let instant = chronology.datetime(2005, 7, 5, 9, 30, 0, 0).unwrap();
//! let month = chronology.field(DateTimeFieldType::MonthOfYear);
//! assert_eq!(month.get(instant), 7);
//!
//! // Calendar-aware arithmetic: adding a month clamps into the target
//! // month instead of overflowing.
//! let jan31 = chronology.datetime(2005, 1, 31, 0, 0, 0, 0).unwrap();
//! let feb28 = month.add(jan31, 1).unwrap();
//! assert_eq!(chronology.field(DateTimeFieldType::DayOfMonth).get(feb28), 28);
//! ```

pub mod calendar;
pub mod chronology;
pub mod clock;
pub mod duration;
pub mod error;
pub mod field;
pub mod instant;
pub mod partial;
pub mod provider;
pub mod zone;

pub use calendar::CalendarKind;
pub use chronology::Chronology;
pub use clock::TimeSource;
pub use duration::{DurationField, DurationFieldType};
pub use error::{ChronalError, Result};
pub use field::{DateTimeField, DateTimeFieldType};
pub use instant::Instant;
pub use partial::Partial;
pub use zone::{TimeZone, Transition, ZoneRecord};
