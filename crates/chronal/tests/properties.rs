//! Property tests: algebraic laws every chronology must satisfy.

use std::sync::OnceLock;

use proptest::prelude::*;

use chronal::{
    provider, CalendarKind, Chronology, DateTimeFieldType, DurationFieldType, Instant, TimeZone,
};

/// 1990-01-01 .. 2030-01-01, inside the tabulated zone range.
fn timeline() -> std::ops::Range<i64> {
    631_152_000_000..1_893_456_000_000
}

fn new_york() -> Chronology {
    static ZONE: OnceLock<TimeZone> = OnceLock::new();
    let zone = ZONE
        .get_or_init(|| provider::zone("America/New_York", 1985, 2035).unwrap())
        .clone();
    Chronology::iso(zone)
}

fn coptic_utc() -> Chronology {
    Chronology::get(CalendarKind::Coptic, TimeZone::utc())
}

proptest! {
    /// set(instant, get(instant)) is the identity for every field, in a
    /// fixed zone, a DST zone and a non-ISO calendar.
    #[test]
    fn prop_set_get_round_trip(millis in timeline()) {
        let instant = Instant::from_millis(millis);
        for chronology in [Chronology::iso_utc(), new_york(), coptic_utc()] {
            for field_type in DateTimeFieldType::all() {
                let field = chronology.field(field_type);
                let back = field.set(instant, field.get(instant)).unwrap();
                prop_assert_eq!(back, instant, "{} under {}", field_type, chronology);
            }
        }
    }

    /// Rounding brackets the instant and is idempotent.
    #[test]
    fn prop_round_floor_ceiling_bracket(millis in timeline()) {
        let instant = Instant::from_millis(millis);
        for chronology in [Chronology::iso_utc(), new_york()] {
            for field_type in DateTimeFieldType::all() {
                let field = chronology.field(field_type);
                let floor = field.round_floor(instant);
                let ceiling = field.round_ceiling(instant);
                prop_assert!(floor <= instant, "{} floor", field_type);
                prop_assert!(ceiling >= instant, "{} ceiling", field_type);
                prop_assert_eq!(field.round_floor(floor), floor, "{} refloor", field_type);
                prop_assert_eq!(field.round_ceiling(ceiling), ceiling, "{} receiling", field_type);
            }
        }
    }

    /// Precise-unit addition is invertible.
    #[test]
    fn prop_precise_add_is_invertible(millis in timeline(), amount in -20_000i64..20_000) {
        let instant = Instant::from_millis(millis);
        let chronology = Chronology::iso_utc();
        for unit in [
            DurationFieldType::Millis,
            DurationFieldType::Seconds,
            DurationFieldType::Minutes,
            DurationFieldType::Hours,
            DurationFieldType::Days,
            DurationFieldType::Weeks,
        ] {
            let field = chronology.duration_field(unit);
            let there = field.add(instant, amount).unwrap();
            prop_assert_eq!(field.subtract(there, amount).unwrap(), instant, "{}", unit);
        }
    }

    /// difference() counts exactly the whole units that fit between two
    /// instants: one more step overshoots.
    #[test]
    fn prop_difference_brackets_instants(a in timeline(), b in timeline()) {
        let (minuend, subtrahend) = if a >= b { (a, b) } else { (b, a) };
        let (minuend, subtrahend) = (Instant::from_millis(minuend), Instant::from_millis(subtrahend));
        let chronology = Chronology::iso_utc();
        for unit in [
            DurationFieldType::Hours,
            DurationFieldType::Days,
            DurationFieldType::Months,
            DurationFieldType::Years,
        ] {
            let field = chronology.duration_field(unit);
            let diff = field.difference(minuend, subtrahend).unwrap();
            prop_assert!(diff >= 0);
            prop_assert!(field.add(subtrahend, diff).unwrap() <= minuend, "{}", unit);
            prop_assert!(field.add(subtrahend, diff + 1).unwrap() > minuend, "{}", unit);
        }
    }

    /// Transition search brackets a real offset change and iterates
    /// monotonically.
    #[test]
    fn prop_transition_search_is_consistent(millis in timeline()) {
        let chronology = new_york();
        let zone = chronology.zone();
        let instant = Instant::from_millis(millis);
        let next = zone.next_transition(instant);
        prop_assert!(next > instant || next == instant);
        if next != instant {
            let just_before = Instant::from_millis(next.millis() - 1);
            prop_assert_ne!(zone.offset(just_before), zone.offset(next));
            // The transition preceding `next` is at or before the query.
            prop_assert!(zone.previous_transition(next) <= instant);
            // Walking forward from the result never goes backwards.
            prop_assert!(zone.next_transition(next) >= next);
        }
    }

    /// Partial matching agrees with direct field decomposition.
    #[test]
    fn prop_partial_match_agrees_with_fields(millis in timeline()) {
        let chronology = Chronology::iso_utc();
        let instant = Instant::from_millis(millis);
        let year = chronology.field(DateTimeFieldType::Year).get(instant);
        let month = chronology.field(DateTimeFieldType::MonthOfYear).get(instant);
        let dow = chronology.field(DateTimeFieldType::DayOfWeek).get(instant);
        let partial = chronal::Partial::new(
            chronology,
            &[
                DateTimeFieldType::Year,
                DateTimeFieldType::MonthOfYear,
                DateTimeFieldType::DayOfWeek,
            ],
            &[year, month, dow],
        )
        .unwrap();
        prop_assert!(partial.is_match_instant(instant));
        // Shifting by a week keeps the day of week but usually not the rest.
        let week_later = Instant::from_millis(millis + 7 * 86_400_000);
        let still_matches = partial.is_match_instant(week_later);
        let same_month = chronal::Chronology::iso_utc()
            .field(DateTimeFieldType::MonthOfYear)
            .get(week_later)
            == month;
        let same_year = chronal::Chronology::iso_utc()
            .field(DateTimeFieldType::Year)
            .get(week_later)
            == year;
        prop_assert_eq!(still_matches, same_month && same_year);
    }
}
