use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};

use chronal::{provider, Chronology, DateTimeFieldType, DurationFieldType, Partial};

fn bench_field_ops(c: &mut Criterion) {
    let utc = Chronology::iso_utc();
    let zoned = Chronology::iso(provider::zone("America/New_York", 1990, 2035).unwrap());
    let instant = utc.datetime(2026, 3, 8, 6, 30, 0, 0).unwrap();

    c.bench_function("get_month_utc", |b| {
        let field = utc.field(DateTimeFieldType::MonthOfYear);
        b.iter(|| field.get(black_box(instant)))
    });

    c.bench_function("get_month_zoned", |b| {
        let field = zoned.field(DateTimeFieldType::MonthOfYear);
        b.iter(|| field.get(black_box(instant)))
    });

    c.bench_function("set_day_of_month", |b| {
        let field = zoned.field(DateTimeFieldType::DayOfMonth);
        b.iter(|| field.set(black_box(instant), 15).unwrap())
    });

    c.bench_function("add_months", |b| {
        let field = zoned.duration_field(DurationFieldType::Months);
        b.iter(|| field.add(black_box(instant), 7).unwrap())
    });

    c.bench_function("zone_offset_lookup", |b| {
        let zone = zoned.zone().clone();
        b.iter(|| zone.offset(black_box(instant)))
    });

    c.bench_function("partial_match", |b| {
        let partial = Partial::new(
            utc.clone(),
            &[
                DateTimeFieldType::Year,
                DateTimeFieldType::MonthOfYear,
                DateTimeFieldType::DayOfWeek,
            ],
            &[2026, 3, 7],
        )
        .unwrap();
        b.iter(|| partial.is_match_instant(black_box(instant)))
    });
}

criterion_group!(benches, bench_field_ops);
criterion_main!(benches);
