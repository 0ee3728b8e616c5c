use chrono::TimeZone;
use chrono_tz::Tz;
use criterion::{criterion_group, criterion_main, Criterion};
use meeting_recurrence::{generate_occurrences, preview, MonthlyPattern, RecurrenceConfig};
use std::hint::black_box;

fn bench_generation(c: &mut Criterion) {
    let now = Tz::UTC.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
    let new_york: Tz = "America/New_York".parse().unwrap();
    let now_ny = new_york.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();

    let daily = RecurrenceConfig::daily();
    let weekly = RecurrenceConfig::weekly([1, 3, 5]).with_interval(2).unwrap();
    let same_date = RecurrenceConfig::monthly(MonthlyPattern::SameDate);
    // never matches: walks the full step limit
    let sparse = RecurrenceConfig::monthly_on([31]).with_interval(12).unwrap();
    let now_april = Tz::UTC.with_ymd_and_hms(2024, 4, 1, 9, 0, 0).unwrap();

    let mut group = c.benchmark_group("generate_occurrences");
    group.bench_function("daily", |b| {
        b.iter(|| generate_occurrences(black_box(&daily), black_box(now)))
    });
    group.bench_function("weekly_interval_2", |b| {
        b.iter(|| generate_occurrences(black_box(&weekly), black_box(now)))
    });
    group.bench_function("monthly_same_date_new_york", |b| {
        b.iter(|| generate_occurrences(black_box(&same_date), black_box(now_ny)))
    });
    group.bench_function("monthly_sparse_step_limit", |b| {
        b.iter(|| generate_occurrences(black_box(&sparse), black_box(now_april)))
    });
    group.finish();

    c.bench_function("preview/weekly", |b| {
        b.iter(|| preview(black_box(&weekly), black_box(now)))
    });
}

criterion_group!(benches, bench_generation);
criterion_main!(benches);
