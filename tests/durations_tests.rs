use chrono::{NaiveDate, TimeZone, Utc, Weekday};
use tasktimer::models::duration::{DateRange, DurationFilter, SortColumn};
use tasktimer::utils::date::Zone;

mod common;
use common::{add_task, file_store, record};

const NEW_YORK: Zone = Zone::Named(chrono_tz::America::New_York);

fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> i64 {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap().timestamp()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn timings_on_the_same_day_are_summed() {
    let t = file_store(Zone::Named(chrono_tz::UTC));
    let a = add_task(&t.store, "A");

    record(&t.store, &t.clock, a, utc(2024, 5, 2, 9, 0), 600);
    record(&t.store, &t.clock, a, utc(2024, 5, 2, 14, 0), 300);

    let rows = t.store.daily_durations(&DurationFilter::default()).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].task_id, a);
    assert_eq!(rows[0].name, "A");
    assert_eq!(rows[0].start_date, date(2024, 5, 2));
    assert_eq!(rows[0].total, 900);
}

#[test]
fn different_days_and_tasks_give_separate_rows() {
    let t = file_store(Zone::Named(chrono_tz::UTC));
    let a = add_task(&t.store, "A");
    let b = add_task(&t.store, "B");

    record(&t.store, &t.clock, a, utc(2024, 5, 2, 9, 0), 100);
    record(&t.store, &t.clock, a, utc(2024, 5, 3, 9, 0), 200);
    record(&t.store, &t.clock, b, utc(2024, 5, 2, 10, 0), 50);

    let rows = t.store.daily_durations(&DurationFilter::default()).unwrap();
    let got: Vec<(&str, NaiveDate, i64)> = rows
        .iter()
        .map(|r| (r.name.as_str(), r.start_date, r.total))
        .collect();
    assert_eq!(
        got,
        [
            ("A", date(2024, 5, 2), 100),
            ("A", date(2024, 5, 3), 200),
            ("B", date(2024, 5, 2), 50),
        ]
    );

    let only_b = t
        .store
        .daily_durations(&DurationFilter::default().for_task(b))
        .unwrap();
    assert_eq!(only_b.len(), 1);
    assert_eq!(only_b[0].total, 50);
}

#[test]
fn days_follow_the_configured_zone_across_dst() {
    // 2024-03-10 is the spring-forward day in New York (23 hours long).
    let t = file_store(NEW_YORK);
    let a = add_task(&t.store, "A");

    // 00:30 EST and 23:30 EDT on the 10th, then 00:30 EDT on the 11th.
    record(&t.store, &t.clock, a, utc(2024, 3, 10, 5, 30), 60);
    record(&t.store, &t.clock, a, utc(2024, 3, 11, 3, 30), 120);
    record(&t.store, &t.clock, a, utc(2024, 3, 11, 4, 30), 240);

    let rows = t.store.daily_durations(&DurationFilter::default()).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!((rows[0].start_date, rows[0].total), (date(2024, 3, 10), 180));
    assert_eq!((rows[1].start_date, rows[1].total), (date(2024, 3, 11), 240));

    let day = DateRange::day(date(2024, 3, 10), NEW_YORK).unwrap();
    assert_eq!(day.end - day.start + 1, 23 * 3600);
}

#[test]
fn open_timings_contribute_nothing() {
    let t = file_store(Zone::Named(chrono_tz::UTC));
    let a = add_task(&t.store, "A");

    record(&t.store, &t.clock, a, utc(2024, 5, 2, 9, 0), 100);
    t.clock.set(utc(2024, 5, 2, 11, 0));
    t.store.toggle_timing(a).unwrap();

    let rows = t.store.daily_durations(&DurationFilter::default()).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].total, 100);
}

#[test]
fn range_and_minimum_duration_filter_single_timings() {
    let t = file_store(Zone::Named(chrono_tz::UTC));
    let a = add_task(&t.store, "A");

    record(&t.store, &t.clock, a, utc(2024, 5, 1, 9, 0), 1_000);
    record(&t.store, &t.clock, a, utc(2024, 5, 2, 9, 0), 30);
    record(&t.store, &t.clock, a, utc(2024, 5, 2, 10, 0), 400);
    record(&t.store, &t.clock, a, utc(2024, 5, 4, 9, 0), 500);

    let range = DateRange::between_dates(date(2024, 5, 2), date(2024, 5, 3), Zone::Named(chrono_tz::UTC))
        .unwrap();
    let rows = t
        .store
        .daily_durations(&DurationFilter::default().within(range))
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].total, 430);

    let rows = t
        .store
        .daily_durations(&DurationFilter::default().within(range).ignoring_less_than(60))
        .unwrap();
    assert_eq!(rows[0].total, 400);

    let rows = t
        .store
        .daily_durations(&DurationFilter::default().ignoring_less_than(450))
        .unwrap();
    let totals: Vec<i64> = rows.iter().map(|r| r.total).collect();
    assert_eq!(totals, [1_000, 500]);
}

#[test]
fn sort_by_duration_puts_longest_first() {
    let t = file_store(Zone::Named(chrono_tz::UTC));
    let a = add_task(&t.store, "A");
    let b = add_task(&t.store, "B");

    record(&t.store, &t.clock, a, utc(2024, 5, 2, 9, 0), 10);
    record(&t.store, &t.clock, b, utc(2024, 5, 2, 10, 0), 20);

    let rows = t
        .store
        .daily_durations(&DurationFilter::default().sorted_by(SortColumn::Duration))
        .unwrap();
    assert_eq!(rows[0].task_id, b);
    assert_eq!(rows[1].task_id, a);
}

#[test]
fn week_range_starts_on_the_configured_day() {
    let utc_zone = Zone::Named(chrono_tz::UTC);
    // Thursday 2024-05-02.
    let monday = DateRange::week(date(2024, 5, 2), Weekday::Mon, utc_zone).unwrap();
    assert_eq!(monday.start, utc(2024, 4, 29, 0, 0));
    assert_eq!(monday.end, utc(2024, 5, 6, 0, 0) - 1);

    let sunday = DateRange::week(date(2024, 5, 2), Weekday::Sun, utc_zone).unwrap();
    assert_eq!(sunday.start, utc(2024, 4, 28, 0, 0));
    assert!(sunday.contains(utc(2024, 5, 4, 23, 59)));
    assert!(!sunday.contains(utc(2024, 5, 5, 0, 0)));
}

#[test]
fn month_range_covers_whole_month() {
    let utc_zone = Zone::Named(chrono_tz::UTC);
    let feb = DateRange::month(date(2024, 2, 17), utc_zone).unwrap();
    assert_eq!(feb.start, utc(2024, 2, 1, 0, 0));
    assert_eq!(feb.end, utc(2024, 3, 1, 0, 0) - 1);
}

#[test]
fn inverted_range_is_rejected() {
    assert!(DateRange::new(10, 5).unwrap_err().is_validation());
}
