//! Filter invariants over several datasets and ranges

use super::{generation_dataset, quarter_hours};
use crate::models::{DateRange, Dataset};
use crate::transform::filter::filter_by_date;
use chrono::NaiveDate;

fn shuffled_dataset() -> Dataset {
    // Deliberately out of time order
    generation_dataset(
        &[
            "16-05-2020 10:00",
            "15-05-2020 08:00",
            "17-05-2020 12:00",
            "15-05-2020 23:45",
            "16-05-2020 00:00",
            "14-05-2020 18:30",
        ],
        &[160.0, 150.0, 170.0, 151.0, 159.0, 140.0],
        &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
    )
}

fn ranges() -> Vec<DateRange> {
    let day = |d: u32| NaiveDate::from_ymd_opt(2020, 5, d).unwrap();
    vec![
        DateRange::from_dates(day(15), day(16)),
        DateRange::from_dates(day(14), day(17)),
        DateRange::new(
            day(15).and_hms_opt(8, 0, 0).unwrap(),
            day(16).and_hms_opt(10, 0, 0).unwrap(),
        ),
        DateRange::from_dates(day(1), day(2)),
        DateRange::from_dates(day(17), day(14)),
        DateRange::from_dates(day(18), day(30)),
    ]
}

#[test]
fn test_every_filtered_row_is_within_range() {
    let dataset = shuffled_dataset();

    for range in ranges() {
        let filtered = filter_by_date(&dataset, &range).unwrap();
        for timestamp in filtered.timestamps().unwrap() {
            assert!(
                range.contains(timestamp),
                "{} outside {:?}",
                timestamp,
                range
            );
        }
    }
}

#[test]
fn test_filter_is_order_preserving_subsequence() {
    let dataset = shuffled_dataset();
    let original = dataset.numeric_values("DAILY_YIELD").unwrap();

    for range in ranges() {
        let filtered = filter_by_date(&dataset, &range).unwrap();
        let kept = filtered.numeric_values("DAILY_YIELD").unwrap();

        // DAILY_YIELD is a unique row id here; it must appear in the same order
        let mut cursor = original.iter();
        for value in &kept {
            assert!(
                cursor.any(|candidate| candidate == value),
                "row {:?} out of order for {:?}",
                value,
                range
            );
        }
    }
}

#[test]
fn test_filter_keeps_every_row_inside_range() {
    let dataset = shuffled_dataset();
    let all_timestamps = dataset.timestamps().unwrap();

    for range in ranges() {
        let filtered = filter_by_date(&dataset, &range).unwrap();
        let expected = all_timestamps
            .iter()
            .filter(|timestamp| range.contains(**timestamp))
            .count();
        assert_eq!(filtered.height(), expected);
    }
}

#[test]
fn test_filter_is_idempotent() {
    let dataset = shuffled_dataset();

    for range in ranges() {
        let once = filter_by_date(&dataset, &range).unwrap();
        let twice = filter_by_date(&once, &range).unwrap();

        assert!(once.frame().equals_missing(twice.frame()));
    }
}

#[test]
fn test_filter_spanning_whole_day_of_readings() {
    let timestamps = quarter_hours(96);
    let refs: Vec<&str> = timestamps.iter().map(String::as_str).collect();
    let ac: Vec<f64> = (0..96).map(f64::from).collect();
    let dataset = generation_dataset(&refs, &ac, &ac);

    let day = NaiveDate::from_ymd_opt(2020, 5, 15).unwrap();
    let morning = DateRange::new(
        day.and_hms_opt(6, 0, 0).unwrap(),
        day.and_hms_opt(11, 45, 0).unwrap(),
    );

    let filtered = filter_by_date(&dataset, &morning).unwrap();

    // 06:00 through 11:45 inclusive, four readings an hour
    assert_eq!(filtered.height(), 24);
    assert_eq!(
        filtered.numeric_values("AC_POWER").unwrap().first(),
        Some(&Some(24.0))
    );
}
