//! Cross-transform tests for the transform module
//!
//! Exercises filtering, smoothing, statistics and insights together on
//! small in-memory plant datasets.

pub mod filter_properties;

use crate::models::{DataKind, Dataset, Plant};
use polars::prelude::*;

/// Generation dataset from parallel timestamp, AC power and daily yield columns.
///
/// DC power is taken as AC power plus ten percent.
pub fn generation_dataset(timestamps: &[&str], ac_power: &[f64], daily_yield: &[f64]) -> Dataset {
    let dc_power: Vec<f64> = ac_power.iter().map(|ac| ac * 1.1).collect();
    let total_yield: Vec<f64> = daily_yield.iter().map(|y| 6_000_000.0 + y).collect();
    let source_keys: Vec<&str> = timestamps.iter().map(|_| "1BY6WEcLGh8j5v7").collect();

    let frame = df!(
        "DATE_TIME" => timestamps,
        "SOURCE_KEY" => source_keys,
        "DC_POWER" => dc_power,
        "AC_POWER" => ac_power,
        "DAILY_YIELD" => daily_yield,
        "TOTAL_YIELD" => total_yield
    )
    .unwrap();

    Dataset::from_frame(DataKind::Generation, Plant::Plant1, frame).unwrap()
}

/// Weather dataset from parallel timestamp, ambient temperature and irradiation columns
pub fn weather_dataset(timestamps: &[&str], ambient: &[f64], irradiation: &[f64]) -> Dataset {
    let module: Vec<f64> = ambient.iter().map(|t| t + 5.0).collect();
    let source_keys: Vec<&str> = timestamps.iter().map(|_| "HmiyD2TTLFNqkNe").collect();

    let frame = df!(
        "DATE_TIME" => timestamps,
        "SOURCE_KEY" => source_keys,
        "AMBIENT_TEMPERATURE" => ambient,
        "MODULE_TEMPERATURE" => module,
        "IRRADIATION" => irradiation
    )
    .unwrap();

    Dataset::from_frame(DataKind::Weather, Plant::Plant1, frame).unwrap()
}

/// A day of quarter-hour timestamps starting at midnight on 15 May 2020
pub fn quarter_hours(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| format!("15-05-2020 {:02}:{:02}", (i / 4) % 24, (i % 4) * 15))
        .collect()
}
