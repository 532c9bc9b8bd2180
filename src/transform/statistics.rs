//! Descriptive statistics for numeric columns.
//!
//! Mirrors the usual "describe" table: count of non-missing values, mean,
//! sample standard deviation, min, quartiles and max. Empty inputs give a
//! count of zero and NaN everywhere else rather than an error.

use crate::error::Result;
use crate::models::{ColumnStatistics, Dataset, StatisticsSummary};
use tracing::debug;

/// Describe every numeric column of `dataset`, in frame order
pub fn describe(dataset: &Dataset) -> Result<StatisticsSummary> {
    let columns = dataset
        .numeric_columns()
        .into_iter()
        .map(|column| {
            let values = dataset.numeric_values(&column)?;
            Ok(describe_values(&column, &values))
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(
        "Described {} numeric columns over {} rows",
        columns.len(),
        dataset.height()
    );

    Ok(StatisticsSummary { columns })
}

/// Statistics of one column's values; missing entries and NaN are skipped
pub fn describe_values(column: &str, values: &[Option<f64>]) -> ColumnStatistics {
    let mut present: Vec<f64> = present_values(values).collect();
    if present.is_empty() {
        return ColumnStatistics::empty(column);
    }

    present.sort_by(f64::total_cmp);

    ColumnStatistics {
        column: column.to_string(),
        count: present.len(),
        mean: mean(&present),
        std: sample_std(&present),
        min: present[0],
        p25: quantile_sorted(&present, 0.25),
        p50: quantile_sorted(&present, 0.50),
        p75: quantile_sorted(&present, 0.75),
        max: present[present.len() - 1],
    }
}

/// Readings that are neither null nor NaN
pub(crate) fn present_values(values: &[Option<f64>]) -> impl Iterator<Item = f64> + '_ {
    values.iter().flatten().copied().filter(|value| !value.is_nan())
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Standard deviation with one degree of freedom removed; NaN below two values
pub(crate) fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }

    let mean = mean(values);
    let sum_sq: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
    (sum_sq / (values.len() - 1) as f64).sqrt()
}

/// Quantile of ascending values using linear interpolation between ranks
pub(crate) fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }

    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;

    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}
