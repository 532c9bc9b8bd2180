//! Headline insights over a plant's full generation and weather data.
//!
//! Each insight is one row of [`INSIGHT_FIELDS`]: a reduction over one
//! column of one dataset. Adding a field means adding a row here and a
//! key in [`InsightKey`].

use crate::constants::{generation, weather};
use crate::error::{DashboardError, Result};
use crate::models::{Aggregation, DataKind, Dataset, InsightField, InsightKey, Insights};
use crate::transform::statistics::present_values;
use tracing::debug;

/// The fixed insight table
pub const INSIGHT_FIELDS: [InsightField; 6] = [
    InsightField {
        key: InsightKey::MaxAcPower,
        source: DataKind::Generation,
        column: generation::AC_POWER,
        aggregation: Aggregation::Max,
        label: "Maximum AC Power",
    },
    InsightField {
        key: InsightKey::MinAcPower,
        source: DataKind::Generation,
        column: generation::AC_POWER,
        aggregation: Aggregation::Min,
        label: "Minimum AC Power",
    },
    InsightField {
        key: InsightKey::AverageDailyYield,
        source: DataKind::Generation,
        column: generation::DAILY_YIELD,
        aggregation: Aggregation::Mean,
        label: "Average Daily Yield",
    },
    InsightField {
        key: InsightKey::MaxTemp,
        source: DataKind::Weather,
        column: weather::AMBIENT_TEMPERATURE,
        aggregation: Aggregation::Max,
        label: "Maximum Ambient Temperature",
    },
    InsightField {
        key: InsightKey::MinTemp,
        source: DataKind::Weather,
        column: weather::AMBIENT_TEMPERATURE,
        aggregation: Aggregation::Min,
        label: "Minimum Ambient Temperature",
    },
    InsightField {
        key: InsightKey::AverageIrradiation,
        source: DataKind::Weather,
        column: weather::IRRADIATION,
        aggregation: Aggregation::Mean,
        label: "Average Irradiation",
    },
];

/// Compute every insight from the unfiltered generation and weather data.
///
/// Fails with `EmptyDataset` when either dataset has no rows. A column
/// whose readings are all missing gives NaN for its insights.
pub fn extract_insights(generation: &Dataset, weather: &Dataset) -> Result<Insights> {
    for dataset in [generation, weather] {
        if dataset.is_empty() {
            return Err(DashboardError::EmptyDataset {
                dataset: format!("{} {}", dataset.plant(), dataset.kind()),
            });
        }
    }

    let mut insights = Insights::default();
    for field in &INSIGHT_FIELDS {
        let dataset = match field.source {
            DataKind::Generation => generation,
            DataKind::Weather => weather,
        };
        let values = dataset.numeric_values(field.column)?;
        insights.set(field.key, aggregate(field.aggregation, &values));
    }

    debug!(
        "Extracted insights from {} generation and {} weather rows",
        generation.height(),
        weather.height()
    );

    Ok(insights)
}

/// Reduce the present values of a column; NaN when none are present
pub fn aggregate(aggregation: Aggregation, values: &[Option<f64>]) -> f64 {
    let present = present_values(values);

    match aggregation {
        Aggregation::Max => present.reduce(f64::max).unwrap_or(f64::NAN),
        Aggregation::Min => present.reduce(f64::min).unwrap_or(f64::NAN),
        Aggregation::Mean => {
            let (sum, count) = present.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
            if count == 0 {
                f64::NAN
            } else {
                sum / count as f64
            }
        }
    }
}
