//! Core data structures and types for solar plant analysis.
//!
//! Defines plants, data kinds and their schemas, the `Dataset` wrapper
//! around a Polars frame, date ranges, statistics summaries and the
//! insights record.

use crate::constants::{DATE_TIME, generation, weather};
use crate::error::{DashboardError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Solar plants with their own generation and weather sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Plant {
    Plant1,
    Plant2,
}

impl Plant {
    /// Every known plant, in display order
    pub fn all() -> [Plant; 2] {
        [Plant::Plant1, Plant::Plant2]
    }
}

impl fmt::Display for Plant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Plant::Plant1 => write!(f, "Plant 1"),
            Plant::Plant2 => write!(f, "Plant 2"),
        }
    }
}

impl FromStr for Plant {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "1" | "plant1" => Ok(Plant::Plant1),
            "2" | "plant2" => Ok(Plant::Plant2),
            _ => Err(DashboardError::Configuration {
                message: format!("Unknown plant '{}': expected 1 or 2", s),
            }),
        }
    }
}

/// The two row shapes a dataset can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataKind {
    Generation,
    Weather,
}

impl DataKind {
    /// Numeric columns required for this kind
    pub fn numeric_columns(&self) -> &'static [&'static str] {
        match self {
            DataKind::Generation => generation::NUMERIC_COLUMNS,
            DataKind::Weather => weather::NUMERIC_COLUMNS,
        }
    }

    /// Column the dashboard smooths by default
    pub fn smoothing_column(&self) -> &'static str {
        match self {
            DataKind::Generation => generation::AC_POWER,
            DataKind::Weather => weather::AMBIENT_TEMPERATURE,
        }
    }

    /// Name of the derived moving average column
    pub fn smoothed_column_name(&self) -> &'static str {
        match self {
            DataKind::Generation => generation::MA_AC_POWER,
            DataKind::Weather => weather::MA_AMBIENT_TEMP,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DataKind::Generation => "generation",
            DataKind::Weather => "weather",
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DataKind {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "generation" | "gen" => Ok(DataKind::Generation),
            "weather" => Ok(DataKind::Weather),
            other => Err(DashboardError::Configuration {
                message: format!("Unknown data kind '{}': expected generation or weather", other),
            }),
        }
    }
}

/// Readings of one kind for one plant, in load order.
///
/// `DATE_TIME` is a millisecond `Datetime` column without nulls and every
/// required numeric column is `Float64`. Construct through
/// [`Dataset::from_frame`] or the loader so these hold.
#[derive(Debug, Clone)]
pub struct Dataset {
    kind: DataKind,
    plant: Plant,
    frame: DataFrame,
}

impl Dataset {
    /// Normalize and validate a raw frame into a dataset
    pub fn from_frame(kind: DataKind, plant: Plant, frame: DataFrame) -> Result<Self> {
        let frame = crate::loader::normalize_frame(kind, frame, "in-memory frame")?;
        Ok(Self { kind, plant, frame })
    }

    /// Wrap a frame already known to satisfy the dataset invariants
    pub(crate) fn from_normalized(kind: DataKind, plant: Plant, frame: DataFrame) -> Self {
        Self { kind, plant, frame }
    }

    pub fn kind(&self) -> DataKind {
        self.kind
    }

    pub fn plant(&self) -> Plant {
        self.plant
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// Timestamps as epoch milliseconds, in row order
    pub(crate) fn timestamp_millis(&self) -> Result<Vec<Option<i64>>> {
        let millis = self
            .frame
            .column(DATE_TIME)?
            .as_materialized_series()
            .cast(&DataType::Int64)?;
        Ok(millis.i64()?.into_iter().collect())
    }

    /// Timestamps in row order
    pub fn timestamps(&self) -> Result<Vec<NaiveDateTime>> {
        Ok(self
            .timestamp_millis()?
            .into_iter()
            .flatten()
            .filter_map(millis_to_datetime)
            .collect())
    }

    /// Names of numeric columns, in frame order
    pub fn numeric_columns(&self) -> Vec<String> {
        self.frame
            .get_columns()
            .iter()
            .filter(|column| is_numeric(column.dtype()))
            .map(|column| column.name().to_string())
            .collect()
    }

    /// Values of a numeric column as `f64`, missing readings as `None`.
    ///
    /// NaN counts as missing, so frames built in memory behave like loaded ones.
    pub fn numeric_values(&self, column: &str) -> Result<Vec<Option<f64>>> {
        let series = self
            .frame
            .column(column)
            .map_err(|_| DashboardError::column_not_found(column))?
            .as_materialized_series();

        if !is_numeric(series.dtype()) {
            return Err(DashboardError::column_not_found(column));
        }

        let values = series.cast(&DataType::Float64)?;
        Ok(values
            .f64()?
            .into_iter()
            .map(|value| value.filter(|v| !v.is_nan()))
            .collect())
    }

    /// Return a new dataset with `values` attached as a `Float64` column.
    ///
    /// An existing column with the same name is replaced.
    pub fn with_derived_column(&self, name: &str, values: Vec<Option<f64>>) -> Result<Self> {
        let mut frame = self.frame.clone();
        frame.with_column(Series::new(name.into(), values))?;
        Ok(Self::from_normalized(self.kind, self.plant, frame))
    }

    /// Same kind and plant, different rows
    pub(crate) fn with_frame(&self, frame: DataFrame) -> Self {
        Self::from_normalized(self.kind, self.plant, frame)
    }
}

/// Numeric dtypes considered for statistics and smoothing
pub(crate) fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float64
            | DataType::Float32
            | DataType::Int64
            | DataType::Int32
            | DataType::UInt64
            | DataType::UInt32
    )
}

pub(crate) fn millis_to_datetime(millis: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_millis(millis).map(|dt| dt.naive_utc())
}

pub(crate) fn datetime_to_millis(value: NaiveDateTime) -> i64 {
    value.and_utc().timestamp_millis()
}

/// Inclusive date-time range; `start <= end` is not enforced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Range between two calendar dates, both taken at midnight
    pub fn from_dates(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: start.and_time(chrono::NaiveTime::MIN),
            end: end.and_time(chrono::NaiveTime::MIN),
        }
    }

    pub fn contains(&self, value: NaiveDateTime) -> bool {
        self.start <= value && value <= self.end
    }
}

/// Descriptive statistics of a single numeric column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStatistics {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub max: f64,
}

impl ColumnStatistics {
    /// Statistics of a column with no values: count 0, everything else NaN
    pub fn empty(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            count: 0,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            p25: f64::NAN,
            p50: f64::NAN,
            p75: f64::NAN,
            max: f64::NAN,
        }
    }
}

/// Per-column statistics for every numeric column of a dataset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatisticsSummary {
    pub columns: Vec<ColumnStatistics>,
}

impl StatisticsSummary {
    pub fn get(&self, column: &str) -> Option<&ColumnStatistics> {
        self.columns.iter().find(|stats| stats.column == column)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Keys of the fixed insights record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InsightKey {
    MaxAcPower,
    MinAcPower,
    AverageDailyYield,
    MaxTemp,
    MinTemp,
    AverageIrradiation,
}

impl InsightKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightKey::MaxAcPower => "max_ac_power",
            InsightKey::MinAcPower => "min_ac_power",
            InsightKey::AverageDailyYield => "average_daily_yield",
            InsightKey::MaxTemp => "max_temp",
            InsightKey::MinTemp => "min_temp",
            InsightKey::AverageIrradiation => "average_irradiation",
        }
    }
}

/// Column reductions used by insights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Aggregation {
    Max,
    Min,
    Mean,
}

/// One row of the insights table: which column of which dataset to reduce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsightField {
    pub key: InsightKey,
    pub source: DataKind,
    pub column: &'static str,
    pub aggregation: Aggregation,
    pub label: &'static str,
}

/// Scalar aggregates over an unfiltered generation/weather pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Insights {
    pub max_ac_power: f64,
    pub min_ac_power: f64,
    pub average_daily_yield: f64,
    pub max_temp: f64,
    pub min_temp: f64,
    pub average_irradiation: f64,
}

impl Default for Insights {
    fn default() -> Self {
        Self {
            max_ac_power: f64::NAN,
            min_ac_power: f64::NAN,
            average_daily_yield: f64::NAN,
            max_temp: f64::NAN,
            min_temp: f64::NAN,
            average_irradiation: f64::NAN,
        }
    }
}

impl Insights {
    pub fn get(&self, key: InsightKey) -> f64 {
        match key {
            InsightKey::MaxAcPower => self.max_ac_power,
            InsightKey::MinAcPower => self.min_ac_power,
            InsightKey::AverageDailyYield => self.average_daily_yield,
            InsightKey::MaxTemp => self.max_temp,
            InsightKey::MinTemp => self.min_temp,
            InsightKey::AverageIrradiation => self.average_irradiation,
        }
    }

    pub(crate) fn set(&mut self, key: InsightKey, value: f64) {
        let slot = match key {
            InsightKey::MaxAcPower => &mut self.max_ac_power,
            InsightKey::MinAcPower => &mut self.min_ac_power,
            InsightKey::AverageDailyYield => &mut self.average_daily_yield,
            InsightKey::MaxTemp => &mut self.max_temp,
            InsightKey::MinTemp => &mut self.min_temp,
            InsightKey::AverageIrradiation => &mut self.average_irradiation,
        };
        *slot = value;
    }
}
