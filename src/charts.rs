//! Chart catalogue and chart data preparation.
//!
//! The dashboard offers the same seven chart types for both data kinds.
//! This module fixes which columns each chart uses and derives the data a
//! renderer needs (column selections, box summaries, histogram bins and
//! correlation matrices). Drawing is left to the caller.

use crate::constants::{DATE_TIME, generation, weather};
use crate::error::{DashboardError, Result};
use crate::models::{DataKind, Dataset, Plant};
use crate::transform::statistics::{describe_values, present_values};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Chart types offered for generation and weather data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartKind {
    Line,
    Bar,
    Scatter,
    Boxplot,
    Histogram,
    Pie,
    Heatmap,
}

impl ChartKind {
    pub fn all() -> [ChartKind; 7] {
        [
            ChartKind::Line,
            ChartKind::Bar,
            ChartKind::Scatter,
            ChartKind::Boxplot,
            ChartKind::Histogram,
            ChartKind::Pie,
            ChartKind::Heatmap,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            ChartKind::Line => "line",
            ChartKind::Bar => "bar",
            ChartKind::Scatter => "scatter",
            ChartKind::Boxplot => "boxplot",
            ChartKind::Histogram => "histogram",
            ChartKind::Pie => "pie",
            ChartKind::Heatmap => "heatmap",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChartKind {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        ChartKind::all()
            .into_iter()
            .find(|kind| kind.name() == wanted || (wanted == "box" && *kind == ChartKind::Boxplot))
            .ok_or_else(|| DashboardError::Configuration {
                message: format!("Unknown chart type '{}'", s),
            })
    }
}

/// Columns and caption of one catalogue entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub data_kind: DataKind,
    pub title: String,
    /// Horizontal axis, slice names (pie) or histogram variable
    pub x: Option<&'static str>,
    /// Plotted values; for heatmaps, the correlated columns
    pub y: &'static [&'static str],
    pub caption: &'static str,
}

/// Look up the catalogue entry for a chart of `data_kind` data
pub fn chart_spec(kind: ChartKind, data_kind: DataKind, plant: Plant) -> ChartSpec {
    use ChartKind::*;
    use generation::{AC_POWER, DAILY_YIELD, DC_POWER};
    use weather::{AMBIENT_TEMPERATURE, IRRADIATION, MODULE_TEMPERATURE};

    let (title, x, y, caption) = match (data_kind, kind) {
        (DataKind::Generation, Line) => entry(
            format!("Line Plot for {}", plant),
            Some(DATE_TIME),
            &[DC_POWER, AC_POWER],
            "DC and AC power over time",
        ),
        (DataKind::Generation, Bar) => entry(
            format!("Bar Plot of DC Power ({})", plant),
            Some(DATE_TIME),
            &[DC_POWER],
            "DC power trend over time",
        ),
        (DataKind::Generation, Scatter) => entry(
            format!("Scatter Plot (DC vs AC Power) ({})", plant),
            Some(DC_POWER),
            &[AC_POWER],
            "How AC output tracks DC input",
        ),
        (DataKind::Generation, Boxplot) => entry(
            format!("Boxplot of DC Power ({})", plant),
            None,
            &[DC_POWER],
            "Spread of DC power output",
        ),
        (DataKind::Generation, Histogram) => entry(
            format!("Histogram of DC Power ({})", plant),
            Some(DC_POWER),
            &[],
            "Distribution of DC power readings",
        ),
        (DataKind::Generation, Pie) => entry(
            format!("Pie Chart of Power Generation ({})", plant),
            Some(DATE_TIME),
            &[DC_POWER],
            "Share of DC power per reading time",
        ),
        (DataKind::Generation, Heatmap) => entry(
            format!("Heatmap of Power Data ({})", plant),
            None,
            &[DC_POWER, AC_POWER, DAILY_YIELD],
            "Correlation between power and yield",
        ),
        (DataKind::Weather, Line) => entry(
            format!("Temperature Over Time ({})", plant),
            Some(DATE_TIME),
            &[AMBIENT_TEMPERATURE, MODULE_TEMPERATURE],
            "Ambient and module temperature over time",
        ),
        (DataKind::Weather, Bar) => entry(
            format!("Bar Plot of Ambient Temperature ({})", plant),
            Some(DATE_TIME),
            &[AMBIENT_TEMPERATURE],
            "Ambient temperature per reading",
        ),
        (DataKind::Weather, Scatter) => entry(
            format!("Scatter Plot (Temperature vs Irradiation) ({})", plant),
            Some(AMBIENT_TEMPERATURE),
            &[IRRADIATION],
            "How irradiation relates to temperature",
        ),
        (DataKind::Weather, Boxplot) => entry(
            format!("Boxplot of Ambient Temperature ({})", plant),
            None,
            &[AMBIENT_TEMPERATURE],
            "Spread of ambient temperature",
        ),
        (DataKind::Weather, Histogram) => entry(
            format!("Histogram of Ambient Temperature ({})", plant),
            Some(AMBIENT_TEMPERATURE),
            &[],
            "Distribution of ambient temperature readings",
        ),
        (DataKind::Weather, Pie) => entry(
            format!("Pie Chart of Irradiation ({})", plant),
            Some(DATE_TIME),
            &[IRRADIATION],
            "Share of irradiation per reading time",
        ),
        (DataKind::Weather, Heatmap) => entry(
            format!("Heatmap of Weather Data ({})", plant),
            None,
            &[AMBIENT_TEMPERATURE, MODULE_TEMPERATURE, IRRADIATION],
            "Correlation between temperatures and irradiation",
        ),
    };

    ChartSpec {
        kind,
        data_kind,
        title,
        x,
        y,
        caption,
    }
}

type CatalogueEntry = (String, Option<&'static str>, &'static [&'static str], &'static str);

fn entry(
    title: String,
    x: Option<&'static str>,
    y: &'static [&'static str],
    caption: &'static str,
) -> CatalogueEntry {
    (title, x, y, caption)
}

/// Five-number summary behind a box plot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxSummary {
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// One histogram bucket, `[start, end)` except the last which is closed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Pairwise Pearson correlations between columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        Some(self.values[i][j])
    }
}

/// Data a renderer needs for one chart
#[derive(Debug, Clone)]
pub enum ChartData {
    /// Columns plotted directly (line, bar, scatter, pie)
    Series(DataFrame),
    Box(BoxSummary),
    Histogram(Vec<HistogramBin>),
    Correlation(CorrelationMatrix),
}

/// Prepare the data for a chart of `dataset`
pub fn prepare_chart(dataset: &Dataset, kind: ChartKind, bins: usize) -> Result<(ChartSpec, ChartData)> {
    let spec = chart_spec(kind, dataset.kind(), dataset.plant());
    debug!("Preparing {} chart over {} rows", kind, dataset.height());

    let data = match kind {
        ChartKind::Line | ChartKind::Bar | ChartKind::Scatter | ChartKind::Pie => {
            let columns: Vec<&str> = spec.x.into_iter().chain(spec.y.iter().copied()).collect();
            ChartData::Series(dataset.frame().select(columns)?)
        }
        ChartKind::Boxplot => {
            let column = spec.y[0];
            let stats = describe_values(column, &dataset.numeric_values(column)?);
            ChartData::Box(BoxSummary {
                count: stats.count,
                min: stats.min,
                q1: stats.p25,
                median: stats.p50,
                q3: stats.p75,
                max: stats.max,
            })
        }
        ChartKind::Histogram => {
            let column = spec.x.ok_or_else(|| DashboardError::column_not_found("histogram variable"))?;
            ChartData::Histogram(histogram(&dataset.numeric_values(column)?, bins)?)
        }
        ChartKind::Heatmap => ChartData::Correlation(correlation_matrix(dataset, spec.y)?),
    };

    Ok((spec, data))
}

/// Equal-width histogram between the smallest and largest present value.
///
/// Returns no bins when nothing is present and a single bin when every
/// value is equal.
pub fn histogram(values: &[Option<f64>], bins: usize) -> Result<Vec<HistogramBin>> {
    if bins == 0 {
        return Err(DashboardError::Configuration {
            message: "histogram bins must be at least 1".to_string(),
        });
    }

    let present: Vec<f64> = present_values(values).collect();
    let Some(min) = present.iter().copied().reduce(f64::min) else {
        return Ok(Vec::new());
    };
    let max = present.iter().copied().fold(min, f64::max);

    if min == max {
        return Ok(vec![HistogramBin {
            start: min,
            end: max,
            count: present.len(),
        }]);
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for value in &present {
        let index = (((value - min) / width).floor() as usize).min(bins - 1);
        counts[index] += 1;
    }

    Ok(counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: min + width * i as f64,
            end: if i + 1 == bins {
                max
            } else {
                min + width * (i + 1) as f64
            },
            count,
        })
        .collect())
}

/// Pearson correlation between every pair of `columns`.
///
/// Each pair uses the rows where both values are present; pairs with
/// fewer than two such rows or zero variance give NaN.
pub fn correlation_matrix(dataset: &Dataset, columns: &[&str]) -> Result<CorrelationMatrix> {
    let series = columns
        .iter()
        .map(|column| dataset.numeric_values(column))
        .collect::<Result<Vec<_>>>()?;

    let values = series
        .iter()
        .map(|a| series.iter().map(|b| pearson(a, b)).collect())
        .collect();

    Ok(CorrelationMatrix {
        columns: columns.iter().map(|c| c.to_string()).collect(),
        values,
    })
}

fn pearson(a: &[Option<f64>], b: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .filter(|(x, y)| !x.is_nan() && !y.is_nan())
        .collect();

    if pairs.len() < 2 {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_a = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_b = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (mut cov, mut var_a, mut var_b) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let (dx, dy) = (x - mean_a, y - mean_b);
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }

    if var_a == 0.0 || var_b == 0.0 {
        return f64::NAN;
    }

    (cov / (var_a * var_b).sqrt()).clamp(-1.0, 1.0)
}
