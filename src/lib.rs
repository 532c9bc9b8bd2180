//! Solar Plant Dashboard Library
//!
//! Data layer for a solar power plant dashboard. Two plants each publish
//! a generation dataset (inverter power and yield) and a weather sensor
//! dataset (temperatures and irradiation) as CSV files.
//!
//! This library provides tools for:
//! - Loading and normalising the plant CSV files into typed datasets
//! - Filtering datasets to an inclusive date-time range
//! - Positional moving averages over a numeric column
//! - Descriptive statistics for every numeric column
//! - Headline insights across a plant's generation and weather data
//! - Chart catalogue lookups and chart data preparation
//! - Session-scoped state for the presentation layer

pub mod charts;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod loader;
pub mod models;
pub mod report;
pub mod session;
pub mod transform;

pub use charts::{ChartData, ChartKind, ChartSpec};
pub use config::DashboardConfig;
pub use error::{DashboardError, Result};
pub use models::{
    ColumnStatistics, DataKind, DateRange, Dataset, InsightKey, Insights, Plant, StatisticsSummary,
};
pub use session::{Exploration, ExploreRequest, Session};
