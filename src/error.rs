//! Error handling for solar dashboard operations.
//!
//! Provides error types with context for data source loading, window
//! validation, and reductions over empty datasets.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Data source error in {origin}: {reason}")]
    DataSource { origin: String, reason: String },

    #[error("Invalid moving average window: {window} (must be at least 1)")]
    InvalidWindow { window: i64 },

    #[error("Cannot reduce over empty {dataset} dataset")]
    EmptyDataset { dataset: String },

    #[error("Column not found or not numeric: {column}")]
    ColumnNotFound { column: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl DashboardError {
    /// Create a data source error
    pub fn data_source(origin: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DataSource {
            origin: origin.into(),
            reason: reason.into(),
        }
    }

    /// Create a column not found error
    pub fn column_not_found(column: impl Into<String>) -> Self {
        Self::ColumnNotFound {
            column: column.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
