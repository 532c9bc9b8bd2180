//! Trailing moving averages over positional row order.
//!
//! The window slides over rows as loaded, not over calendar time, so the
//! result is only meaningful for datasets that are already time-ordered.

use crate::error::{DashboardError, Result};
use crate::models::Dataset;
use tracing::debug;

/// Trailing moving average of `column` with a window of `window` rows.
///
/// `out[i]` is the mean of rows `i-window+1..=i`. The first `window-1`
/// entries are `None`, as is any window containing a missing reading.
pub fn moving_average(dataset: &Dataset, column: &str, window: i64) -> Result<Vec<Option<f64>>> {
    let window = validate_window(window)?;
    let values = dataset.numeric_values(column)?;

    debug!(
        "Computing {}-row moving average of {} over {} rows",
        window,
        column,
        values.len()
    );

    Ok(rolling_mean(&values, window))
}

/// Smooth the kind's default column and attach it under the kind's
/// derived column name (`MA_AC_POWER` or `MA_AMBIENT_TEMP`)
pub fn with_moving_average(dataset: &Dataset, window: i64) -> Result<Dataset> {
    let kind = dataset.kind();
    let smoothed = moving_average(dataset, kind.smoothing_column(), window)?;
    dataset.with_derived_column(kind.smoothed_column_name(), smoothed)
}

fn validate_window(window: i64) -> Result<usize> {
    if window < 1 {
        return Err(DashboardError::InvalidWindow { window });
    }
    usize::try_from(window).map_err(|_| DashboardError::InvalidWindow { window })
}

/// Rolling mean over a slice of optional values; `window` must be non-zero
pub(crate) fn rolling_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    let mut output = vec![None; values.len().min(window.saturating_sub(1))];

    output.extend(values.windows(window).map(|slice| {
        slice
            .iter()
            .copied()
            .sum::<Option<f64>>()
            .map(|total| total / window as f64)
    }));

    output
}
