//! Date-range filtering of datasets.

use crate::error::Result;
use crate::models::{DateRange, Dataset, datetime_to_millis, millis_to_datetime};
use chrono::NaiveDateTime;
use polars::prelude::*;
use tracing::debug;

/// Keep rows whose timestamp lies within `range`, both ends inclusive.
///
/// Relative row order is preserved and the input is left untouched. An
/// inverted or non-overlapping range yields an empty dataset.
pub fn filter_by_date(dataset: &Dataset, range: &DateRange) -> Result<Dataset> {
    let start = datetime_to_millis(range.start);
    let end = datetime_to_millis(range.end);

    let mask: BooleanChunked = dataset
        .timestamp_millis()?
        .into_iter()
        .map(|millis| millis.is_some_and(|t| start <= t && t <= end))
        .collect();

    let frame = dataset.frame().filter(&mask)?;

    debug!(
        "Filtered {} {} rows to {} between {} and {}",
        dataset.height(),
        dataset.kind(),
        frame.height(),
        range.start,
        range.end
    );

    Ok(dataset.with_frame(frame))
}

/// Earliest and latest timestamps of a dataset, `None` when it is empty
pub fn date_bounds(dataset: &Dataset) -> Result<Option<(NaiveDateTime, NaiveDateTime)>> {
    let millis = dataset.timestamp_millis()?;
    let min = millis.iter().flatten().min().copied();
    let max = millis.iter().flatten().max().copied();

    Ok(match (min, max) {
        (Some(min), Some(max)) => millis_to_datetime(min).zip(millis_to_datetime(max)),
        _ => None,
    })
}
