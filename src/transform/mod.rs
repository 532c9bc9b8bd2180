//! Data transforms applied between loading and presentation.
//!
//! Each transform is a pure function of its inputs: date filtering,
//! positional smoothing, descriptive statistics and headline insights.

pub mod filter;
pub mod insights;
pub mod smoothing;
pub mod statistics;

#[cfg(test)]
pub mod tests;

pub use filter::{date_bounds, filter_by_date};
pub use insights::{INSIGHT_FIELDS, extract_insights};
pub use smoothing::{moving_average, with_moving_average};
pub use statistics::describe;
