//! Configuration management and validation.
//!
//! Provides the dashboard configuration: where plant data lives, which
//! files belong to each plant, and the defaults offered to the user.

use crate::constants::{
    DEFAULT_DATA_DIR, DEFAULT_HISTOGRAM_BINS, DEFAULT_WINDOW_SIZE, PLANT_1_GENERATION_FILE,
    PLANT_1_WEATHER_FILE, PLANT_2_GENERATION_FILE, PLANT_2_WEATHER_FILE,
};
use crate::error::{DashboardError, Result};
use crate::models::Plant;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Source files of a single plant, relative to the data directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantSource {
    /// Generation readings file
    pub generation_file: String,

    /// Weather sensor readings file
    pub weather_file: String,
}

impl PlantSource {
    fn default_for(plant: Plant) -> Self {
        let (generation_file, weather_file) = match plant {
            Plant::Plant1 => (PLANT_1_GENERATION_FILE, PLANT_1_WEATHER_FILE),
            Plant::Plant2 => (PLANT_2_GENERATION_FILE, PLANT_2_WEATHER_FILE),
        };

        Self {
            generation_file: generation_file.to_string(),
            weather_file: weather_file.to_string(),
        }
    }
}

/// Global configuration for the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Directory containing the plant CSV files
    pub data_dir: PathBuf,

    /// Moving average window used when a request does not specify one
    pub default_window: i64,

    /// Number of equal-width bins for histogram charts
    pub histogram_bins: usize,

    /// Plant-specific source files
    pub sources: HashMap<Plant, PlantSource>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let sources = Plant::all()
            .into_iter()
            .map(|plant| (plant, PlantSource::default_for(plant)))
            .collect();

        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            default_window: DEFAULT_WINDOW_SIZE,
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            sources,
        }
    }
}

impl DashboardConfig {
    /// Create configuration reading from a custom data directory
    pub fn with_data_dir(mut self, data_dir: impl AsRef<Path>) -> Self {
        self.data_dir = data_dir.as_ref().to_path_buf();
        self
    }

    /// Create configuration with a custom default window
    pub fn with_default_window(mut self, window: i64) -> Self {
        self.default_window = window;
        self
    }

    /// Create configuration with a custom histogram bin count
    pub fn with_histogram_bins(mut self, bins: usize) -> Self {
        self.histogram_bins = bins;
        self
    }

    /// Override the source files of one plant
    pub fn with_source(mut self, plant: Plant, source: PlantSource) -> Self {
        self.sources.insert(plant, source);
        self
    }

    /// Get the source files for a plant, falling back to the standard names
    pub fn source_for(&self, plant: Plant) -> PlantSource {
        self.sources
            .get(&plant)
            .cloned()
            .unwrap_or_else(|| PlantSource::default_for(plant))
    }

    /// Check the configured defaults are usable
    pub fn validate(&self) -> Result<()> {
        if self.default_window < 1 {
            return Err(DashboardError::Configuration {
                message: format!(
                    "default window must be at least 1, got {}",
                    self.default_window
                ),
            });
        }

        if self.histogram_bins == 0 {
            return Err(DashboardError::Configuration {
                message: "histogram bins must be at least 1".to_string(),
            });
        }

        debug!(
            "Configuration valid: data_dir={}, window={}, bins={}",
            self.data_dir.display(),
            self.default_window,
            self.histogram_bins
        );
        Ok(())
    }
}
