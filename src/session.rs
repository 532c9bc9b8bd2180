//! Session-scoped dashboard state.
//!
//! A `Session` owns the datasets of the currently selected plant and
//! answers the presentation layer's requests against them. Nothing is
//! shared between sessions; switching plant replaces both datasets.

use crate::charts::{ChartData, ChartKind, ChartSpec, prepare_chart};
use crate::config::DashboardConfig;
use crate::error::{DashboardError, Result};
use crate::loader::load_plant;
use crate::models::{DataKind, DateRange, Dataset, Insights, Plant, StatisticsSummary};
use crate::transform::{date_bounds, describe, extract_insights, filter_by_date, with_moving_average};
use tracing::{debug, info};

/// One user's view of a plant's data
#[derive(Debug)]
pub struct Session {
    config: DashboardConfig,
    plant: Plant,
    generation: Dataset,
    weather: Dataset,
}

impl Session {
    /// Validate the configuration and load the plant's datasets
    pub fn open(config: DashboardConfig, plant: Plant) -> Result<Self> {
        config.validate()?;
        let (generation, weather) = load_plant(&config, plant)?;
        Ok(Self {
            config,
            plant,
            generation,
            weather,
        })
    }

    /// Build a session around datasets that are already in memory
    pub fn from_datasets(config: DashboardConfig, generation: Dataset, weather: Dataset) -> Result<Self> {
        config.validate()?;

        if generation.kind() != DataKind::Generation || weather.kind() != DataKind::Weather {
            return Err(DashboardError::Configuration {
                message: "session needs one generation and one weather dataset".to_string(),
            });
        }
        if generation.plant() != weather.plant() {
            return Err(DashboardError::Configuration {
                message: format!(
                    "datasets belong to different plants ({} and {})",
                    generation.plant(),
                    weather.plant()
                ),
            });
        }

        Ok(Self {
            config,
            plant: generation.plant(),
            generation,
            weather,
        })
    }

    pub fn plant(&self) -> Plant {
        self.plant
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn generation(&self) -> &Dataset {
        &self.generation
    }

    pub fn weather(&self) -> &Dataset {
        &self.weather
    }

    pub fn dataset(&self, kind: DataKind) -> &Dataset {
        match kind {
            DataKind::Generation => &self.generation,
            DataKind::Weather => &self.weather,
        }
    }

    /// Switch to another plant, reloading its data.
    ///
    /// Selecting the current plant again keeps the loaded data. On failure
    /// the session keeps its previous plant and datasets.
    pub fn select_plant(&mut self, plant: Plant) -> Result<()> {
        if plant == self.plant {
            debug!("{} already selected", plant);
            return Ok(());
        }

        // Load before mutating; a failed load leaves the session unchanged
        let (generation, weather) = load_plant(&self.config, plant)?;
        info!("Switched session from {} to {}", self.plant, plant);

        self.plant = plant;
        self.generation = generation;
        self.weather = weather;
        Ok(())
    }

    /// Headline insights over the full, unfiltered datasets
    pub fn insights(&self) -> Result<Insights> {
        extract_insights(&self.generation, &self.weather)
    }

    /// Filter, smooth and optionally describe and chart one dataset
    pub fn explore(&self, request: &ExploreRequest) -> Result<Exploration> {
        let source = self.dataset(request.data_kind);

        // Default to whole-day dataset bounds and the configured window
        let range = match request.range {
            Some(range) => Some(range),
            None => default_range(source)?,
        };
        let window = request.window.unwrap_or(self.config.default_window);

        // Smooth after filtering
        let filtered = match &range {
            Some(range) => filter_by_date(source, range)?,
            None => source.clone(),
        };
        let data = with_moving_average(&filtered, window)?;

        let statistics = if request.show_statistics {
            Some(describe(&data)?)
        } else {
            None
        };

        let chart = request
            .chart
            .map(|kind| prepare_chart(&data, kind, self.config.histogram_bins))
            .transpose()?;

        debug!(
            "Explored {} {} data: {} of {} rows, window {}",
            self.plant,
            request.data_kind,
            data.height(),
            source.height(),
            window
        );

        Ok(Exploration {
            range,
            window,
            data,
            statistics,
            chart,
        })
    }
}

/// Whole-day range covering a dataset, as offered by the date pickers.
///
/// Both ends are midnight of the first and last reading dates.
pub fn default_range(dataset: &Dataset) -> Result<Option<DateRange>> {
    Ok(date_bounds(dataset)?.map(|(min, max)| DateRange::from_dates(min.date(), max.date())))
}

/// Inputs collected by the explore view
#[derive(Debug, Clone, PartialEq)]
pub struct ExploreRequest {
    pub data_kind: DataKind,
    /// Dataset date bounds when absent
    pub range: Option<DateRange>,
    /// Configured default window when absent
    pub window: Option<i64>,
    pub show_statistics: bool,
    pub chart: Option<ChartKind>,
}

impl ExploreRequest {
    pub fn new(data_kind: DataKind) -> Self {
        Self {
            data_kind,
            range: None,
            window: None,
            show_statistics: false,
            chart: None,
        }
    }

    pub fn with_range(mut self, range: DateRange) -> Self {
        self.range = Some(range);
        self
    }

    pub fn with_window(mut self, window: i64) -> Self {
        self.window = Some(window);
        self
    }

    pub fn with_statistics(mut self) -> Self {
        self.show_statistics = true;
        self
    }

    pub fn with_chart(mut self, chart: ChartKind) -> Self {
        self.chart = Some(chart);
        self
    }
}

/// Result of an explore request
#[derive(Debug, Clone)]
pub struct Exploration {
    /// Range actually applied, `None` for an empty source dataset
    pub range: Option<DateRange>,
    pub window: i64,
    /// Filtered rows with the moving average column attached
    pub data: Dataset,
    pub statistics: Option<StatisticsSummary>,
    pub chart: Option<(ChartSpec, ChartData)>,
}
