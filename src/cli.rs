//! Command-line interface for the solar dashboard.
//!
//! `insights` prints the headline numbers for a plant; `explore` filters,
//! smooths and summarises one of its datasets.

use crate::charts::ChartKind;
use crate::config::DashboardConfig;
use crate::constants::{DATE_FORMATS, DEFAULT_DATA_DIR, DEFAULT_HISTOGRAM_BINS};
use crate::models::{DataKind, DateRange, Plant};
use crate::report::{render_exploration, render_insights};
use crate::session::{ExploreRequest, Session, default_range};
use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, info};

/// CLI arguments for the solar plant dashboard
#[derive(Debug, Clone, Parser)]
#[command(
    name = "solar-dashboard",
    version,
    about = "Explore solar plant generation and weather sensor data",
    long_about = "Loads the generation and weather sensor CSV files of a solar plant, \
                  filters them by date, smooths them with a moving average and reports \
                  descriptive statistics, chart data and key insights."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding the plant CSV files
    #[arg(
        long = "data-dir",
        value_name = "PATH",
        default_value = DEFAULT_DATA_DIR,
        global = true
    )]
    pub data_dir: PathBuf,

    /// Number of histogram bins for histogram charts
    #[arg(long, value_name = "N", default_value_t = DEFAULT_HISTOGRAM_BINS, global = true)]
    pub bins: usize,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors
    #[arg(short = 'q', long = "quiet", global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Show key insights for a plant
    Insights(InsightsArgs),
    /// Filter, smooth and summarise a plant dataset
    Explore(ExploreArgs),
}

#[derive(Debug, Clone, Parser)]
pub struct InsightsArgs {
    /// Plant to report on (1 or 2)
    #[arg(short, long, default_value = "1")]
    pub plant: Plant,
}

#[derive(Debug, Clone, Parser)]
pub struct ExploreArgs {
    /// Plant to explore (1 or 2)
    #[arg(short, long, default_value = "1")]
    pub plant: Plant,

    /// Dataset to explore (generation or weather)
    #[arg(short, long, default_value = "generation")]
    pub data: DataKind,

    /// First day of the range, defaults to the first reading's date
    #[arg(long, value_name = "DATE", value_parser = parse_date)]
    pub start: Option<NaiveDate>,

    /// Last day of the range (taken at midnight), defaults to the last reading's date
    #[arg(long, value_name = "DATE", value_parser = parse_date)]
    pub end: Option<NaiveDate>,

    /// Moving average window in rows
    #[arg(short, long, allow_negative_numbers = true)]
    pub window: Option<i64>,

    /// Print descriptive statistics
    #[arg(long)]
    pub stats: bool,

    /// Prepare data for a chart (line, bar, scatter, boxplot, histogram, pie, heatmap)
    #[arg(short, long)]
    pub chart: Option<ChartKind>,
}

impl Args {
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    pub fn config(&self) -> DashboardConfig {
        DashboardConfig::default()
            .with_data_dir(&self.data_dir)
            .with_histogram_bins(self.bins)
    }
}

/// Parse a calendar date in any of the accepted day-first or ISO layouts
pub fn parse_date(raw: &str) -> std::result::Result<NaiveDate, String> {
    let trimmed = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| {
            format!(
                "invalid date '{}', expected one of {}",
                raw,
                DATE_FORMATS.join(", ")
            )
        })
}

/// Set up structured logging to stderr
pub fn setup_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    // Create filter, RUST_LOG takes precedence over -v/-q
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("solar_dashboard={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init()
        .context("Failed to initialise logging")?;

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Run the selected command
pub fn run(args: Args) -> Result<()> {
    setup_logging(&args)?;
    debug!("Command line arguments: {:?}", args);

    let config = args.config();
    config.validate()?;

    match &args.command {
        Commands::Insights(insights_args) => run_insights(config, insights_args),
        Commands::Explore(explore_args) => run_explore(config, explore_args),
    }
}

fn run_insights(config: DashboardConfig, args: &InsightsArgs) -> Result<()> {
    let session = Session::open(config, args.plant)
        .with_context(|| format!("Failed to load data for {}", args.plant))?;

    let insights = session.insights()?;
    info!("Computed insights for {}", args.plant);

    print!("{}", render_insights(session.plant(), &insights));
    Ok(())
}

fn run_explore(config: DashboardConfig, args: &ExploreArgs) -> Result<()> {
    let session = Session::open(config, args.plant)
        .with_context(|| format!("Failed to load data for {}", args.plant))?;

    // Unset flags keep the session defaults
    let mut request = ExploreRequest::new(args.data);
    if let Some(range) = requested_range(&session, args)? {
        request = request.with_range(range);
    }
    if let Some(window) = args.window {
        request = request.with_window(window);
    }
    if args.stats {
        request = request.with_statistics();
    }
    if let Some(chart) = args.chart {
        request = request.with_chart(chart);
    }

    let exploration = session.explore(&request)?;
    print!("{}", render_exploration(session.plant(), &exploration));
    Ok(())
}

/// Range from `--start`/`--end`, filling a missing end from the dataset bounds
fn requested_range(session: &Session, args: &ExploreArgs) -> Result<Option<DateRange>> {
    if args.start.is_none() && args.end.is_none() {
        return Ok(None);
    }

    // Fill whichever end is missing from the dataset's own bounds
    let bounds = default_range(session.dataset(args.data))?;
    let start = match (args.start, bounds) {
        (Some(start), _) => start,
        (None, Some(bounds)) => bounds.start.date(),
        (None, None) => bail!("--start is required when the {} dataset is empty", args.data),
    };
    let end = match (args.end, bounds) {
        (Some(end), _) => end,
        (None, Some(bounds)) => bounds.end.date(),
        (None, None) => bail!("--end is required when the {} dataset is empty", args.data),
    };

    Ok(Some(DateRange::from_dates(start, end)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_explore_command() {
        let args = Args::try_parse_from([
            "solar-dashboard",
            "--data-dir",
            "/data/solar",
            "explore",
            "--plant",
            "2",
            "--data",
            "weather",
            "--start",
            "15-05-2020",
            "--end",
            "2020-05-20",
            "--window",
            "12",
            "--stats",
            "--chart",
            "heatmap",
        ])
        .unwrap();

        assert_eq!(args.data_dir, PathBuf::from("/data/solar"));
        match args.command {
            Commands::Explore(explore) => {
                assert_eq!(explore.plant, Plant::Plant2);
                assert_eq!(explore.data, DataKind::Weather);
                assert_eq!(explore.start, NaiveDate::from_ymd_opt(2020, 5, 15));
                assert_eq!(explore.end, NaiveDate::from_ymd_opt(2020, 5, 20));
                assert_eq!(explore.window, Some(12));
                assert!(explore.stats);
                assert_eq!(explore.chart, Some(ChartKind::Heatmap));
            }
            other => panic!("expected explore, got {:?}", other),
        }
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["solar-dashboard", "insights"]).unwrap();

        assert_eq!(args.data_dir, PathBuf::from("."));
        assert_eq!(args.bins, 50);
        assert_eq!(args.get_log_level(), "warn");
        match args.command {
            Commands::Insights(insights) => assert_eq!(insights.plant, Plant::Plant1),
            other => panic!("expected insights, got {:?}", other),
        }
    }

    #[test]
    fn test_log_levels() {
        let args = Args::try_parse_from(["solar-dashboard", "-vv", "insights"]).unwrap();
        assert_eq!(args.get_log_level(), "debug");

        let args = Args::try_parse_from(["solar-dashboard", "insights", "-q"]).unwrap();
        assert_eq!(args.get_log_level(), "error");

        assert!(Args::try_parse_from(["solar-dashboard", "-v", "-q", "insights"]).is_err());
    }

    #[test]
    fn test_negative_window_reaches_validation() {
        let args =
            Args::try_parse_from(["solar-dashboard", "explore", "--window", "-3"]).unwrap();

        match args.command {
            Commands::Explore(explore) => assert_eq!(explore.window, Some(-3)),
            other => panic!("expected explore, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_unknown_values() {
        assert!(Args::try_parse_from(["solar-dashboard", "insights", "--plant", "3"]).is_err());
        assert!(Args::try_parse_from(["solar-dashboard", "explore", "--chart", "radar"]).is_err());
        assert!(
            Args::try_parse_from(["solar-dashboard", "explore", "--start", "May 15"]).is_err()
        );
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2020, 6, 17);
        assert_eq!(parse_date("17-06-2020").ok(), expected);
        assert_eq!(parse_date("17/06/2020").ok(), expected);
        assert_eq!(parse_date(" 2020-06-17 ").ok(), expected);
        assert!(parse_date("2020/06/17").is_err());
    }
}
