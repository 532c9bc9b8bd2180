//! Plant data loading and timestamp normalization.
//!
//! Reads the generation and weather CSV files of a plant into Polars
//! frames, parses `DATE_TIME` day-first into a millisecond `Datetime`
//! column and casts the required measurement columns to `Float64`.

use crate::config::DashboardConfig;
use crate::constants::{
    DATE_FORMATS, DATE_TIME, DATE_TIME_FORMATS, MISSING_VALUE_TOKENS, SOURCE_KEY,
};
use crate::error::{DashboardError, Result};
use crate::models::{DataKind, Dataset, Plant, datetime_to_millis};
use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// Load the generation and weather datasets of a plant
pub fn load_plant(config: &DashboardConfig, plant: Plant) -> Result<(Dataset, Dataset)> {
    let source = config.source_for(plant);
    info!("Loading data for {}", plant);

    let generation = load_dataset(
        &config.data_dir.join(&source.generation_file),
        DataKind::Generation,
        plant,
    )?;
    let weather = load_dataset(
        &config.data_dir.join(&source.weather_file),
        DataKind::Weather,
        plant,
    )?;

    info!(
        "Loaded {} generation rows and {} weather rows for {}",
        generation.height(),
        weather.height(),
        plant
    );

    Ok((generation, weather))
}

/// Load a single CSV file as a dataset of the given kind
pub fn load_dataset(path: &Path, kind: DataKind, plant: Plant) -> Result<Dataset> {
    let origin = path.display().to_string();

    if !path.is_file() {
        return Err(DashboardError::data_source(&origin, "file not found"));
    }

    debug!("Reading {} data from {}", kind, origin);

    // Missing-value markers become nulls, not NaN floats or text
    let null_values = NullValues::AllColumns(
        MISSING_VALUE_TOKENS
            .iter()
            .map(|token| PlSmallStr::from_str(token))
            .collect(),
    );

    let frame = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .with_parse_options(CsvParseOptions::default().with_null_values(Some(null_values)))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .and_then(|reader| reader.finish())
        .map_err(|e| DashboardError::data_source(&origin, format!("unreadable CSV: {}", e)))?;

    let frame = normalize_frame(kind, frame, &origin)?;
    Ok(Dataset::from_normalized(kind, plant, frame))
}

/// Validate a raw frame against the schema of `kind` and normalize its types.
///
/// `DATE_TIME` becomes a millisecond `Datetime` column and every required
/// numeric column becomes `Float64`. Other columns pass through untouched.
pub(crate) fn normalize_frame(kind: DataKind, mut frame: DataFrame, origin: &str) -> Result<DataFrame> {
    for required in [DATE_TIME, SOURCE_KEY] {
        if frame.column(required).is_err() {
            return Err(DashboardError::data_source(
                origin,
                format!("missing required column '{}'", required),
            ));
        }
    }

    // Replace DATE_TIME with a millisecond Datetime column
    let timestamps = normalize_timestamps(&frame, origin)?;
    frame.with_column(timestamps)?;

    // Measurement columns must cast to Float64 without losing values
    for &name in kind.numeric_columns() {
        let column = frame.column(name).map_err(|_| {
            DashboardError::data_source(origin, format!("missing required column '{}'", name))
        })?;

        let values = column
            .as_materialized_series()
            .strict_cast(&DataType::Float64)
            .map_err(|e| {
                DashboardError::data_source(
                    origin,
                    format!("column '{}' is not numeric: {}", name, e),
                )
            })?;
        frame.with_column(values)?;
    }

    debug!(
        "Normalized {} frame from {}: {} rows, {} columns",
        kind,
        origin,
        frame.height(),
        frame.width()
    );

    Ok(frame)
}

/// Convert the `DATE_TIME` column into a millisecond `Datetime` series
fn normalize_timestamps(frame: &DataFrame, origin: &str) -> Result<Series> {
    let column = frame.column(DATE_TIME)?.as_materialized_series();

    match column.dtype() {
        DataType::String => {
            // Fail on the first empty or unparseable row
            let mut millis = Vec::with_capacity(column.len());
            for (row, value) in column.str()?.into_iter().enumerate() {
                let raw = value.ok_or_else(|| {
                    DashboardError::data_source(origin, format!("empty {} at row {}", DATE_TIME, row))
                })?;
                let parsed = parse_day_first(raw).ok_or_else(|| {
                    DashboardError::data_source(
                        origin,
                        format!("unparseable {} '{}' at row {}", DATE_TIME, raw, row),
                    )
                })?;
                millis.push(datetime_to_millis(parsed));
            }

            Ok(Int64Chunked::from_vec(DATE_TIME.into(), millis)
                .into_datetime(TimeUnit::Milliseconds, None)
                .into_series())
        }
        // Frames built in memory may already carry parsed timestamps
        DataType::Datetime(_, _) => {
            if column.null_count() > 0 {
                return Err(DashboardError::data_source(
                    origin,
                    format!("{} contains missing timestamps", DATE_TIME),
                ));
            }
            Ok(column.cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?)
        }
        other => Err(DashboardError::data_source(
            origin,
            format!("{} has unsupported type {}", DATE_TIME, other),
        )),
    }
}

/// Parse a timestamp with day-first precedence.
///
/// `03/04/2020 10:00` is 3 April. ISO `YYYY-MM-DD` forms are accepted too,
/// and bare dates resolve to midnight.
pub fn parse_day_first(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
                .map(|date| date.and_time(chrono::NaiveTime::MIN))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use std::fs;
    use tempfile::TempDir;

    const GENERATION_CSV: &str = "\
DATE_TIME,PLANT_ID,SOURCE_KEY,DC_POWER,AC_POWER,DAILY_YIELD,TOTAL_YIELD
15-05-2020 00:00,4135001,1BY6WEcLGh8j5v7,0,0,0,6259559
15-05-2020 00:15,4135001,1BY6WEcLGh8j5v7,10.5,9.8,1.25,6259560
03-04-2020 12:00,4135001,1IF53ai7Xc0U56Y,120.0,115.5,300,6183645
";

    const WEATHER_CSV: &str = "\
DATE_TIME,PLANT_ID,SOURCE_KEY,AMBIENT_TEMPERATURE,MODULE_TEMPERATURE,IRRADIATION
2020-05-15 00:00:00,4135001,HmiyD2TTLFNqkNe,25.18,22.86,0
2020-05-15 00:15:00,4135001,HmiyD2TTLFNqkNe,25.08,22.76,0
";

    fn write_file(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_parse_day_first_formats() {
        let parsed = parse_day_first("15-05-2020 09:00").unwrap();
        assert_eq!((parsed.day(), parsed.month(), parsed.year()), (15, 5, 2020));
        assert_eq!(parsed.hour(), 9);

        let ambiguous = parse_day_first("03/04/2020").unwrap();
        assert_eq!(ambiguous.day(), 3);
        assert_eq!(ambiguous.month(), 4);

        let iso = parse_day_first("2020-05-15 23:45:00").unwrap();
        assert_eq!((iso.day(), iso.month(), iso.minute()), (15, 5, 45));

        assert!(parse_day_first("not a date").is_none());
        assert!(parse_day_first("").is_none());
    }

    #[test]
    fn test_load_generation_dataset() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "gen.csv", GENERATION_CSV);

        let dataset = load_dataset(&path, DataKind::Generation, Plant::Plant1).unwrap();

        assert_eq!(dataset.height(), 3);
        assert_eq!(dataset.kind(), DataKind::Generation);
        assert_eq!(
            dataset.frame().column(DATE_TIME).unwrap().dtype(),
            &DataType::Datetime(TimeUnit::Milliseconds, None)
        );
        assert_eq!(
            dataset.frame().column("AC_POWER").unwrap().dtype(),
            &DataType::Float64
        );

        // Load order is preserved, not sorted by time
        let timestamps = dataset.timestamps().unwrap();
        assert_eq!(timestamps[2].month(), 4);
        assert_eq!(timestamps[2].day(), 3);
    }

    #[test]
    fn test_load_weather_dataset_with_iso_timestamps() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "weather.csv", WEATHER_CSV);

        let dataset = load_dataset(&path, DataKind::Weather, Plant::Plant2).unwrap();

        assert_eq!(dataset.height(), 2);
        assert_eq!(dataset.plant(), Plant::Plant2);
        let values = dataset.numeric_values("AMBIENT_TEMPERATURE").unwrap();
        assert_eq!(values, vec![Some(25.18), Some(25.08)]);
    }

    #[test]
    fn test_load_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "gen.csv", GENERATION_CSV);

        let first = load_dataset(&path, DataKind::Generation, Plant::Plant1).unwrap();
        let second = load_dataset(&path, DataKind::Generation, Plant::Plant1).unwrap();

        assert!(first.frame().equals_missing(second.frame()));
    }

    #[test]
    fn test_missing_file_is_data_source_error() {
        let dir = TempDir::new().unwrap();
        let result = load_dataset(
            &dir.path().join("absent.csv"),
            DataKind::Generation,
            Plant::Plant1,
        );

        assert!(matches!(result, Err(DashboardError::DataSource { .. })));
    }

    #[test]
    fn test_bad_timestamp_is_data_source_error() {
        let dir = TempDir::new().unwrap();
        let contents = GENERATION_CSV.replace("03-04-2020 12:00", "yesterday");
        let path = write_file(&dir, "gen.csv", &contents);

        let result = load_dataset(&path, DataKind::Generation, Plant::Plant1);

        match result {
            Err(DashboardError::DataSource { reason, .. }) => {
                assert!(reason.contains("yesterday"), "unexpected reason: {}", reason)
            }
            other => panic!("expected DataSource error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_column_is_data_source_error() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "weather.csv", WEATHER_CSV);

        // A weather file does not satisfy the generation schema
        let result = load_dataset(&path, DataKind::Generation, Plant::Plant1);

        assert!(matches!(result, Err(DashboardError::DataSource { .. })));
    }

    #[test]
    fn test_non_numeric_measurement_is_data_source_error() {
        let dir = TempDir::new().unwrap();
        let contents = WEATHER_CSV.replace("25.08", "warm");
        let path = write_file(&dir, "weather.csv", &contents);

        let result = load_dataset(&path, DataKind::Weather, Plant::Plant1);

        assert!(matches!(result, Err(DashboardError::DataSource { .. })));
    }

    #[test]
    fn test_missing_value_markers_load_as_nulls() {
        let dir = TempDir::new().unwrap();
        let csv = "\
DATE_TIME,PLANT_ID,SOURCE_KEY,DC_POWER,AC_POWER,DAILY_YIELD,TOTAL_YIELD
15-05-2020 00:00,4135001,1BY6WEcLGh8j5v7,NaN,NaN,nan,6259559
15-05-2020 00:15,4135001,1BY6WEcLGh8j5v7,,,NA,6259560
15-05-2020 00:30,4135001,1BY6WEcLGh8j5v7,33.0,30.0,N/A,6259561
";
        let path = write_file(&dir, "gen.csv", csv);

        let dataset = load_dataset(&path, DataKind::Generation, Plant::Plant1).unwrap();

        assert_eq!(
            dataset.numeric_values("AC_POWER").unwrap(),
            vec![None, None, Some(30.0)]
        );
        assert_eq!(dataset.frame().column("AC_POWER").unwrap().null_count(), 2);
        assert_eq!(dataset.numeric_values("DAILY_YIELD").unwrap(), vec![None; 3]);

        let summary = crate::transform::describe(&dataset).unwrap();
        let ac = summary.get("AC_POWER").unwrap();
        assert_eq!(ac.count, 1);
        assert_eq!(ac.mean, 30.0);
        assert_eq!(ac.max, 30.0);
        assert_eq!(summary.get("DAILY_YIELD").unwrap().count, 0);
    }

    #[test]
    fn test_load_plant_reads_both_sources() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "Plant_1_Generation_Data.csv", GENERATION_CSV);
        write_file(&dir, "Plant_1_Weather_Sensor_Data.csv", WEATHER_CSV);

        let config = DashboardConfig::default().with_data_dir(dir.path());
        let (generation, weather) = load_plant(&config, Plant::Plant1).unwrap();

        assert_eq!(generation.height(), 3);
        assert_eq!(weather.height(), 2);
        assert!(load_plant(&config, Plant::Plant2).is_err());
    }
}
