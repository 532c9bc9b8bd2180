//! Application constants for the solar dashboard
//!
//! Column names, timestamp formats, per-plant source file names and
//! default values used throughout the crate.

// =============================================================================
// Column Names
// =============================================================================

/// Timestamp column shared by both data kinds
pub const DATE_TIME: &str = "DATE_TIME";

/// Source-unit identifier (inverter or sensor) shared by both data kinds
pub const SOURCE_KEY: &str = "SOURCE_KEY";

/// Generation data columns
pub mod generation {
    pub const DC_POWER: &str = "DC_POWER";
    pub const AC_POWER: &str = "AC_POWER";
    pub const DAILY_YIELD: &str = "DAILY_YIELD";
    pub const TOTAL_YIELD: &str = "TOTAL_YIELD";

    /// Numeric columns every generation file must provide
    pub const NUMERIC_COLUMNS: &[&str] = &[DC_POWER, AC_POWER, DAILY_YIELD, TOTAL_YIELD];

    /// Derived moving average column attached by the dashboard
    pub const MA_AC_POWER: &str = "MA_AC_POWER";
}

/// Weather sensor columns
pub mod weather {
    pub const AMBIENT_TEMPERATURE: &str = "AMBIENT_TEMPERATURE";
    pub const MODULE_TEMPERATURE: &str = "MODULE_TEMPERATURE";
    pub const IRRADIATION: &str = "IRRADIATION";

    /// Numeric columns every weather file must provide
    pub const NUMERIC_COLUMNS: &[&str] = &[AMBIENT_TEMPERATURE, MODULE_TEMPERATURE, IRRADIATION];

    /// Derived moving average column attached by the dashboard
    pub const MA_AMBIENT_TEMP: &str = "MA_AMBIENT_TEMP";
}

// =============================================================================
// Timestamp Parsing
// =============================================================================

/// Date-time formats accepted for `DATE_TIME`, tried in order.
///
/// Day-first forms come first so that `03/04/2020` reads as 3 April.
pub const DATE_TIME_FORMATS: &[&str] = &[
    "%d-%m-%Y %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Date-only formats, interpreted as midnight
pub const DATE_FORMATS: &[&str] = &["%d-%m-%Y", "%d/%m/%Y", "%Y-%m-%d"];

/// Cell text read as a missing reading, as pandas `read_csv` does by default
pub const MISSING_VALUE_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

// =============================================================================
// Data Sources
// =============================================================================

pub const PLANT_1_GENERATION_FILE: &str = "Plant_1_Generation_Data.csv";
pub const PLANT_1_WEATHER_FILE: &str = "Plant_1_Weather_Sensor_Data.csv";
pub const PLANT_2_GENERATION_FILE: &str = "Plant_2_Generation_Data.csv";
pub const PLANT_2_WEATHER_FILE: &str = "Plant_2_Weather_Sensor_Data.csv";

// =============================================================================
// Defaults
// =============================================================================

/// Default moving average window offered by the dashboard
pub const DEFAULT_WINDOW_SIZE: i64 = 7;

/// Default histogram bin count
pub const DEFAULT_HISTOGRAM_BINS: usize = 50;

/// Default data directory (relative to the working directory)
pub const DEFAULT_DATA_DIR: &str = ".";
