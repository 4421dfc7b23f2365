/// Default source file names
pub const MEASUREMENTS_FILE: &str = "air_quality_dataset.csv";
pub const POLLUTANT_LEVELS_FILE: &str = "kadar_polutan.csv";
pub const STATION_EXTREMES_FILE: &str = "max_min.csv";

/// Default configuration file, looked up in the working directory
pub const CONFIG_FILE: &str = "airq-report.toml";
pub const ENV_PREFIX: &str = "AIRQ";

/// Column headers
pub const STATION_HEADER: &str = "station";
pub const DATETIME_HEADER: &str = "datetime";
pub const YEAR_HEADER: &str = "year";
pub const MONTH_HEADER: &str = "month";
pub const DAY_HEADER: &str = "day";
pub const HOUR_HEADER: &str = "hour";

/// Accepted timestamp layouts for the datetime column
pub const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"];
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Cell values read as missing
pub const MISSING_MARKERS: [&str; 4] = ["", "NA", "NaN", "nan"];

/// Display rounding
pub const DISPLAY_DECIMALS: u32 = 2;

/// Minimum paired observations for a correlation coefficient
pub const MIN_PAIRED_OBSERVATIONS: usize = 2;

/// Reported minimum temperature (°C) published with the station extremes
pub const DEFAULT_REPORTED_MIN_TEMP: f64 = -15.6;

/// Rows shown by the overview preview
pub const DEFAULT_PREVIEW_ROWS: usize = 50;
