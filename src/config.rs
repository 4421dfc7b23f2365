use crate::error::Result;
use crate::utils::constants::{
    CONFIG_FILE, DEFAULT_PREVIEW_ROWS, DEFAULT_REPORTED_MIN_TEMP, ENV_PREFIX, MEASUREMENTS_FILE,
    POLLUTANT_LEVELS_FILE, STATION_EXTREMES_FILE,
};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Locations of the three source tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSources {
    pub measurements: PathBuf,
    pub pollutant_levels: PathBuf,
    pub station_extremes: PathBuf,
}

impl DataSources {
    /// Default file names inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            measurements: dir.join(MEASUREMENTS_FILE),
            pollutant_levels: dir.join(POLLUTANT_LEVELS_FILE),
            station_extremes: dir.join(STATION_EXTREMES_FILE),
        }
    }
}

impl Default for DataSources {
    fn default() -> Self {
        Self {
            measurements: PathBuf::from(MEASUREMENTS_FILE),
            pollutant_levels: PathBuf::from(POLLUTANT_LEVELS_FILE),
            station_extremes: PathBuf::from(STATION_EXTREMES_FILE),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReportOptions {
    /// Published minimum temperature. Shown as-is, never recomputed.
    pub reported_min_temp: f64,
    pub preview_rows: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            reported_min_temp: DEFAULT_REPORTED_MIN_TEMP,
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub data: DataSources,
    pub report: ReportOptions,
}

impl AppConfig {
    /// Layered load: defaults, then the config file, then `AIRQ__*`
    /// environment variables.
    ///
    /// An explicit `path` must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = Self::default();

        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::from(Path::new(CONFIG_FILE)).required(false),
        };

        let config = Config::builder()
            .set_default(
                "data.measurements",
                defaults.data.measurements.to_string_lossy().into_owned(),
            )?
            .set_default(
                "data.pollutant_levels",
                defaults.data.pollutant_levels.to_string_lossy().into_owned(),
            )?
            .set_default(
                "data.station_extremes",
                defaults.data.station_extremes.to_string_lossy().into_owned(),
            )?
            .set_default("report.reported_min_temp", defaults.report.reported_min_temp)?
            .set_default("report.preview_rows", defaults.report.preview_rows as i64)?
            .add_source(file)
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.data.measurements, PathBuf::from(MEASUREMENTS_FILE));
        assert_eq!(config.report.reported_min_temp, -15.6);
        assert_eq!(config.report.preview_rows, 50);
    }

    #[test]
    fn test_data_sources_in_dir() {
        let sources = DataSources::in_dir(Path::new("data"));
        assert_eq!(sources.station_extremes, PathBuf::from("data/max_min.csv"));
    }

    #[test]
    fn test_load_from_file_overrides_defaults() -> Result<()> {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
        writeln!(file, "[data]")?;
        writeln!(file, "measurements = \"fixtures/beijing.csv\"")?;
        writeln!(file, "[report]")?;
        writeln!(file, "reported_min_temp = -20.5")?;
        file.flush()?;

        let config = AppConfig::load(Some(file.path()))?;

        assert_eq!(config.data.measurements, PathBuf::from("fixtures/beijing.csv"));
        assert_eq!(
            config.data.pollutant_levels,
            PathBuf::from(POLLUTANT_LEVELS_FILE)
        );
        assert_eq!(config.report.reported_min_temp, -20.5);
        assert_eq!(config.report.preview_rows, DEFAULT_PREVIEW_ROWS);

        Ok(())
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        assert!(AppConfig::load(Some(Path::new("missing/airq.toml"))).is_err());
    }
}
