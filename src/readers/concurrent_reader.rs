use crate::config::DataSources;
use crate::error::Result;
use crate::models::{Measurement, StationExtremes, StationPollutantLevels};
use crate::readers::{MeasurementReader, StationReader};
use std::path::PathBuf;
use tokio::task::JoinHandle;
use tracing::debug;

/// Reads the three source tables at the same time, each on a blocking worker.
pub struct ConcurrentReader {
    delimiter: u8,
}

impl ConcurrentReader {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub async fn read_all(&self, sources: &DataSources) -> Result<SourceTables> {
        let delimiter = self.delimiter;
        let measurements_path: PathBuf = sources.measurements.clone();
        let levels_path: PathBuf = sources.pollutant_levels.clone();
        let extremes_path: PathBuf = sources.station_extremes.clone();

        let measurements_handle: JoinHandle<Result<Vec<Measurement>>> =
            tokio::task::spawn_blocking(move || {
                MeasurementReader::with_delimiter(delimiter).read_measurements(&measurements_path)
            });

        let levels_handle: JoinHandle<Result<Vec<StationPollutantLevels>>> =
            tokio::task::spawn_blocking(move || {
                StationReader::with_delimiter(delimiter).read_pollutant_levels(&levels_path)
            });

        let extremes_handle: JoinHandle<Result<Vec<StationExtremes>>> =
            tokio::task::spawn_blocking(move || {
                StationReader::with_delimiter(delimiter).read_extremes(&extremes_path)
            });

        let (measurements, pollutant_levels, station_extremes) =
            tokio::try_join!(measurements_handle, levels_handle, extremes_handle)?;

        let tables = SourceTables {
            measurements: measurements?,
            pollutant_levels: pollutant_levels?,
            station_extremes: station_extremes?,
        };
        debug!(
            measurements = tables.measurements.len(),
            pollutant_levels = tables.pollutant_levels.len(),
            station_extremes = tables.station_extremes.len(),
            "source tables read"
        );

        Ok(tables)
    }

    /// Sequential counterpart of [`ConcurrentReader::read_all`].
    pub fn read_all_blocking(&self, sources: &DataSources) -> Result<SourceTables> {
        let measurements =
            MeasurementReader::with_delimiter(self.delimiter).read_measurements(&sources.measurements)?;
        let station_reader = StationReader::with_delimiter(self.delimiter);
        let pollutant_levels = station_reader.read_pollutant_levels(&sources.pollutant_levels)?;
        let station_extremes = station_reader.read_extremes(&sources.station_extremes)?;

        Ok(SourceTables {
            measurements,
            pollutant_levels,
            station_extremes,
        })
    }
}

impl Default for ConcurrentReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Container for the three loaded tables
#[derive(Debug)]
pub struct SourceTables {
    pub measurements: Vec<Measurement>,
    pub pollutant_levels: Vec<StationPollutantLevels>,
    pub station_extremes: Vec<StationExtremes>,
}
