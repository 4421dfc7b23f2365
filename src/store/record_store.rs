use crate::config::DataSources;
use crate::error::Result;
use crate::models::{Measurement, StationExtremes, StationPollutantLevels};
use crate::readers::{ConcurrentReader, SourceTables};
use std::collections::BTreeSet;
use tracing::info;

/// Immutable snapshot of the loaded source tables.
///
/// Owns the raw measurements and the two precomputed per-station tables.
/// Everything derived from it is computed on request and owned by the caller.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    measurements: Vec<Measurement>,
    pollutant_levels: Vec<StationPollutantLevels>,
    station_extremes: Vec<StationExtremes>,
}

impl RecordStore {
    pub fn from_parts(
        measurements: Vec<Measurement>,
        pollutant_levels: Vec<StationPollutantLevels>,
        station_extremes: Vec<StationExtremes>,
    ) -> Self {
        Self {
            measurements,
            pollutant_levels,
            station_extremes,
        }
    }

    /// Load all three sources one after another.
    pub fn load(sources: &DataSources) -> Result<Self> {
        let tables = ConcurrentReader::new().read_all_blocking(sources)?;
        Ok(Self::from_tables(tables))
    }

    /// Load all three sources concurrently.
    pub async fn load_concurrent(sources: &DataSources) -> Result<Self> {
        let tables = ConcurrentReader::new().read_all(sources).await?;
        Ok(Self::from_tables(tables))
    }

    fn from_tables(tables: SourceTables) -> Self {
        let store = Self::from_parts(
            tables.measurements,
            tables.pollutant_levels,
            tables.station_extremes,
        );
        info!(
            rows = store.len(),
            stations = store.stations().len(),
            "record store loaded"
        );
        store
    }

    /// Measurements in load order.
    pub fn rows(&self) -> &[Measurement] {
        &self.measurements
    }

    pub fn pollutant_levels(&self) -> &[StationPollutantLevels] {
        &self.pollutant_levels
    }

    pub fn station_extremes(&self) -> &[StationExtremes] {
        &self.station_extremes
    }

    pub fn len(&self) -> usize {
        self.measurements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }

    /// Distinct station names in the measurements, sorted.
    pub fn stations(&self) -> BTreeSet<&str> {
        self.measurements.iter().map(|m| m.station.as_str()).collect()
    }
}
