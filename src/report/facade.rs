use crate::analyzers::{Aggregator, CorrelationEngine, TrendEngine};
use crate::config::ReportOptions;
use crate::error::{ReportError, Result};
use crate::models::{
    Column, CorrelationMatrix, HeadlineMetrics, Measurement, OverallExtremes, PollutantSummary,
    Pollutant, RainOverview, SeasonalProfile, StationExtremes, StationPollutantLevels,
    StationRainRange, StationTemperatureRange, TemperatureOverview, YearlyTrend,
};
use crate::store::RecordStore;
use crate::utils::constants::DISPLAY_DECIMALS;
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

/// Entry point for the presentation layer.
///
/// Holds a read-only handle to the store and recomputes every table on each
/// call, so results always reflect the store it was built over.
pub struct ReportFacade<'a> {
    store: &'a RecordStore,
    options: ReportOptions,
}

impl<'a> ReportFacade<'a> {
    pub fn new(store: &'a RecordStore) -> Self {
        Self {
            store,
            options: ReportOptions::default(),
        }
    }

    pub fn with_options(store: &'a RecordStore, options: ReportOptions) -> Self {
        Self { store, options }
    }

    pub fn get_station_summary(&self) -> Result<Vec<PollutantSummary>> {
        Aggregator::new().summarize_by_station(self.store.rows())
    }

    /// Rank correlations over every numeric column.
    pub fn get_correlations(&self) -> Result<CorrelationMatrix> {
        self.get_correlations_for(&Column::NUMERIC)
    }

    pub fn get_correlations_for(&self, columns: &[Column]) -> Result<CorrelationMatrix> {
        CorrelationEngine::new().correlation_matrix(self.store.rows(), columns)
    }

    pub fn get_yearly_trend(&self) -> Result<YearlyTrend> {
        self.get_yearly_trend_for(&Pollutant::ALL)
    }

    pub fn get_yearly_trend_for(&self, pollutants: &[Pollutant]) -> Result<YearlyTrend> {
        TrendEngine::new().yearly_means(self.store.rows(), pollutants)
    }

    pub fn get_seasonal_profile(&self) -> Result<SeasonalProfile> {
        self.get_seasonal_profile_for(&Pollutant::ALL)
    }

    pub fn get_seasonal_profile_for(&self, pollutants: &[Pollutant]) -> Result<SeasonalProfile> {
        TrendEngine::new().seasonal_means(self.store.rows(), pollutants)
    }

    pub fn get_extremes(&self) -> Result<OverallExtremes> {
        Aggregator::new().overall_extremes(self.store.rows())
    }

    /// The precomputed pollutant table, rounded for display.
    pub fn get_pollutant_levels(&self) -> Vec<StationPollutantLevels> {
        self.store
            .pollutant_levels()
            .iter()
            .map(|levels| levels.rounded(DISPLAY_DECIMALS))
            .collect()
    }

    /// The precomputed extremes table as supplied.
    pub fn get_station_extremes(&self) -> &[StationExtremes] {
        self.store.station_extremes()
    }

    /// Max temperature, rain and wind speed from the measurements, and the
    /// highest composite index from the precomputed pollutant table.
    pub fn get_headline_metrics(&self) -> Result<HeadlineMetrics> {
        let extremes = self.get_extremes()?;
        let max_pollution_index = self
            .store
            .pollutant_levels()
            .iter()
            .map(|levels| levels.total_index)
            .filter(|v| !v.is_nan())
            .fold(f64::NAN, f64::max);

        Ok(HeadlineMetrics {
            max_temp: extremes.max_temp,
            max_rain: extremes.max_rain,
            max_wind_speed: extremes.max_wind_speed,
            max_pollution_index,
        })
    }

    /// Per-station temperature extremes with the published minimum.
    ///
    /// The minimum is the configured reported value, not the smallest
    /// `TEMP_MIN` in the table.
    pub fn get_temperature_overview(&self) -> Result<TemperatureOverview> {
        let extremes = self.get_station_extremes();
        if extremes.is_empty() {
            return Err(ReportError::EmptyDataset {
                operation: "temperature overview",
            });
        }

        Ok(TemperatureOverview {
            stations: extremes
                .iter()
                .map(|e| StationTemperatureRange {
                    station: e.station.clone(),
                    temp_max: e.temp_max,
                    temp_min: e.temp_min,
                })
                .collect(),
            max_temp: extremes.iter().map(|e| e.temp_max).fold(f64::NAN, f64::max),
            reported_min_temp: self.options.reported_min_temp,
        })
    }

    pub fn get_rain_overview(&self) -> Result<RainOverview> {
        let extremes = self.get_station_extremes();
        if extremes.is_empty() {
            return Err(ReportError::EmptyDataset {
                operation: "rain overview",
            });
        }
        let mean_rain = Aggregator::new().column_mean(self.store.rows(), Column::Rain)?;

        Ok(RainOverview {
            stations: extremes
                .iter()
                .map(|e| StationRainRange {
                    station: e.station.clone(),
                    rain_max: e.rain_max,
                    rain_min: e.rain_min,
                })
                .collect(),
            max_rain: extremes.iter().map(|e| e.rain_max).fold(f64::NAN, f64::max),
            mean_rain,
        })
    }

    /// The first `rows` measurements in load order with `hidden` columns
    /// removed, for the overview table. The selection is deterministic: rows
    /// are taken from the front, never sampled at random.
    pub fn preview(&self, rows: Option<usize>, hidden: &[Column]) -> Preview<'a> {
        let limit = rows.unwrap_or(self.options.preview_rows);
        let store: &'a RecordStore = self.store;
        Preview {
            columns: Column::ALL
                .into_iter()
                .filter(|c| !hidden.contains(c))
                .collect(),
            rows: store.rows().iter().take(limit).collect(),
        }
    }
}

/// A projection of the measurement table.
///
/// Serializes each row with only `station`, `datetime` and the selected
/// columns.
#[derive(Debug, Clone)]
pub struct Preview<'a> {
    pub columns: Vec<Column>,
    pub rows: Vec<&'a Measurement>,
}

impl Serialize for Preview<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let rows: Vec<PreviewRow<'_>> = self
            .rows
            .iter()
            .map(|measurement| PreviewRow {
                measurement,
                columns: &self.columns,
            })
            .collect();

        let mut state = serializer.serialize_struct("Preview", 2)?;
        state.serialize_field("columns", &self.columns)?;
        state.serialize_field("rows", &rows)?;
        state.end()
    }
}

struct PreviewRow<'p> {
    measurement: &'p Measurement,
    columns: &'p [Column],
}

impl Serialize for PreviewRow<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len() + 2))?;
        map.serialize_entry("station", &self.measurement.station)?;
        map.serialize_entry("datetime", &self.measurement.timestamp)?;
        for column in self.columns {
            match column {
                Column::WindDirection => {
                    map.serialize_entry(column.name(), &self.measurement.wind_direction)?
                }
                _ => map.serialize_entry(column.name(), &self.measurement.value(*column))?,
            }
        }
        map.end()
    }
}
