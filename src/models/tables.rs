use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{Column, Pollutant};

/// Per-station pollutant means and composite index, rounded for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollutantSummary {
    pub station: String,
    #[serde(rename = "PM10")]
    pub pm10: f64,
    #[serde(rename = "SO2")]
    pub so2: f64,
    #[serde(rename = "NO2")]
    pub no2: f64,
    #[serde(rename = "CO")]
    pub co: f64,
    #[serde(rename = "O3")]
    pub o3: f64,
    pub total_index: f64,
}

impl PollutantSummary {
    pub fn mean(&self, pollutant: Pollutant) -> f64 {
        match pollutant {
            Pollutant::Pm10 => self.pm10,
            Pollutant::So2 => self.so2,
            Pollutant::No2 => self.no2,
            Pollutant::Co => self.co,
            Pollutant::O3 => self.o3,
        }
    }
}

/// Why a correlation cell holds `NaN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DegradedReason {
    InsufficientData { observations: usize },
    ZeroVariance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DegradedPair {
    pub left: Column,
    pub right: Column,
    pub reason: DegradedReason,
}

/// Square, symmetric matrix of rank correlation coefficients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    columns: Vec<Column>,
    values: Vec<f64>,
    degraded: Vec<DegradedPair>,
}

impl CorrelationMatrix {
    /// Matrix filled with `NaN`, to be populated pair by pair.
    pub(crate) fn empty(columns: Vec<Column>) -> Self {
        let n = columns.len();
        Self {
            columns,
            values: vec![f64::NAN; n * n],
            degraded: Vec::new(),
        }
    }

    pub(crate) fn set_pair(&mut self, i: usize, j: usize, coefficient: f64) {
        let n = self.columns.len();
        self.values[i * n + j] = coefficient;
        self.values[j * n + i] = coefficient;
    }

    pub(crate) fn mark_degraded(&mut self, pair: DegradedPair) {
        self.degraded.push(pair);
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn degraded_pairs(&self) -> &[DegradedPair] {
        &self.degraded
    }

    /// Coefficient for a pair, `None` when either column is not in the matrix.
    pub fn get(&self, left: Column, right: Column) -> Option<f64> {
        let i = self.columns.iter().position(|c| *c == left)?;
        let j = self.columns.iter().position(|c| *c == right)?;
        Some(self.values[i * self.columns.len() + j])
    }

    /// Row-major view, one row per column.
    pub fn rows(&self) -> impl Iterator<Item = (Column, &[f64])> {
        let n = self.columns.len();
        self.columns
            .iter()
            .copied()
            .zip(self.values.chunks(n.max(1)))
    }

    pub fn is_symmetric(&self) -> bool {
        let n = self.columns.len();
        (0..n).all(|i| {
            (0..n).all(|j| {
                let a = self.values[i * n + j];
                let b = self.values[j * n + i];
                a == b || (a.is_nan() && b.is_nan())
            })
        })
    }
}

/// Pollutant means for one calendar year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyPoint {
    pub year: i32,
    pub means: BTreeMap<Pollutant, f64>,
}

/// Yearly pollutant means, strictly ascending by year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyTrend {
    pub pollutants: Vec<Pollutant>,
    pub points: Vec<YearlyPoint>,
}

impl YearlyTrend {
    pub fn years(&self) -> Vec<i32> {
        self.points.iter().map(|p| p.year).collect()
    }

    /// One pollutant as a `(year, mean)` series.
    pub fn series(&self, pollutant: Pollutant) -> Vec<(i32, f64)> {
        self.points
            .iter()
            .filter_map(|p| p.means.get(&pollutant).map(|v| (p.year, *v)))
            .collect()
    }
}

/// Pollutant means for one calendar month, pooled across years.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPoint {
    pub month: u32,
    pub means: BTreeMap<Pollutant, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalProfile {
    pub pollutants: Vec<Pollutant>,
    pub points: Vec<MonthlyPoint>,
}

/// Whole-dataset maxima.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverallExtremes {
    pub max_temp: f64,
    pub max_rain: f64,
    pub max_wind_speed: f64,
}

/// The four scalar metrics shown on the overview.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeadlineMetrics {
    pub max_temp: f64,
    pub max_rain: f64,
    pub max_wind_speed: f64,
    pub max_pollution_index: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationTemperatureRange {
    pub station: String,
    #[serde(rename = "TEMP_MAX")]
    pub temp_max: f64,
    #[serde(rename = "TEMP_MIN")]
    pub temp_min: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureOverview {
    pub stations: Vec<StationTemperatureRange>,
    pub max_temp: f64,
    pub reported_min_temp: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationRainRange {
    pub station: String,
    #[serde(rename = "RAIN_MAX")]
    pub rain_max: f64,
    #[serde(rename = "RAIN_MIN")]
    pub rain_min: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RainOverview {
    pub stations: Vec<StationRainRange>,
    pub max_rain: f64,
    pub mean_rain: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_set_pair_is_symmetric() {
        let mut matrix = CorrelationMatrix::empty(vec![Column::So2, Column::No2, Column::Temp]);
        matrix.set_pair(0, 0, 1.0);
        matrix.set_pair(0, 1, 0.42);
        matrix.set_pair(2, 1, -0.3);

        assert_eq!(matrix.get(Column::No2, Column::So2), Some(0.42));
        assert_eq!(matrix.get(Column::No2, Column::Temp), Some(-0.3));
        assert!(matrix.get(Column::So2, Column::Temp).unwrap().is_nan());
        assert_eq!(matrix.get(Column::So2, Column::Rain), None);
        assert!(matrix.is_symmetric());
        assert_eq!(matrix.rows().count(), 3);
    }

    #[test]
    fn test_yearly_series() {
        let trend = YearlyTrend {
            pollutants: vec![Pollutant::Co],
            points: vec![
                YearlyPoint {
                    year: 2013,
                    means: BTreeMap::from([(Pollutant::Co, 2.0)]),
                },
                YearlyPoint {
                    year: 2014,
                    means: BTreeMap::from([(Pollutant::Co, 5.0)]),
                },
            ],
        };

        assert_eq!(trend.years(), vec![2013, 2014]);
        assert_eq!(trend.series(Pollutant::Co), vec![(2013, 2.0), (2014, 5.0)]);
        assert!(trend.series(Pollutant::O3).is_empty());
    }
}
