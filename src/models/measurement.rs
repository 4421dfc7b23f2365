use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ReportError;
use crate::models::{Column, Pollutant};

/// 16-point compass direction reported by the wind vane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WindDirection {
    N,
    NNE,
    NE,
    ENE,
    E,
    ESE,
    SE,
    SSE,
    S,
    SSW,
    SW,
    WSW,
    W,
    WNW,
    NW,
    NNW,
}

impl WindDirection {
    const POINTS: [WindDirection; 16] = [
        WindDirection::N,
        WindDirection::NNE,
        WindDirection::NE,
        WindDirection::ENE,
        WindDirection::E,
        WindDirection::ESE,
        WindDirection::SE,
        WindDirection::SSE,
        WindDirection::S,
        WindDirection::SSW,
        WindDirection::SW,
        WindDirection::WSW,
        WindDirection::W,
        WindDirection::WNW,
        WindDirection::NW,
        WindDirection::NNW,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WindDirection::N => "N",
            WindDirection::NNE => "NNE",
            WindDirection::NE => "NE",
            WindDirection::ENE => "ENE",
            WindDirection::E => "E",
            WindDirection::ESE => "ESE",
            WindDirection::SE => "SE",
            WindDirection::SSE => "SSE",
            WindDirection::S => "S",
            WindDirection::SSW => "SSW",
            WindDirection::SW => "SW",
            WindDirection::WSW => "WSW",
            WindDirection::W => "W",
            WindDirection::WNW => "WNW",
            WindDirection::NW => "NW",
            WindDirection::NNW => "NNW",
        }
    }
}

impl fmt::Display for WindDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for WindDirection {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::POINTS
            .into_iter()
            .find(|point| point.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ReportError::ingest("wind direction", format!("unknown value '{}'", s)))
    }
}

/// One observational row: a station at a point in time.
///
/// Missing cells are `None`. A `NaN` read from a source is stored as `None`
/// as well, so every consumer has a single missing-value state to handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub station: String,
    pub timestamp: NaiveDateTime,
    #[serde(rename = "PM10")]
    pub pm10: Option<f64>,
    #[serde(rename = "SO2")]
    pub so2: Option<f64>,
    #[serde(rename = "NO2")]
    pub no2: Option<f64>,
    #[serde(rename = "CO")]
    pub co: Option<f64>,
    #[serde(rename = "O3")]
    pub o3: Option<f64>,
    #[serde(rename = "TEMP")]
    pub temp: Option<f64>,
    #[serde(rename = "PRES")]
    pub pres: Option<f64>,
    #[serde(rename = "RAIN")]
    pub rain: Option<f64>,
    pub wind_direction: Option<WindDirection>,
    pub wind_speed: Option<f64>,
}

impl Measurement {
    pub fn new(station: impl Into<String>, timestamp: NaiveDateTime) -> Self {
        Self {
            station: station.into(),
            timestamp,
            pm10: None,
            so2: None,
            no2: None,
            co: None,
            o3: None,
            temp: None,
            pres: None,
            rain: None,
            wind_direction: None,
            wind_speed: None,
        }
    }

    pub fn builder(station: impl Into<String>, timestamp: NaiveDateTime) -> MeasurementBuilder {
        MeasurementBuilder {
            measurement: Self::new(station, timestamp),
        }
    }

    /// Numeric value of `column`; `None` when missing or when the column is
    /// not numeric.
    pub fn value(&self, column: Column) -> Option<f64> {
        match column {
            Column::Pm10 => self.pm10,
            Column::So2 => self.so2,
            Column::No2 => self.no2,
            Column::Co => self.co,
            Column::O3 => self.o3,
            Column::Temp => self.temp,
            Column::Pres => self.pres,
            Column::Rain => self.rain,
            Column::WindSpeed => self.wind_speed,
            Column::WindDirection => None,
        }
    }

    pub fn pollutant(&self, pollutant: Pollutant) -> Option<f64> {
        self.value(pollutant.column())
    }

    /// Store a numeric value. `NaN` is normalised to missing; writes to
    /// `WindDirection` are ignored.
    pub fn set_value(&mut self, column: Column, value: Option<f64>) {
        let value = value.filter(|v| !v.is_nan());
        let slot = match column {
            Column::Pm10 => &mut self.pm10,
            Column::So2 => &mut self.so2,
            Column::No2 => &mut self.no2,
            Column::Co => &mut self.co,
            Column::O3 => &mut self.o3,
            Column::Temp => &mut self.temp,
            Column::Pres => &mut self.pres,
            Column::Rain => &mut self.rain,
            Column::WindSpeed => &mut self.wind_speed,
            Column::WindDirection => return,
        };
        *slot = value;
    }

    pub fn year(&self) -> i32 {
        self.timestamp.year()
    }

    pub fn month(&self) -> u32 {
        self.timestamp.month()
    }

    /// Cell text for a display table; empty when missing.
    pub fn display_value(&self, column: Column) -> String {
        match column {
            Column::WindDirection => self
                .wind_direction
                .map(|d| d.to_string())
                .unwrap_or_default(),
            _ => self
                .value(column)
                .map(|v| v.to_string())
                .unwrap_or_default(),
        }
    }
}

pub struct MeasurementBuilder {
    measurement: Measurement,
}

impl MeasurementBuilder {
    pub fn value(mut self, column: Column, value: f64) -> Self {
        self.measurement.set_value(column, Some(value));
        self
    }

    pub fn pollutant(self, pollutant: Pollutant, value: f64) -> Self {
        self.value(pollutant.column(), value)
    }

    pub fn wind_direction(mut self, direction: WindDirection) -> Self {
        self.measurement.wind_direction = Some(direction);
        self
    }

    pub fn build(self) -> Measurement {
        self.measurement
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2014, 3, 1)
            .unwrap()
            .and_hms_opt(6, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_nan_is_stored_as_missing() {
        let record = Measurement::builder("Aotizhongxin", timestamp())
            .value(Column::So2, f64::NAN)
            .value(Column::No2, 41.0)
            .build();

        assert_eq!(record.value(Column::So2), None);
        assert_eq!(record.value(Column::No2), Some(41.0));
        assert_eq!(record.year(), 2014);
        assert_eq!(record.month(), 3);
    }

    #[test]
    fn test_wind_direction_parsing() {
        assert_eq!("nne".parse::<WindDirection>().unwrap(), WindDirection::NNE);
        assert!("NORTH".parse::<WindDirection>().is_err());
    }

    #[test]
    fn test_wind_direction_is_not_numeric() {
        let record = Measurement::builder("Dongsi", timestamp())
            .wind_direction(WindDirection::SW)
            .build();

        assert_eq!(record.value(Column::WindDirection), None);
        assert_eq!(record.display_value(Column::WindDirection), "SW");
        assert_eq!(record.display_value(Column::Temp), "");
    }
}
