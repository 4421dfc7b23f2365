use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

use crate::utils::round_half_even;

/// Per-station temperature and rain extremes, supplied precomputed.
///
/// These values are authoritative; the engine never recomputes them from
/// measurements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_extreme_ordering"))]
pub struct StationExtremes {
    #[validate(length(min = 1))]
    pub station: String,

    #[serde(rename = "TEMP_MAX")]
    pub temp_max: f64,

    #[serde(rename = "TEMP_MIN")]
    pub temp_min: f64,

    #[serde(rename = "RAIN_MAX")]
    pub rain_max: f64,

    #[serde(rename = "RAIN_MIN")]
    #[validate(range(min = 0.0))]
    pub rain_min: f64,
}

fn validate_extreme_ordering(extremes: &StationExtremes) -> Result<(), ValidationError> {
    if extremes.temp_max < extremes.temp_min {
        let mut error = ValidationError::new("temp_ordering");
        error.message = Some(Cow::from(format!(
            "{}: TEMP_MAX {} < TEMP_MIN {}",
            extremes.station, extremes.temp_max, extremes.temp_min
        )));
        return Err(error);
    }

    if extremes.rain_max < extremes.rain_min {
        let mut error = ValidationError::new("rain_ordering");
        error.message = Some(Cow::from(format!(
            "{}: RAIN_MAX {} < RAIN_MIN {}",
            extremes.station, extremes.rain_max, extremes.rain_min
        )));
        return Err(error);
    }

    Ok(())
}

impl StationExtremes {
    pub fn new(
        station: impl Into<String>,
        temp_max: f64,
        temp_min: f64,
        rain_max: f64,
        rain_min: f64,
    ) -> Self {
        Self {
            station: station.into(),
            temp_max,
            temp_min,
            rain_max,
            rain_min,
        }
    }
}

/// Per-station pollutant levels, supplied precomputed alongside the raw
/// measurements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationPollutantLevels {
    pub station: String,

    #[serde(rename = "PM10", default)]
    pub pm10: Option<f64>,

    #[serde(rename = "SO2")]
    pub so2: f64,

    #[serde(rename = "NO2")]
    pub no2: f64,

    #[serde(rename = "CO")]
    pub co: f64,

    #[serde(rename = "O3")]
    pub o3: f64,

    #[serde(
        rename(serialize = "total_index", deserialize = "total_kadar_polutan"),
        alias = "total_index"
    )]
    pub total_index: f64,
}

impl StationPollutantLevels {
    /// Copy with every level rounded for display.
    pub fn rounded(&self, decimals: u32) -> Self {
        Self {
            station: self.station.clone(),
            pm10: self.pm10.map(|v| round_half_even(v, decimals)),
            so2: round_half_even(self.so2, decimals),
            no2: round_half_even(self.no2, decimals),
            co: round_half_even(self.co, decimals),
            o3: round_half_even(self.o3, decimals),
            total_index: round_half_even(self.total_index, decimals),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_station_extremes_validation() {
        let extremes = StationExtremes::new("Changping", 41.4, -16.6, 52.1, 0.0);
        assert!(extremes.validate().is_ok());
    }

    #[test]
    fn test_inverted_temperatures_rejected() {
        let extremes = StationExtremes::new("Changping", -16.6, 41.4, 52.1, 0.0);
        assert!(extremes.validate().is_err());
    }

    #[test]
    fn test_negative_rain_rejected() {
        let extremes = StationExtremes::new("Changping", 41.4, -16.6, 52.1, -0.5);
        assert!(extremes.validate().is_err());
    }

    #[test]
    fn test_pollutant_levels_rounding() {
        let levels = StationPollutantLevels {
            station: "Gucheng".to_string(),
            pm10: Some(119.261_3),
            so2: 15.366_6,
            no2: 55.871_1,
            co: 1_323.974_5,
            o3: 57.940_1,
            total_index: 363.288_08,
        };

        let rounded = levels.rounded(2);
        assert_eq!(rounded.pm10, Some(119.26));
        assert_eq!(rounded.so2, 15.37);
        assert_eq!(rounded.total_index, 363.29);
        assert_eq!(rounded.co, 1_323.97);
    }
}
