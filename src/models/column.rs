use crate::error::ReportError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Columns of the measurement table that callers can address.
///
/// Every column except `WindDirection` is numeric. Raw header names are
/// mapped onto these variants once, at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Column {
    #[serde(rename = "PM10")]
    Pm10,
    #[serde(rename = "SO2")]
    So2,
    #[serde(rename = "NO2")]
    No2,
    #[serde(rename = "CO")]
    Co,
    #[serde(rename = "O3")]
    O3,
    #[serde(rename = "TEMP")]
    Temp,
    #[serde(rename = "PRES")]
    Pres,
    #[serde(rename = "RAIN")]
    Rain,
    #[serde(rename = "wind_direction")]
    WindDirection,
    #[serde(rename = "wind_speed")]
    WindSpeed,
}

impl Column {
    pub const ALL: [Column; 10] = [
        Column::Pm10,
        Column::So2,
        Column::No2,
        Column::Co,
        Column::O3,
        Column::Temp,
        Column::Pres,
        Column::Rain,
        Column::WindDirection,
        Column::WindSpeed,
    ];

    /// Numeric columns in table order; the default correlation set.
    pub const NUMERIC: [Column; 9] = [
        Column::Pm10,
        Column::So2,
        Column::No2,
        Column::Co,
        Column::O3,
        Column::Temp,
        Column::Pres,
        Column::Rain,
        Column::WindSpeed,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Column::Pm10 => "PM10",
            Column::So2 => "SO2",
            Column::No2 => "NO2",
            Column::Co => "CO",
            Column::O3 => "O3",
            Column::Temp => "TEMP",
            Column::Pres => "PRES",
            Column::Rain => "RAIN",
            Column::WindDirection => "wind_direction",
            Column::WindSpeed => "wind_speed",
        }
    }

    /// Header names accepted for this column in a raw source, preferred first.
    pub fn header_aliases(&self) -> &'static [&'static str] {
        match self {
            Column::WindDirection => &["wind_direction", "wd"],
            Column::WindSpeed => &["wind_speed", "WSPM"],
            Column::Pm10 => &["PM10"],
            Column::So2 => &["SO2"],
            Column::No2 => &["NO2"],
            Column::Co => &["CO"],
            Column::O3 => &["O3"],
            Column::Temp => &["TEMP"],
            Column::Pres => &["PRES"],
            Column::Rain => &["RAIN"],
        }
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, Column::WindDirection)
    }

    pub fn pollutant(&self) -> Option<Pollutant> {
        match self {
            Column::Pm10 => Some(Pollutant::Pm10),
            Column::So2 => Some(Pollutant::So2),
            Column::No2 => Some(Pollutant::No2),
            Column::Co => Some(Pollutant::Co),
            Column::O3 => Some(Pollutant::O3),
            _ => None,
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Column {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Column::ALL
            .into_iter()
            .find(|column| {
                column
                    .header_aliases()
                    .iter()
                    .any(|alias| alias.eq_ignore_ascii_case(needle))
            })
            .ok_or_else(|| ReportError::UnknownColumn(s.to_string()))
    }
}

/// The pollutant concentration columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Pollutant {
    #[serde(rename = "PM10")]
    Pm10,
    #[serde(rename = "SO2")]
    So2,
    #[serde(rename = "NO2")]
    No2,
    #[serde(rename = "CO")]
    Co,
    #[serde(rename = "O3")]
    O3,
}

impl Pollutant {
    pub const ALL: [Pollutant; 5] = [
        Pollutant::Pm10,
        Pollutant::So2,
        Pollutant::No2,
        Pollutant::Co,
        Pollutant::O3,
    ];

    /// Inputs of the composite pollution index. PM10 is not one of them.
    pub const INDEX_COMPONENTS: [Pollutant; 4] = [
        Pollutant::So2,
        Pollutant::No2,
        Pollutant::Co,
        Pollutant::O3,
    ];

    pub fn column(&self) -> Column {
        match self {
            Pollutant::Pm10 => Column::Pm10,
            Pollutant::So2 => Column::So2,
            Pollutant::No2 => Column::No2,
            Pollutant::Co => Column::Co,
            Pollutant::O3 => Column::O3,
        }
    }

    pub fn name(&self) -> &'static str {
        self.column().name()
    }
}

impl fmt::Display for Pollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Pollutant {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Column>()
            .ok()
            .and_then(|column| column.pollutant())
            .ok_or_else(|| ReportError::UnknownColumn(s.to_string()))
    }
}
