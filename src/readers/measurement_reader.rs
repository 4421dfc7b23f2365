use crate::error::{ReportError, Result};
use crate::models::{Column, Measurement, WindDirection};
use crate::readers::source_text::read_source_text;
use crate::utils::constants::{
    DATETIME_FORMATS, DATETIME_HEADER, DATE_FORMAT, DAY_HEADER, HOUR_HEADER, MISSING_MARKERS,
    MONTH_HEADER, STATION_HEADER, YEAR_HEADER,
};
use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::path::Path;
use tracing::{debug, warn};

/// Where the timestamp of a row comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimestampLayout {
    Combined(usize),
    Parts {
        year: usize,
        month: usize,
        day: usize,
        hour: Option<usize>,
    },
}

/// Header positions resolved once per source.
#[derive(Debug, Clone)]
struct HeaderLayout {
    station: usize,
    timestamp: TimestampLayout,
    columns: Vec<(Column, usize)>,
}

impl HeaderLayout {
    fn resolve(headers: &StringRecord, source_name: &str) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);

        let station = find(STATION_HEADER)
            .ok_or_else(|| ReportError::missing_column(source_name, STATION_HEADER))?;

        let timestamp = match find(DATETIME_HEADER) {
            Some(index) => TimestampLayout::Combined(index),
            None => {
                let part = |name: &str| {
                    find(name).ok_or_else(|| ReportError::missing_column(source_name, DATETIME_HEADER))
                };
                TimestampLayout::Parts {
                    year: part(YEAR_HEADER)?,
                    month: part(MONTH_HEADER)?,
                    day: part(DAY_HEADER)?,
                    hour: find(HOUR_HEADER),
                }
            }
        };

        let mut columns = Vec::with_capacity(Column::ALL.len());
        for column in Column::ALL {
            let index = column
                .header_aliases()
                .iter()
                .find_map(|&alias| find(alias))
                .ok_or_else(|| ReportError::missing_column(source_name, column.name()))?;
            columns.push((column, index));
        }

        Ok(Self {
            station,
            timestamp,
            columns,
        })
    }
}

/// Reads the raw measurement table.
///
/// Raw headers `wd` and `WSPM` are renamed to `wind_direction` and
/// `wind_speed` here; nothing downstream sees the raw names. Numeric cells
/// that are empty, `NA`, `NaN` or unparsable load as missing.
pub struct MeasurementReader {
    delimiter: u8,
}

impl MeasurementReader {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }

    pub fn read_measurements(&self, path: &Path) -> Result<Vec<Measurement>> {
        let text = read_source_text(path)?;
        self.parse_measurements(&text, &path.display().to_string())
    }

    pub fn parse_measurements(&self, text: &str, source_name: &str) -> Result<Vec<Measurement>> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(text.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| ReportError::ingest(source_name, e.to_string()))?
            .clone();
        let layout = HeaderLayout::resolve(&headers, source_name)?;

        let mut records = Vec::new();
        let mut malformed_cells = 0usize;

        for result in reader.records() {
            let row = result.map_err(|e| ReportError::ingest(source_name, e.to_string()))?;
            let line = row.position().map(|p| p.line()).unwrap_or_default();
            records.push(self.parse_row(&row, &layout, line, source_name, &mut malformed_cells)?);
        }

        if malformed_cells > 0 {
            warn!(
                source = source_name,
                malformed_cells, "unparsable cells loaded as missing values"
            );
        }
        debug!(source = source_name, rows = records.len(), "measurements parsed");

        Ok(records)
    }

    fn parse_row(
        &self,
        row: &StringRecord,
        layout: &HeaderLayout,
        line: u64,
        source_name: &str,
        malformed_cells: &mut usize,
    ) -> Result<Measurement> {
        let cell = |index: usize| row.get(index).unwrap_or("");

        let timestamp = parse_timestamp(&layout.timestamp, &cell).ok_or_else(|| {
            ReportError::ingest(
                source_name,
                format!("line {}: invalid timestamp", line),
            )
        })?;

        let mut record = Measurement::new(cell(layout.station), timestamp);

        for &(column, index) in &layout.columns {
            let raw = cell(index);
            if column == Column::WindDirection {
                record.wind_direction = if is_missing_marker(raw) {
                    None
                } else {
                    raw.parse::<WindDirection>()
                        .inspect_err(|_| *malformed_cells += 1)
                        .ok()
                };
                continue;
            }

            let value = if is_missing_marker(raw) {
                None
            } else {
                raw.parse::<f64>().inspect_err(|_| *malformed_cells += 1).ok()
            };
            record.set_value(column, value);
        }

        Ok(record)
    }
}

impl Default for MeasurementReader {
    fn default() -> Self {
        Self::new()
    }
}

fn is_missing_marker(cell: &str) -> bool {
    MISSING_MARKERS.contains(&cell.trim())
}

fn parse_timestamp<'a, F>(layout: &TimestampLayout, cell: &F) -> Option<NaiveDateTime>
where
    F: Fn(usize) -> &'a str,
{
    match *layout {
        TimestampLayout::Combined(index) => {
            let raw = cell(index).trim();
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
                .or_else(|| {
                    NaiveDate::parse_from_str(raw, DATE_FORMAT)
                        .ok()
                        .and_then(|date| date.and_hms_opt(0, 0, 0))
                })
        }
        TimestampLayout::Parts {
            year,
            month,
            day,
            hour,
        } => {
            let year = cell(year).trim().parse::<i32>().ok()?;
            let month = cell(month).trim().parse::<u32>().ok()?;
            let day = cell(day).trim().parse::<u32>().ok()?;
            let hour = match hour {
                Some(index) => cell(index).trim().parse::<u32>().ok()?,
                None => 0,
            };
            NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, 0, 0)
        }
    }
}
