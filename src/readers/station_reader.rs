use crate::error::{ReportError, Result};
use crate::models::{StationExtremes, StationPollutantLevels};
use crate::readers::source_text::read_source_text;
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::debug;
use validator::Validate;

const EXTREMES_HEADERS: [&[&str]; 5] = [
    &["station"],
    &["TEMP_MAX"],
    &["TEMP_MIN"],
    &["RAIN_MAX"],
    &["RAIN_MIN"],
];

const POLLUTANT_LEVEL_HEADERS: [&[&str]; 6] = [
    &["station"],
    &["SO2"],
    &["NO2"],
    &["CO"],
    &["O3"],
    &["total_kadar_polutan", "total_index"],
];

/// Reads the precomputed per-station tables. Values are taken verbatim.
pub struct StationReader {
    delimiter: u8,
}

impl StationReader {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }

    /// Read the station extremes table and check its ordering invariants.
    pub fn read_extremes(&self, path: &Path) -> Result<Vec<StationExtremes>> {
        let text = read_source_text(path)?;
        self.parse_extremes(&text, &path.display().to_string())
    }

    pub fn parse_extremes(&self, text: &str, source_name: &str) -> Result<Vec<StationExtremes>> {
        let rows: Vec<StationExtremes> = self.parse_table(text, source_name, &EXTREMES_HEADERS)?;
        for row in &rows {
            row.validate()?;
        }
        debug!(source = source_name, stations = rows.len(), "station extremes parsed");
        Ok(rows)
    }

    pub fn read_pollutant_levels(&self, path: &Path) -> Result<Vec<StationPollutantLevels>> {
        let text = read_source_text(path)?;
        self.parse_pollutant_levels(&text, &path.display().to_string())
    }

    pub fn parse_pollutant_levels(
        &self,
        text: &str,
        source_name: &str,
    ) -> Result<Vec<StationPollutantLevels>> {
        let rows: Vec<StationPollutantLevels> =
            self.parse_table(text, source_name, &POLLUTANT_LEVEL_HEADERS)?;
        debug!(source = source_name, stations = rows.len(), "pollutant levels parsed");
        Ok(rows)
    }

    fn parse_table<T: DeserializeOwned>(
        &self,
        text: &str,
        source_name: &str,
        required: &[&[&str]],
    ) -> Result<Vec<T>> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(text.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| ReportError::ingest(source_name, e.to_string()))?
            .clone();
        check_headers(&headers, required, source_name)?;

        reader
            .deserialize()
            .map(|row| row.map_err(|e| ReportError::ingest(source_name, e.to_string())))
            .collect()
    }
}

impl Default for StationReader {
    fn default() -> Self {
        Self::new()
    }
}

fn check_headers(headers: &StringRecord, required: &[&[&str]], source_name: &str) -> Result<()> {
    for aliases in required {
        let present = aliases
            .iter()
            .any(|alias| headers.iter().any(|h| h.trim() == *alias));
        if !present {
            return Err(ReportError::missing_column(source_name, aliases[0]));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_extremes() {
        let text = "station,TEMP_MAX,TEMP_MIN,RAIN_MAX,RAIN_MIN\n\
                    Aotizhongxin,40.5,-16.8,72.5,0.0\n\
                    Changping,41.4,-16.6,52.1,0.0\n";

        let rows = StationReader::new().parse_extremes(text, "test").unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].station, "Changping");
        assert_eq!(rows[1].temp_max, 41.4);
        assert_eq!(rows[0].rain_max, 72.5);
    }

    #[test]
    fn test_extremes_invariant_violation_fails_load() {
        let text = "station,TEMP_MAX,TEMP_MIN,RAIN_MAX,RAIN_MIN\nDingling,-5.0,10.0,1.0,0.0\n";

        let err = StationReader::new().parse_extremes(text, "test").unwrap_err();
        assert!(matches!(err, ReportError::Validation(_)));
        assert!(err.is_ingest());
    }

    #[test]
    fn test_pollutant_levels_with_index_column() {
        let text = ",station,PM10,SO2,NO2,CO,O3,total_kadar_polutan\n\
                    0,Gucheng,119.26,15.37,55.87,1323.97,57.94,363.29\n";

        let rows = StationReader::new()
            .parse_pollutant_levels(text, "test")
            .unwrap();

        assert_eq!(rows[0].station, "Gucheng");
        assert_eq!(rows[0].pm10, Some(119.26));
        assert_eq!(rows[0].total_index, 363.29);
    }

    #[test]
    fn test_pollutant_levels_without_pm10() {
        let text = "station,SO2,NO2,CO,O3,total_index\nHuairou,12.0,32.0,1022.0,59.0,281.25\n";

        let rows = StationReader::new()
            .parse_pollutant_levels(text, "test")
            .unwrap();

        assert_eq!(rows[0].pm10, None);
        assert_eq!(rows[0].total_index, 281.25);
    }

    #[test]
    fn test_missing_extremes_column() {
        let text = "station,TEMP_MAX,TEMP_MIN,RAIN_MAX\nDongsi,41.1,-16.8,46.4\n";

        let err = StationReader::new().parse_extremes(text, "test").unwrap_err();
        match err {
            ReportError::MissingColumn { column, .. } => assert_eq!(column, "RAIN_MIN"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_extremes_file() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, "station,TEMP_MAX,TEMP_MIN,RAIN_MAX,RAIN_MIN")?;
        writeln!(temp_file, "Wanliu,40.5,-16.0,72.5,0.0")?;

        let rows = StationReader::new().read_extremes(temp_file.path())?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].temp_min, -16.0);

        Ok(())
    }
}
