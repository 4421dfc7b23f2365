use crate::error::{ReportError, Result};
use crate::models::{Column, Measurement, OverallExtremes, Pollutant, PollutantSummary};
use crate::utils::constants::DISPLAY_DECIMALS;
use crate::utils::{mean_of_present, round_half_even, MeanAccumulator};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::debug;

/// Full-precision pollutant means for one station.
#[derive(Debug, Clone, PartialEq)]
pub struct StationMeans {
    pub station: String,
    pub means: [f64; 5],
}

impl StationMeans {
    pub fn mean(&self, pollutant: Pollutant) -> f64 {
        self.means[pollutant_slot(pollutant)]
    }

    /// Composite pollution index: mean of the SO2, NO2, CO and O3 means.
    /// `NaN` if any of the four is `NaN`.
    pub fn total_index(&self) -> f64 {
        let components = Pollutant::INDEX_COMPONENTS;
        components.iter().map(|p| self.mean(*p)).sum::<f64>() / components.len() as f64
    }

    /// Rounded once, at the end, from the full-precision values.
    pub fn to_summary(&self) -> PollutantSummary {
        let round = |value: f64| round_half_even(value, DISPLAY_DECIMALS);
        PollutantSummary {
            station: self.station.clone(),
            pm10: round(self.mean(Pollutant::Pm10)),
            so2: round(self.mean(Pollutant::So2)),
            no2: round(self.mean(Pollutant::No2)),
            co: round(self.mean(Pollutant::Co)),
            o3: round(self.mean(Pollutant::O3)),
            total_index: round(self.total_index()),
        }
    }
}

fn pollutant_slot(pollutant: Pollutant) -> usize {
    match pollutant {
        Pollutant::Pm10 => 0,
        Pollutant::So2 => 1,
        Pollutant::No2 => 2,
        Pollutant::Co => 3,
        Pollutant::O3 => 4,
    }
}

/// Descending, with `NaN` after every number.
fn descending_nan_last(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

fn max_present(current: f64, value: Option<f64>) -> f64 {
    match value {
        Some(v) if current.is_nan() || v > current => v,
        _ => current,
    }
}

/// Group-by-station reductions and whole-dataset scalars.
pub struct Aggregator;

impl Aggregator {
    pub fn new() -> Self {
        Self
    }

    /// Unrounded per-station means, ordered by station name.
    pub fn station_means(&self, records: &[Measurement]) -> Result<Vec<StationMeans>> {
        if records.is_empty() {
            return Err(ReportError::EmptyDataset {
                operation: "station means",
            });
        }

        let mut groups: BTreeMap<&str, [MeanAccumulator; 5]> = BTreeMap::new();
        for record in records {
            let accumulators = groups.entry(record.station.as_str()).or_default();
            for pollutant in Pollutant::ALL {
                accumulators[pollutant_slot(pollutant)].push(record.pollutant(pollutant));
            }
        }

        Ok(groups
            .into_iter()
            .map(|(station, accumulators)| StationMeans {
                station: station.to_string(),
                means: accumulators.map(|acc| acc.mean()),
            })
            .collect())
    }

    /// Per-station summary ranked by descending composite index.
    ///
    /// Ranking uses the full-precision index; only exact ties fall back to
    /// station name. Stations whose index is `NaN` come last.
    pub fn summarize_by_station(&self, records: &[Measurement]) -> Result<Vec<PollutantSummary>> {
        let mut means = self.station_means(records)?;
        means.sort_by(|a, b| {
            descending_nan_last(a.total_index(), b.total_index())
                .then_with(|| a.station.cmp(&b.station))
        });

        let summaries: Vec<PollutantSummary> =
            means.iter().map(StationMeans::to_summary).collect();

        debug!(stations = summaries.len(), "station summary computed");
        Ok(summaries)
    }

    /// Maximum temperature, rain and wind speed over all rows.
    pub fn overall_extremes(&self, records: &[Measurement]) -> Result<OverallExtremes> {
        if records.is_empty() {
            return Err(ReportError::EmptyDataset {
                operation: "overall extremes",
            });
        }

        let extremes = records.iter().fold(
            OverallExtremes {
                max_temp: f64::NAN,
                max_rain: f64::NAN,
                max_wind_speed: f64::NAN,
            },
            |acc, record| OverallExtremes {
                max_temp: max_present(acc.max_temp, record.temp),
                max_rain: max_present(acc.max_rain, record.rain),
                max_wind_speed: max_present(acc.max_wind_speed, record.wind_speed),
            },
        );

        Ok(extremes)
    }

    /// Mean of one numeric column over present values.
    pub fn column_mean(&self, records: &[Measurement], column: Column) -> Result<f64> {
        if records.is_empty() {
            return Err(ReportError::EmptyDataset {
                operation: "column mean",
            });
        }

        Ok(mean_of_present(records.iter().map(|r| r.value(column))))
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use pretty_assertions::assert_eq;

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2013, 3, 1)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn uniform(station: &str, value: f64) -> Measurement {
        Measurement::builder(station, at(0))
            .pollutant(Pollutant::Pm10, value)
            .pollutant(Pollutant::So2, value)
            .pollutant(Pollutant::No2, value)
            .pollutant(Pollutant::Co, value)
            .pollutant(Pollutant::O3, value)
            .build()
    }

    #[test]
    fn test_missing_values_excluded_from_mean() {
        let records = vec![
            Measurement::builder("A", at(0)).pollutant(Pollutant::So2, 10.0).build(),
            Measurement::builder("A", at(1)).pollutant(Pollutant::So2, 20.0).build(),
            Measurement::builder("A", at(2)).value(Column::So2, f64::NAN).build(),
        ];

        let summary = Aggregator::new().summarize_by_station(&records).unwrap();

        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].so2, 15.0);
    }

    #[test]
    fn test_ranking_ties_broken_by_name() {
        let records = vec![
            uniform("C", 9.1),
            uniform("B", 12.3),
            uniform("A", 12.3),
        ];

        let summary = Aggregator::new().summarize_by_station(&records).unwrap();
        let order: Vec<&str> = summary.iter().map(|s| s.station.as_str()).collect();

        assert_eq!(order, vec!["A", "B", "C"]);
        assert_eq!(summary[0].total_index, 12.3);
        assert_eq!(summary[2].total_index, 9.1);
    }

    #[test]
    fn test_ranking_uses_full_precision_index() {
        let records = vec![uniform("A", 12.301), uniform("B", 12.304)];

        let summary = Aggregator::new().summarize_by_station(&records).unwrap();
        let ranked: Vec<(&str, f64)> = summary
            .iter()
            .map(|s| (s.station.as_str(), s.total_index))
            .collect();

        assert_eq!(ranked, vec![("B", 12.3), ("A", 12.3)]);
    }

    #[test]
    fn test_total_index_rounds_last() {
        let records = vec![Measurement::builder("A", at(0))
            .pollutant(Pollutant::So2, 0.006)
            .pollutant(Pollutant::No2, 0.006)
            .pollutant(Pollutant::Co, 0.006)
            .pollutant(Pollutant::O3, 0.0)
            .build()];

        let summary = Aggregator::new().summarize_by_station(&records).unwrap();
        let row = &summary[0];

        // Rounding the inputs first would give mean(0.01, 0.01, 0.01, 0.0) = 0.0075 -> 0.01.
        let rounded_first = round_half_even(
            Pollutant::INDEX_COMPONENTS
                .iter()
                .map(|p| row.mean(*p))
                .sum::<f64>()
                / 4.0,
            2,
        );
        assert_eq!(rounded_first, 0.01);
        assert_eq!(row.total_index, 0.0);
    }

    #[test]
    fn test_total_index_excludes_pm10() {
        let records = vec![Measurement::builder("A", at(0))
            .pollutant(Pollutant::Pm10, 1000.0)
            .pollutant(Pollutant::So2, 1.0)
            .pollutant(Pollutant::No2, 2.0)
            .pollutant(Pollutant::Co, 3.0)
            .pollutant(Pollutant::O3, 4.0)
            .build()];

        let summary = Aggregator::new().summarize_by_station(&records).unwrap();
        assert_eq!(summary[0].total_index, 2.5);
        assert_eq!(summary[0].pm10, 1000.0);
    }

    #[test]
    fn test_all_missing_pollutant_propagates_nan_locally() {
        let records = vec![
            Measurement::builder("Dingling", at(0))
                .pollutant(Pollutant::So2, 3.0)
                .pollutant(Pollutant::No2, 5.0)
                .pollutant(Pollutant::Co, 200.0)
                .build(),
            uniform("Tiantan", 8.0),
        ];

        let summary = Aggregator::new().summarize_by_station(&records).unwrap();

        assert_eq!(summary[0].station, "Tiantan");
        assert_eq!(summary[0].total_index, 8.0);
        assert_eq!(summary[1].station, "Dingling");
        assert!(summary[1].o3.is_nan());
        assert!(summary[1].total_index.is_nan());
        assert_eq!(summary[1].so2, 3.0);
    }

    #[test]
    fn test_summary_is_idempotent() {
        let records = vec![uniform("A", 1.234), uniform("B", 5.678), uniform("A", 2.0)];
        let aggregator = Aggregator::new();

        assert_eq!(
            aggregator.summarize_by_station(&records).unwrap(),
            aggregator.summarize_by_station(&records).unwrap()
        );
    }

    #[test]
    fn test_overall_extremes() {
        let mut hot = Measurement::new("A", at(0));
        hot.temp = Some(41.6);
        hot.rain = None;
        hot.wind_speed = Some(3.2);
        let mut wet = Measurement::new("B", at(1));
        wet.temp = Some(12.0);
        wet.rain = Some(72.5);
        wet.wind_speed = Some(13.2);

        let extremes = Aggregator::new().overall_extremes(&[hot, wet]).unwrap();

        assert_eq!(extremes.max_temp, 41.6);
        assert_eq!(extremes.max_rain, 72.5);
        assert_eq!(extremes.max_wind_speed, 13.2);
    }

    #[test]
    fn test_overall_extremes_empty_dataset() {
        let err = Aggregator::new().overall_extremes(&[]).unwrap_err();
        assert!(matches!(err, ReportError::EmptyDataset { .. }));
    }

    #[test]
    fn test_column_without_values_is_nan() {
        let records = vec![Measurement::new("A", at(0))];
        let extremes = Aggregator::new().overall_extremes(&records).unwrap();
        assert!(extremes.max_rain.is_nan());
        assert!(Aggregator::new()
            .column_mean(&records, Column::Rain)
            .unwrap()
            .is_nan());
    }
}
