//! Plain-text rendering of report tables for the terminal.

use crate::models::{
    CorrelationMatrix, DegradedReason, HeadlineMetrics, PollutantSummary, RainOverview,
    SeasonalProfile, StationPollutantLevels, TemperatureOverview, YearlyTrend,
};
use crate::report::Preview;

fn cell(value: f64, decimals: usize) -> String {
    if value.is_nan() {
        "-".to_string()
    } else {
        format!("{:.*}", decimals, value)
    }
}

fn metric(value: f64, unit: &str) -> String {
    if value.is_nan() {
        "No valid measurements".to_string()
    } else {
        format!("{:.1}{}", value, unit)
    }
}

pub fn headline(metrics: &HeadlineMetrics) -> String {
    format!(
        "Maximum Temperature: {}\n\
        Maximum Rain Volume: {}\n\
        Maximum Wind Speed: {}\n\
        Highest Pollution Index: {}",
        metric(metrics.max_temp, "°C"),
        metric(metrics.max_rain, "mm"),
        metric(metrics.max_wind_speed, "m/s"),
        metric(metrics.max_pollution_index, " ppm"),
    )
}

pub fn preview(preview: &Preview<'_>) -> String {
    let mut out = String::new();
    let header: Vec<String> = std::iter::once("station".to_string())
        .chain(std::iter::once("datetime".to_string()))
        .chain(preview.columns.iter().map(|c| c.name().to_string()))
        .collect();
    out.push_str(&format!("{}\n", header.join("\t")));

    for row in &preview.rows {
        let mut cells = vec![
            row.station.clone(),
            row.timestamp.format("%Y-%m-%d %H:%M").to_string(),
        ];
        cells.extend(preview.columns.iter().map(|c| row.display_value(*c)));
        out.push_str(&format!("{}\n", cells.join("\t")));
    }
    out
}

pub fn station_summary(rows: &[PollutantSummary]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<4} {:<16} {:>10} {:>10} {:>10} {:>10} {:>10} {:>12}\n",
        "Rank", "Station", "PM10", "SO2", "NO2", "CO", "O3", "Total index"
    ));
    for (rank, row) in rows.iter().enumerate() {
        out.push_str(&format!(
            "{:<4} {:<16} {:>10} {:>10} {:>10} {:>10} {:>10} {:>12}\n",
            rank + 1,
            row.station,
            cell(row.pm10, 2),
            cell(row.so2, 2),
            cell(row.no2, 2),
            cell(row.co, 2),
            cell(row.o3, 2),
            cell(row.total_index, 2),
        ));
    }
    out
}

pub fn pollutant_levels(rows: &[StationPollutantLevels]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<16} {:>10} {:>10} {:>10} {:>10} {:>10} {:>12}\n",
        "Station", "PM10", "SO2", "NO2", "CO", "O3", "Total index"
    ));
    for row in rows {
        out.push_str(&format!(
            "{:<16} {:>10} {:>10} {:>10} {:>10} {:>10} {:>12}\n",
            row.station,
            row.pm10.map(|v| cell(v, 2)).unwrap_or_else(|| "-".to_string()),
            cell(row.so2, 2),
            cell(row.no2, 2),
            cell(row.co, 2),
            cell(row.o3, 2),
            cell(row.total_index, 2),
        ));
    }
    out
}

pub fn correlations(matrix: &CorrelationMatrix) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<12}", ""));
    for column in matrix.columns() {
        out.push_str(&format!(" {:>10}", column.name()));
    }
    out.push('\n');

    for (column, values) in matrix.rows() {
        out.push_str(&format!("{:<12}", column.name()));
        for value in values {
            out.push_str(&format!(" {:>10}", cell(*value, 3)));
        }
        out.push('\n');
    }

    if !matrix.degraded_pairs().is_empty() {
        out.push_str("\nUndefined coefficients:\n");
        for pair in matrix.degraded_pairs() {
            let reason = match pair.reason {
                DegradedReason::InsufficientData { observations } => {
                    format!("{} paired observations", observations)
                }
                DegradedReason::ZeroVariance => "no variation".to_string(),
            };
            out.push_str(&format!("  - {} / {}: {}\n", pair.left, pair.right, reason));
        }
    }
    out
}

pub fn yearly_trend(trend: &YearlyTrend) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<6}", "Year"));
    for pollutant in &trend.pollutants {
        out.push_str(&format!(" {:>10}", pollutant.name()));
    }
    out.push('\n');

    for point in &trend.points {
        out.push_str(&format!("{:<6}", point.year));
        for pollutant in &trend.pollutants {
            let value = point.means.get(pollutant).copied().unwrap_or(f64::NAN);
            out.push_str(&format!(" {:>10}", cell(value, 2)));
        }
        out.push('\n');
    }
    out
}

pub fn seasonal_profile(profile: &SeasonalProfile) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<6}", "Month"));
    for pollutant in &profile.pollutants {
        out.push_str(&format!(" {:>10}", pollutant.name()));
    }
    out.push('\n');

    for point in &profile.points {
        out.push_str(&format!("{:<6}", point.month));
        for pollutant in &profile.pollutants {
            let value = point.means.get(pollutant).copied().unwrap_or(f64::NAN);
            out.push_str(&format!(" {:>10}", cell(value, 2)));
        }
        out.push('\n');
    }
    out
}

pub fn temperature(overview: &TemperatureOverview) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<16} {:>10} {:>10}\n", "Station", "TEMP_MAX", "TEMP_MIN"));
    for row in &overview.stations {
        out.push_str(&format!(
            "{:<16} {:>10} {:>10}\n",
            row.station,
            cell(row.temp_max, 1),
            cell(row.temp_min, 1)
        ));
    }
    out.push_str(&format!(
        "\nMaximum Temperature: {}\nMinimum Temperature: {}",
        metric(overview.max_temp, "°C"),
        metric(overview.reported_min_temp, "°C"),
    ));
    out
}

pub fn rain(overview: &RainOverview) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<16} {:>10} {:>10}\n", "Station", "RAIN_MAX", "RAIN_MIN"));
    for row in &overview.stations {
        out.push_str(&format!(
            "{:<16} {:>10} {:>10}\n",
            row.station,
            cell(row.rain_max, 1),
            cell(row.rain_min, 1)
        ));
    }
    out.push_str(&format!(
        "\nMaximum Rain Volume: {}\nAverage Rain Volume: {}",
        metric(overview.max_rain, "mm"),
        metric(overview.mean_rain, "mm"),
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headline_formatting() {
        let text = headline(&HeadlineMetrics {
            max_temp: 41.6,
            max_rain: 72.5,
            max_wind_speed: 13.2,
            max_pollution_index: f64::NAN,
        });

        assert!(text.contains("Maximum Temperature: 41.6°C"));
        assert!(text.contains("Maximum Rain Volume: 72.5mm"));
        assert!(text.contains("Maximum Wind Speed: 13.2m/s"));
        assert!(text.contains("Highest Pollution Index: No valid measurements"));
    }

    #[test]
    fn test_correlations_lists_undefined_pairs() {
        use crate::analyzers::CorrelationEngine;
        use crate::models::{Column, Measurement};
        use chrono::NaiveDate;

        let records: Vec<Measurement> = (0..3)
            .map(|hour| {
                let timestamp = NaiveDate::from_ymd_opt(2016, 6, 1)
                    .unwrap()
                    .and_hms_opt(hour, 0, 0)
                    .unwrap();
                Measurement::builder("Wanliu", timestamp)
                    .value(Column::So2, f64::from(hour))
                    .value(Column::Rain, 0.0)
                    .build()
            })
            .collect();
        let matrix = CorrelationEngine::new()
            .correlation_matrix(&records, &[Column::So2, Column::Rain])
            .unwrap();

        let text = correlations(&matrix);
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].contains("SO2") && lines[0].contains("RAIN"));
        assert!(lines[1].starts_with("SO2") && lines[1].contains("1.000"));
        assert!(text.contains("Undefined coefficients:"));
        assert!(text.contains("  - SO2 / RAIN: no variation"));
        assert!(text.contains("  - RAIN / RAIN: no variation"));
    }

    #[test]
    fn test_station_summary_marks_nan() {
        let text = station_summary(&[PollutantSummary {
            station: "Dingling".to_string(),
            pm10: 83.74,
            so2: 11.75,
            no2: 27.59,
            co: 904.9,
            o3: f64::NAN,
            total_index: f64::NAN,
        }]);

        let row = text.lines().nth(1).unwrap();
        assert!(row.starts_with("1    Dingling"));
        assert!(row.contains("904.90"));
        assert!(row.trim_end().ends_with('-'));
    }
}
