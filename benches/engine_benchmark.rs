use air_quality_report::analyzers::{Aggregator, CorrelationEngine, TrendEngine};
use air_quality_report::models::{Column, Measurement, Pollutant};
use air_quality_report::readers::MeasurementReader;
use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

// Hourly readings spread over several stations and years
fn create_test_measurements(station_count: usize, hours: usize) -> Vec<Measurement> {
    let start = NaiveDate::from_ymd_opt(2013, 3, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let mut records = Vec::with_capacity(station_count * hours);

    for station in 0..station_count {
        let name = format!("Station {}", station);
        for hour in 0..hours {
            let t = hour as f64;
            let offset = station as f64 * 3.0;
            let mut builder = Measurement::builder(&name, start + Duration::hours(hour as i64 * 7))
                .value(Column::Pm10, 80.0 + (t * 0.13).sin() * 40.0 + offset)
                .value(Column::No2, 40.0 + (t * 0.05).cos() * 15.0)
                .value(Column::Co, 1_200.0 + (t * 0.02).sin() * 500.0)
                .value(Column::O3, 55.0 - (t * 0.05).cos() * 20.0)
                .value(Column::Temp, 12.0 + (t * 0.01).sin() * 18.0)
                .value(Column::Pres, 1_010.0 + (t * 0.03).cos() * 12.0)
                .value(Column::Rain, if hour % 17 == 0 { 1.2 } else { 0.0 })
                .value(Column::WindSpeed, 2.0 + (t * 0.4).sin().abs() * 3.0);
            // every tenth SO2 reading missing
            if hour % 10 != 0 {
                builder = builder.value(Column::So2, 15.0 + (t * 0.07).sin() * 8.0);
            }
            records.push(builder.build());
        }
    }

    records
}

fn create_test_csv(rows: usize) -> String {
    let mut text = String::from(
        "station,datetime,PM10,SO2,NO2,CO,O3,TEMP,PRES,RAIN,wind_direction,wind_speed\n",
    );
    for row in 0..rows {
        text.push_str(&format!(
            "Dongsi,2015-{:02}-{:02} {:02}:00:00,{},{},NA,900,{},{},1012.5,0.0,NNE,{}\n",
            row % 12 + 1,
            row % 28 + 1,
            row % 24,
            50 + row % 40,
            5 + row % 9,
            30 + row % 50,
            row % 35,
            (row % 7) as f64 * 0.5,
        ));
    }
    text
}

fn benchmark_station_summary(c: &mut Criterion) {
    let records = create_test_measurements(12, 2_000);

    c.bench_function("station_summary", |b| {
        b.iter(|| {
            let summary = Aggregator::new().summarize_by_station(&records).unwrap();
            black_box(summary.len())
        })
    });
}

fn benchmark_correlation_matrix(c: &mut Criterion) {
    let records = create_test_measurements(4, 2_500);

    c.bench_function("correlation_matrix", |b| {
        b.iter(|| {
            let matrix = CorrelationEngine::new()
                .correlation_matrix(&records, &Column::NUMERIC)
                .unwrap();
            black_box(matrix.degraded_pairs().len())
        })
    });
}

fn benchmark_yearly_trend(c: &mut Criterion) {
    let records = create_test_measurements(12, 2_000);

    c.bench_function("yearly_trend", |b| {
        b.iter(|| {
            let trend = TrendEngine::new()
                .yearly_means(&records, &Pollutant::ALL)
                .unwrap();
            black_box(trend.points.len())
        })
    });
}

fn benchmark_measurement_parsing(c: &mut Criterion) {
    let text = create_test_csv(5_000);

    c.bench_function("measurement_parsing", |b| {
        b.iter(|| {
            let records = MeasurementReader::new()
                .parse_measurements(&text, "bench.csv")
                .unwrap();
            black_box(records.len())
        })
    });
}

fn benchmark_varying_data_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("correlation_by_size");

    for &size in &[500, 2_000, 8_000] {
        group.bench_with_input(BenchmarkId::new("rows", size), &size, |b, &rows| {
            let records = create_test_measurements(1, rows);
            b.iter(|| {
                let matrix = CorrelationEngine::new()
                    .correlation_matrix(&records, &Column::NUMERIC)
                    .unwrap();
                black_box(matrix.columns().len())
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_station_summary,
    benchmark_correlation_matrix,
    benchmark_yearly_trend,
    benchmark_measurement_parsing,
    benchmark_varying_data_sizes
);
criterion_main!(benches);
