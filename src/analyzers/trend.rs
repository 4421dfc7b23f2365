use crate::error::{ReportError, Result};
use crate::models::{Measurement, MonthlyPoint, Pollutant, SeasonalProfile, YearlyPoint, YearlyTrend};
use crate::utils::MeanAccumulator;
use std::collections::BTreeMap;
use tracing::debug;

/// Calendar-bucketed pollutant means.
pub struct TrendEngine;

impl TrendEngine {
    pub fn new() -> Self {
        Self
    }

    /// Per-year means of `pollutants`, ascending by year.
    ///
    /// A year in which a pollutant has no values gets `NaN` for it.
    pub fn yearly_means(
        &self,
        records: &[Measurement],
        pollutants: &[Pollutant],
    ) -> Result<YearlyTrend> {
        let pollutants = dedup(pollutants);
        let buckets = bucket_means(records, &pollutants, Measurement::year, "yearly means")?;

        let points: Vec<YearlyPoint> = buckets
            .into_iter()
            .map(|(year, means)| YearlyPoint { year, means })
            .collect();
        debug!(years = points.len(), "yearly trend computed");

        Ok(YearlyTrend { pollutants, points })
    }

    /// Per-calendar-month means of `pollutants`, pooled across years.
    pub fn seasonal_means(
        &self,
        records: &[Measurement],
        pollutants: &[Pollutant],
    ) -> Result<SeasonalProfile> {
        let pollutants = dedup(pollutants);
        let buckets = bucket_means(records, &pollutants, Measurement::month, "seasonal means")?;

        let points: Vec<MonthlyPoint> = buckets
            .into_iter()
            .map(|(month, means)| MonthlyPoint { month, means })
            .collect();
        debug!(months = points.len(), "seasonal profile computed");

        Ok(SeasonalProfile { pollutants, points })
    }
}

impl Default for TrendEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn dedup(pollutants: &[Pollutant]) -> Vec<Pollutant> {
    let mut unique = Vec::with_capacity(pollutants.len());
    for pollutant in pollutants {
        if !unique.contains(pollutant) {
            unique.push(*pollutant);
        }
    }
    unique
}

/// Means per bucket key; the BTreeMap keeps keys ascending.
fn bucket_means<K, F>(
    records: &[Measurement],
    pollutants: &[Pollutant],
    key: F,
    operation: &'static str,
) -> Result<BTreeMap<K, BTreeMap<Pollutant, f64>>>
where
    K: Ord,
    F: Fn(&Measurement) -> K,
{
    if records.is_empty() {
        return Err(ReportError::EmptyDataset { operation });
    }

    let mut buckets: BTreeMap<K, Vec<MeanAccumulator>> = BTreeMap::new();
    for record in records {
        let accumulators = buckets
            .entry(key(record))
            .or_insert_with(|| vec![MeanAccumulator::default(); pollutants.len()]);
        for (acc, pollutant) in accumulators.iter_mut().zip(pollutants) {
            acc.push(record.pollutant(*pollutant));
        }
    }

    Ok(buckets
        .into_iter()
        .map(|(k, accumulators)| {
            let means = pollutants
                .iter()
                .copied()
                .zip(accumulators.iter().map(MeanAccumulator::mean))
                .collect();
            (k, means)
        })
        .collect())
}
