use crate::error::{ReportError, Result};
use crate::models::{Column, CorrelationMatrix, DegradedPair, DegradedReason, Measurement};
use crate::utils::constants::MIN_PAIRED_OBSERVATIONS;
use std::cmp::Ordering;
use tracing::{debug, warn};

/// Average ranks (1-based), ties sharing the mean of their positions.
pub fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap_or(Ordering::Equal));

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // Positions start..end hold equal values: ranks start+1 ..= end.
        let rank = (start + 1 + end) as f64 / 2.0;
        for &index in &order[start..end] {
            ranks[index] = rank;
        }
        start = end;
    }

    ranks
}

/// Product-moment correlation. `None` when either side has zero variance.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len().min(y.len());
    if n == 0 {
        return None;
    }

    let mean_x = x[..n].iter().sum::<f64>() / n as f64;
    let mean_y = y[..n].iter().sum::<f64>() / n as f64;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in x[..n].iter().zip(&y[..n]) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    Some((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}

/// Spearman rank correlation with pairwise deletion.
pub struct CorrelationEngine {
    min_observations: usize,
}

impl CorrelationEngine {
    pub fn new() -> Self {
        Self {
            min_observations: MIN_PAIRED_OBSERVATIONS,
        }
    }

    /// Coefficient for a single pair.
    ///
    /// Only rows where both columns are present take part, and ranks are
    /// assigned within those rows. Self-pairs are 1.0 given enough data.
    pub fn correlate_pair(
        &self,
        records: &[Measurement],
        left: Column,
        right: Column,
    ) -> Result<Option<f64>> {
        let (xs, ys): (Vec<f64>, Vec<f64>) = records
            .iter()
            .filter_map(|r| Some((r.value(left)?, r.value(right)?)))
            .unzip();

        if xs.len() < self.min_observations {
            return Err(ReportError::InsufficientData {
                left,
                right,
                observations: xs.len(),
            });
        }

        let rank_x = average_ranks(&xs);
        if left == right {
            // Self-pair: defined whenever the column varies.
            return Ok(pearson(&rank_x, &rank_x).map(|_| 1.0));
        }

        let rank_y = average_ranks(&ys);
        Ok(pearson(&rank_x, &rank_y))
    }

    /// Matrix over `columns`. Non-numeric columns are dropped.
    ///
    /// A pair without enough data, or whose ranks do not vary, becomes a
    /// `NaN` cell and is listed in [`CorrelationMatrix::degraded_pairs`];
    /// the other pairs are unaffected.
    pub fn correlation_matrix(
        &self,
        records: &[Measurement],
        columns: &[Column],
    ) -> Result<CorrelationMatrix> {
        if records.is_empty() {
            return Err(ReportError::EmptyDataset {
                operation: "correlation matrix",
            });
        }

        let mut selected: Vec<Column> = Vec::with_capacity(columns.len());
        for column in columns {
            if !column.is_numeric() {
                debug!(%column, "skipping non-numeric column");
            } else if !selected.contains(column) {
                selected.push(*column);
            }
        }

        let mut matrix = CorrelationMatrix::empty(selected.clone());
        for (i, &left) in selected.iter().enumerate() {
            for (j, &right) in selected.iter().enumerate().skip(i) {
                match self.correlate_pair(records, left, right) {
                    Ok(Some(coefficient)) => matrix.set_pair(i, j, coefficient),
                    Ok(None) => {
                        warn!(%left, %right, "rank variance is zero, coefficient undefined");
                        matrix.mark_degraded(DegradedPair {
                            left,
                            right,
                            reason: DegradedReason::ZeroVariance,
                        });
                    }
                    Err(ReportError::InsufficientData { observations, .. }) => {
                        warn!(%left, %right, observations, "insufficient paired observations");
                        matrix.mark_degraded(DegradedPair {
                            left,
                            right,
                            reason: DegradedReason::InsufficientData { observations },
                        });
                    }
                    Err(other) => return Err(other),
                }
            }
        }

        debug!(
            columns = selected.len(),
            degraded = matrix.degraded_pairs().len(),
            "correlation matrix computed"
        );
        Ok(matrix)
    }
}

impl Default for CorrelationEngine {
    fn default() -> Self {
        Self::new()
    }
}
