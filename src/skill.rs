//! Forecast skill scoring
//!
//! Two verification scores per lead time: the Gerrity skill score over a
//! tercile contingency table, and the mean-squared-error skill score (MSESS)
//! against a training-climatology baseline.

use crate::error::{Result, YieldcastError};
use serde::{Deserialize, Serialize};

const N_CLASSES: usize = 3;

/// Linear-interpolation quantile (the numpy default estimator)
pub fn quantile(values: &[f64], q: f64) -> Result<f64> {
    if values.is_empty() {
        return Err(YieldcastError::EmptyInput("quantile input".to_string()));
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let position = (sorted.len() - 1) as f64 * q.clamp(0.0, 1.0);
    let lower = position.floor() as usize;
    let fraction = position - lower as f64;
    if lower + 1 < sorted.len() {
        Ok(sorted[lower] + fraction * (sorted[lower + 1] - sorted[lower]))
    } else {
        Ok(sorted[lower])
    }
}

/// Tercile boundaries of a climatological distribution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TercileThresholds {
    pub lower: f64,
    pub upper: f64,
}

impl TercileThresholds {
    /// 1/3 and 2/3 quantiles of the training climatology
    pub fn from_climatology(climatology: &[f64]) -> Result<Self> {
        Ok(Self {
            lower: quantile(climatology, 1.0 / 3.0)?,
            upper: quantile(climatology, 2.0 / 3.0)?,
        })
    }

    /// Tercile class of a value: 0 below-normal, 1 normal, 2 above-normal
    pub fn classify(&self, value: f64) -> usize {
        if value <= self.lower {
            0
        } else if value <= self.upper {
            1
        } else {
            2
        }
    }
}

/// 3x3 contingency table, observed class by predicted class
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContingencyTable {
    pub counts: [[usize; N_CLASSES]; N_CLASSES],
}

impl ContingencyTable {
    /// Tally (observed, predicted) pairs into tercile classes.
    ///
    /// Pairs with a non-finite member are skipped; they come from isolated
    /// step failures.
    pub fn from_pairs(observed: &[f64], predicted: &[f64], thresholds: &TercileThresholds) -> Self {
        let mut counts = [[0usize; N_CLASSES]; N_CLASSES];
        for (&obs, &pred) in observed.iter().zip(predicted.iter()) {
            if obs.is_finite() && pred.is_finite() {
                counts[thresholds.classify(obs)][thresholds.classify(pred)] += 1;
            }
        }
        Self { counts }
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    /// Observed-class marginal frequencies
    fn observed_frequencies(&self) -> [f64; N_CLASSES] {
        let total = self.total() as f64;
        let mut freqs = [0.0; N_CLASSES];
        for (class, row) in self.counts.iter().enumerate() {
            freqs[class] = row.iter().sum::<usize>() as f64 / total;
        }
        freqs
    }
}

/// Gerrity skill score of an ordered three-class contingency table.
///
/// Scoring weights are derived from the observed class frequencies; range
/// [-1, 1], 1 for perfect agreement, 0 for no skill over random assignment
/// by class frequency. Returns NaN for empty or degenerate tables (a class
/// never observed).
pub fn gerrity_skill_score(table: &ContingencyTable) -> f64 {
    let total = table.total();
    if total == 0 {
        return f64::NAN;
    }
    let freqs = table.observed_frequencies();

    // Odds ratios from cumulative observed frequencies
    let mut odds = [0.0; N_CLASSES - 1];
    let mut cumulative = 0.0;
    for r in 0..N_CLASSES - 1 {
        cumulative += freqs[r];
        if cumulative <= 0.0 || cumulative >= 1.0 {
            return f64::NAN;
        }
        odds[r] = (1.0 - cumulative) / cumulative;
    }

    let b = 1.0 / (N_CLASSES as f64 - 1.0);
    let mut scoring = [[0.0; N_CLASSES]; N_CLASSES];
    for i in 0..N_CLASSES {
        for j in i..N_CLASSES {
            let recip_sum: f64 = odds[..i].iter().map(|a| 1.0 / a).sum();
            let tail_sum: f64 = odds[j..].iter().sum();
            let value = b * (recip_sum - (j - i) as f64 + tail_sum);
            scoring[i][j] = value;
            scoring[j][i] = value;
        }
    }

    let mut score = 0.0;
    for i in 0..N_CLASSES {
        for j in 0..N_CLASSES {
            score += table.counts[i][j] as f64 / total as f64 * scoring[i][j];
        }
    }
    score
}

/// Mean-squared-error skill score against the training-mean climatology.
///
/// `1 - MSE(forecast) / MSE(climatology)`: 0 means no better than always
/// forecasting the training mean, positive better, negative worse. Pairs
/// with a non-finite member are skipped.
pub fn msess(observed: &[f64], predicted: &[f64], climatology_mean: f64) -> f64 {
    let mut mse_forecast = 0.0;
    let mut mse_climatology = 0.0;
    let mut n = 0usize;
    for (&obs, &pred) in observed.iter().zip(predicted.iter()) {
        if obs.is_finite() && pred.is_finite() {
            mse_forecast += (obs - pred).powi(2);
            mse_climatology += (obs - climatology_mean).powi(2);
            n += 1;
        }
    }
    if n == 0 || mse_climatology == 0.0 {
        return f64::NAN;
    }
    1.0 - mse_forecast / mse_climatology
}
