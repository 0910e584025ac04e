//! Correlation-based column selection
//!
//! Each predictor variable contributes exactly one column to the regression:
//! the candidate combination whose Pearson correlation with training yield is
//! extremal under the variable's strategy. Correlations are computed on
//! training rows only.

use crate::combinations::CombinationMatrix;
use crate::error::{Result, YieldcastError};
use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, Distribution};

/// How a variable picks among its candidate combinations.
///
/// `MaxCorrelation` is the sensible default; `MinCorrelation` exists because
/// callers may want to reproduce legacy selection behaviour per variable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionStrategy {
    #[default]
    MaxCorrelation,
    MinCorrelation,
}

/// Pearson correlation coefficient of two equal-length slices.
///
/// Returns NaN when either side has (near-)zero variance or fewer than two
/// points, mirroring how degenerate columns drop out of selection.
pub fn pearson(x: &[f64], y: &[f64]) -> Result<f64> {
    if x.len() != y.len() {
        return Err(YieldcastError::DimensionMismatch {
            expected: y.len(),
            got: x.len(),
        });
    }
    if x.len() < 2 {
        return Ok(f64::NAN);
    }

    let n = x.len();
    let x_data = Data::new(x.to_vec());
    let y_data = Data::new(y.to_vec());
    let x_mean = x_data.mean().unwrap_or(0.0);
    let y_mean = y_data.mean().unwrap_or(0.0);

    let covariance: f64 = x
        .iter()
        .zip(y.iter())
        .map(|(&xi, &yi)| (xi - x_mean) * (yi - y_mean))
        .sum::<f64>()
        / (n - 1) as f64;

    let x_std = x_data.std_dev().unwrap_or(0.0);
    let y_std = y_data.std_dev().unwrap_or(0.0);

    if x_std == 0.0 || y_std == 0.0 {
        Ok(f64::NAN)
    } else {
        Ok(covariance / (x_std * y_std))
    }
}

/// Correlate every candidate column (training rows only) against training
/// yield. Degenerate columns yield NaN entries.
pub fn correlate_columns(
    matrix: &CombinationMatrix,
    n_train: usize,
    y_train: &[f64],
) -> Result<Vec<f64>> {
    if y_train.len() != n_train {
        return Err(YieldcastError::DimensionMismatch {
            expected: n_train,
            got: y_train.len(),
        });
    }
    matrix
        .columns
        .iter()
        .map(|column| {
            if column.len() < n_train {
                return Err(YieldcastError::DimensionMismatch {
                    expected: n_train,
                    got: column.len(),
                });
            }
            pearson(&column[..n_train], y_train)
        })
        .collect()
}

/// Index of the extremal finite correlation, ties broken by lowest index.
///
/// Errs when every correlation is NaN: the variable has no usable candidate
/// this step.
pub fn select_column(
    variable: &str,
    correlations: &[f64],
    strategy: SelectionStrategy,
) -> Result<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, &corr) in correlations.iter().enumerate() {
        if !corr.is_finite() {
            continue;
        }
        let better = match (best, strategy) {
            (None, _) => true,
            (Some((_, b)), SelectionStrategy::MaxCorrelation) => corr > b,
            (Some((_, b)), SelectionStrategy::MinCorrelation) => corr < b,
        };
        if better {
            best = Some((idx, corr));
        }
    }
    best.map(|(idx, _)| idx)
        .ok_or_else(|| YieldcastError::DegenerateSelection {
            variable: variable.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_pearson_perfect_positive() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 4.0, 6.0, 8.0, 10.0];
        assert_relative_eq!(pearson(&x, &y).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_pearson_perfect_negative() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [8.0, 6.0, 4.0, 2.0];
        assert_relative_eq!(pearson(&x, &y).unwrap(), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_pearson_constant_is_nan() {
        let x = [3.0, 3.0, 3.0];
        let y = [1.0, 2.0, 3.0];
        assert!(pearson(&x, &y).unwrap().is_nan());
    }

    #[test]
    fn test_pearson_length_mismatch() {
        assert!(pearson(&[1.0, 2.0], &[1.0]).is_err());
    }

    #[test]
    fn test_select_max_with_tie_takes_lowest_index() {
        let corr = [0.2, 0.9, 0.9, 0.5];
        let idx = select_column("prcp", &corr, SelectionStrategy::MaxCorrelation).unwrap();
        assert_eq!(idx, 1);
    }

    #[test]
    fn test_select_min() {
        let corr = [0.2, -0.7, 0.9];
        let idx = select_column("etos", &corr, SelectionStrategy::MinCorrelation).unwrap();
        assert_eq!(idx, 1);
    }

    #[test]
    fn test_select_skips_nan() {
        let corr = [f64::NAN, 0.1, f64::NAN, 0.3];
        let idx = select_column("smos", &corr, SelectionStrategy::MaxCorrelation).unwrap();
        assert_eq!(idx, 3);
    }

    #[test]
    fn test_select_all_nan_is_error() {
        let corr = [f64::NAN, f64::NAN];
        let err = select_column("smos", &corr, SelectionStrategy::MaxCorrelation).unwrap_err();
        assert!(matches!(
            err,
            YieldcastError::DegenerateSelection { .. }
        ));
    }
}
