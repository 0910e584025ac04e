//! Standardized ordinary-least-squares regression
//!
//! The forecaster standardizes predictors and target with training-set mean
//! and sample standard deviation (ddof = 1), fits OLS with intercept on the
//! standardized training data, and inverts the transform on predictions.
//! Every walk-forward step refits from scratch.

use crate::error::{Result, YieldcastError};
use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, Distribution};

/// Mean / sample-standard-deviation transform for one column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standardizer {
    pub mean: f64,
    pub std_dev: f64,
}

impl Standardizer {
    /// Fit from training values. Errs on fewer than two points or zero
    /// variance, since the transform would not be invertible.
    pub fn fit(label: &str, values: &[f64]) -> Result<Self> {
        if values.len() < 2 {
            return Err(YieldcastError::EmptyInput(format!(
                "standardizer for '{label}' needs at least 2 values, got {}",
                values.len()
            )));
        }
        let data = Data::new(values.to_vec());
        let mean = data.mean().unwrap_or(0.0);
        let std_dev = data.std_dev().unwrap_or(0.0);
        if std_dev == 0.0 || !std_dev.is_finite() {
            return Err(YieldcastError::ZeroVariance(label.to_string()));
        }
        Ok(Self { mean, std_dev })
    }

    pub fn transform_value(&self, value: f64) -> f64 {
        (value - self.mean) / self.std_dev
    }

    pub fn inverse_value(&self, value: f64) -> f64 {
        value * self.std_dev + self.mean
    }

    pub fn transform(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|&v| self.transform_value(v)).collect()
    }

    pub fn inverse(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|&v| self.inverse_value(v)).collect()
    }
}

/// Fitted linear model, `y = intercept + x . coefficients`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl LinearModel {
    /// Fit OLS with intercept on column-major predictors.
    ///
    /// Solves the normal equations with a Cholesky decomposition; a small
    /// diagonal term guards against near-singular designs.
    pub fn fit(columns: &[Vec<f64>], y: &[f64]) -> Result<Self> {
        let n = y.len();
        if n == 0 {
            return Err(YieldcastError::EmptyInput("regression target".to_string()));
        }
        for column in columns {
            if column.len() != n {
                return Err(YieldcastError::DimensionMismatch {
                    expected: n,
                    got: column.len(),
                });
            }
        }

        let k = columns.len();
        let num_params = k + 1;

        // Accumulate X'X and X'y with the intercept as column zero
        let mut xtx = vec![vec![0.0; num_params]; num_params];
        let mut xty = vec![0.0; num_params];
        for obs in 0..n {
            xtx[0][0] += 1.0;
            for i in 0..k {
                let xi = columns[i][obs];
                xtx[0][i + 1] += xi;
                xtx[i + 1][0] += xi;
                for j in 0..k {
                    xtx[i + 1][j + 1] += xi * columns[j][obs];
                }
            }
            xty[0] += y[obs];
            for i in 0..k {
                xty[i + 1] += columns[i][obs] * y[obs];
            }
        }

        for i in 0..num_params {
            xtx[i][i] += 1e-8;
        }

        let beta = solve_symmetric(&xtx, &xty).ok_or_else(|| {
            YieldcastError::SingularFit("normal equations not positive definite".to_string())
        })?;

        Ok(Self {
            intercept: beta[0],
            coefficients: beta[1..].to_vec(),
        })
    }

    /// Predict one observation from its predictor row
    pub fn predict_row(&self, row: &[f64]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(row.iter())
                .map(|(c, x)| c * x)
                .sum::<f64>()
    }

    /// Predict every observation in column-major predictors
    pub fn predict(&self, columns: &[Vec<f64>]) -> Vec<f64> {
        let n = columns.first().map_or(0, Vec::len);
        (0..n)
            .map(|obs| {
                self.intercept
                    + self
                        .coefficients
                        .iter()
                        .zip(columns.iter())
                        .map(|(c, col)| c * col[obs])
                        .sum::<f64>()
            })
            .collect()
    }
}

/// Solve `A x = b` for symmetric positive definite `A` via Cholesky
fn solve_symmetric(a: &[Vec<f64>], b: &[f64]) -> Option<Vec<f64>> {
    let n = b.len();
    if n == 0 || a.len() != n {
        return None;
    }

    let mut l = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[i][j];
            for k in 0..j {
                sum -= l[i][k] * l[j][k];
            }
            if i == j {
                if sum <= 0.0 {
                    return None;
                }
                l[i][j] = sum.sqrt();
            } else {
                l[i][j] = sum / l[j][j];
            }
        }
    }

    let mut y = vec![0.0; n];
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum -= l[i][j] * y[j];
        }
        y[i] = sum / l[i][i];
    }

    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = y[i];
        for j in (i + 1)..n {
            sum -= l[j][i] * x[j];
        }
        x[i] = sum / l[i][i];
    }

    Some(x)
}
