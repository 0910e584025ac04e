//! Yield-series input validation
//!
//! Runs before any modelling: drops missing years, then rejects series that
//! are too short (status 110) or entirely monotonic (status 120, usually a
//! sign of stale or placeholder records). On failure the run returns with
//! only status fields populated.

use crate::types::YieldSeries;
use serde::{Deserialize, Serialize};

/// Run status carried on every output, serialized as its numeric code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
pub enum StatusCode {
    /// Run completed
    Success,
    /// Fewer than the required number of non-missing years
    InsufficientYears,
    /// Values are entirely non-decreasing or non-increasing
    MonotonicSeries,
}

impl StatusCode {
    pub fn code(self) -> u16 {
        match self {
            StatusCode::Success => 0,
            StatusCode::InsufficientYears => 110,
            StatusCode::MonotonicSeries => 120,
        }
    }

    pub fn message(self) -> Option<&'static str> {
        match self {
            StatusCode::Success => None,
            StatusCode::InsufficientYears => Some("The number of records is less than 15."),
            StatusCode::MonotonicSeries => Some("The records are monotonic."),
        }
    }
}

impl From<StatusCode> for u16 {
    fn from(status: StatusCode) -> Self {
        status.code()
    }
}

impl TryFrom<u16> for StatusCode {
    type Error = String;

    fn try_from(code: u16) -> std::result::Result<Self, Self::Error> {
        match code {
            0 => Ok(StatusCode::Success),
            110 => Ok(StatusCode::InsufficientYears),
            120 => Ok(StatusCode::MonotonicSeries),
            other => Err(format!("unknown status code: {other}")),
        }
    }
}

/// Whether a monotonic series fails the run or only warns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MonotonicPolicy {
    #[default]
    Reject,
    Warn,
}

/// Validation rules for the yield series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Minimum non-missing years required for the training/testing split
    pub min_years: usize,
    /// Handling of entirely monotonic series
    pub monotonic_policy: MonotonicPolicy,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_years: 15,
            monotonic_policy: MonotonicPolicy::Reject,
        }
    }
}

/// Outcome of validating a yield series
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    /// Cleaned series, safe to model
    Valid(YieldSeries),
    /// Fatal status; the run stops here
    Invalid(StatusCode),
}

/// Drop missing years and apply the configured rules
pub fn validate(series: &YieldSeries, config: &ValidationConfig) -> ValidationOutcome {
    let cleaned = series.drop_missing();

    if cleaned.len() < config.min_years {
        return ValidationOutcome::Invalid(StatusCode::InsufficientYears);
    }

    if cleaned.is_monotonic() {
        match config.monotonic_policy {
            MonotonicPolicy::Reject => {
                return ValidationOutcome::Invalid(StatusCode::MonotonicSeries);
            }
            MonotonicPolicy::Warn => {
                log::warn!(
                    "yield series is monotonic over {} years; continuing per policy",
                    cleaned.len()
                );
            }
        }
    }

    ValidationOutcome::Valid(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yearly(values: &[f64]) -> YieldSeries {
        YieldSeries::new(
            values
                .iter()
                .enumerate()
                .map(|(i, &v)| (2000 + i as i32, v))
                .collect(),
        )
    }

    #[test]
    fn test_short_series_is_110() {
        let series = yearly(&[1.0, 3.0, 2.0, 5.0, 4.0]);
        let outcome = validate(&series, &ValidationConfig::default());
        assert_eq!(outcome, ValidationOutcome::Invalid(StatusCode::InsufficientYears));
        assert_eq!(StatusCode::InsufficientYears.code(), 110);
    }

    #[test]
    fn test_missing_years_count_against_minimum() {
        // 16 raw years, only 14 finite
        let mut values: Vec<f64> = (0..16).map(|i| (i as f64 * 0.7).sin()).collect();
        values[3] = f64::NAN;
        values[9] = f64::NAN;
        let outcome = validate(&yearly(&values), &ValidationConfig::default());
        assert_eq!(outcome, ValidationOutcome::Invalid(StatusCode::InsufficientYears));
    }

    #[test]
    fn test_monotonic_series_is_120() {
        let values: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let outcome = validate(&yearly(&values), &ValidationConfig::default());
        assert_eq!(outcome, ValidationOutcome::Invalid(StatusCode::MonotonicSeries));
        assert_eq!(StatusCode::MonotonicSeries.code(), 120);
    }

    #[test]
    fn test_monotonic_warn_policy_passes() {
        let values: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let config = ValidationConfig {
            monotonic_policy: MonotonicPolicy::Warn,
            ..Default::default()
        };
        match validate(&yearly(&values), &config) {
            ValidationOutcome::Valid(series) => assert_eq!(series.len(), 20),
            other => panic!("expected valid outcome, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_series_is_cleaned() {
        let mut values: Vec<f64> = (0..20).map(|i| (i as f64 * 1.3).sin() * 4.0).collect();
        values[5] = f64::NAN;
        match validate(&yearly(&values), &ValidationConfig::default()) {
            ValidationOutcome::Valid(series) => {
                assert_eq!(series.len(), 19);
                assert!(series.values().iter().all(|v| v.is_finite()));
            }
            other => panic!("expected valid outcome, got {other:?}"),
        }
    }

    #[test]
    fn test_status_code_serde_round_trip() {
        let json = serde_json::to_string(&StatusCode::MonotonicSeries).unwrap();
        assert_eq!(json, "120");
        let back: StatusCode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, StatusCode::MonotonicSeries);
    }
}
