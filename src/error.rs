//! Error types for Yieldcast
//!
//! Validation outcomes (status 110/120) are *not* errors: they are statuses
//! on the run output. Errors here signal contract violations or numeric
//! failures inside a walk-forward step.

use thiserror::Error;

/// Main error type for Yieldcast
#[derive(Error, Debug, Clone, PartialEq)]
pub enum YieldcastError {
    #[error("empty input: {0}")]
    EmptyInput(String),

    #[error("invalid calendar month: {0} (expected 1..=12)")]
    InvalidMonth(u32),

    #[error("invalid lead list: {0}")]
    InvalidLeads(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("predictor '{variable}' has no value for {month}")]
    MissingPredictorMonth { variable: String, month: String },

    #[error("no usable combination for predictor '{variable}': all correlations degenerate")]
    DegenerateSelection { variable: String },

    #[error("zero variance in column '{0}': cannot standardize")]
    ZeroVariance(String),

    #[error("regression failed: {0}")]
    SingularFit(String),
}

/// Result type alias for Yieldcast operations
pub type Result<T> = std::result::Result<T, YieldcastError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = YieldcastError::InvalidMonth(13);
        assert_eq!(err.to_string(), "invalid calendar month: 13 (expected 1..=12)");

        let err = YieldcastError::DimensionMismatch { expected: 3, got: 2 };
        assert_eq!(err.to_string(), "dimension mismatch: expected 3, got 2");

        let err = YieldcastError::MissingPredictorMonth {
            variable: "prcp".to_string(),
            month: "1999-06".to_string(),
        };
        assert!(err.to_string().contains("prcp"));
        assert!(err.to_string().contains("1999-06"));
    }

    #[test]
    fn test_errors_clone_and_compare() {
        let err = YieldcastError::ZeroVariance("yield".to_string());
        assert_eq!(err.clone(), err);
    }
}
