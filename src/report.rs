//! Run output assembly
//!
//! Per-lead diagnostics are keyed by a label derived from the calendar month
//! the lead falls on (`"m06"` for June). On validation failure only the
//! status fields are populated.

use crate::regression::LinearModel;
use crate::types::{Lead, Month, YieldSeries};
use crate::validation::StatusCode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Label for one lead's diagnostics, derived from its calendar month
pub fn month_label(month: Month) -> String {
    format!("m{month:02}")
}

/// One predictor variable's selected combination at the final refit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedColumn {
    pub variable: String,
    /// Calendar months whose values are summed into the column
    pub months: Vec<Month>,
    /// Training correlation of the column at selection time
    pub correlation: f64,
}

/// Diagnostics for one lead time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadReport {
    pub lead: Lead,
    /// Calendar month the lead falls on
    pub month: Month,
    /// Model refit at the final walk-forward step, if any step succeeded
    pub model: Option<LinearModel>,
    /// Selected combination per variable at the final refit
    pub selected: Vec<SelectedColumn>,
    /// Initial training block
    pub y_train: YieldSeries,
    /// Held-out test tail
    pub y_test: YieldSeries,
    /// Out-of-sample prediction per test year; NaN marks an isolated step
    /// failure
    pub predictions: Vec<f64>,
    /// In-sample predictions of the final refit over its training rows
    pub in_sample: Option<Vec<f64>>,
    /// Gerrity skill score over the test period
    pub gerrity: f64,
    /// MSE skill score against training climatology
    pub msess: f64,
}

/// Aggregated output of one forecasting run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutput {
    /// Caller-supplied run identifier
    pub run_id: Option<String>,
    pub status: StatusCode,
    pub status_msg: Option<String>,
    /// Per-lead diagnostics keyed by calendar-month label
    pub leads: BTreeMap<String, LeadReport>,
}

impl RunOutput {
    /// Output for a run stopped by validation
    pub fn failure(run_id: Option<String>, status: StatusCode) -> Self {
        Self {
            run_id,
            status,
            status_msg: status.message().map(str::to_string),
            leads: BTreeMap::new(),
        }
    }

    /// Output for a completed run
    pub fn success(run_id: Option<String>, reports: Vec<LeadReport>) -> Self {
        let leads = reports
            .into_iter()
            .map(|report| (month_label(report.month), report))
            .collect();
        Self {
            run_id,
            status: StatusCode::Success,
            status_msg: None,
            leads,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == StatusCode::Success
    }
}
