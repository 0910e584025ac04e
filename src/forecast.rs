//! Walk-forward forecast evaluation
//!
//! The evaluator drives the whole model: per lead time it replays the test
//! period one year at a time with an expanding training window, re-running
//! combination generation, correlation selection and the standardized
//! regression at every step, then scores the out-of-sample predictions.
//!
//! Causal ordering is strict: step j sees the initial training block plus
//! test years before j, and nothing else. Numeric failures are isolated to
//! their step; the prediction is recorded as NaN and the walk continues.

use crate::calendar::lead_to_months;
use crate::combinations::build_combination_matrix;
use crate::error::{Result, YieldcastError};
use crate::regression::{LinearModel, Standardizer};
use crate::report::{LeadReport, RunOutput, SelectedColumn};
use crate::selection::{correlate_columns, select_column};
use crate::skill::{gerrity_skill_score, msess, ContingencyTable, TercileThresholds};
use crate::types::{Lead, Month, PredictorBundle, YearMonth, YieldSeries};
use crate::validation::{validate, ValidationConfig, ValidationOutcome};
use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, Distribution};

/// Configuration for a forecasting run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Yield-series validation rules
    pub validation: ValidationConfig,
    /// Fraction of years held out as the temporally-ordered test tail
    pub test_fraction: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            validation: ValidationConfig::default(),
            test_fraction: 0.30,
        }
    }
}

/// Forecasting model over explicit inputs; holds no state across runs
#[derive(Debug, Clone, Default)]
pub struct ForecastEngine {
    config: ForecastConfig,
}

/// One successful walk-forward step
struct StepFit {
    prediction: f64,
    model: LinearModel,
    in_sample: Vec<f64>,
    selected: Vec<SelectedColumn>,
}

impl ForecastEngine {
    pub fn new(config: ForecastConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Run the full walk-forward evaluation.
    ///
    /// Validation failures are statuses on the returned output, not errors;
    /// `Err` signals a contract violation (bad month, empty bundle or lead
    /// list, unusable test fraction).
    pub fn run(
        &self,
        yields: &YieldSeries,
        bundle: &PredictorBundle,
        target_month: Month,
        leads: &[Lead],
        run_id: Option<&str>,
    ) -> Result<RunOutput> {
        if !(1..=12).contains(&target_month) {
            return Err(YieldcastError::InvalidMonth(target_month));
        }
        if leads.is_empty() {
            return Err(YieldcastError::InvalidLeads("empty lead list".to_string()));
        }
        if bundle.is_empty() {
            return Err(YieldcastError::EmptyInput("predictor bundle".to_string()));
        }
        if !(self.config.test_fraction > 0.0 && self.config.test_fraction < 1.0) {
            return Err(YieldcastError::InvalidConfig(format!(
                "test_fraction must be in (0, 1), got {}",
                self.config.test_fraction
            )));
        }

        // Reports are keyed by calendar month, so leads a whole year apart
        // would collide in the output map
        let months = lead_to_months(target_month, leads);
        let mut seen = std::collections::BTreeSet::new();
        if let Some(duplicate) = months.iter().find(|&&month| !seen.insert(month)) {
            return Err(YieldcastError::InvalidLeads(format!(
                "leads {leads:?} revisit calendar month {duplicate} at target {target_month}"
            )));
        }

        let id = run_id.unwrap_or("-");
        log::info!("run {id}: target month {target_month}, leads {leads:?}");

        let cleaned = match validate(yields, &self.config.validation) {
            ValidationOutcome::Valid(series) => series,
            ValidationOutcome::Invalid(status) => {
                log::info!("run {id}: rejected with status {}", status.code());
                return Ok(RunOutput::failure(run_id.map(str::to_string), status));
            }
        };

        // Fixed, non-shuffled 30% tail; the split never moves during the run
        let n = cleaned.len();
        let n_test = (n as f64 * self.config.test_fraction).ceil() as usize;
        let n_train = n - n_test;
        if n_test == 0 || n_train < 2 {
            return Err(YieldcastError::InvalidConfig(format!(
                "split of {n} years into {n_train} train / {n_test} test is unusable"
            )));
        }

        let y_train_block = YieldSeries::new(
            cleaned.years()[..n_train]
                .iter()
                .zip(&cleaned.values()[..n_train])
                .map(|(&year, &value)| (year, value))
                .collect(),
        );
        let y_test_block = YieldSeries::new(
            cleaned.years()[n_train..]
                .iter()
                .zip(&cleaned.values()[n_train..])
                .map(|(&year, &value)| (year, value))
                .collect(),
        );

        // Training climatology, computed once over the full training block
        let climatology = y_train_block.values().to_vec();
        let climatology_mean = Data::new(climatology.clone()).mean().unwrap_or(0.0);
        let thresholds = TercileThresholds::from_climatology(&climatology)?;

        let mut reports = Vec::with_capacity(leads.len());
        for (i, &lead) in leads.iter().enumerate() {
            let active_leads = &leads[..=i];
            let month = months[i];
            log::debug!("run {id}: lead {lead} (month {month}), active set {active_leads:?}");

            let mut predictions = Vec::with_capacity(n_test);
            let mut last_fit: Option<StepFit> = None;
            for j in 0..n_test {
                let train_len = n_train + j;
                let y_train = &cleaned.values()[..train_len];
                let timestamps: Vec<YearMonth> = cleaned.years()[..=train_len]
                    .iter()
                    .map(|&year| YearMonth {
                        year,
                        month: target_month,
                    })
                    .collect();

                match forecast_step(bundle, &timestamps, y_train, active_leads) {
                    Ok(fit) => {
                        predictions.push(fit.prediction);
                        last_fit = Some(fit);
                    }
                    Err(err) => {
                        log::warn!(
                            "run {id}: lead {lead} step {j} ({}) skipped: {err}",
                            cleaned.years()[train_len]
                        );
                        predictions.push(f64::NAN);
                    }
                }
            }

            let observed = y_test_block.values();
            let table = ContingencyTable::from_pairs(observed, &predictions, &thresholds);
            let gerrity = gerrity_skill_score(&table);
            let msess_score = msess(observed, &predictions, climatology_mean);
            log::debug!("run {id}: lead {lead} gerrity {gerrity:.3}, msess {msess_score:.3}");

            let (model, in_sample, selected) = match last_fit {
                Some(fit) => (Some(fit.model), Some(fit.in_sample), fit.selected),
                None => (None, None, Vec::new()),
            };
            reports.push(LeadReport {
                lead,
                month,
                model,
                selected,
                y_train: y_train_block.clone(),
                y_test: y_test_block.clone(),
                predictions,
                in_sample,
                gerrity,
                msess: msess_score,
            });
        }

        log::info!("run {id}: completed {} lead times", reports.len());
        Ok(RunOutput::success(run_id.map(str::to_string), reports))
    }
}

/// One expanding-window step: select a column per variable on training rows,
/// fit the standardized regression, and predict the held-out year.
///
/// `timestamps` holds the training years plus the test year, in order; the
/// final entry is the test point and never feeds selection or fitting.
fn forecast_step(
    bundle: &PredictorBundle,
    timestamps: &[YearMonth],
    y_train: &[f64],
    active_leads: &[Lead],
) -> Result<StepFit> {
    let n_train = y_train.len();

    let mut train_columns = Vec::with_capacity(bundle.len());
    let mut test_row = Vec::with_capacity(bundle.len());
    let mut selected = Vec::with_capacity(bundle.len());
    for variable in bundle.iter() {
        let matrix =
            build_combination_matrix(&variable.name, &variable.series, timestamps, active_leads)?;
        let correlations = correlate_columns(&matrix, n_train, y_train)?;
        let choice = select_column(&variable.name, &correlations, variable.strategy)?;

        let column = &matrix.columns[choice];
        train_columns.push(column[..n_train].to_vec());
        test_row.push(column[n_train]);
        selected.push(SelectedColumn {
            variable: variable.name.clone(),
            months: matrix.months[choice].clone(),
            correlation: correlations[choice],
        });
    }

    // Standardize per column from training rows only, then apply the same
    // transform to the test row
    let mut x_std = Vec::with_capacity(train_columns.len());
    let mut test_std = Vec::with_capacity(test_row.len());
    for (idx, column) in train_columns.iter().enumerate() {
        let scaler = Standardizer::fit(&selected[idx].variable, column)?;
        x_std.push(scaler.transform(column));
        test_std.push(scaler.transform_value(test_row[idx]));
    }
    let y_scaler = Standardizer::fit("yield", y_train)?;
    let y_std = y_scaler.transform(y_train);

    let model = LinearModel::fit(&x_std, &y_std)?;
    let prediction = y_scaler.inverse_value(model.predict_row(&test_std));
    let in_sample = y_scaler.inverse(&model.predict(&x_std));

    Ok(StepFit {
        prediction,
        model,
        in_sample,
        selected,
    })
}

/// Entry point with the default configuration
pub fn run_forecast(
    yields: &YieldSeries,
    bundle: &PredictorBundle,
    target_month: Month,
    leads: &[Lead],
    run_id: Option<&str>,
) -> Result<RunOutput> {
    ForecastEngine::default().run(yields, bundle, target_month, leads, run_id)
}
