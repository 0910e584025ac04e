//! Parallel batch driver
//!
//! Each (location, target-month) run is fully independent, so batches fan
//! out over a rayon pool with no coordination. Failed runs are logged and
//! carried in the result vector; one bad job never aborts the batch.

use crate::error::Result;
use crate::forecast::ForecastEngine;
use crate::report::RunOutput;
use crate::types::{Lead, Month, PredictorBundle, YieldSeries};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// One independent forecasting job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastJob {
    /// Identifier echoed into the run output and log lines
    pub run_id: String,
    pub yields: YieldSeries,
    pub bundle: PredictorBundle,
    pub target_month: Month,
}

/// Run every job across the rayon pool, preserving input order.
///
/// Contract errors stay in the output vector as `Err`; validation failures
/// are successful outputs carrying their status code.
pub fn run_batch(
    engine: &ForecastEngine,
    jobs: &[ForecastJob],
    leads: &[Lead],
) -> Vec<Result<RunOutput>> {
    log::info!("batch of {} jobs, leads {leads:?}", jobs.len());
    let results: Vec<Result<RunOutput>> = jobs
        .par_iter()
        .map(|job| {
            let result = engine.run(
                &job.yields,
                &job.bundle,
                job.target_month,
                leads,
                Some(&job.run_id),
            );
            if let Err(ref err) = result {
                log::warn!("job {} failed: {err}", job.run_id);
            }
            result
        })
        .collect();

    let completed = results
        .iter()
        .filter(|r| r.as_ref().is_ok_and(|o| o.is_success()))
        .count();
    log::info!("batch done: {completed}/{} completed runs", jobs.len());
    results
}
