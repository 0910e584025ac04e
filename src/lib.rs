//! # Yieldcast
//!
//! Probabilistic crop-yield forecasting from monthly climate predictors,
//! for agricultural and food-security early warning.
//!
//! The model builds walk-forward-validated regression forecasts across
//! multiple lead times. Per lead time and test year it enumerates every
//! summed multi-month combination of the active leads, picks the best
//! combination per predictor variable by training-set correlation, fits a
//! standardized ordinary-least-squares regression, and predicts the held-out
//! year. Forecast skill is scored with the Gerrity skill score over tercile
//! classes and the MSE skill score against training climatology.
//!
//! ## Example
//!
//! ```rust,no_run
//! use yieldcast::prelude::*;
//!
//! # fn demo(yields: YieldSeries, bundle: PredictorBundle) -> yieldcast::error::Result<()> {
//! // Forecast July yields from predictors observed 1-3 months ahead
//! let output = run_forecast(&yields, &bundle, 7, &[1, 2, 3], Some("zone-41"))?;
//! if output.is_success() {
//!     for (label, report) in &output.leads {
//!         println!("{label}: gerrity {:.2}, msess {:.2}", report.gerrity, report.msess);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod calendar;
pub mod combinations;
pub mod error;
pub mod forecast;
pub mod regression;
pub mod report;
pub mod selection;
pub mod skill;
pub mod types;
pub mod validation;

pub mod prelude {
    //! Commonly used types and functions
    pub use crate::batch::{run_batch, ForecastJob};
    pub use crate::error::{Result, YieldcastError};
    pub use crate::forecast::{run_forecast, ForecastConfig, ForecastEngine};
    pub use crate::report::{LeadReport, RunOutput, SelectedColumn};
    pub use crate::selection::SelectionStrategy;
    pub use crate::types::{
        MonthlySeries, PredictorBundle, PredictorVariable, YearMonth, YieldSeries,
    };
    pub use crate::validation::{MonotonicPolicy, StatusCode, ValidationConfig};
}
