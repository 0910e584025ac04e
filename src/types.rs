//! Core types for yield and predictor time series

use crate::error::{Result, YieldcastError};
use crate::selection::SelectionStrategy;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Calendar year
pub type Year = i32;

/// Calendar month (1 = January .. 12 = December)
pub type Month = u32;

/// Lead offset in months before the forecast target month
pub type Lead = u32;

/// A calendar (year, month) key with month arithmetic.
///
/// Monthly predictor observations are indexed by `YearMonth`; yield
/// observations are annual and carry only a `Year`, aligned to the
/// forecast target month when predictors are fetched.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct YearMonth {
    pub year: Year,
    pub month: Month,
}

impl YearMonth {
    /// Create a new year-month key
    pub fn new(year: Year, month: Month) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(YieldcastError::InvalidMonth(month));
        }
        Ok(Self { year, month })
    }

    /// Build the key for a dated observation
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Last calendar day of this month
    pub fn end_of_month(self) -> NaiveDate {
        let (next_year, next_month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|d| d.pred_opt())
            .expect("month validated at construction")
    }

    /// Step back `months` months, crossing year boundaries as needed
    pub fn minus_months(self, months: u32) -> Self {
        let total = self.year as i64 * 12 + (self.month as i64 - 1) - months as i64;
        Self {
            year: total.div_euclid(12) as Year,
            month: (total.rem_euclid(12) + 1) as Month,
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Annual yield series, year-indexed, sorted by year.
///
/// Missing years may be encoded as `f64::NAN`; the input validator drops
/// them before any modelling happens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldSeries {
    years: Vec<Year>,
    values: Vec<f64>,
}

impl YieldSeries {
    /// Build a series from (year, value) points. Points are sorted by year.
    pub fn new(mut points: Vec<(Year, f64)>) -> Self {
        points.sort_by_key(|(year, _)| *year);
        let (years, values) = points.into_iter().unzip();
        Self { years, values }
    }

    /// Build a series from dated observations, keeping only those falling
    /// in `target_month`
    pub fn from_dated(points: &[(NaiveDate, f64)], target_month: Month) -> Self {
        let filtered: Vec<(Year, f64)> = points
            .iter()
            .filter(|(date, _)| date.month() == target_month)
            .map(|(date, value)| (date.year(), *value))
            .collect();
        Self::new(filtered)
    }

    pub fn years(&self) -> &[Year] {
        &self.years
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Drop entries whose value is not finite (missing years)
    pub fn drop_missing(&self) -> Self {
        let points: Vec<(Year, f64)> = self
            .years
            .iter()
            .zip(self.values.iter())
            .filter(|(_, value)| value.is_finite())
            .map(|(year, value)| (*year, *value))
            .collect();
        Self::new(points)
    }

    /// True when the values are entirely non-decreasing or entirely
    /// non-increasing (pandas `is_monotonic` semantics)
    pub fn is_monotonic(&self) -> bool {
        let non_decreasing = self.values.windows(2).all(|w| w[0] <= w[1]);
        let non_increasing = self.values.windows(2).all(|w| w[0] >= w[1]);
        non_decreasing || non_increasing
    }
}

/// Monthly time-indexed scalar series for one climate variable
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlySeries {
    values: BTreeMap<YearMonth, f64>,
}

impl MonthlySeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from (year-month, value) pairs
    pub fn from_points(points: Vec<(YearMonth, f64)>) -> Self {
        Self {
            values: points.into_iter().collect(),
        }
    }

    /// Build from dated end-of-month observations
    pub fn from_dated(points: &[(NaiveDate, f64)]) -> Self {
        Self {
            values: points
                .iter()
                .map(|(date, value)| (YearMonth::from_date(*date), *value))
                .collect(),
        }
    }

    pub fn insert(&mut self, key: YearMonth, value: f64) {
        self.values.insert(key, value);
    }

    pub fn get(&self, key: &YearMonth) -> Option<f64> {
        self.values.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// One named monthly climate predictor with its selection strategy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictorVariable {
    pub name: String,
    pub series: MonthlySeries,
    pub strategy: SelectionStrategy,
}

impl PredictorVariable {
    /// Create a predictor with the default (max-correlation) strategy
    pub fn new(name: impl Into<String>, series: MonthlySeries) -> Self {
        Self {
            name: name.into(),
            series,
            strategy: SelectionStrategy::default(),
        }
    }

    /// Override the selection strategy
    pub fn with_strategy(mut self, strategy: SelectionStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

/// Ordered bundle of named predictor variables
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredictorBundle {
    pub variables: Vec<PredictorVariable>,
}

impl PredictorBundle {
    pub fn new(variables: Vec<PredictorVariable>) -> Self {
        Self { variables }
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PredictorVariable> {
        self.variables.iter()
    }
}
