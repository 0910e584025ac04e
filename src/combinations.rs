//! Predictor combination generation
//!
//! Every non-empty subset of the active lead list becomes one candidate
//! column: the predictor values at each lead in the subset, summed. For a
//! lead list of length n there are 2^n - 1 candidates, enumerated by
//! increasing subset size and, within a size, lexicographically by input
//! position.

use crate::calendar::lead_to_month;
use crate::error::{Result, YieldcastError};
use crate::types::{Lead, Month, MonthlySeries, YearMonth};

/// All non-empty subsets of `items`, smallest subsets first.
///
/// Within one size the enumeration is lexicographic over input positions,
/// matching the conventional combinations ordering.
pub fn all_combinations<T: Copy>(items: &[T]) -> Vec<Vec<T>> {
    let n = items.len();
    let mut combs = Vec::with_capacity((1usize << n).saturating_sub(1));
    for size in 1..=n {
        let mut indices: Vec<usize> = (0..size).collect();
        loop {
            combs.push(indices.iter().map(|&i| items[i]).collect());

            // Rightmost index that can still advance; indices to its right
            // restart in consecutive order
            match (0..size).rev().find(|&pos| indices[pos] < pos + n - size) {
                Some(pos) => {
                    indices[pos] += 1;
                    for later in pos + 1..size {
                        indices[later] = indices[later - 1] + 1;
                    }
                }
                None => break,
            }
        }
    }
    combs
}

/// Candidate predictor columns for one variable: one summed column per
/// lead-subset, plus the calendar months each column draws on.
#[derive(Debug, Clone)]
pub struct CombinationMatrix {
    /// Column-major values, `columns[c][t]` for combination c at timestamp t
    pub columns: Vec<Vec<f64>>,
    /// Calendar months of each combination's leads
    pub months: Vec<Vec<Month>>,
}

impl CombinationMatrix {
    pub fn n_combinations(&self) -> usize {
        self.columns.len()
    }

    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }
}

/// Build the combination matrix for one predictor variable.
///
/// `timestamps` are the target year-months needed this step (training years
/// plus the current test year, all at the target month). For each subset of
/// `leads` and each timestamp, the variable's values at `timestamp - lead`
/// are summed. A month missing from the series is an error; the walk-forward
/// evaluator isolates it to the offending step.
pub fn build_combination_matrix(
    variable: &str,
    series: &MonthlySeries,
    timestamps: &[YearMonth],
    leads: &[Lead],
) -> Result<CombinationMatrix> {
    if leads.is_empty() {
        return Err(YieldcastError::InvalidLeads("empty lead list".to_string()));
    }
    if timestamps.is_empty() {
        return Err(YieldcastError::EmptyInput("no timestamps".to_string()));
    }

    let lead_subsets = all_combinations(leads);

    let mut columns = Vec::with_capacity(lead_subsets.len());
    for subset in &lead_subsets {
        let mut column = Vec::with_capacity(timestamps.len());
        for &ts in timestamps {
            let mut sum = 0.0;
            for &lead in subset {
                let key = ts.minus_months(lead);
                let value = series.get(&key).ok_or_else(|| {
                    YieldcastError::MissingPredictorMonth {
                        variable: variable.to_string(),
                        month: key.to_string(),
                    }
                })?;
                sum += value;
            }
            column.push(sum);
        }
        columns.push(column);
    }

    // Label each combination with calendar months instead of lead offsets
    let target_month = timestamps[0].month;
    let month_labels: Vec<Month> = leads
        .iter()
        .map(|&lead| lead_to_month(target_month, lead))
        .collect();
    let months = all_combinations(&month_labels);

    Ok(CombinationMatrix { columns, months })
}
