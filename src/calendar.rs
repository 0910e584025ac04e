//! Lead-to-month mapping
//!
//! A lead offset counts months before the forecast target month; the
//! calendar month it lands on wraps around the year boundary.

use crate::types::{Lead, Month};

/// Calendar month observed `lead` months before `target_month`.
///
/// Wraps across the year boundary, so `lead_to_month(7, 9) == 10`.
pub fn lead_to_month(target_month: Month, lead: Lead) -> Month {
    let shifted = target_month as i64 - lead as i64;
    ((shifted - 1).rem_euclid(12) + 1) as Month
}

/// Map a list of leads to their calendar months
pub fn lead_to_months(target_month: Month, leads: &[Lead]) -> Vec<Month> {
    leads
        .iter()
        .map(|&lead| lead_to_month(target_month, lead))
        .collect()
}
