pub mod csv;
pub mod json;
pub mod table;

use crate::types::EmissionBreakdown;

/// Percentage of `total` contributed by `value`, 0 when the total is 0.
pub fn share_percent(value: f64, total: f64) -> f64 {
    if total > 0.0 {
        value / total * 100.0
    } else {
        0.0
    }
}

pub fn tonnes(kg: f64) -> f64 {
    kg / 1000.0
}

pub(crate) fn breakdown_rows(breakdown: &EmissionBreakdown) -> Vec<(String, f64, f64)> {
    let total = breakdown.total();
    breakdown
        .categories()
        .iter()
        .map(|(category, kg)| (category.to_string(), *kg, share_percent(*kg, total)))
        .collect()
}
