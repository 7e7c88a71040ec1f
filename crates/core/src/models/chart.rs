use serde::{Deserialize, Serialize};

use super::month::Month;

/// A single month of the rolling trend chart.
///
/// The backend aggregates these. The core only caches and hands them to
/// the frontend, which just renders them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDataPoint {
    /// Axis label, e.g. "Mar"
    pub month: String,

    /// Full month name
    pub month_full: Month,

    pub year: i32,

    /// Sum of purchases in the month
    pub purchases: f64,

    /// Sum of payments in the month
    pub payments: f64,

    /// Resulting balance at the end of the month
    pub balance: f64,
}
