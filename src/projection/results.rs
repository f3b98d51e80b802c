//! Result tables produced by a projection run

use serde::{Deserialize, Serialize};

/// One month of cashflows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashflowRow {
    /// Projection month (0-indexed)
    pub month: u32,
    pub premiums: f64,
    pub claims: f64,
    pub expenses: f64,
    pub commissions: f64,
    pub net_cf: f64,
}

/// One month of policy decrements
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecrementRow {
    /// Projection month (0-indexed)
    pub month: u32,

    /// Policies in force at the start of the month (before maturity)
    pub pols_if: f64,
    pub pols_maturity: f64,
    pub pols_new_biz: f64,
    pub pols_death: f64,
    pub pols_lapse: f64,
}

/// Present values of each cashflow series
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PvSummary {
    pub premiums: f64,
    pub claims: f64,
    pub expenses: f64,
    pub commissions: f64,
    pub net_cf: f64,
}

/// Complete projection output for one model point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionResult {
    /// Model point identifier
    pub point_id: u32,

    /// Monthly cashflow table
    pub cashflow: Vec<CashflowRow>,

    /// Monthly decrement table
    pub decrements: Vec<DecrementRow>,

    /// Present value table
    pub present_value: PvSummary,

    /// Whether the PV of net cashflow reconciles with the per-series PVs
    pub pv_consistent: bool,
}

impl ProjectionResult {
    /// Number of projected months
    pub fn months(&self) -> u32 {
        self.cashflow.len() as u32
    }
}
