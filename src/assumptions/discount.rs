//! Discount curve of annual rates by policy projection year

use crate::error::{ProjectionError, Result};

/// Annual discount rates indexed by projection year (year 0 first)
#[derive(Debug, Clone)]
pub struct DiscountCurve {
    rates: Vec<f64>,
}

impl DiscountCurve {
    /// Create a curve from explicit annual rates, year 0 first
    pub fn new(rates: Vec<f64>) -> Result<Self> {
        if rates.is_empty() {
            return Err(ProjectionError::config("discount curve has no entries"));
        }
        Ok(Self { rates })
    }

    /// Flat curve at a single annual rate for `years` years
    pub fn flat(rate: f64, years: usize) -> Self {
        Self {
            rates: vec![rate; years.max(1)],
        }
    }

    /// Annual discount rate for a projection year
    pub fn annual_rate(&self, year: u32) -> Result<f64> {
        self.rates
            .get(year as usize)
            .copied()
            .ok_or(ProjectionError::AssumptionOutOfRange {
                table: "discount",
                key: format!("year {}", year),
            })
    }

    /// Number of years the curve covers
    pub fn years(&self) -> usize {
        self.rates.len()
    }
}
