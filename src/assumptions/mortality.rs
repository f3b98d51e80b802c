//! Mortality assumptions by attained age and duration band
//!
//! Annual rates are tabulated by attained age (one row per age) and policy
//! duration in years, banded into columns 0 through 5. Lookups beyond
//! duration 5 use the band 5 column; there is no extrapolation policy
//! beyond it.

use crate::error::{ProjectionError, Result};

/// Number of duration bands in the table (durations 0..=5)
pub const DURATION_BANDS: usize = 6;

/// Mortality table by age and duration band
#[derive(Debug, Clone)]
pub struct MortalityTable {
    /// Lowest tabulated age; row 0 of `rates`
    min_age: u32,

    /// Annual rates, one row per age, one column per duration band
    rates: Vec<[f64; DURATION_BANDS]>,
}

impl MortalityTable {
    /// Create a table from explicit rates starting at `min_age`
    pub fn new(min_age: u32, rates: Vec<[f64; DURATION_BANDS]>) -> Result<Self> {
        if rates.is_empty() {
            return Err(ProjectionError::config("mortality table has no rows"));
        }
        Ok(Self { min_age, rates })
    }

    /// Synthetic standard table for ages 18 to 120.
    ///
    /// Base rates follow a Gompertz curve calibrated to reach 1.0 near the
    /// terminal age; each duration band loads the previous one by 10%.
    pub fn standard() -> Self {
        let min_age = 18;
        let max_age = 120;
        let rates = (min_age..=max_age)
            .map(|age| {
                let base = (0.00022 * 1.097_f64.powi((age - min_age) as i32)).min(1.0);
                let mut row = [0.0; DURATION_BANDS];
                for (band, slot) in row.iter_mut().enumerate() {
                    *slot = (base * 1.1_f64.powi(band as i32)).min(1.0);
                }
                row
            })
            .collect();
        Self { min_age, rates }
    }

    /// Zero mortality for ages 18 to 120, for sensitivity runs
    pub fn zero() -> Self {
        Self {
            min_age: 18,
            rates: vec![[0.0; DURATION_BANDS]; 103],
        }
    }

    /// Lowest tabulated age
    pub fn min_age(&self) -> u32 {
        self.min_age
    }

    /// Highest tabulated age
    pub fn max_age(&self) -> u32 {
        self.min_age + self.rates.len() as u32 - 1
    }

    /// Annual mortality rate for an attained age and duration band.
    ///
    /// The age may be negative for future new business points whose
    /// duration is still negative; any age outside the tabulated range is
    /// a configuration error.
    pub fn annual_rate(&self, age: i64, band: usize) -> Result<f64> {
        if band >= DURATION_BANDS {
            return Err(ProjectionError::AssumptionOutOfRange {
                table: "mortality",
                key: format!("duration band {}", band),
            });
        }
        if age < self.min_age as i64 || age > self.max_age() as i64 {
            return Err(ProjectionError::AssumptionOutOfRange {
                table: "mortality",
                key: format!("age {}", age),
            });
        }
        let row = (age - self.min_age as i64) as usize;
        Ok(self.rates[row][band])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table_shape() {
        let table = MortalityTable::standard();
        assert_eq!(table.min_age(), 18);
        assert_eq!(table.max_age(), 120);

        // Young-age rate is small, terminal rate saturates
        assert!(table.annual_rate(18, 0).unwrap() < 0.001);
        assert_eq!(table.annual_rate(120, 5).unwrap(), 1.0);
    }

    #[test]
    fn test_band_loading_increases_rate() {
        let table = MortalityTable::standard();
        let band0 = table.annual_rate(47, 0).unwrap();
        let band5 = table.annual_rate(47, 5).unwrap();
        assert!(band5 > band0);

        // Each band loads the previous by 10%
        let band1 = table.annual_rate(47, 1).unwrap();
        assert!((band1 / band0 - 1.1).abs() < 1e-12);
    }

    #[test]
    fn test_out_of_range_lookups() {
        let table = MortalityTable::standard();
        assert!(table.annual_rate(17, 0).is_err());
        assert!(table.annual_rate(121, 0).is_err());
        assert!(table.annual_rate(47, 6).is_err());
    }

    #[test]
    fn test_empty_table_rejected() {
        assert!(MortalityTable::new(18, Vec::new()).is_err());
    }
}
