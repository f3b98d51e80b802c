//! Actuarial assumptions: mortality, lapse, premium rates and discounting

mod discount;
mod lapse;
pub mod loader;
mod mortality;
mod premium;

pub use discount::DiscountCurve;
pub use lapse::LapseAssumption;
pub use mortality::{MortalityTable, DURATION_BANDS};
pub use premium::PremiumTable;

use std::path::Path;

use crate::error::Result;

/// Container for all projection assumptions.
///
/// Immutable and shared read-only across model points; each engine
/// instance takes its own clone.
#[derive(Debug, Clone)]
pub struct Assumptions {
    pub mortality: MortalityTable,
    pub lapse: LapseAssumption,
    pub premium: PremiumTable,
    pub discount: DiscountCurve,
}

impl Assumptions {
    /// Assumptions with synthetic default tables.
    ///
    /// Mortality is the standard synthetic table, lapse the duration-graded
    /// basis, premiums are derived from the mortality basis with a 50%
    /// loading for entry ages 20-59 and terms 10/15/20, and discounting is
    /// a flat 2% curve long enough for any supported term.
    pub fn default_pricing() -> Self {
        let mortality = MortalityTable::standard();
        let premium = PremiumTable::from_mortality(&mortality, 0.5, 20..=59, &[10, 15, 20])
            .expect("default premium basis is well-formed");
        Self {
            mortality,
            lapse: LapseAssumption::default(),
            premium,
            discount: DiscountCurve::flat(0.02, 151),
        }
    }

    /// Load all four tables from CSV files in the default location
    pub fn from_csv() -> Result<Self> {
        Self::from_csv_path(Path::new(loader::DEFAULT_ASSUMPTIONS_PATH))
    }

    /// Load all four tables from CSV files in a specific directory
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let (min_age, rates) = loader::load_mortality_rates(path)?;
        let lapse_rates = loader::load_lapse_rates(path)?;
        let lapse = if lapse_rates.is_empty() {
            LapseAssumption::default()
        } else {
            LapseAssumption::Table(lapse_rates)
        };

        Ok(Self {
            mortality: MortalityTable::new(min_age, rates)?,
            lapse,
            premium: PremiumTable::from_rates(loader::load_premium_rates(path)?)?,
            discount: DiscountCurve::new(loader::load_discount_rates(path)?)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pricing_is_usable() {
        let assumptions = Assumptions::default_pricing();
        assert!(assumptions.mortality.annual_rate(47, 1).unwrap() > 0.0);
        assert!(assumptions.premium.monthly_rate(47, 10).unwrap() > 0.0);
        assert_eq!(assumptions.lapse.annual_rate(0).unwrap(), 0.1);
        assert_eq!(assumptions.discount.annual_rate(20).unwrap(), 0.02);
    }
}
