//! Premium rate assumptions by entry age and policy term
//!
//! Rates are monthly premium per unit of sum assured, keyed by the exact
//! (entry age, term) pair. There is no interpolation: a pair the table
//! does not carry is a configuration error.

use std::collections::HashMap;

use crate::error::{ProjectionError, Result};

use super::mortality::MortalityTable;

/// Premium rate table keyed by (entry age, policy term in years)
#[derive(Debug, Clone)]
pub struct PremiumTable {
    rates: HashMap<(u32, u32), f64>,
}

impl PremiumTable {
    /// Create a table from explicit (entry age, term) rates
    pub fn from_rates(rates: HashMap<(u32, u32), f64>) -> Result<Self> {
        if rates.is_empty() {
            return Err(ProjectionError::config("premium table has no entries"));
        }
        Ok(Self { rates })
    }

    /// Derive a table from a mortality basis.
    ///
    /// The monthly rate for (age, term) is the average annual mortality
    /// over the term (each policy year at its duration band) divided by
    /// 12, grossed up by the premium loading. Ages or terms the mortality
    /// table cannot support are skipped.
    pub fn from_mortality(
        mortality: &MortalityTable,
        loading: f64,
        entry_ages: impl IntoIterator<Item = u32>,
        terms: &[u32],
    ) -> Result<Self> {
        let mut rates = HashMap::new();
        for age in entry_ages {
            for &term in terms {
                if term == 0 || age as i64 + term as i64 - 1 > mortality.max_age() as i64 {
                    continue;
                }
                let mut total = 0.0;
                for year in 0..term {
                    let band = (year as usize).min(5);
                    total += mortality.annual_rate((age + year) as i64, band)?;
                }
                let monthly = total / term as f64 / 12.0 * (1.0 + loading);
                rates.insert((age, term), monthly);
            }
        }
        Self::from_rates(rates)
    }

    /// Monthly premium rate per unit sum assured for (entry age, term)
    pub fn monthly_rate(&self, age_at_entry: u32, policy_term: u32) -> Result<f64> {
        self.rates
            .get(&(age_at_entry, policy_term))
            .copied()
            .ok_or(ProjectionError::AssumptionOutOfRange {
                table: "premium",
                key: format!("(age {}, term {})", age_at_entry, policy_term),
            })
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let mut rates = HashMap::new();
        rates.insert((47, 10), 0.00015);
        let table = PremiumTable::from_rates(rates).unwrap();

        assert_eq!(table.monthly_rate(47, 10).unwrap(), 0.00015);
        assert!(table.monthly_rate(47, 15).is_err());
        assert!(table.monthly_rate(48, 10).is_err());
    }

    #[test]
    fn test_from_mortality() {
        let mortality = MortalityTable::standard();
        let table =
            PremiumTable::from_mortality(&mortality, 0.5, 20..=59, &[10, 15, 20]).unwrap();

        // 40 entry ages x 3 terms
        assert_eq!(table.len(), 120);

        // Longer terms reach higher attained ages, so cost more per month
        let r10 = table.monthly_rate(40, 10).unwrap();
        let r20 = table.monthly_rate(40, 20).unwrap();
        assert!(r20 > r10);

        // Older entry ages cost more
        assert!(table.monthly_rate(59, 10).unwrap() > table.monthly_rate(20, 10).unwrap());
    }

    #[test]
    fn test_empty_table_rejected() {
        assert!(PremiumTable::from_rates(HashMap::new()).is_err());
    }
}
