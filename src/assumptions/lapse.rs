//! Lapse assumptions as an annual rate by policy duration

use crate::error::{ProjectionError, Result};

/// Annual lapse rate as a function of duration in years
#[derive(Debug, Clone)]
pub enum LapseAssumption {
    /// Default basis: `max(0.1 - 0.02 * duration, 0.02)`
    DurationGraded,

    /// Single rate at every duration
    Flat(f64),

    /// Tabulated rate by duration year. Durations below 0 (future new
    /// business months, where nothing is in force anyway) use the first
    /// entry; durations past the end of the table are a configuration
    /// error.
    Table(Vec<f64>),
}

impl Default for LapseAssumption {
    fn default() -> Self {
        Self::DurationGraded
    }
}

impl LapseAssumption {
    /// Annual lapse rate at the given duration in years
    pub fn annual_rate(&self, duration: i64) -> Result<f64> {
        match self {
            Self::DurationGraded => Ok((0.1 - 0.02 * duration as f64).max(0.02)),
            Self::Flat(rate) => Ok(*rate),
            Self::Table(rates) => {
                let idx = duration.max(0) as usize;
                rates
                    .get(idx)
                    .copied()
                    .ok_or(ProjectionError::AssumptionOutOfRange {
                        table: "lapse",
                        key: format!("duration {}", duration),
                    })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_graded_basis() {
        let lapse = LapseAssumption::default();
        assert_eq!(lapse.annual_rate(0).unwrap(), 0.1);
        assert!((lapse.annual_rate(1).unwrap() - 0.08).abs() < 1e-15);
        assert!((lapse.annual_rate(3).unwrap() - 0.04).abs() < 1e-15);

        // Floors at 2%
        assert!((lapse.annual_rate(4).unwrap() - 0.02).abs() < 1e-15);
        assert_eq!(lapse.annual_rate(30).unwrap(), 0.02);

        // Negative durations grade upward, matching the formula
        assert!((lapse.annual_rate(-2).unwrap() - 0.14).abs() < 1e-12);
    }

    #[test]
    fn test_table_basis() {
        let lapse = LapseAssumption::Table(vec![0.05, 0.04, 0.03]);
        assert_eq!(lapse.annual_rate(1).unwrap(), 0.04);

        // Pre-issue durations clamp to the first entry
        assert_eq!(lapse.annual_rate(-1).unwrap(), 0.05);

        // Beyond the table is an error
        assert!(lapse.annual_rate(3).is_err());
    }
}
