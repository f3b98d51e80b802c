//! Model point data structures
//!
//! A model point is one aggregated record standing for a cohort of
//! identical term policies. Records are immutable once loaded; the engine
//! only ever reads them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{ProjectionError, Result};

/// Sex of the insured cohort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    M,
    F,
}

/// A single model point record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelPoint {
    /// Unique model point identifier
    pub point_id: u32,

    /// Age at policy issue
    pub age_at_entry: u32,

    /// Sex of the cohort
    pub sex: Sex,

    /// Policy term in years
    pub policy_term: u32,

    /// Number of policies in the cohort (fractional for weighted cohorts)
    pub policy_count: f64,

    /// Sum assured per policy
    pub sum_assured: f64,

    /// Elapsed in-force duration in months at time 0.
    /// Negative values mean future new business: a value of -15 means the
    /// cohort is issued at projection month 15.
    pub duration_mth: i32,
}

impl ModelPoint {
    /// Projection length in months for this point.
    ///
    /// `max(12 * policy_term - duration_mth + 1, 0)`: the projection runs
    /// up to and including the maturity month. Points already past their
    /// term get a zero-length projection.
    pub fn horizon(&self) -> u32 {
        (12 * self.policy_term as i64 - self.duration_mth as i64 + 1).max(0) as u32
    }
}

/// Read-only lookup of model points by id
#[derive(Debug, Clone, Default)]
pub struct ModelPointStore {
    points: Vec<ModelPoint>,
    by_id: HashMap<u32, usize>,
}

impl ModelPointStore {
    /// Build a store from a list of records, indexing by point id
    pub fn from_points(points: Vec<ModelPoint>) -> Result<Self> {
        let mut by_id = HashMap::with_capacity(points.len());
        for (idx, point) in points.iter().enumerate() {
            if by_id.insert(point.point_id, idx).is_some() {
                return Err(ProjectionError::config(format!(
                    "duplicate model point id {}",
                    point.point_id
                )));
            }
        }
        Ok(Self { points, by_id })
    }

    /// Look up a model point by id
    pub fn get(&self, id: u32) -> Result<&ModelPoint> {
        self.by_id
            .get(&id)
            .map(|&idx| &self.points[idx])
            .ok_or(ProjectionError::PointNotFound { id })
    }

    /// All points, in load order
    pub fn points(&self) -> &[ModelPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(id: u32, term: u32, duration_mth: i32) -> ModelPoint {
        ModelPoint {
            point_id: id,
            age_at_entry: 47,
            sex: Sex::M,
            policy_term: term,
            policy_count: 86.0,
            sum_assured: 622_000.0,
            duration_mth,
        }
    }

    #[test]
    fn test_horizon() {
        // In-force for one month: 120 - 1 + 1 = 120
        assert_eq!(point(1, 10, 1).horizon(), 120);

        // Future new business extends the horizon
        assert_eq!(point(1, 10, -15).horizon(), 136);

        // Already matured
        assert_eq!(point(1, 10, 121).horizon(), 0);
        assert_eq!(point(1, 10, 200).horizon(), 0);
    }

    #[test]
    fn test_store_lookup() {
        let store = ModelPointStore::from_points(vec![point(1, 10, 1), point(2, 20, 210)]).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.get(2).unwrap().policy_term, 20);

        match store.get(99) {
            Err(ProjectionError::PointNotFound { id: 99 }) => {}
            other => panic!("expected PointNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_store_rejects_duplicate_ids() {
        let res = ModelPointStore::from_points(vec![point(1, 10, 1), point(1, 15, 5)]);
        assert!(res.is_err());
    }
}
