//! Block runner for projecting many model points
//!
//! Engine instances share nothing mutable, so a block of model points is
//! projected in parallel with one fresh instance per point.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::assumptions::Assumptions;
use crate::error::Result;
use crate::policy::{ModelPoint, ModelPointStore};
use crate::projection::{Projection, ProjectionConfig, ProjectionResult};

/// Pre-loaded runner for projecting whole blocks of model points
#[derive(Debug, Clone)]
pub struct BlockRunner {
    assumptions: Assumptions,
    config: ProjectionConfig,
}

impl BlockRunner {
    pub fn new(assumptions: Assumptions) -> Self {
        Self::with_config(assumptions, ProjectionConfig::default())
    }

    pub fn with_config(assumptions: Assumptions, config: ProjectionConfig) -> Self {
        Self {
            assumptions,
            config,
        }
    }

    /// Project a single model point on a fresh engine instance
    pub fn run_point(&self, point: &ModelPoint) -> Result<ProjectionResult> {
        let projection = Projection::new(
            point.clone(),
            self.assumptions.clone(),
            self.config.clone(),
        );
        projection.project()
    }

    /// Project every model point in the store in parallel.
    ///
    /// Fails on the first point whose projection fails; result order
    /// matches store order.
    pub fn run_block(&self, store: &ModelPointStore) -> Result<Vec<ProjectionResult>> {
        log::info!("projecting block of {} model points", store.len());
        store
            .points()
            .par_iter()
            .map(|point| self.run_point(point))
            .collect()
    }

    pub fn assumptions(&self) -> &Assumptions {
        &self.assumptions
    }
}

/// Block-level totals across projected points
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct BlockSummary {
    pub points: usize,
    pub pv_premiums: f64,
    pub pv_claims: f64,
    pub pv_expenses: f64,
    pub pv_commissions: f64,
    pub pv_net_cf: f64,

    /// Whether every point passed its PV reconciliation check
    pub all_consistent: bool,
}

impl BlockSummary {
    /// Aggregate per-point present values into block totals
    pub fn from_results(results: &[ProjectionResult]) -> Self {
        let mut summary = Self {
            points: results.len(),
            all_consistent: true,
            ..Default::default()
        };
        for result in results {
            summary.pv_premiums += result.present_value.premiums;
            summary.pv_claims += result.present_value.claims;
            summary.pv_expenses += result.present_value.expenses;
            summary.pv_commissions += result.present_value.commissions;
            summary.pv_net_cf += result.present_value.net_cf;
            summary.all_consistent &= result.pv_consistent;
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::Sex;
    use approx::assert_relative_eq;

    fn store() -> ModelPointStore {
        let points = (1..=6)
            .map(|id| ModelPoint {
                point_id: id,
                age_at_entry: 40 + id,
                sex: if id % 2 == 0 { Sex::F } else { Sex::M },
                policy_term: 10,
                policy_count: 10.0 * id as f64,
                sum_assured: 100_000.0 + 50_000.0 * id as f64,
                duration_mth: id as i32 * 7,
            })
            .collect();
        ModelPointStore::from_points(points).unwrap()
    }

    #[test]
    fn test_block_matches_single_runs() {
        let runner = BlockRunner::new(Assumptions::default_pricing());
        let store = store();

        let results = runner.run_block(&store).unwrap();
        assert_eq!(results.len(), 6);

        // Result order follows store order, values match a solo run
        for (point, result) in store.points().iter().zip(&results) {
            assert_eq!(point.point_id, result.point_id);
            let solo = runner.run_point(point).unwrap();
            assert_eq!(
                solo.present_value.net_cf.to_bits(),
                result.present_value.net_cf.to_bits()
            );
        }
    }

    #[test]
    fn test_block_summary_totals() {
        let runner = BlockRunner::new(Assumptions::default_pricing());
        let results = runner.run_block(&store()).unwrap();
        let summary = BlockSummary::from_results(&results);

        assert_eq!(summary.points, 6);
        assert!(summary.all_consistent);

        let expected: f64 = results.iter().map(|r| r.present_value.premiums).sum();
        assert_relative_eq!(summary.pv_premiums, expected);
    }
}
