//! Active-model-point selection over a model point store
//!
//! A [`Projector`] owns the store and the shared assumptions and keeps at
//! most one live engine instance. Selecting a point always builds a fresh
//! instance with empty caches, so values can never leak between model
//! points; re-selecting an earlier point reproduces its results exactly.

use crate::assumptions::Assumptions;
use crate::error::{ProjectionError, Result};
use crate::policy::ModelPointStore;

use super::engine::{Projection, ProjectionConfig};
use super::results::ProjectionResult;

/// Façade binding a model point store, assumptions and the active engine
pub struct Projector {
    store: ModelPointStore,
    assumptions: Assumptions,
    config: ProjectionConfig,
    active: Option<Projection>,
}

impl Projector {
    pub fn new(store: ModelPointStore, assumptions: Assumptions) -> Self {
        Self::with_config(store, assumptions, ProjectionConfig::default())
    }

    pub fn with_config(
        store: ModelPointStore,
        assumptions: Assumptions,
        config: ProjectionConfig,
    ) -> Self {
        Self {
            store,
            assumptions,
            config,
            active: None,
        }
    }

    /// Switch the active model point, discarding any previous engine
    /// instance together with its caches
    pub fn select(&mut self, point_id: u32) -> Result<&Projection> {
        let point = self.store.get(point_id)?.clone();
        let projection =
            Projection::new(point, self.assumptions.clone(), self.config.clone());
        Ok(self.active.insert(projection))
    }

    /// The currently selected engine instance
    pub fn active(&self) -> Result<&Projection> {
        self.active.as_ref().ok_or(ProjectionError::NoActivePoint)
    }

    /// Generic quantity accessor against the selected model point
    pub fn get(&self, name: &str, args: &[&str]) -> Result<f64> {
        self.active()?.get(name, args)
    }

    /// Run the projection for the selected model point
    pub fn project(&self) -> Result<ProjectionResult> {
        self.active()?.project()
    }

    pub fn store(&self) -> &ModelPointStore {
        &self.store
    }

    pub fn assumptions(&self) -> &Assumptions {
        &self.assumptions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{ModelPoint, Sex};

    fn store() -> ModelPointStore {
        ModelPointStore::from_points(vec![
            ModelPoint {
                point_id: 1,
                age_at_entry: 47,
                sex: Sex::M,
                policy_term: 10,
                policy_count: 86.0,
                sum_assured: 622_000.0,
                duration_mth: 1,
            },
            ModelPoint {
                point_id: 2,
                age_at_entry: 29,
                sex: Sex::M,
                policy_term: 20,
                policy_count: 56.0,
                sum_assured: 752_000.0,
                duration_mth: 210,
            },
        ])
        .unwrap()
    }

    #[test]
    fn test_select_before_use() {
        let projector = Projector::new(store(), Assumptions::default_pricing());
        assert!(matches!(
            projector.project(),
            Err(ProjectionError::NoActivePoint)
        ));
        assert!(matches!(
            projector.get("premiums", &["0"]),
            Err(ProjectionError::NoActivePoint)
        ));
    }

    #[test]
    fn test_select_unknown_point() {
        let mut projector = Projector::new(store(), Assumptions::default_pricing());
        assert!(matches!(
            projector.select(99),
            Err(ProjectionError::PointNotFound { id: 99 })
        ));
    }

    #[test]
    fn test_switching_points_does_not_contaminate_results() {
        let mut projector = Projector::new(store(), Assumptions::default_pricing());

        projector.select(1).unwrap();
        let first = projector.project().unwrap();

        projector.select(2).unwrap();
        let second = projector.project().unwrap();
        assert_ne!(first.months(), second.months());

        // Re-selecting the first point reproduces its results bit for bit
        projector.select(1).unwrap();
        let first_again = projector.project().unwrap();

        assert_eq!(first.months(), first_again.months());
        assert_eq!(
            first.present_value.net_cf.to_bits(),
            first_again.present_value.net_cf.to_bits()
        );
        for (a, b) in first.cashflow.iter().zip(first_again.cashflow.iter()) {
            assert_eq!(a.premiums.to_bits(), b.premiums.to_bits());
            assert_eq!(a.net_cf.to_bits(), b.net_cf.to_bits());
        }
    }

    #[test]
    fn test_fresh_instance_per_selection() {
        let mut projector = Projector::new(store(), Assumptions::default_pricing());

        projector.select(1).unwrap();
        projector.get("premiums", &["0"]).unwrap();
        assert_eq!(
            projector.active().unwrap().stats_for("premiums").unwrap().computations,
            1
        );

        // Selection resets the caches even for the same point
        projector.select(1).unwrap();
        assert_eq!(
            projector.active().unwrap().stats_for("premiums").unwrap().computations,
            0
        );
    }
}
