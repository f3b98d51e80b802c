//! Term Projection - Recursive cashflow projection system for term life model points
//!
//! This library provides:
//! - A lazily evaluated, per-argument memoized recurrence engine
//! - Monthly in-force roll-forward through maturity, new business, lapse and death
//! - Premium, claim, expense and commission cashflow derivation
//! - Present values, result tables and a PV reconciliation check
//! - Parallel projection of whole blocks of model points

pub mod assumptions;
pub mod error;
pub mod policy;
pub mod projection;
pub mod scenario;

// Re-export commonly used types
pub use assumptions::{Assumptions, DiscountCurve, LapseAssumption, MortalityTable, PremiumTable};
pub use error::{ProjectionError, Result};
pub use policy::{ModelPoint, ModelPointStore, Sex};
pub use projection::{
    CashflowRow, ClaimBasis, DecrementRow, Projection, ProjectionConfig, ProjectionResult,
    Projector, PvSummary, Timing,
};
pub use scenario::{BlockRunner, BlockSummary};
