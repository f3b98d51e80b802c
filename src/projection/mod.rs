//! Recursive projection engine, memoization substrate and result tables

mod engine;
mod memo;
mod projector;
mod results;

pub use engine::{ClaimBasis, Projection, ProjectionConfig, Timing};
pub use memo::{CellStats, MemoCell, ScalarCell};
pub use projector::Projector;
pub use results::{CashflowRow, DecrementRow, ProjectionResult, PvSummary};
