//! Error types for the projection system
//!
//! Failures fall into two classes: configuration errors (an assumption
//! table does not cover a requested index) and argument errors (a caller
//! requested a quantity outside its contract). Both are fatal for the call
//! that raised them; nothing in the core is retryable.

use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, ProjectionError>;

/// All failures the projection system can surface
#[derive(Debug, Error)]
pub enum ProjectionError {
    /// Requested model point id is not in the store
    #[error("model point {id} not found")]
    PointNotFound { id: u32 },

    /// An assumption lookup fell outside the supplied table
    #[error("{table} table has no entry for {key}")]
    AssumptionOutOfRange { table: &'static str, key: String },

    /// Assumption or model point data failed validation at load time
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// Unrecognized in-force timing token
    #[error("invalid in-force timing {token:?} (expected BEF_MAT, BEF_NB or BEF_DECR)")]
    InvalidTiming { token: String },

    /// Generic accessor was asked for a quantity the engine does not define
    #[error("unknown quantity {name:?}")]
    UnknownQuantity { name: String },

    /// Generic accessor received the wrong number of arguments
    #[error("{name} takes {expected} argument(s), got {got}")]
    BadArity {
        name: String,
        expected: usize,
        got: usize,
    },

    /// An argument could not be parsed as the expected type
    #[error("invalid argument {value:?} for {name}: {reason}")]
    BadArgument {
        name: String,
        value: String,
        reason: String,
    },

    /// Requested month lies outside the projection horizon
    #[error("month {t} outside projection horizon [0, {horizon})")]
    MonthOutOfRange { t: u32, horizon: u32 },

    /// A projection was requested before any model point was selected
    #[error("no model point selected")]
    NoActivePoint,

    /// I/O failure while reading a data file
    #[error("failed to read {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV parsing failure while reading a data file
    #[error("failed to parse {path}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
}

impl ProjectionError {
    /// Shorthand for a load-time validation failure
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProjectionError::PointNotFound { id: 42 };
        assert_eq!(err.to_string(), "model point 42 not found");

        let err = ProjectionError::AssumptionOutOfRange {
            table: "mortality",
            key: "age 121".to_string(),
        };
        assert_eq!(err.to_string(), "mortality table has no entry for age 121");

        let err = ProjectionError::MonthOutOfRange { t: 120, horizon: 120 };
        assert_eq!(err.to_string(), "month 120 outside projection horizon [0, 120)");
    }
}
