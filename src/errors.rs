//! Unified error type for the goal tracking engine.
//!
//! Store operations, configuration loading and boundary validation all report
//! through [`Error`]. The pure computations in [`crate::core::progress`] and
//! [`crate::core::interval`] never fail; their preconditions are enforced when
//! the inputs are constructed.

use thiserror::Error;
use uuid::Uuid;

/// Errors raised by goal-buddy.
#[derive(Debug, Error)]
pub enum Error {
    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the problem
        message: String,
    },

    /// Input rejected at the store boundary
    #[error("Validation error: {message}")]
    Validation {
        /// Description of the rejected input
        message: String,
    },

    /// Amount is NaN or infinite
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// Interval length (or bucket size) is zero or negative
    #[error("Invalid interval length: {seconds}s (must be greater than zero)")]
    InvalidInterval {
        /// The rejected length in whole seconds
        seconds: i64,
    },

    /// Text could not be parsed as an instant
    #[error("Invalid timestamp: {value}")]
    InvalidTimestamp {
        /// The rejected text
        value: String,
    },

    /// A goal or record identifier does not exist
    #[error("{resource} not found: {id}")]
    ResourceNotFound {
        /// Kind of resource that was looked up ("Goal", "Record")
        resource: &'static str,
        /// The identifier that was not found
        id: Uuid,
    },
}

impl Error {
    /// Shorthand for a missing goal.
    #[must_use]
    pub const fn goal_not_found(id: Uuid) -> Self {
        Self::ResourceNotFound {
            resource: "Goal",
            id,
        }
    }

    /// Shorthand for a missing record.
    #[must_use]
    pub const fn record_not_found(id: Uuid) -> Self {
        Self::ResourceNotFound {
            resource: "Record",
            id,
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
