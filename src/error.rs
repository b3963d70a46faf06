//! Custom error types for Fortnight
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use rust_decimal::Decimal;
use thiserror::Error;

/// The main error type for Fortnight operations
#[derive(Error, Debug)]
pub enum BudgetError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// CSV reading/writing errors
    #[error("CSV error: {0}")]
    Csv(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Bucket percentages that cannot be allocated
    #[error("Fire % + Smile % cannot exceed 100% (got {fire_pct}% + {smile_pct}%)")]
    InvalidAllocationInput {
        fire_pct: Decimal,
        smile_pct: Decimal,
    },

    /// An amount, or a total of amounts, beyond what can be represented
    #[error("Amount out of range: {0}")]
    AmountOutOfRange(String),

    /// A bill start date that is not a calendar date
    #[error("Unparseable date: '{0}'")]
    UnparseableDate(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Remote datastore errors
    #[error("Sync error: {0}")]
    Sync(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Import errors
    #[error("Import error: {0}")]
    Import(String),
}

impl BudgetError {
    /// Create a "not found" error for bills
    pub fn bill_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Bill",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for debts
    pub fn debt_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Debt",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for goals
    pub fn goal_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Goal",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for history snapshots
    pub fn snapshot_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Snapshot",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this error rejects the bucket percentages
    pub fn is_invalid_allocation(&self) -> bool {
        matches!(self, Self::InvalidAllocationInput { .. })
    }
}

impl From<std::io::Error> for BudgetError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BudgetError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for BudgetError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}

/// Result type alias for Fortnight operations
pub type BudgetResult<T> = Result<T, BudgetError>;
