//! Unified error type for the rollover engine and its catalogs.

use crate::entities::Frequency;
use chrono::NaiveDate;
use thiserror::Error;

/// Every failure the crate can surface to a caller.
#[derive(Debug, Error)]
pub enum Error {
    /// No caller identity could be resolved. Never retried; the user must sign in again.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// The recurring expense does not exist or belongs to another user.
    #[error("Recurring expense not found: {id}")]
    ExpenseNotFound {
        /// Requested expense id
        id: i64,
    },

    /// The category does not exist or belongs to another user.
    #[error("Category not found: {id}")]
    CategoryNotFound {
        /// Requested category id
        id: i64,
    },

    /// The category is still referenced and cannot be deleted.
    #[error("Category {id} is still referenced by {references} record(s)")]
    CategoryInUse {
        /// Category id
        id: i64,
        /// Number of recurring expenses and transactions pointing at it
        references: u64,
    },

    /// Amounts must be finite and strictly positive.
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// Rejected amount
        amount: f64,
    },

    /// Advancing the schedule left chrono's representable date range.
    #[error("Cannot advance {date} by one {frequency} period")]
    DateOutOfRange {
        /// Anchor date
        date: NaiveDate,
        /// Frequency being applied
        frequency: Frequency,
    },

    /// Input failed validation (empty names, duplicates, ...).
    #[error("Validation error: {message}")]
    Validation {
        /// Human-readable reason
        message: String,
    },

    /// Configuration could not be read or parsed.
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable reason
        message: String,
    },

    /// The backing store rejected a read or write.
    #[error("Persistence error: {0}")]
    Persistence(#[from] sea_orm::DbErr),

    /// Filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
