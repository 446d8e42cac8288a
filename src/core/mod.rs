//! Core business logic - framework-agnostic scheduling, rollover and catalog operations.

/// Batch processing of due auto-add expenses
pub mod batch;
/// Owner-scoped category catalog
pub mod category;
/// Source of the current date
pub mod clock;
/// Due-expense selection
pub mod due;
/// Recurring expense catalog
pub mod recurring_expense;
/// Materialization of a single occurrence
pub mod rollover;
/// Recurrence date arithmetic
pub mod schedule;
/// Seeding from configuration
pub mod seed;
/// Caller identity
pub mod session;
/// Transaction ledger
pub mod transaction;

pub use batch::{BatchItem, BatchItemResult, BatchReport, format_batch_summary};
pub use clock::{Clock, FixedClock, SystemClock};
pub use rollover::{AdvanceFailure, MaterializeOutcome, RolloverEngine};
pub use session::Session;
