//! Batch processing of due auto-add expenses.
//!
//! One pass materializes every due, auto-add-enabled expense in `next_due` order. A failing
//! expense is logged and skipped; it never stops its siblings from rolling over, and nothing
//! already written is undone.

use crate::{
    core::{
        clock::Clock,
        recurring_expense::ExpenseCatalog,
        rollover::{AdvanceFailure, MaterializeOutcome, RolloverEngine},
        session::Session,
        transaction::TransactionLedger,
    },
    errors::Result,
};
use chrono::NaiveDate;
use tracing::{info, instrument, warn};

/// Per-expense result of a batch pass.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchItemResult {
    /// Transaction recorded and schedule advanced
    Completed {
        /// Recorded transaction id
        transaction_id: i64,
        /// New `next_due`
        next_due: NaiveDate,
    },
    /// Transaction recorded, schedule left unchanged
    ScheduleNotAdvanced {
        /// Recorded transaction id
        transaction_id: i64,
        /// Why the advance did not happen
        reason: AdvanceFailure,
    },
    /// Nothing recorded
    Failed {
        /// Error text
        message: String,
    },
}

/// Outcome for one expense in a batch pass.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchItem {
    /// Recurring expense id
    pub expense_id: i64,
    /// Recurring expense name
    pub name: String,
    /// What happened
    pub result: BatchItemResult,
}

/// Summary of a batch pass.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport {
    /// Expenses for which a transaction was recorded
    pub processed_count: usize,
    /// One entry per due expense, in processing order
    pub outcomes: Vec<BatchItem>,
    /// Date the pass ran for
    pub run_date: NaiveDate,
}

impl BatchReport {
    /// Items that recorded nothing.
    pub fn failures(&self) -> impl Iterator<Item = &BatchItem> {
        self.outcomes
            .iter()
            .filter(|item| matches!(item.result, BatchItemResult::Failed { .. }))
    }

    /// Items that recorded a transaction but left `next_due` unchanged.
    pub fn degraded(&self) -> impl Iterator<Item = &BatchItem> {
        self.outcomes
            .iter()
            .filter(|item| matches!(item.result, BatchItemResult::ScheduleNotAdvanced { .. }))
    }
}

impl From<MaterializeOutcome> for BatchItemResult {
    fn from(outcome: MaterializeOutcome) -> Self {
        match outcome {
            MaterializeOutcome::Completed {
                transaction,
                next_due,
            } => Self::Completed {
                transaction_id: transaction.id,
                next_due,
            },
            MaterializeOutcome::ScheduleNotAdvanced {
                transaction,
                reason,
            } => Self::ScheduleNotAdvanced {
                transaction_id: transaction.id,
                reason,
            },
        }
    }
}

impl<E, L, K> RolloverEngine<E, L, K>
where
    E: ExpenseCatalog,
    L: TransactionLedger,
    K: Clock,
{
    /// Materializes every due auto-add expense once.
    ///
    /// The clock is read once; selection, every transaction date and
    /// [`BatchReport::run_date`] use that reading.
    ///
    /// # Errors
    /// Fails only when the caller is not authenticated or the due list cannot be read;
    /// per-expense failures are reported in [`BatchReport::outcomes`].
    #[instrument(skip(self, session))]
    pub async fn process_due_expenses(&self, session: &Session) -> Result<BatchReport> {
        let user_id = session.require_user()?;
        let now = self.clock.now();
        let run_date = now.date_naive();

        let due = self.list_due_on(user_id, run_date, true).await?;

        let mut processed_count = 0;
        let mut outcomes = Vec::with_capacity(due.len());

        for expense in due {
            let result = match self.materialize_at(user_id, expense.id, None, now).await {
                Ok(outcome) => {
                    processed_count += 1;
                    BatchItemResult::from(outcome)
                }
                Err(e) => {
                    warn!(
                        "Skipping recurring expense {} ('{}'): {}",
                        expense.id, expense.name, e
                    );
                    BatchItemResult::Failed {
                        message: e.to_string(),
                    }
                }
            };

            outcomes.push(BatchItem {
                expense_id: expense.id,
                name: expense.name,
                result,
            });
        }

        info!(
            "Batch for {}: {} of {} due expense(s) recorded",
            run_date,
            processed_count,
            outcomes.len()
        );

        Ok(BatchReport {
            processed_count,
            outcomes,
            run_date,
        })
    }
}

/// Formats a batch report into a human-readable summary string.
#[must_use]
pub fn format_batch_summary(report: &BatchReport) -> String {
    let mut summary = format!(
        "Recurring expenses - {} - Recorded {} of {} due\n",
        report.run_date.format("%Y-%m-%d"),
        report.processed_count,
        report.outcomes.len()
    );

    for item in &report.outcomes {
        let line = match &item.result {
            BatchItemResult::Completed {
                transaction_id,
                next_due,
            } => format!("recorded as #{transaction_id}, next due {next_due}"),
            BatchItemResult::ScheduleNotAdvanced {
                transaction_id,
                reason: AdvanceFailure::Conflict,
            } => format!("recorded as #{transaction_id}, schedule changed concurrently"),
            BatchItemResult::ScheduleNotAdvanced {
                transaction_id,
                reason: AdvanceFailure::Storage { message },
            } => format!("recorded as #{transaction_id}, schedule not advanced: {message}"),
            BatchItemResult::Failed { message } => format!("failed: {message}"),
        };
        summary.push_str(&format!("  {} - {}\n", item.name, line));
    }

    summary
}
