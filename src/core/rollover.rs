//! Rollover engine - Turns one occurrence of a recurring expense into a ledger transaction.
//!
//! Materialization performs two dependent writes: the transaction insert, then the
//! `next_due` advance. The insert is the primary effect and its failure fails the call.
//! The advance is a compare-and-set on the previously read `next_due`; if it fails or loses
//! a race, the transaction is kept and the caller receives
//! [`MaterializeOutcome::ScheduleNotAdvanced`] instead of a plain success.

use crate::{
    core::{
        clock::Clock,
        recurring_expense::{ExpenseCatalog, validate_amount},
        schedule::advance,
        session::Session,
        transaction::{NewTransaction, TransactionLedger},
    },
    entities::{TransactionType, transaction},
    errors::{Error, Result},
};
use chrono::{DateTime, NaiveDate, Utc};
use tracing::{info, instrument, warn};

/// Why a materialized occurrence did not move its schedule forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceFailure {
    /// `next_due` changed (or the definition vanished) between read and write.
    Conflict,
    /// The catalog rejected the update.
    Storage {
        /// Backend error text
        message: String,
    },
}

/// Result of a successful materialization.
#[derive(Debug, Clone, PartialEq)]
pub enum MaterializeOutcome {
    /// Transaction recorded and schedule advanced.
    Completed {
        /// The recorded transaction
        transaction: transaction::Model,
        /// The definition's new `next_due`
        next_due: NaiveDate,
    },
    /// Transaction recorded but `next_due` was left unchanged.
    ///
    /// The same occurrence will be selected as due again until the schedule is fixed.
    ScheduleNotAdvanced {
        /// The recorded transaction
        transaction: transaction::Model,
        /// Why the advance did not happen
        reason: AdvanceFailure,
    },
}

impl MaterializeOutcome {
    /// The recorded transaction.
    #[must_use]
    pub const fn transaction(&self) -> &transaction::Model {
        match self {
            Self::Completed { transaction, .. } | Self::ScheduleNotAdvanced { transaction, .. } => {
                transaction
            }
        }
    }

    /// Id assigned to the recorded transaction.
    #[must_use]
    pub const fn transaction_id(&self) -> i64 {
        self.transaction().id
    }

    /// Whether the schedule advanced.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// Materializes, selects and batch-processes recurring expenses.
///
/// Collaborators are injected at construction: the expense catalog, the transaction ledger
/// and the clock. In production both stores are the same `DatabaseConnection`.
#[derive(Debug, Clone)]
pub struct RolloverEngine<E, L, K> {
    pub(crate) catalog: E,
    pub(crate) ledger: L,
    pub(crate) clock: K,
}

impl<E, L, K> RolloverEngine<E, L, K>
where
    E: ExpenseCatalog,
    L: TransactionLedger,
    K: Clock,
{
    /// Builds an engine over the given collaborators.
    pub const fn new(catalog: E, ledger: L, clock: K) -> Self {
        Self {
            catalog,
            ledger,
            clock,
        }
    }

    /// Records one occurrence of `expense_id` and advances its schedule.
    ///
    /// `custom_amount` overrides the definition's amount for this occurrence only.
    /// When the definition has never been scheduled, today is used as the anchor
    /// for the next due date.
    ///
    /// # Errors
    /// - `NotAuthenticated` if no user is signed in
    /// - `InvalidAmount` if `custom_amount` is not finite and positive
    /// - `ExpenseNotFound` if the caller does not own the expense
    /// - `DateOutOfRange` if the next due date cannot be represented
    /// - `Persistence` if the transaction insert fails
    #[instrument(skip(self, session))]
    pub async fn materialize_occurrence(
        &self,
        session: &Session,
        expense_id: i64,
        custom_amount: Option<f64>,
    ) -> Result<MaterializeOutcome> {
        let user_id = session.require_user()?;
        if let Some(amount) = custom_amount {
            validate_amount(amount)?;
        }

        self.materialize_at(user_id, expense_id, custom_amount, self.clock.now()).await
    }

    /// Materializes one occurrence as of `now`; the caller has checked identity
    /// and `custom_amount`.
    pub(crate) async fn materialize_at(
        &self,
        user_id: &str,
        expense_id: i64,
        custom_amount: Option<f64>,
        now: DateTime<Utc>,
    ) -> Result<MaterializeOutcome> {
        let expense = self
            .catalog
            .find_owned(expense_id, user_id)
            .await?
            .ok_or(Error::ExpenseNotFound { id: expense_id })?;

        let today = now.date_naive();
        let next_due = advance(expense.next_due.unwrap_or(today), expense.frequency)?;

        let transaction = self
            .ledger
            .insert_transaction(NewTransaction {
                user_id: user_id.to_string(),
                transaction_type: TransactionType::Expense,
                amount: custom_amount.unwrap_or(expense.amount),
                category_id: expense.category_id,
                description: expense.name.clone(),
                date: today,
                is_recurring: true,
                recurring_pattern: Some(expense.frequency),
            })
            .await?;

        let advanced = self
            .catalog
            .advance_next_due(expense.id, user_id, expense.next_due, next_due, now)
            .await;

        let outcome = match advanced {
            Ok(true) => {
                info!(
                    "Recorded '{}' as transaction {} ({:.2}); next due {}",
                    expense.name, transaction.id, transaction.amount, next_due
                );
                MaterializeOutcome::Completed {
                    transaction,
                    next_due,
                }
            }
            Ok(false) => {
                warn!(
                    "Recorded '{}' as transaction {} but its schedule changed concurrently; next_due not advanced",
                    expense.name, transaction.id
                );
                MaterializeOutcome::ScheduleNotAdvanced {
                    transaction,
                    reason: AdvanceFailure::Conflict,
                }
            }
            Err(e) => {
                warn!(
                    "Recorded '{}' as transaction {} but failed to advance next_due: {}",
                    expense.name, transaction.id, e
                );
                MaterializeOutcome::ScheduleNotAdvanced {
                    transaction,
                    reason: AdvanceFailure::Storage {
                        message: e.to_string(),
                    },
                }
            }
        };

        Ok(outcome)
    }
}
