//! Due-expense selection.
//!
//! An expense is due when it is active, scheduled, and its `next_due` is on or
//! before today. Selection is a pure read ordered earliest-overdue first.

use crate::{
    core::{
        clock::Clock, recurring_expense::ExpenseCatalog, rollover::RolloverEngine,
        session::Session, transaction::TransactionLedger,
    },
    entities::recurring_expense,
    errors::Result,
};
use chrono::{Days, NaiveDate};
use tracing::debug;

/// Whether `expense` is due on `today`.
#[must_use]
pub fn is_due(expense: &recurring_expense::Model, today: NaiveDate) -> bool {
    expense.is_active && expense.next_due.is_some_and(|due| due <= today)
}

impl<E, L, K> RolloverEngine<E, L, K>
where
    E: ExpenseCatalog,
    L: TransactionLedger,
    K: Clock,
{
    /// Lists the caller's due expenses, earliest `next_due` first.
    ///
    /// With `auto_add_only`, expenses that need manual confirmation are left out.
    pub async fn list_due(
        &self,
        session: &Session,
        auto_add_only: bool,
    ) -> Result<Vec<recurring_expense::Model>> {
        let user_id = session.require_user()?;
        self.list_due_on(user_id, self.clock.today(), auto_add_only).await
    }

    pub(crate) async fn list_due_on(
        &self,
        user_id: &str,
        today: NaiveDate,
        auto_add_only: bool,
    ) -> Result<Vec<recurring_expense::Model>> {
        let due = self.catalog.list_due(user_id, today, auto_add_only).await?;
        debug!(
            "{} expense(s) due on {} (auto_add_only: {})",
            due.len(),
            today,
            auto_add_only
        );
        Ok(due)
    }

    /// Lists active expenses coming due after today and within `within_days` days.
    pub async fn list_upcoming(
        &self,
        session: &Session,
        within_days: u64,
    ) -> Result<Vec<recurring_expense::Model>> {
        let user_id = session.require_user()?;
        let today = self.clock.today();
        let until = today
            .checked_add_days(Days::new(within_days))
            .unwrap_or(NaiveDate::MAX);

        self.catalog.list_upcoming(user_id, today, until).await
    }
}
