//! Shared test utilities.
//!
//! This module provides common helper functions for setting up test databases,
//! creating test entities with sensible defaults, and fake collaborators that
//! force catalog or ledger failures.

use crate::{
    core::{
        category,
        clock::{Clock, FixedClock},
        recurring_expense::{self, ExpenseCatalog, RecurringExpenseInput},
        rollover::RolloverEngine,
        session::Session,
        transaction::{self, NewTransaction, TransactionLedger},
    },
    entities::{self, Frequency, TransactionType},
    errors::{Error, Result},
};
use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use sea_orm::{DatabaseConnection, DbErr};
use std::{cell::Cell, collections::HashSet};

/// Owner used by most tests
pub const TEST_USER: &str = "test_user";
/// A second owner for isolation tests
pub const OTHER_USER: &str = "other_user";

/// Shorthand for a valid calendar date.
#[allow(clippy::unwrap_used)]
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Midnight UTC on `date`.
pub fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Clock that moves one day forward every time it is read, starting at midnight
/// UTC on the given date.
pub struct SteppingClock {
    next: Cell<DateTime<Utc>>,
}

impl SteppingClock {
    /// First reading is midnight UTC on `date`.
    pub fn starting_on(date: NaiveDate) -> Self {
        Self {
            next: Cell::new(midnight(date)),
        }
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let now = self.next.get();
        self.next.set(now + Days::new(1));
        now
    }
}

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Returns (db, session for [`TEST_USER`]).
pub async fn setup_with_session() -> Result<(DatabaseConnection, Session)> {
    Ok((setup_test_db().await?, Session::authenticated(TEST_USER)))
}

/// Sets up a database holding one category and one weekly, auto-add "Rent"
/// expense of 50.0 due 2024-01-01.
pub async fn setup_with_expense()
-> Result<(DatabaseConnection, Session, entities::RecurringExpenseModel)> {
    let (db, session) = setup_with_session().await?;
    let category = create_test_category(&db, &session, "Housing").await?;
    let expense =
        create_test_expense(&db, &session, "Rent", category.id, Some(date(2024, 1, 1))).await?;
    Ok((db, session, expense))
}

/// Creates an expense category for the session's user.
pub async fn create_test_category(
    db: &DatabaseConnection,
    session: &Session,
    name: &str,
) -> Result<entities::CategoryModel> {
    category::create_category(db, session, name.to_string(), TransactionType::Expense).await
}

/// Builds expense input with `auto_add` enabled and no description.
pub fn expense_input(
    name: &str,
    category_id: i64,
    amount: f64,
    frequency: Frequency,
    next_due: Option<NaiveDate>,
) -> RecurringExpenseInput {
    RecurringExpenseInput {
        name: name.to_string(),
        category_id,
        amount,
        frequency,
        next_due,
        auto_add: true,
        description: None,
    }
}

/// Creates a weekly, auto-add recurring expense of 50.0.
pub async fn create_test_expense(
    db: &DatabaseConnection,
    session: &Session,
    name: &str,
    category_id: i64,
    next_due: Option<NaiveDate>,
) -> Result<entities::RecurringExpenseModel> {
    recurring_expense::create_recurring_expense(
        db,
        session,
        expense_input(name, category_id, 50.0, Frequency::Weekly, next_due),
    )
    .await
}

/// Engine over `db` with the clock pinned to `today`.
pub fn test_engine(
    db: &DatabaseConnection,
    today: NaiveDate,
) -> RolloverEngine<DatabaseConnection, DatabaseConnection, FixedClock> {
    RolloverEngine::new(db.clone(), db.clone(), FixedClock::on(today))
}

/// All of the session's transactions, newest first.
pub async fn transactions_for(
    db: &DatabaseConnection,
    session: &Session,
) -> Result<Vec<entities::TransactionModel>> {
    transaction::get_transactions_for_user(db, session).await
}

/// Reloads a recurring expense that must exist.
pub async fn reload_expense(
    db: &DatabaseConnection,
    session: &Session,
    expense_id: i64,
) -> Result<entities::RecurringExpenseModel> {
    recurring_expense::get_recurring_expense_by_id(db, session, expense_id)
        .await?
        .ok_or(Error::ExpenseNotFound { id: expense_id })
}

/// Ledger that rejects inserts whose description is in `fail_on`.
pub struct FlakyLedger {
    inner: DatabaseConnection,
    fail_on: HashSet<String>,
}

impl FlakyLedger {
    /// Wraps `inner`, failing inserts for the given descriptions.
    pub fn failing_on<'a>(
        inner: DatabaseConnection,
        descriptions: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        Self {
            inner,
            fail_on: descriptions.into_iter().map(str::to_string).collect(),
        }
    }
}

impl TransactionLedger for FlakyLedger {
    async fn insert_transaction(&self, new: NewTransaction) -> Result<entities::TransactionModel> {
        if self.fail_on.contains(&new.description) {
            return Err(Error::Persistence(DbErr::Custom(format!(
                "forced ledger failure for '{}'",
                new.description
            ))));
        }
        self.inner.insert_transaction(new).await
    }
}

/// Catalog whose `next_due` updates always fail.
pub struct StuckCatalog {
    inner: DatabaseConnection,
}

impl StuckCatalog {
    /// Wraps `inner`.
    pub const fn new(inner: DatabaseConnection) -> Self {
        Self { inner }
    }
}

impl ExpenseCatalog for StuckCatalog {
    async fn find_owned(
        &self,
        expense_id: i64,
        user_id: &str,
    ) -> Result<Option<entities::RecurringExpenseModel>> {
        self.inner.find_owned(expense_id, user_id).await
    }

    async fn advance_next_due(
        &self,
        _expense_id: i64,
        _user_id: &str,
        _expected: Option<NaiveDate>,
        _next_due: NaiveDate,
        _at: DateTime<Utc>,
    ) -> Result<bool> {
        Err(Error::Persistence(DbErr::Custom(
            "forced catalog failure".to_string(),
        )))
    }

    async fn list_due(
        &self,
        user_id: &str,
        today: NaiveDate,
        auto_add_only: bool,
    ) -> Result<Vec<entities::RecurringExpenseModel>> {
        self.inner.list_due(user_id, today, auto_add_only).await
    }

    async fn list_upcoming(
        &self,
        user_id: &str,
        after: NaiveDate,
        until: NaiveDate,
    ) -> Result<Vec<entities::RecurringExpenseModel>> {
        self.inner.list_upcoming(user_id, after, until).await
    }
}

/// Catalog where another caller always advances the schedule first.
pub struct RacingCatalog {
    inner: DatabaseConnection,
}

impl RacingCatalog {
    /// Wraps `inner`.
    pub const fn new(inner: DatabaseConnection) -> Self {
        Self { inner }
    }
}

impl ExpenseCatalog for RacingCatalog {
    async fn find_owned(
        &self,
        expense_id: i64,
        user_id: &str,
    ) -> Result<Option<entities::RecurringExpenseModel>> {
        self.inner.find_owned(expense_id, user_id).await
    }

    async fn advance_next_due(
        &self,
        expense_id: i64,
        user_id: &str,
        expected: Option<NaiveDate>,
        next_due: NaiveDate,
        at: DateTime<Utc>,
    ) -> Result<bool> {
        // The competing writer lands between our read and our write
        self.inner
            .advance_next_due(expense_id, user_id, expected, next_due, at)
            .await?;
        self.inner
            .advance_next_due(expense_id, user_id, expected, next_due, at)
            .await
    }

    async fn list_due(
        &self,
        user_id: &str,
        today: NaiveDate,
        auto_add_only: bool,
    ) -> Result<Vec<entities::RecurringExpenseModel>> {
        self.inner.list_due(user_id, today, auto_add_only).await
    }

    async fn list_upcoming(
        &self,
        user_id: &str,
        after: NaiveDate,
        until: NaiveDate,
    ) -> Result<Vec<entities::RecurringExpenseModel>> {
        self.inner.list_upcoming(user_id, after, until).await
    }
}
