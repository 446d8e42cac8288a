//! Recurring expense business logic - The expense catalog.
//!
//! This module provides owner-scoped creation, retrieval, editing, deactivation and deletion
//! of recurring expense definitions, plus the [`ExpenseCatalog`] seam the rollover engine reads
//! and writes through. The SeaORM connection is the production implementation; tests wrap it to
//! inject failures. All amounts are validated to be finite and strictly positive, and every
//! definition must point at a category owned by the same user.

use crate::{
    core::{category::ensure_owned_category, session::Session},
    entities::{Frequency, RecurringExpense, recurring_expense},
    errors::{Error, Result},
};
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Storage operations the rollover engine needs from the expense catalog.
#[allow(async_fn_in_trait)]
pub trait ExpenseCatalog {
    /// Fetches a definition owned by `user_id`.
    async fn find_owned(
        &self,
        expense_id: i64,
        user_id: &str,
    ) -> Result<Option<recurring_expense::Model>>;

    /// Moves `next_due` forward only if it still equals `expected`, stamping
    /// `updated_at` with `at`.
    ///
    /// Returns `false` when no row matched, meaning another caller advanced the
    /// schedule first or the definition was removed.
    async fn advance_next_due(
        &self,
        expense_id: i64,
        user_id: &str,
        expected: Option<NaiveDate>,
        next_due: NaiveDate,
        at: DateTime<Utc>,
    ) -> Result<bool>;

    /// Active definitions with `next_due <= today`, earliest first.
    async fn list_due(
        &self,
        user_id: &str,
        today: NaiveDate,
        auto_add_only: bool,
    ) -> Result<Vec<recurring_expense::Model>>;

    /// Active definitions with `after < next_due <= until`, earliest first.
    async fn list_upcoming(
        &self,
        user_id: &str,
        after: NaiveDate,
        until: NaiveDate,
    ) -> Result<Vec<recurring_expense::Model>>;
}

impl ExpenseCatalog for DatabaseConnection {
    async fn find_owned(
        &self,
        expense_id: i64,
        user_id: &str,
    ) -> Result<Option<recurring_expense::Model>> {
        RecurringExpense::find_by_id(expense_id)
            .filter(recurring_expense::Column::UserId.eq(user_id))
            .one(self)
            .await
            .map_err(Into::into)
    }

    async fn advance_next_due(
        &self,
        expense_id: i64,
        user_id: &str,
        expected: Option<NaiveDate>,
        next_due: NaiveDate,
        at: DateTime<Utc>,
    ) -> Result<bool> {
        let current = match expected {
            Some(date) => recurring_expense::Column::NextDue.eq(date),
            None => recurring_expense::Column::NextDue.is_null(),
        };

        let result = RecurringExpense::update_many()
            .set(recurring_expense::ActiveModel {
                next_due: Set(Some(next_due)),
                updated_at: Set(at),
                ..Default::default()
            })
            .filter(recurring_expense::Column::Id.eq(expense_id))
            .filter(recurring_expense::Column::UserId.eq(user_id))
            .filter(current)
            .exec(self)
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn list_due(
        &self,
        user_id: &str,
        today: NaiveDate,
        auto_add_only: bool,
    ) -> Result<Vec<recurring_expense::Model>> {
        let mut query = RecurringExpense::find()
            .filter(recurring_expense::Column::UserId.eq(user_id))
            .filter(recurring_expense::Column::IsActive.eq(true))
            .filter(recurring_expense::Column::NextDue.is_not_null())
            .filter(recurring_expense::Column::NextDue.lte(today));

        if auto_add_only {
            query = query.filter(recurring_expense::Column::AutoAdd.eq(true));
        }

        query
            .order_by_asc(recurring_expense::Column::NextDue)
            .order_by_asc(recurring_expense::Column::Id)
            .all(self)
            .await
            .map_err(Into::into)
    }

    async fn list_upcoming(
        &self,
        user_id: &str,
        after: NaiveDate,
        until: NaiveDate,
    ) -> Result<Vec<recurring_expense::Model>> {
        RecurringExpense::find()
            .filter(recurring_expense::Column::UserId.eq(user_id))
            .filter(recurring_expense::Column::IsActive.eq(true))
            .filter(recurring_expense::Column::NextDue.gt(after))
            .filter(recurring_expense::Column::NextDue.lte(until))
            .order_by_asc(recurring_expense::Column::NextDue)
            .order_by_asc(recurring_expense::Column::Id)
            .all(self)
            .await
            .map_err(Into::into)
    }
}

/// User-editable fields of a recurring expense.
#[derive(Debug, Clone, PartialEq)]
pub struct RecurringExpenseInput {
    /// Display name
    pub name: String,
    /// Category charged by each occurrence
    pub category_id: i64,
    /// Amount of each occurrence
    pub amount: f64,
    /// Repeat frequency
    pub frequency: Frequency,
    /// First (or next) due date; `None` leaves it unscheduled
    pub next_due: Option<NaiveDate>,
    /// Allow unattended materialization
    pub auto_add: bool,
    /// Optional notes
    pub description: Option<String>,
}

/// Rejects amounts that are not finite and strictly positive.
pub(crate) fn validate_amount(amount: f64) -> Result<()> {
    if amount.is_finite() && amount > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidAmount { amount })
    }
}

fn validate_input(input: &RecurringExpenseInput) -> Result<String> {
    let name = input.name.trim().to_string();
    if name.is_empty() {
        return Err(Error::Validation {
            message: "Recurring expense name cannot be empty".to_string(),
        });
    }
    validate_amount(input.amount)?;
    Ok(name)
}

fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}

/// Retrieves all of the caller's recurring expenses, ordered alphabetically by name.
pub async fn get_recurring_expenses_for_user(
    db: &DatabaseConnection,
    session: &Session,
) -> Result<Vec<recurring_expense::Model>> {
    let user_id = session.require_user()?;

    RecurringExpense::find()
        .filter(recurring_expense::Column::UserId.eq(user_id))
        .order_by_asc(recurring_expense::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a recurring expense by id, returning None if missing or not owned by the caller.
pub async fn get_recurring_expense_by_id(
    db: &DatabaseConnection,
    session: &Session,
    expense_id: i64,
) -> Result<Option<recurring_expense::Model>> {
    let user_id = session.require_user()?;
    db.find_owned(expense_id, user_id).await
}

/// Creates a new, active recurring expense for the caller.
///
/// # Errors
/// Returns an error if:
/// - No user is signed in
/// - The name is empty or whitespace-only
/// - The amount is not finite or not strictly positive
/// - The category does not exist or belongs to another user
/// - The database insert fails
pub async fn create_recurring_expense(
    db: &DatabaseConnection,
    session: &Session,
    input: RecurringExpenseInput,
) -> Result<recurring_expense::Model> {
    let user_id = session.require_user()?;
    let name = validate_input(&input)?;
    ensure_owned_category(db, user_id, input.category_id).await?;

    let now = chrono::Utc::now();
    let expense = recurring_expense::ActiveModel {
        user_id: Set(user_id.to_string()),
        name: Set(name),
        category_id: Set(input.category_id),
        amount: Set(input.amount),
        frequency: Set(input.frequency),
        next_due: Set(input.next_due),
        is_active: Set(true),
        auto_add: Set(input.auto_add),
        description: Set(normalize_description(input.description)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let result = expense.insert(db).await?;
    tracing::debug!("Created recurring expense {} ({})", result.id, result.name);
    Ok(result)
}

/// Replaces the editable fields of an existing recurring expense.
///
/// The active flag is left untouched; use [`set_recurring_expense_active`] for that.
///
/// # Errors
/// Returns an error if validation fails, the expense or category is not owned by the
/// caller, or the database update fails.
pub async fn update_recurring_expense(
    db: &DatabaseConnection,
    session: &Session,
    expense_id: i64,
    input: RecurringExpenseInput,
) -> Result<recurring_expense::Model> {
    let user_id = session.require_user()?;
    let name = validate_input(&input)?;

    let mut expense: recurring_expense::ActiveModel = db
        .find_owned(expense_id, user_id)
        .await?
        .ok_or(Error::ExpenseNotFound { id: expense_id })?
        .into();

    ensure_owned_category(db, user_id, input.category_id).await?;

    expense.name = Set(name);
    expense.category_id = Set(input.category_id);
    expense.amount = Set(input.amount);
    expense.frequency = Set(input.frequency);
    expense.next_due = Set(input.next_due);
    expense.auto_add = Set(input.auto_add);
    expense.description = Set(normalize_description(input.description));
    expense.updated_at = Set(chrono::Utc::now());

    expense.update(db).await.map_err(Into::into)
}

/// Activates or deactivates a recurring expense. Inactive expenses are never due.
pub async fn set_recurring_expense_active(
    db: &DatabaseConnection,
    session: &Session,
    expense_id: i64,
    is_active: bool,
) -> Result<recurring_expense::Model> {
    let user_id = session.require_user()?;

    let mut expense: recurring_expense::ActiveModel = db
        .find_owned(expense_id, user_id)
        .await?
        .ok_or(Error::ExpenseNotFound { id: expense_id })?
        .into();

    expense.is_active = Set(is_active);
    expense.updated_at = Set(chrono::Utc::now());

    expense.update(db).await.map_err(Into::into)
}

/// Permanently deletes a recurring expense. Transactions it produced are kept.
pub async fn delete_recurring_expense(
    db: &DatabaseConnection,
    session: &Session,
    expense_id: i64,
) -> Result<()> {
    let user_id = session.require_user()?;

    let expense = db
        .find_owned(expense_id, user_id)
        .await?
        .ok_or(Error::ExpenseNotFound { id: expense_id })?;

    expense.delete(db).await?;
    Ok(())
}
