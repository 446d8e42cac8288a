//! Category business logic - Owner-scoped category catalog.
//!
//! Recurring expenses must reference a category owned by the same user, so this module
//! also provides the ownership check used when definitions are created or edited.
//! Deleting a category that is still referenced is refused.

use crate::{
    core::session::Session,
    entities::{Category, RecurringExpense, Transaction, TransactionType, category},
    errors::{Error, Result},
};
use sea_orm::{PaginatorTrait, QueryOrder, Set, prelude::*};

/// Retrieves all categories owned by the caller, ordered alphabetically by name.
pub async fn get_categories_for_user(
    db: &DatabaseConnection,
    session: &Session,
) -> Result<Vec<category::Model>> {
    let user_id = session.require_user()?;

    Category::find()
        .filter(category::Column::UserId.eq(user_id))
        .order_by_asc(category::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a category by id, returning None if missing or owned by someone else.
pub async fn get_category_by_id(
    db: &DatabaseConnection,
    session: &Session,
    category_id: i64,
) -> Result<Option<category::Model>> {
    let user_id = session.require_user()?;
    find_owned_category(db, user_id, category_id).await
}

/// Finds a category by its exact name for the caller.
pub async fn get_category_by_name(
    db: &DatabaseConnection,
    session: &Session,
    name: &str,
) -> Result<Option<category::Model>> {
    let user_id = session.require_user()?;

    Category::find()
        .filter(category::Column::UserId.eq(user_id))
        .filter(category::Column::Name.eq(name.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a new category for the caller.
///
/// # Errors
/// Returns an error if:
/// - No user is signed in
/// - The name is empty or whitespace-only
/// - The caller already has a category with the same name
/// - The database insert fails
pub async fn create_category(
    db: &DatabaseConnection,
    session: &Session,
    name: String,
    category_type: TransactionType,
) -> Result<category::Model> {
    let user_id = session.require_user()?;

    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(Error::Validation {
            message: "Category name cannot be empty".to_string(),
        });
    }

    if get_category_by_name(db, session, &name).await?.is_some() {
        return Err(Error::Validation {
            message: format!("Category '{name}' already exists"),
        });
    }

    let category = category::ActiveModel {
        user_id: Set(user_id.to_string()),
        name: Set(name),
        category_type: Set(category_type),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    category.insert(db).await.map_err(Into::into)
}

/// Deletes a category that nothing references.
///
/// # Errors
/// Returns `CategoryNotFound` if the caller does not own it, and `CategoryInUse`
/// if any recurring expense or transaction still points at it.
pub async fn delete_category(
    db: &DatabaseConnection,
    session: &Session,
    category_id: i64,
) -> Result<()> {
    let user_id = session.require_user()?;

    let category = find_owned_category(db, user_id, category_id)
        .await?
        .ok_or(Error::CategoryNotFound { id: category_id })?;

    let expense_refs = RecurringExpense::find()
        .filter(crate::entities::recurring_expense::Column::CategoryId.eq(category_id))
        .count(db)
        .await?;
    let transaction_refs = Transaction::find()
        .filter(crate::entities::transaction::Column::CategoryId.eq(category_id))
        .count(db)
        .await?;

    let references = expense_refs + transaction_refs;
    if references > 0 {
        return Err(Error::CategoryInUse {
            id: category_id,
            references,
        });
    }

    category.delete(db).await?;
    Ok(())
}

/// Ensures `category_id` exists and belongs to `user_id`.
pub(crate) async fn ensure_owned_category<C>(db: &C, user_id: &str, category_id: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    find_owned_category(db, user_id, category_id)
        .await?
        .map(|_| ())
        .ok_or(Error::CategoryNotFound { id: category_id })
}

async fn find_owned_category<C>(
    db: &C,
    user_id: &str,
    category_id: i64,
) -> Result<Option<category::Model>>
where
    C: ConnectionTrait,
{
    Category::find_by_id(category_id)
        .filter(category::Column::UserId.eq(user_id))
        .one(db)
        .await
        .map_err(Into::into)
}
