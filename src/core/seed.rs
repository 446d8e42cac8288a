//! Seeds categories and recurring expenses listed in config.toml.
//!
//! Records are matched by name, so running the seed repeatedly only creates what is missing.

use crate::{
    config::settings::Config,
    core::{
        category::{create_category, get_category_by_name, get_categories_for_user},
        recurring_expense::{
            RecurringExpenseInput, create_recurring_expense, get_recurring_expenses_for_user,
        },
        session::Session,
    },
    errors::{Error, Result},
};
use sea_orm::DatabaseConnection;
use std::collections::HashSet;
use tracing::info;

/// Number of records created by a seed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    /// Categories created
    pub categories_created: usize,
    /// Recurring expenses created
    pub expenses_created: usize,
}

/// Creates every configured category and recurring expense the caller does not have yet.
///
/// # Errors
/// Returns `Config` if a recurring expense names a category that is neither configured
/// nor already present, and propagates validation and database errors.
pub async fn seed_from_config(
    db: &DatabaseConnection,
    session: &Session,
    config: &Config,
) -> Result<SeedSummary> {
    let mut summary = SeedSummary::default();

    let mut existing: HashSet<String> = get_categories_for_user(db, session)
        .await?
        .into_iter()
        .map(|c| c.name)
        .collect();

    for category in &config.categories {
        let name = category.name.trim();
        if existing.contains(name) {
            continue;
        }
        create_category(db, session, category.name.clone(), category.category_type).await?;
        existing.insert(name.to_string());
        summary.categories_created += 1;
    }

    // Also tracks names created by this run, so a repeated config entry is seeded once
    let mut existing: HashSet<String> = get_recurring_expenses_for_user(db, session)
        .await?
        .into_iter()
        .map(|e| e.name)
        .collect();

    for expense in &config.recurring_expenses {
        let name = expense.name.trim();
        if existing.contains(name) {
            continue;
        }

        let category = get_category_by_name(db, session, &expense.category)
            .await?
            .ok_or_else(|| Error::Config {
                message: format!(
                    "Recurring expense '{}' references unknown category '{}'",
                    expense.name, expense.category
                ),
            })?;

        create_recurring_expense(
            db,
            session,
            RecurringExpenseInput {
                name: expense.name.clone(),
                category_id: category.id,
                amount: expense.amount,
                frequency: expense.frequency,
                next_due: expense.next_due,
                auto_add: expense.auto_add,
                description: expense.description.clone(),
            },
        )
        .await?;
        existing.insert(name.to_string());
        summary.expenses_created += 1;
    }

    info!(
        "Seeded {} categories and {} recurring expenses",
        summary.categories_created, summary.expenses_created
    );
    Ok(summary)
}
