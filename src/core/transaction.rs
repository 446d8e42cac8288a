//! Transaction business logic - The ledger of realized transactions.
//!
//! The rollover engine writes through the [`TransactionLedger`] seam; the SeaORM connection is
//! the production ledger. Read helpers here are owner-scoped so one user never sees another's
//! ledger. Rows produced by rollover are never modified by this crate after insertion.

use crate::{
    core::session::Session,
    entities::{Frequency, Transaction, TransactionType, transaction},
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, prelude::*};

/// A transaction about to be written to the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// Owner of the transaction
    pub user_id: String,
    /// `expense` or `income`
    pub transaction_type: TransactionType,
    /// Positive amount
    pub amount: f64,
    /// Category booked against
    pub category_id: i64,
    /// Description shown in the ledger
    pub description: String,
    /// Booking date
    pub date: NaiveDate,
    /// Produced from a recurring expense
    pub is_recurring: bool,
    /// Frequency of the originating recurring expense
    pub recurring_pattern: Option<Frequency>,
}

/// Write access to the transaction ledger.
#[allow(async_fn_in_trait)]
pub trait TransactionLedger {
    /// Inserts a transaction and returns the stored row, including its assigned id.
    async fn insert_transaction(&self, new: NewTransaction) -> Result<transaction::Model>;
}

impl TransactionLedger for DatabaseConnection {
    async fn insert_transaction(&self, new: NewTransaction) -> Result<transaction::Model> {
        let model = transaction::ActiveModel {
            user_id: Set(new.user_id),
            transaction_type: Set(new.transaction_type),
            amount: Set(new.amount),
            category_id: Set(new.category_id),
            description: Set(new.description),
            date: Set(new.date),
            is_recurring: Set(new.is_recurring),
            recurring_pattern: Set(new.recurring_pattern),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        };

        model.insert(self).await.map_err(Into::into)
    }
}

/// Retrieves the caller's transactions, newest booking date first.
pub async fn get_transactions_for_user(
    db: &DatabaseConnection,
    session: &Session,
) -> Result<Vec<transaction::Model>> {
    let user_id = session.require_user()?;

    Transaction::find()
        .filter(transaction::Column::UserId.eq(user_id))
        .order_by_desc(transaction::Column::Date)
        .order_by_desc(transaction::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a transaction by id, returning None if missing or owned by someone else.
pub async fn get_transaction_by_id(
    db: &DatabaseConnection,
    session: &Session,
    transaction_id: i64,
) -> Result<Option<transaction::Model>> {
    let user_id = session.require_user()?;

    Transaction::find_by_id(transaction_id)
        .filter(transaction::Column::UserId.eq(user_id))
        .one(db)
        .await
        .map_err(Into::into)
}
