//! Transaction entity - A realized ledger entry.
//!
//! Rollover inserts one expense row per occurrence with `is_recurring` set and the
//! definition's frequency copied into `recurring_pattern`. Rows carry no back-reference
//! to the recurring expense they came from.
use super::enums::{Frequency, TransactionType};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Unique identifier for the transaction
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owner of the transaction
    pub user_id: String,
    /// `expense` or `income`
    pub transaction_type: TransactionType,
    /// Transaction amount, always positive; direction comes from `transaction_type`
    pub amount: f64,
    /// Category the transaction is booked against
    pub category_id: i64,
    /// Human-readable description of the transaction
    pub description: String,
    /// Booking date
    pub date: Date,
    /// Whether the transaction was produced from a recurring expense
    pub is_recurring: bool,
    /// Repeat pattern of the originating recurring expense
    pub recurring_pattern: Option<Frequency>,
    /// When the row was inserted
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Transaction and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each transaction belongs to one category
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
