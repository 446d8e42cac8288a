//! Recurring expense entity - A bill or subscription template.
//!
//! Each definition repeats on a fixed [`Frequency`]. `next_due` is `None` until the
//! expense has been scheduled; only the rollover engine moves it forward.

use super::enums::Frequency;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Recurring expense database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "recurring_expenses")]
pub struct Model {
    /// Unique identifier for the definition
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owner of the definition
    pub user_id: String,
    /// Display name, copied into each materialized transaction's description
    pub name: String,
    /// Category charged by each occurrence
    pub category_id: i64,
    /// Amount of each occurrence, always positive
    pub amount: f64,
    /// How often the expense repeats
    pub frequency: Frequency,
    /// Date of the next occurrence; `None` means not yet scheduled
    pub next_due: Option<Date>,
    /// Inactive definitions are never due
    pub is_active: bool,
    /// Whether the batch processor may materialize it without confirmation
    pub auto_add: bool,
    /// Optional free-form notes
    pub description: Option<String>,
    /// When the definition was created
    pub created_at: DateTimeUtc,
    /// When the definition was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between `RecurringExpense` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each definition belongs to one category
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
