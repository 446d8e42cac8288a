//! Enumerated column types shared by several entities.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How often a recurring expense repeats.
///
/// Also stored on materialized transactions as their recurring pattern tag.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// Every seven days
    #[sea_orm(string_value = "weekly")]
    Weekly,
    /// Same day of the following calendar month
    #[sea_orm(string_value = "monthly")]
    Monthly,
    /// Same month and day of the following year
    #[sea_orm(string_value = "yearly")]
    Yearly,
}

impl Frequency {
    /// Lowercase name as stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of money flow for categories and transactions.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money going out
    #[sea_orm(string_value = "expense")]
    Expense,
    /// Money coming in
    #[sea_orm(string_value = "income")]
    Income,
}
