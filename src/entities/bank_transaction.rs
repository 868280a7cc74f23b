//! Bank transaction entity - A single movement on a bank account.
//!
//! Amounts are always stored positive; `movement_type` carries the direction.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Direction of a bank movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    /// Money into the account
    #[sea_orm(string_value = "income")]
    Income,
    /// Money out of the account
    #[sea_orm(string_value = "expense")]
    Expense,
}

/// Bank transaction database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bank_transactions")]
pub struct Model {
    /// Unique identifier for the transaction
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Account the movement belongs to
    pub bank_account_id: i64,
    /// Value date
    pub date: Date,
    /// Amount in whole currency units, always positive
    pub amount: i64,
    /// Income or expense
    pub movement_type: MovementType,
    /// Free-text description
    pub description: String,
}

/// Defines relationships between `BankTransaction` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each transaction belongs to one bank account
    #[sea_orm(
        belongs_to = "super::bank_account::Entity",
        from = "Column::BankAccountId",
        to = "super::bank_account::Column::Id"
    )]
    BankAccount,
}

impl Related<super::bank_account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BankAccount.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
