//! Expense entity - Money spent on behalf of the building.
//!
//! Expenses paid by bank transfer point at the bank account they left from;
//! cash expenses have no account.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// How an expense was paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Paid from one of the building's bank accounts
    #[sea_orm(string_value = "bank_transfer")]
    BankTransfer,
    /// Paid in cash
    #[sea_orm(string_value = "cash")]
    Cash,
}

/// Expense database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    /// Unique identifier for the expense
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Date the expense was paid
    pub payment_date: Date,
    /// Amount in whole currency units
    pub amount: i64,
    /// What the money was spent on
    pub description: String,
    /// Bank transfer or cash
    pub payment_method: PaymentMethod,
    /// Source account, present for bank transfers
    pub bank_account_id: Option<i64>,
}

/// Defines relationships between Expense and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A bank-transfer expense belongs to one bank account
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
