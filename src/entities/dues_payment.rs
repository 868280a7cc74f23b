//! Dues payment entity - A single payment made by a resident.
//!
//! Payments reference a resident, the year and month they settle, the date the
//! money was received, and the amount. There is no uniqueness over
//! (resident, year, month): partial and repeated payments are all recorded.

use super::month::Month;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Dues payment database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "dues_payments")]
pub struct Model {
    /// Unique identifier for the payment
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Resident who paid
    pub resident_id: i64,
    /// Year being paid for
    pub year: i32,
    /// Month being paid for
    pub month: Month,
    /// Date the payment was received
    pub payment_date: Date,
    /// Amount in whole currency units
    pub amount: i64,
    /// Free-text note
    pub note: String,
}

/// Defines relationships between `DuesPayment` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each payment belongs to one resident
    #[sea_orm(
        belongs_to = "super::resident::Entity",
        from = "Column::ResidentId",
        to = "super::resident::Column::Id"
    )]
    Resident,
}

impl Related<super::resident::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Resident.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
