//! Resident entity - One row per occupied unit.
//!
//! The unit number is the natural key and carries a UNIQUE constraint.
//! Residents are referenced by dues payments and, optionally, by user accounts.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Whether the resident owns the unit or rents it
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum Ownership {
    /// Unit owner
    #[sea_orm(string_value = "owner")]
    Owner,
    /// Tenant renting the unit
    #[sea_orm(string_value = "tenant")]
    Tenant,
}

/// Resident database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "residents")]
pub struct Model {
    /// Unique identifier for the resident
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Unit (flat) number, unique across the building
    #[sea_orm(unique)]
    pub unit_number: i32,
    /// Full name
    pub full_name: String,
    /// Phone number, digits only
    pub phone: String,
    /// Owner or tenant
    pub ownership: Ownership,
    /// Name of the building the unit belongs to
    pub building_name: String,
    /// Optional email address
    pub email: Option<String>,
}

/// Defines relationships between Resident and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One resident has many dues payments
    #[sea_orm(has_many = "super::dues_payment::Entity")]
    DuesPayments,
    /// A resident may be linked to login accounts
    #[sea_orm(has_many = "super::user::Entity")]
    Users,
}

impl Related<super::dues_payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DuesPayments.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
