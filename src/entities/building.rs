//! Building entity - The single profile row for the managed building.
//!
//! The table is constrained to one row: the primary key is fixed to
//! [`BUILDING_ID`] and a CHECK constraint rejects any other value.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Primary key of the one and only building row
pub const BUILDING_ID: i32 = 1;

/// Building database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "building")]
pub struct Model {
    /// Always [`BUILDING_ID`]
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    /// Name of the building
    pub name: String,
    /// Building manager
    pub manager: String,
    /// Assistant manager
    pub assistant: String,
    /// Auditor
    pub auditor: String,
    /// Contact phone
    pub phone: String,
    /// Postal address
    pub address: String,
}

/// `Building` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
