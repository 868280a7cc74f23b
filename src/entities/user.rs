//! User entity - Login credentials.
//!
//! Passwords are stored only as argon2 PHC strings. A user may be linked to the
//! resident record of the person it belongs to.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// What a logged-in user is allowed to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Building administrator, may manage user accounts
    #[sea_orm(string_value = "administrator")]
    Administrator,
    /// Resident with ordinary access
    #[sea_orm(string_value = "resident")]
    Resident,
}

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Login name
    #[sea_orm(unique)]
    pub username: String,
    /// Argon2 PHC string
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Administrator or resident
    pub role: Role,
    /// Resident record this account belongs to
    pub resident_id: Option<i64>,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A user may belong to one resident
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
