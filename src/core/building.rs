//! Building profile - the single record describing the managed building.

use crate::{
    config::BuildingConfig,
    core::validation,
    entities::{Building, building},
    errors::Result,
};
use sea_orm::{Set, prelude::*};
use tracing::info;

/// Editable fields of the building profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildingInput {
    /// Building name, required
    pub name: String,
    /// Building manager
    pub manager: String,
    /// Assistant manager
    pub assistant: String,
    /// Auditor
    pub auditor: String,
    /// Contact phone, digits only; may be blank
    pub phone: String,
    /// Postal address
    pub address: String,
}

impl From<BuildingConfig> for BuildingInput {
    fn from(config: BuildingConfig) -> Self {
        Self {
            name: config.name,
            manager: config.manager,
            assistant: config.assistant,
            auditor: config.auditor,
            phone: config.phone,
            address: config.address,
        }
    }
}

/// Returns the building profile, or `None` if it has never been entered.
pub async fn get_building(db: &DatabaseConnection) -> Result<Option<building::Model>> {
    Building::find_by_id(building::BUILDING_ID)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates or replaces the building profile.
///
/// The name is required and the phone, when given, must be a valid number.
pub async fn save_building(
    db: &DatabaseConnection,
    input: BuildingInput,
) -> Result<building::Model> {
    let name = validation::require_non_empty("name", &input.name)?;
    let phone = validation::optional_phone(&input.phone)?;

    let existing = get_building(db).await?;
    let is_new = existing.is_none();
    let mut model: building::ActiveModel = match existing {
        Some(current) => current.into(),
        None => building::ActiveModel {
            id: Set(building::BUILDING_ID),
            ..Default::default()
        },
    };

    model.name = Set(name);
    model.manager = Set(input.manager.trim().to_string());
    model.assistant = Set(input.assistant.trim().to_string());
    model.auditor = Set(input.auditor.trim().to_string());
    model.phone = Set(phone);
    model.address = Set(input.address.trim().to_string());

    let saved = if is_new {
        model.insert(db).await?
    } else {
        model.update(db).await?
    };
    info!("Building profile saved: {}", saved.name);
    Ok(saved)
}

/// Writes the configured profile only when the database has none yet.
///
/// Returns whether a profile was written.
pub async fn seed_building(
    db: &DatabaseConnection,
    config: Option<&BuildingConfig>,
) -> Result<bool> {
    let Some(config) = config else {
        return Ok(false);
    };
    if get_building(db).await?.is_some() {
        return Ok(false);
    }
    save_building(db, config.clone().into()).await?;
    Ok(true)
}
