//! Resident business logic - the roster of units and the people living in them.
//!
//! Residents are keyed by unit number. The database enforces uniqueness of the
//! unit number and a clash is reported as [`Error::DuplicateUnit`] rather than a
//! raw constraint failure. Residents with recorded payments cannot be deleted;
//! the foreign key on `dues_payments` rejects it.

use crate::{
    core::validation,
    entities::{Ownership, Resident, resident},
    errors::{Error, Result},
};
use sea_orm::{PaginatorTrait, QueryOrder, Set, SqlErr, prelude::*};
use tracing::info;

/// Fields entered on the resident form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResidentInput {
    /// Unit number, positive and unique
    pub unit_number: i32,
    /// Full name, required
    pub full_name: String,
    /// Phone number, digits only; may be blank
    pub phone: String,
    /// Owner or tenant
    pub ownership: Ownership,
    /// Building or block the unit belongs to
    pub building_name: String,
    /// Email address; blank means none
    pub email: Option<String>,
}

struct ValidResident {
    unit_number: i32,
    full_name: String,
    phone: String,
    email: Option<String>,
}

fn validate(input: &ResidentInput) -> Result<ValidResident> {
    if input.unit_number <= 0 {
        return Err(Error::validation("unit number", "must be a positive number"));
    }
    Ok(ValidResident {
        unit_number: input.unit_number,
        full_name: validation::require_non_empty("full name", &input.full_name)?,
        phone: validation::optional_phone(&input.phone)?,
        email: validation::optional_email(input.email.as_deref())?,
    })
}

fn map_unit_conflict(err: DbErr, unit_number: i32) -> Error {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => Error::DuplicateUnit { unit_number },
        _ => err.into(),
    }
}

/// Registers a new resident.
///
/// # Errors
/// - [`Error::Validation`] for a blank name, malformed phone or email, or a
///   non-positive unit number
/// - [`Error::DuplicateUnit`] if the unit number is already registered
pub async fn create_resident(
    db: &DatabaseConnection,
    input: ResidentInput,
) -> Result<resident::Model> {
    let valid = validate(&input)?;

    let model = resident::ActiveModel {
        unit_number: Set(valid.unit_number),
        full_name: Set(valid.full_name),
        phone: Set(valid.phone),
        ownership: Set(input.ownership),
        building_name: Set(input.building_name.trim().to_string()),
        email: Set(valid.email),
        ..Default::default()
    };

    let created = model
        .insert(db)
        .await
        .map_err(|e| map_unit_conflict(e, valid.unit_number))?;
    info!(
        "Resident registered: unit {} ({})",
        created.unit_number, created.full_name
    );
    Ok(created)
}

/// Replaces every field of an existing resident.
///
/// Moving a resident onto a unit number that someone else holds fails with
/// [`Error::DuplicateUnit`].
pub async fn update_resident(
    db: &DatabaseConnection,
    resident_id: i64,
    input: ResidentInput,
) -> Result<resident::Model> {
    let valid = validate(&input)?;

    let mut model: resident::ActiveModel = Resident::find_by_id(resident_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "Resident",
            id: resident_id,
        })?
        .into();

    model.unit_number = Set(valid.unit_number);
    model.full_name = Set(valid.full_name);
    model.phone = Set(valid.phone);
    model.ownership = Set(input.ownership);
    model.building_name = Set(input.building_name.trim().to_string());
    model.email = Set(valid.email);

    model
        .update(db)
        .await
        .map_err(|e| map_unit_conflict(e, valid.unit_number))
}

/// Removes a resident. Fails while payments or user accounts still reference it.
pub async fn delete_resident(db: &DatabaseConnection, resident_id: i64) -> Result<()> {
    let result = Resident::delete_by_id(resident_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "Resident",
            id: resident_id,
        });
    }
    info!("Resident {} deleted", resident_id);
    Ok(())
}

/// Finds a resident by primary key.
pub async fn get_resident_by_id(
    db: &DatabaseConnection,
    resident_id: i64,
) -> Result<Option<resident::Model>> {
    Resident::find_by_id(resident_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds the resident living in `unit_number`.
pub async fn get_resident_by_unit(
    db: &DatabaseConnection,
    unit_number: i32,
) -> Result<Option<resident::Model>> {
    Resident::find()
        .filter(resident::Column::UnitNumber.eq(unit_number))
        .one(db)
        .await
        .map_err(Into::into)
}

/// All residents, ordered by unit number.
pub async fn list_residents(db: &DatabaseConnection) -> Result<Vec<resident::Model>> {
    Resident::find()
        .order_by_asc(resident::Column::UnitNumber)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Number of registered residents, i.e. the number of units that owe dues.
pub async fn count_residents(db: &DatabaseConnection) -> Result<u64> {
    Resident::find().count(db).await.map_err(Into::into)
}
