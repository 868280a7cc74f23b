//! Shared test utilities for `AidatBuddy`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test records with sensible defaults.

use crate::{
    core::{
        bank::{self, AccountInput, TransactionInput},
        dues::{self, PaymentInput},
        expense::ExpenseInput,
        resident::{self, ResidentInput},
    },
    entities::{self, MovementType, Month, Ownership, PaymentMethod, Role},
    errors::Result,
    session::Session,
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Builds a calendar date, panicking on an impossible one.
#[allow(clippy::unwrap_used)]
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// A session for an administrator who never logged in through the database.
pub fn admin_session() -> Session {
    Session::new("test_admin".to_string(), Role::Administrator)
}

/// Resident form input with sensible defaults.
///
/// # Defaults
/// * `full_name`: `"Test Resident"`
/// * `phone`: `"05321234567"`
/// * `ownership`: owner
/// * `email`: None
pub fn resident_input(unit_number: i32) -> ResidentInput {
    ResidentInput {
        unit_number,
        full_name: "Test Resident".to_string(),
        phone: "05321234567".to_string(),
        ownership: Ownership::Owner,
        building_name: "A Blok".to_string(),
        email: None,
    }
}

/// Registers a resident in `unit_number` with the defaults of [`resident_input`].
pub async fn create_test_resident(
    db: &DatabaseConnection,
    unit_number: i32,
) -> Result<entities::resident::Model> {
    resident::create_resident(db, resident_input(unit_number)).await
}

/// Registers residents in units `1..=count`.
pub async fn create_test_residents(
    db: &DatabaseConnection,
    count: i32,
) -> Result<Vec<entities::resident::Model>> {
    let mut residents = Vec::new();
    for unit in 1..=count {
        residents.push(create_test_resident(db, unit).await?);
    }
    Ok(residents)
}

/// Payment input settling `month` of `year`, received on the first of that month.
pub fn payment_input(resident_id: i64, year: i32, month: Month, amount: i64) -> PaymentInput {
    PaymentInput {
        resident_id,
        year,
        month,
        payment_date: date(year, month.number(), 1),
        amount,
        note: String::new(),
    }
}

/// Records a payment with the defaults of [`payment_input`].
pub async fn create_test_payment(
    db: &DatabaseConnection,
    resident_id: i64,
    year: i32,
    month: Month,
    amount: i64,
) -> Result<entities::dues_payment::Model> {
    dues::record_payment(db, payment_input(resident_id, year, month, amount)).await
}

/// Records a payment received on a specific date.
pub async fn record_test_payment_on(
    db: &DatabaseConnection,
    resident_id: i64,
    year: i32,
    month: Month,
    payment_date: NaiveDate,
    amount: i64,
) -> Result<entities::dues_payment::Model> {
    dues::record_payment(
        db,
        PaymentInput {
            payment_date,
            ..payment_input(resident_id, year, month, amount)
        },
    )
    .await
}

/// Opens a bank account with only the bank name filled in.
pub async fn create_test_account(
    db: &DatabaseConnection,
    bank_name: &str,
) -> Result<entities::bank_account::Model> {
    bank::create_account(
        db,
        AccountInput {
            bank_name: bank_name.to_string(),
            ..AccountInput::default()
        },
    )
    .await
}

/// Transaction input with the description `"Test transaction"`.
pub fn transaction_input(
    bank_account_id: i64,
    date: NaiveDate,
    amount: i64,
    movement_type: MovementType,
) -> TransactionInput {
    TransactionInput {
        bank_account_id,
        date,
        amount,
        movement_type,
        description: "Test transaction".to_string(),
    }
}

/// Cash expense input with the description `"Test expense"`.
pub fn cash_expense(payment_date: NaiveDate, amount: i64) -> ExpenseInput {
    ExpenseInput {
        payment_date,
        amount,
        description: "Test expense".to_string(),
        payment_method: PaymentMethod::Cash,
        bank_account_id: None,
    }
}

/// Bank-transfer expense input paid from `bank_account_id`.
pub fn bank_expense(payment_date: NaiveDate, amount: i64, bank_account_id: i64) -> ExpenseInput {
    ExpenseInput {
        payment_method: PaymentMethod::BankTransfer,
        bank_account_id: Some(bank_account_id),
        ..cash_expense(payment_date, amount)
    }
}
