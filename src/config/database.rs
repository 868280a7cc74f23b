//! Database configuration module for `AidatBuddy`.
//!
//! This module handles the `SQLite` connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, marked `IF NOT EXISTS` so that start-up can
//! run them on every launch, and decorated with the CHECK constraints the entity
//! macros cannot express: the single building row and the string enumerations.

use crate::core::auth;
use crate::entities::{
    BankAccount, BankTransaction, Building, DuesPayment, DuesSchedule, Expense, Resident, User,
    bank_transaction, building, dues_payment, expense, user,
};
use crate::errors::Result;
use sea_orm::sea_query::{Expr, TableCreateStatement};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use tracing::{debug, info, instrument};

/// Location used when neither `DATABASE_URL` nor `config.toml` names one.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/aidat_buddy.sqlite?mode=rwc";

/// Gets the database URL from environment variable or returns default `SQLite` path.
///
/// This function looks for `DATABASE_URL` in the environment, then takes the
/// `configured` URL, and falls back to a default local `SQLite` file.
#[must_use]
pub fn get_database_url(configured: Option<&str>) -> String {
    std::env::var("DATABASE_URL")
        .ok()
        .or_else(|| configured.map(str::to_string))
        .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string())
}

/// Opens the `SQLite` database at `database_url`.
///
/// The connection handle checks a connection out for every statement and hands
/// it back when the statement finishes, whether it succeeded or not.
#[instrument]
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    debug!("Opening database connection");
    Database::connect(database_url).await.map_err(Into::into)
}

fn table_for<E: EntityTrait>(schema: &Schema, entity: E) -> TableCreateStatement {
    let mut table = schema.create_table_from_entity(entity);
    table.if_not_exists();
    table
}

/// Creates all tables if they do not exist yet.
///
/// Safe to call on every start; existing tables and their rows are untouched.
/// There is no migration step, a changed entity needs a fresh database.
#[instrument(skip(db))]
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut building_table = table_for(&schema, Building);
    building_table.check(Expr::col(building::Column::Id).eq(building::BUILDING_ID));

    let mut payment_table = table_for(&schema, DuesPayment);
    payment_table.check(
        Expr::col(dues_payment::Column::Month).is_in([
            "january",
            "february",
            "march",
            "april",
            "may",
            "june",
            "july",
            "august",
            "september",
            "october",
            "november",
            "december",
        ]),
    );

    let mut expense_table = table_for(&schema, Expense);
    expense_table.check(Expr::col(expense::Column::PaymentMethod).is_in(["bank_transfer", "cash"]));

    let mut bank_transaction_table = table_for(&schema, BankTransaction);
    bank_transaction_table
        .check(Expr::col(bank_transaction::Column::MovementType).is_in(["income", "expense"]));

    let mut user_table = table_for(&schema, User);
    user_table.check(Expr::col(user::Column::Role).is_in(["administrator", "resident"]));

    // Referenced tables first
    let statements = [
        building_table,
        table_for(&schema, Resident),
        table_for(&schema, DuesSchedule),
        payment_table,
        table_for(&schema, BankAccount),
        expense_table,
        bank_transaction_table,
        user_table,
    ];

    for statement in &statements {
        db.execute(builder.build(statement)).await?;
    }

    info!("Database tables ensured.");
    Ok(())
}

/// Prepares a freshly opened database for use: creates the tables and makes
/// sure an administrator account exists.
pub async fn init_database(db: &DatabaseConnection) -> Result<()> {
    create_tables(db).await?;
    auth::ensure_default_admin(db).await?;
    Ok(())
}
