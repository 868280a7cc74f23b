//! Expense business logic - recording money spent on the building.
//!
//! A bank-transfer expense must name the account it was paid from and that
//! account must exist. Cash expenses never carry an account, even if one was
//! selected on the form.

use crate::{
    core::{bank, validation},
    entities::{Expense, PaymentMethod, expense},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{Set, prelude::*};
use tracing::info;

/// An expense as entered on the expense form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseInput {
    /// Date the expense was paid
    pub payment_date: NaiveDate,
    /// Amount in whole currency units
    pub amount: i64,
    /// What the money was spent on, required
    pub description: String,
    /// Bank transfer or cash
    pub payment_method: PaymentMethod,
    /// Source account; required for bank transfers, ignored for cash
    pub bank_account_id: Option<i64>,
}

/// Checks the input and returns the account id to store.
async fn validate(db: &DatabaseConnection, input: &ExpenseInput) -> Result<Option<i64>> {
    validation::require_positive(input.amount)?;
    validation::require_non_empty("description", &input.description)?;

    match input.payment_method {
        PaymentMethod::Cash => Ok(None),
        PaymentMethod::BankTransfer => {
            let account_id = input.bank_account_id.ok_or_else(|| {
                Error::validation("bank account", "is required for bank transfers")
            })?;
            if bank::get_account(db, account_id).await?.is_none() {
                return Err(Error::NotFound {
                    entity: "Bank account",
                    id: account_id,
                });
            }
            Ok(Some(account_id))
        }
    }
}

/// Records a new expense.
pub async fn record_expense(
    db: &DatabaseConnection,
    input: ExpenseInput,
) -> Result<expense::Model> {
    let bank_account_id = validate(db, &input).await?;

    let created = expense::ActiveModel {
        payment_date: Set(input.payment_date),
        amount: Set(input.amount),
        description: Set(input.description.trim().to_string()),
        payment_method: Set(input.payment_method),
        bank_account_id: Set(bank_account_id),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(
        "Expense {} recorded: {} on {} ({:?})",
        created.id, created.amount, created.payment_date, created.payment_method
    );
    Ok(created)
}

/// Replaces every field of an existing expense.
pub async fn update_expense(
    db: &DatabaseConnection,
    expense_id: i64,
    input: ExpenseInput,
) -> Result<expense::Model> {
    let bank_account_id = validate(db, &input).await?;

    let mut model: expense::ActiveModel = get_expense(db, expense_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "Expense",
            id: expense_id,
        })?
        .into();

    model.payment_date = Set(input.payment_date);
    model.amount = Set(input.amount);
    model.description = Set(input.description.trim().to_string());
    model.payment_method = Set(input.payment_method);
    model.bank_account_id = Set(bank_account_id);

    model.update(db).await.map_err(Into::into)
}

/// Deletes an expense.
pub async fn delete_expense(db: &DatabaseConnection, expense_id: i64) -> Result<()> {
    let result = Expense::delete_by_id(expense_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "Expense",
            id: expense_id,
        });
    }
    info!("Expense {} deleted", expense_id);
    Ok(())
}

/// Finds an expense by primary key.
pub async fn get_expense(
    db: &DatabaseConnection,
    expense_id: i64,
) -> Result<Option<expense::Model>> {
    Expense::find_by_id(expense_id)
        .one(db)
        .await
        .map_err(Into::into)
}
