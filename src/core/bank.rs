//! Bank business logic - the building's accounts and the movements on them.
//!
//! Movement amounts are stored positive and the movement type gives the
//! direction, so an account balance is income minus expense.

use crate::{
    core::validation,
    entities::{BankAccount, BankTransaction, MovementType, bank_account, bank_transaction},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, QuerySelect, Set, prelude::*, sea_query::Expr};
use tracing::info;

/// Fields entered on the bank account form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountInput {
    /// Name of the bank, required
    pub bank_name: String,
    /// Branch name
    pub branch: String,
    /// Account number
    pub account_number: String,
    /// IBAN; spaces are removed and letters uppercased
    pub iban: String,
    /// Free-text description
    pub description: String,
}

/// A movement as entered on the bank transaction form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionInput {
    /// Account the movement belongs to
    pub bank_account_id: i64,
    /// Value date
    pub date: NaiveDate,
    /// Amount in whole currency units, always positive
    pub amount: i64,
    /// Income or expense
    pub movement_type: MovementType,
    /// Free-text description
    pub description: String,
}

/// Totals of one account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountBalance {
    /// Account id
    pub account_id: i64,
    /// Bank name, for display
    pub bank_name: String,
    /// Sum of income movements
    pub income: i64,
    /// Sum of expense movements
    pub expense: i64,
    /// `income − expense`
    pub balance: i64,
}

fn normalize_iban(iban: &str) -> String {
    iban.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

/// Opens a new account record.
pub async fn create_account(
    db: &DatabaseConnection,
    input: AccountInput,
) -> Result<bank_account::Model> {
    let bank_name = validation::require_non_empty("bank name", &input.bank_name)?;

    let account = bank_account::ActiveModel {
        bank_name: Set(bank_name),
        branch: Set(input.branch.trim().to_string()),
        account_number: Set(input.account_number.trim().to_string()),
        iban: Set(normalize_iban(&input.iban)),
        description: Set(input.description.trim().to_string()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!("Bank account {} created at {}", account.id, account.bank_name);
    Ok(account)
}

/// Replaces every field of an existing account.
pub async fn update_account(
    db: &DatabaseConnection,
    account_id: i64,
    input: AccountInput,
) -> Result<bank_account::Model> {
    let bank_name = validation::require_non_empty("bank name", &input.bank_name)?;

    let mut account: bank_account::ActiveModel = get_account(db, account_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "Bank account",
            id: account_id,
        })?
        .into();

    account.bank_name = Set(bank_name);
    account.branch = Set(input.branch.trim().to_string());
    account.account_number = Set(input.account_number.trim().to_string());
    account.iban = Set(normalize_iban(&input.iban));
    account.description = Set(input.description.trim().to_string());

    account.update(db).await.map_err(Into::into)
}

/// Deletes an account. Fails while transactions or expenses reference it.
pub async fn delete_account(db: &DatabaseConnection, account_id: i64) -> Result<()> {
    let result = BankAccount::delete_by_id(account_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "Bank account",
            id: account_id,
        });
    }
    info!("Bank account {} deleted", account_id);
    Ok(())
}

/// Finds an account by primary key.
pub async fn get_account(
    db: &DatabaseConnection,
    account_id: i64,
) -> Result<Option<bank_account::Model>> {
    BankAccount::find_by_id(account_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// All accounts, in the order they were created.
pub async fn list_accounts(db: &DatabaseConnection) -> Result<Vec<bank_account::Model>> {
    BankAccount::find()
        .order_by_asc(bank_account::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

async fn validate_transaction(db: &DatabaseConnection, input: &TransactionInput) -> Result<()> {
    validation::require_positive(input.amount)?;
    if get_account(db, input.bank_account_id).await?.is_none() {
        return Err(Error::NotFound {
            entity: "Bank account",
            id: input.bank_account_id,
        });
    }
    Ok(())
}

/// Records a movement on an account.
pub async fn record_transaction(
    db: &DatabaseConnection,
    input: TransactionInput,
) -> Result<bank_transaction::Model> {
    validate_transaction(db, &input).await?;

    let transaction = bank_transaction::ActiveModel {
        bank_account_id: Set(input.bank_account_id),
        date: Set(input.date),
        amount: Set(input.amount),
        movement_type: Set(input.movement_type),
        description: Set(input.description.trim().to_string()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(
        "Bank transaction {} recorded on account {}: {:?} {}",
        transaction.id, transaction.bank_account_id, transaction.movement_type, transaction.amount
    );
    Ok(transaction)
}

/// Replaces every field of an existing movement.
pub async fn update_transaction(
    db: &DatabaseConnection,
    transaction_id: i64,
    input: TransactionInput,
) -> Result<bank_transaction::Model> {
    validate_transaction(db, &input).await?;

    let mut transaction: bank_transaction::ActiveModel = get_transaction(db, transaction_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "Bank transaction",
            id: transaction_id,
        })?
        .into();

    transaction.bank_account_id = Set(input.bank_account_id);
    transaction.date = Set(input.date);
    transaction.amount = Set(input.amount);
    transaction.movement_type = Set(input.movement_type);
    transaction.description = Set(input.description.trim().to_string());

    transaction.update(db).await.map_err(Into::into)
}

/// Deletes a movement.
pub async fn delete_transaction(db: &DatabaseConnection, transaction_id: i64) -> Result<()> {
    let result = BankTransaction::delete_by_id(transaction_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "Bank transaction",
            id: transaction_id,
        });
    }
    info!("Bank transaction {} deleted", transaction_id);
    Ok(())
}

/// Finds a movement by primary key.
pub async fn get_transaction(
    db: &DatabaseConnection,
    transaction_id: i64,
) -> Result<Option<bank_transaction::Model>> {
    BankTransaction::find_by_id(transaction_id)
        .one(db)
        .await
        .map_err(Into::into)
}

async fn total_of(db: &DatabaseConnection, account_id: i64, movement: MovementType) -> Result<i64> {
    let total = BankTransaction::find()
        .select_only()
        .column_as(Expr::col(bank_transaction::Column::Amount).sum(), "total")
        .filter(bank_transaction::Column::BankAccountId.eq(account_id))
        .filter(bank_transaction::Column::MovementType.eq(movement))
        .into_tuple::<Option<i64>>()
        .one(db)
        .await?;
    Ok(total.flatten().unwrap_or(0))
}

/// Income, expense and balance of one account.
pub async fn account_balance(db: &DatabaseConnection, account_id: i64) -> Result<AccountBalance> {
    let account = get_account(db, account_id).await?.ok_or(Error::NotFound {
        entity: "Bank account",
        id: account_id,
    })?;

    let income = total_of(db, account_id, MovementType::Income).await?;
    let expense = total_of(db, account_id, MovementType::Expense).await?;

    Ok(AccountBalance {
        account_id,
        bank_name: account.bank_name,
        income,
        expense,
        balance: income
            .checked_sub(expense)
            .ok_or(Error::InvalidAmount { amount: expense })?,
    })
}

/// Balances of every account, in account order.
pub async fn account_balances(db: &DatabaseConnection) -> Result<Vec<AccountBalance>> {
    let mut balances = Vec::new();
    for account in list_accounts(db).await? {
        balances.push(account_balance(db, account.id).await?);
    }
    Ok(balances)
}
