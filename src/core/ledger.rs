//! Ledger queries - filtered, newest-first views for the reports.
//!
//! Every query takes the same [`LedgerFilter`]. Filters combine with AND and an
//! unset filter imposes nothing. Date bounds are inclusive on both ends. A
//! filter that matches nothing yields an empty list, never an error.
//!
//! Filters that do not apply to a ledger are ignored by it: expenses have no
//! resident, bank movements have no resident either.

use crate::{
    entities::{
        BankAccount, BankTransaction, DuesPayment, Expense, bank_transaction, dues_payment,
        expense,
    },
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{Condition, QueryOrder, prelude::*};

/// Optional constraints shared by all ledger queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerFilter {
    /// Only payments made by this resident
    pub resident_id: Option<i64>,
    /// Dues payments: the year paid for.
    /// Expenses and bank movements: the calendar year of their date.
    pub year: Option<i32>,
    /// Earliest date, inclusive
    pub start_date: Option<NaiveDate>,
    /// Latest date, inclusive
    pub end_date: Option<NaiveDate>,
    /// Only expenses paid from, or movements on, this account
    pub bank_account_id: Option<i64>,
}

impl LedgerFilter {
    /// No constraints at all.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Restricts to one resident.
    #[must_use]
    pub const fn resident(mut self, resident_id: i64) -> Self {
        self.resident_id = Some(resident_id);
        self
    }

    /// Restricts to one year.
    #[must_use]
    pub const fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// Restricts to dates within `start..=end`.
    #[must_use]
    pub const fn between(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    /// Restricts to one bank account.
    #[must_use]
    pub const fn bank_account(mut self, bank_account_id: i64) -> Self {
        self.bank_account_id = Some(bank_account_id);
        self
    }
}

/// An expense together with the name of the bank it was paid from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseRow {
    /// The expense itself
    pub expense: expense::Model,
    /// `None` for cash expenses
    pub bank_name: Option<String>,
}

/// First and last day of `year`.
fn year_bounds(year: i32) -> Result<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, 1, 1);
    let last = NaiveDate::from_ymd_opt(year, 12, 31);
    first
        .zip(last)
        .ok_or_else(|| Error::validation("year", format!("{year} is out of range")))
}

/// Date-range condition on `column`, honouring the year and explicit bounds.
fn date_condition<C: ColumnTrait>(filter: &LedgerFilter, column: C) -> Result<Condition> {
    let year_range = filter.year.map(year_bounds).transpose()?;
    Ok(Condition::all()
        .add_option(year_range.map(|(first, _)| column.gte(first)))
        .add_option(year_range.map(|(_, last)| column.lte(last)))
        .add_option(filter.start_date.map(|start| column.gte(start)))
        .add_option(filter.end_date.map(|end| column.lte(end))))
}

/// Dues payments, newest payment date first.
pub async fn dues_payments(
    db: &DatabaseConnection,
    filter: &LedgerFilter,
) -> Result<Vec<dues_payment::Model>> {
    let condition = Condition::all()
        .add_option(
            filter
                .resident_id
                .map(|id| dues_payment::Column::ResidentId.eq(id)),
        )
        .add_option(filter.year.map(|year| dues_payment::Column::Year.eq(year)))
        .add_option(
            filter
                .start_date
                .map(|start| dues_payment::Column::PaymentDate.gte(start)),
        )
        .add_option(
            filter
                .end_date
                .map(|end| dues_payment::Column::PaymentDate.lte(end)),
        );

    DuesPayment::find()
        .filter(condition)
        .order_by_desc(dues_payment::Column::PaymentDate)
        .order_by_desc(dues_payment::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Expenses with their bank name, newest first.
///
/// The bank account is LEFT JOINed, so cash expenses appear with no bank.
pub async fn expenses(db: &DatabaseConnection, filter: &LedgerFilter) -> Result<Vec<ExpenseRow>> {
    let condition = date_condition(filter, expense::Column::PaymentDate)?.add_option(
        filter
            .bank_account_id
            .map(|id| expense::Column::BankAccountId.eq(id)),
    );

    let rows = Expense::find()
        .find_also_related(BankAccount)
        .filter(condition)
        .order_by_desc(expense::Column::PaymentDate)
        .order_by_desc(expense::Column::Id)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(expense, account)| ExpenseRow {
            expense,
            bank_name: account.map(|a| a.bank_name),
        })
        .collect())
}

/// Bank movements, newest first.
pub async fn bank_transactions(
    db: &DatabaseConnection,
    filter: &LedgerFilter,
) -> Result<Vec<bank_transaction::Model>> {
    let condition = date_condition(filter, bank_transaction::Column::Date)?.add_option(
        filter
            .bank_account_id
            .map(|id| bank_transaction::Column::BankAccountId.eq(id)),
    );

    BankTransaction::find()
        .filter(condition)
        .order_by_desc(bank_transaction::Column::Date)
        .order_by_desc(bank_transaction::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}
