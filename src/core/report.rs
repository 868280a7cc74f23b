//! Report generation business logic.
//!
//! The general report gathers one year of building finances: the dues summary
//! of every month, the year's expenses and the current balance of each bank
//! account. Everything here only reads; the functions return structured data
//! that the presentation layer formats.

use crate::{
    core::{
        bank::{self, AccountBalance},
        dues::{self, DuesSummary},
        ledger::{self, LedgerFilter},
    },
    entities::Month,
    errors::Result,
};
use sea_orm::DatabaseConnection;
use tracing::instrument;

/// One year of building finances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneralReport {
    /// Year covered
    pub year: i32,
    /// Dues summary for January through December
    pub months: Vec<DuesSummary>,
    /// Sum of assessed dues over the year
    pub expected_total: i64,
    /// Sum of dues payments recorded for the year
    pub collected_total: i64,
    /// Sum of expenses dated within the year
    pub expense_total: i64,
    /// Balance of every bank account, in account order
    pub bank_balances: Vec<AccountBalance>,
}

impl GeneralReport {
    /// Dues still to collect over the whole year.
    #[must_use]
    pub const fn outstanding_total(&self) -> i64 {
        self.expected_total.saturating_sub(self.collected_total)
    }
}

/// Builds the yearly report.
#[instrument(skip(db))]
pub async fn general_report(db: &DatabaseConnection, year: i32) -> Result<GeneralReport> {
    let mut months = Vec::with_capacity(Month::ALL.len());
    for month in Month::ALL {
        months.push(dues::dues_summary(db, year, month).await?);
    }

    let expenses = ledger::expenses(db, &LedgerFilter::all().year(year)).await?;
    let expense_total = dues::checked_total(expenses.iter().map(|row| row.expense.amount))?;

    Ok(GeneralReport {
        year,
        expected_total: dues::checked_total(months.iter().map(|m| m.assessed))?,
        collected_total: dues::checked_total(months.iter().map(|m| m.collected))?,
        months,
        expense_total,
        bank_balances: bank::account_balances(db).await?,
    })
}

/// Formats an amount the way the building's paperwork does: `1.250.000 TL`.
#[must_use]
pub fn format_currency(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    if amount < 0 {
        format!("-{grouped} TL")
    } else {
        format!("{grouped} TL")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{core::expense, entities::MovementType, test_utils::*};

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0), "0 TL");
        assert_eq!(format_currency(750), "750 TL");
        assert_eq!(format_currency(1000), "1.000 TL");
        assert_eq!(format_currency(12_500), "12.500 TL");
        assert_eq!(format_currency(1_250_000), "1.250.000 TL");
        assert_eq!(format_currency(-4_200), "-4.200 TL");
        assert_eq!(format_currency(i64::MIN), "-9.223.372.036.854.775.808 TL");
    }

    #[tokio::test]
    async fn test_general_report_empty_year() -> Result<()> {
        let db = setup_test_db().await?;
        let report = general_report(&db, 2024).await?;

        assert_eq!(report.months.len(), 12);
        assert!(report.months.iter().all(|m| m.assessed == 0 && m.collected == 0));
        assert_eq!(report.expected_total, 0);
        assert_eq!(report.expense_total, 0);
        assert!(report.bank_balances.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_general_report_totals() -> Result<()> {
        let db = setup_test_db().await?;
        let mut rates = [500; 12];
        rates[11] = 700;
        dues::set_dues_schedule(&db, 2024, rates).await?;
        let residents = create_test_residents(&db, 3).await?;

        create_test_payment(&db, residents[0].id, 2024, Month::January, 500).await?;
        create_test_payment(&db, residents[1].id, 2024, Month::December, 700).await?;
        create_test_payment(&db, residents[2].id, 2023, Month::December, 500).await?;

        let account = create_test_account(&db, "Vakifbank").await?;
        bank::record_transaction(
            &db,
            transaction_input(account.id, date(2024, 2, 1), 2000, MovementType::Income),
        )
        .await?;
        expense::record_expense(&db, cash_expense(date(2024, 3, 10), 150)).await?;
        expense::record_expense(&db, bank_expense(date(2024, 8, 1), 350, account.id)).await?;
        expense::record_expense(&db, cash_expense(date(2023, 12, 31), 999)).await?;

        let report = general_report(&db, 2024).await?;
        assert_eq!(report.year, 2024);
        assert_eq!(report.months[0].month, Month::January);
        assert_eq!(report.months[0].outstanding, 1000);
        assert_eq!(report.months[11].assessed, 2100);
        assert_eq!(report.expected_total, 500 * 3 * 11 + 700 * 3);
        assert_eq!(report.collected_total, 1200);
        assert_eq!(
            report.outstanding_total(),
            report.expected_total - report.collected_total
        );
        assert_eq!(report.expense_total, 500);
        assert_eq!(report.bank_balances.len(), 1);
        assert_eq!(report.bank_balances[0].balance, 2000);
        Ok(())
    }
}
