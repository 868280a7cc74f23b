//! Dues business logic - annual schedules, payments and the collection summary.
//!
//! Each year has one schedule holding the per-unit rate for every month. Every
//! registered resident owes that flat rate; there are no unit-specific
//! assessments. Payments are recorded against a resident, year and month, and
//! any number of payments may settle the same month.
//!
//! The month selects a schedule column through [`Month::schedule_column`], so the
//! rate lookup never builds SQL from a month name.

use crate::{
    core::{resident, validation},
    entities::{DuesPayment, DuesSchedule, Month, dues_payment, dues_schedule},
    errors::{Error, Result},
};
use chrono::{Datelike, NaiveDate};
use sea_orm::{
    QuerySelect, Set,
    prelude::*,
    sea_query::{Expr, OnConflict},
};
use tracing::{debug, info, instrument};

/// A payment as entered on the payment form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentInput {
    /// Resident who paid
    pub resident_id: i64,
    /// Year being paid for
    pub year: i32,
    /// Month being paid for
    pub month: Month,
    /// Date the money was received
    pub payment_date: NaiveDate,
    /// Amount in whole currency units
    pub amount: i64,
    /// Free-text note, may be empty
    pub note: String,
}

/// How much the building is owed for one month and how much has come in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuesSummary {
    /// Year assessed
    pub year: i32,
    /// Month assessed
    pub month: Month,
    /// Per-unit rate for the month, 0 when no schedule exists for the year
    pub monthly_rate: i64,
    /// Number of registered residents
    pub resident_count: u64,
    /// `monthly_rate × resident_count`
    pub assessed: i64,
    /// Sum of all payments recorded for the month
    pub collected: i64,
    /// `assessed − collected`; negative when more came in than was assessed
    pub outstanding: i64,
}

/// One month on a resident's statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatementLine {
    /// Month the line refers to
    pub month: Month,
    /// Rate owed for the month
    pub due: i64,
    /// Total the resident paid toward the month
    pub paid: i64,
    /// `due − paid`
    pub balance: i64,
}

/// A resident's dues position over one year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResidentStatement {
    /// Resident the statement belongs to
    pub resident_id: i64,
    /// Year covered
    pub year: i32,
    /// Twelve lines in calendar order
    pub lines: Vec<StatementLine>,
    /// Sum of all dues for the year
    pub total_due: i64,
    /// Sum of all payments for the year
    pub total_paid: i64,
    /// `total_due − total_paid`
    pub balance: i64,
}

/// Amount still to collect for a month, `None` if it does not fit in an `i64`.
///
/// Not clamped: duplicate or advance payments drive it below zero.
#[must_use]
pub const fn outstanding(monthly_rate: i64, resident_count: i64, collected: i64) -> Option<i64> {
    match monthly_rate.checked_mul(resident_count) {
        Some(assessed) => assessed.checked_sub(collected),
        None => None,
    }
}

fn validate_rates(rates: &[i64; 12]) -> Result<()> {
    match rates
        .iter()
        .find(|rate| **rate < 0 || **rate > validation::MAX_AMOUNT)
    {
        Some(&amount) => Err(Error::InvalidAmount { amount }),
        None => Ok(()),
    }
}

/// Sum of `amounts`, failing with [`Error::InvalidAmount`] on the first addend
/// that overflows.
pub(crate) fn checked_total(amounts: impl IntoIterator<Item = i64>) -> Result<i64> {
    amounts.into_iter().try_fold(0_i64, |total, amount| {
        total
            .checked_add(amount)
            .ok_or(Error::InvalidAmount { amount })
    })
}

fn validate_year(year: i32) -> Result<i32> {
    if year < 1 {
        return Err(Error::validation("year", "must be a positive year"));
    }
    Ok(year)
}

/// Creates or replaces the schedule for `year`.
///
/// `rates` are the per-unit amounts for January through December. The cached
/// total is recomputed from them.
#[instrument(skip(db))]
pub async fn set_dues_schedule(
    db: &DatabaseConnection,
    year: i32,
    rates: [i64; 12],
) -> Result<dues_schedule::Model> {
    validate_year(year)?;
    validate_rates(&rates)?;
    let total = checked_total(rates)?;

    let row = dues_schedule::ActiveModel {
        year: Set(year),
        january: Set(rates[Month::January.index()]),
        february: Set(rates[Month::February.index()]),
        march: Set(rates[Month::March.index()]),
        april: Set(rates[Month::April.index()]),
        may: Set(rates[Month::May.index()]),
        june: Set(rates[Month::June.index()]),
        july: Set(rates[Month::July.index()]),
        august: Set(rates[Month::August.index()]),
        september: Set(rates[Month::September.index()]),
        october: Set(rates[Month::October.index()]),
        november: Set(rates[Month::November.index()]),
        december: Set(rates[Month::December.index()]),
        total: Set(total),
        ..Default::default()
    };

    let mut update_columns: Vec<dues_schedule::Column> =
        Month::ALL.iter().map(|m| m.schedule_column()).collect();
    update_columns.push(dues_schedule::Column::Total);

    DuesSchedule::insert(row)
        .on_conflict(
            OnConflict::column(dues_schedule::Column::Year)
                .update_columns(update_columns)
                .to_owned(),
        )
        .exec(db)
        .await?;

    info!("Dues schedule for {} saved (total {})", year, total);
    get_dues_schedule(db, year)
        .await?
        .ok_or(Error::NotFound {
            entity: "Dues schedule",
            id: i64::from(year),
        })
}

/// The schedule for `year`, if one was entered.
pub async fn get_dues_schedule(
    db: &DatabaseConnection,
    year: i32,
) -> Result<Option<dues_schedule::Model>> {
    DuesSchedule::find()
        .filter(dues_schedule::Column::Year.eq(year))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Per-unit rate for one month, 0 when the year has no schedule.
pub async fn monthly_rate(db: &DatabaseConnection, year: i32, month: Month) -> Result<i64> {
    let rate = DuesSchedule::find()
        .select_only()
        .column(month.schedule_column())
        .filter(dues_schedule::Column::Year.eq(year))
        .into_tuple::<i64>()
        .one(db)
        .await?;
    Ok(rate.unwrap_or(0))
}

/// Sum of all payments recorded for a year and month, 0 when there are none.
pub async fn collected_for(db: &DatabaseConnection, year: i32, month: Month) -> Result<i64> {
    let total = DuesPayment::find()
        .select_only()
        .column_as(Expr::col(dues_payment::Column::Amount).sum(), "collected")
        .filter(dues_payment::Column::Year.eq(year))
        .filter(dues_payment::Column::Month.eq(month))
        .into_tuple::<Option<i64>>()
        .one(db)
        .await?;
    Ok(total.flatten().unwrap_or(0))
}

/// Assessment and collection for one month.
///
/// Reads only; nothing is written.
#[instrument(skip(db))]
pub async fn dues_summary(db: &DatabaseConnection, year: i32, month: Month) -> Result<DuesSummary> {
    let monthly_rate = monthly_rate(db, year, month).await?;
    let resident_count = resident::count_residents(db).await?;
    let collected = collected_for(db, year, month).await?;

    let units = i64::try_from(resident_count)?;
    let overflow = Error::InvalidAmount {
        amount: monthly_rate,
    };
    let summary = DuesSummary {
        year,
        month,
        monthly_rate,
        resident_count,
        assessed: monthly_rate.checked_mul(units).ok_or(overflow)?,
        collected,
        outstanding: outstanding(monthly_rate, units, collected).ok_or(Error::InvalidAmount {
            amount: collected,
        })?,
    };
    debug!(?summary, "Computed dues summary");
    Ok(summary)
}

/// [`dues_summary`] for the month containing `today`.
pub async fn dues_summary_for_date(
    db: &DatabaseConnection,
    today: NaiveDate,
) -> Result<DuesSummary> {
    let month = Month::from_number(today.month()).ok_or_else(|| Error::Config {
        message: format!("Date {today} has no valid month"),
    })?;
    dues_summary(db, today.year(), month).await
}

/// [`dues_summary`] for the current calendar month.
pub async fn current_dues_summary(db: &DatabaseConnection) -> Result<DuesSummary> {
    dues_summary_for_date(db, chrono::Local::now().date_naive()).await
}

async fn validate_payment(db: &DatabaseConnection, input: &PaymentInput) -> Result<()> {
    validate_year(input.year)?;
    validation::require_positive(input.amount)?;
    if resident::get_resident_by_id(db, input.resident_id)
        .await?
        .is_none()
    {
        return Err(Error::NotFound {
            entity: "Resident",
            id: input.resident_id,
        });
    }
    Ok(())
}

/// Records a payment. Several payments for the same month are all kept.
pub async fn record_payment(
    db: &DatabaseConnection,
    input: PaymentInput,
) -> Result<dues_payment::Model> {
    validate_payment(db, &input).await?;

    let payment = dues_payment::ActiveModel {
        resident_id: Set(input.resident_id),
        year: Set(input.year),
        month: Set(input.month),
        payment_date: Set(input.payment_date),
        amount: Set(input.amount),
        note: Set(input.note.trim().to_string()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(
        "Payment {} recorded: resident {} paid {} for {:?} {}",
        payment.id, payment.resident_id, payment.amount, payment.month, payment.year
    );
    Ok(payment)
}

/// Replaces every field of an existing payment.
pub async fn update_payment(
    db: &DatabaseConnection,
    payment_id: i64,
    input: PaymentInput,
) -> Result<dues_payment::Model> {
    validate_payment(db, &input).await?;

    let mut payment: dues_payment::ActiveModel = get_payment(db, payment_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "Payment",
            id: payment_id,
        })?
        .into();

    payment.resident_id = Set(input.resident_id);
    payment.year = Set(input.year);
    payment.month = Set(input.month);
    payment.payment_date = Set(input.payment_date);
    payment.amount = Set(input.amount);
    payment.note = Set(input.note.trim().to_string());

    payment.update(db).await.map_err(Into::into)
}

/// Deletes a payment.
pub async fn delete_payment(db: &DatabaseConnection, payment_id: i64) -> Result<()> {
    let result = DuesPayment::delete_by_id(payment_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "Payment",
            id: payment_id,
        });
    }
    info!("Payment {} deleted", payment_id);
    Ok(())
}

/// Finds a payment by primary key.
pub async fn get_payment(
    db: &DatabaseConnection,
    payment_id: i64,
) -> Result<Option<dues_payment::Model>> {
    DuesPayment::find_by_id(payment_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Month-by-month dues and payments of one resident for one year.
pub async fn resident_statement(
    db: &DatabaseConnection,
    resident_id: i64,
    year: i32,
) -> Result<ResidentStatement> {
    if resident::get_resident_by_id(db, resident_id).await?.is_none() {
        return Err(Error::NotFound {
            entity: "Resident",
            id: resident_id,
        });
    }

    let rates = get_dues_schedule(db, year)
        .await?
        .map_or([0; 12], |schedule| schedule.rates());

    let payments = DuesPayment::find()
        .filter(dues_payment::Column::ResidentId.eq(resident_id))
        .filter(dues_payment::Column::Year.eq(year))
        .all(db)
        .await?;

    let mut paid = [0_i64; 12];
    for payment in &payments {
        let slot = &mut paid[payment.month.index()];
        *slot = checked_total([*slot, payment.amount])?;
    }

    let lines = Month::ALL
        .iter()
        .map(|&month| {
            let due = rates[month.index()];
            let paid = paid[month.index()];
            let balance = due
                .checked_sub(paid)
                .ok_or(Error::InvalidAmount { amount: paid })?;
            Ok(StatementLine {
                month,
                due,
                paid,
                balance,
            })
        })
        .collect::<Result<Vec<StatementLine>>>()?;

    let total_due = checked_total(lines.iter().map(|l| l.due))?;
    let total_paid = checked_total(lines.iter().map(|l| l.paid))?;

    Ok(ResidentStatement {
        resident_id,
        year,
        lines,
        total_due,
        total_paid,
        balance: total_due
            .checked_sub(total_paid)
            .ok_or(Error::InvalidAmount { amount: total_paid })?,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    const FLAT_RATES: [i64; 12] = [500; 12];

    #[test]
    fn test_outstanding_formula() {
        assert_eq!(outstanding(500, 10, 3000), Some(2000));
        assert_eq!(outstanding(500, 10, 5000), Some(0));
        assert_eq!(outstanding(0, 10, 750), Some(-750));
        // Over-collection is reported, not clamped
        assert_eq!(outstanding(500, 2, 1500), Some(-500));
        for rate in [0, 1, 250, 1200] {
            for count in [0, 1, 8, 40] {
                for collected in [0, 100, 10_000, 60_000] {
                    assert_eq!(
                        outstanding(rate, count, collected),
                        Some(rate * count - collected)
                    );
                }
            }
        }
    }

    #[test]
    fn test_outstanding_overflow_is_none() {
        assert_eq!(outstanding(i64::MAX / 2, 3, 0), None);
        assert_eq!(outstanding(0, 1, i64::MIN), None);
    }

    #[test]
    fn test_checked_total() {
        assert_eq!(checked_total([500; 12]).unwrap(), 6000);
        assert_eq!(checked_total([]).unwrap(), 0);
        assert!(matches!(
            checked_total([i64::MAX, 1]).unwrap_err(),
            Error::InvalidAmount { amount: 1 }
        ));
    }

    #[tokio::test]
    async fn test_set_dues_schedule_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let mut rates = FLAT_RATES;
        rates[4] = -1;
        let result = set_dues_schedule(&db, 2024, rates).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidAmount { amount: -1 }
        ));

        // Huge rates are rejected before the total is computed
        let result = set_dues_schedule(&db, 2024, [i64::MAX / 2; 12]).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidAmount { amount } if amount == i64::MAX / 2
        ));

        let mut rates = FLAT_RATES;
        rates[0] = validation::MAX_AMOUNT + 1;
        assert!(matches!(
            set_dues_schedule(&db, 2024, rates).await.unwrap_err(),
            Error::InvalidAmount { .. }
        ));

        let result = set_dues_schedule(&db, 0, FLAT_RATES).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Validation { field: "year", .. }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_set_dues_schedule_upserts_by_year() -> Result<()> {
        let db = setup_test_db().await?;

        let first = set_dues_schedule(&db, 2024, FLAT_RATES).await?;
        assert_eq!(first.total, 6000);
        assert_eq!(first.rate_for(Month::July), 500);

        let mut raised = FLAT_RATES;
        raised[Month::July.index()..].fill(650);
        let second = set_dues_schedule(&db, 2024, raised).await?;
        assert_eq!(second.id, first.id);
        assert_eq!(second.rate_for(Month::June), 500);
        assert_eq!(second.rate_for(Month::July), 650);
        assert_eq!(second.total, 6 * 500 + 6 * 650);

        assert_eq!(DuesSchedule::find().all(&db).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_monthly_rate_defaults_to_zero() -> Result<()> {
        let db = setup_test_db().await?;
        assert_eq!(monthly_rate(&db, 2030, Month::May).await?, 0);

        let mut rates = [0; 12];
        rates[Month::May.index()] = 720;
        set_dues_schedule(&db, 2030, rates).await?;
        assert_eq!(monthly_rate(&db, 2030, Month::May).await?, 720);
        assert_eq!(monthly_rate(&db, 2030, Month::June).await?, 0);
        assert_eq!(monthly_rate(&db, 2031, Month::May).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_summary_without_schedule_is_negative_collected() -> Result<()> {
        let db = setup_test_db().await?;
        let resident = create_test_resident(&db, 1).await?;
        create_test_resident(&db, 2).await?;
        create_test_payment(&db, resident.id, 2019, Month::April, 300).await?;

        let summary = dues_summary(&db, 2019, Month::April).await?;
        assert_eq!(summary.monthly_rate, 0);
        assert_eq!(summary.resident_count, 2);
        assert_eq!(summary.assessed, 0);
        assert_eq!(summary.collected, 300);
        assert_eq!(summary.outstanding, -300);

        let empty = dues_summary(&db, 2019, Month::May).await?;
        assert_eq!(empty.collected, 0);
        assert_eq!(empty.outstanding, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_summary_counts_only_matching_month() -> Result<()> {
        let db = setup_test_db().await?;
        set_dues_schedule(&db, 2024, FLAT_RATES).await?;
        let residents = create_test_residents(&db, 4).await?;

        create_test_payment(&db, residents[0].id, 2024, Month::March, 500).await?;
        create_test_payment(&db, residents[1].id, 2024, Month::March, 200).await?;
        // Partial second payment for the same month is kept
        create_test_payment(&db, residents[1].id, 2024, Month::March, 300).await?;
        // Other month and other year do not count
        create_test_payment(&db, residents[2].id, 2024, Month::April, 500).await?;
        create_test_payment(&db, residents[3].id, 2023, Month::March, 500).await?;

        let summary = dues_summary(&db, 2024, Month::March).await?;
        assert_eq!(summary.monthly_rate, 500);
        assert_eq!(summary.resident_count, 4);
        assert_eq!(summary.assessed, 2000);
        assert_eq!(summary.collected, 1000);
        assert_eq!(summary.outstanding, 1000);
        Ok(())
    }

    #[tokio::test]
    async fn test_summary_over_collection_not_clamped() -> Result<()> {
        let db = setup_test_db().await?;
        set_dues_schedule(&db, 2024, FLAT_RATES).await?;
        let resident = create_test_resident(&db, 1).await?;

        create_test_payment(&db, resident.id, 2024, Month::January, 500).await?;
        create_test_payment(&db, resident.id, 2024, Month::January, 500).await?;

        let summary = dues_summary(&db, 2024, Month::January).await?;
        assert_eq!(summary.outstanding, -500);
        Ok(())
    }

    #[tokio::test]
    async fn test_summary_at_largest_rate() -> Result<()> {
        let db = setup_test_db().await?;
        let schedule = set_dues_schedule(&db, 2024, [validation::MAX_AMOUNT; 12]).await?;
        assert_eq!(schedule.total, 12 * validation::MAX_AMOUNT);
        let residents = create_test_residents(&db, 3).await?;
        create_test_payment(&db, residents[0].id, 2024, Month::January, validation::MAX_AMOUNT)
            .await?;

        let summary = dues_summary(&db, 2024, Month::January).await?;
        assert_eq!(summary.assessed, 3 * validation::MAX_AMOUNT);
        assert_eq!(summary.outstanding, 2 * validation::MAX_AMOUNT);

        let statement = resident_statement(&db, residents[0].id, 2024).await?;
        assert_eq!(statement.total_due, 12 * validation::MAX_AMOUNT);
        assert_eq!(statement.balance, 11 * validation::MAX_AMOUNT);
        Ok(())
    }

    #[tokio::test]
    async fn test_summary_for_date_picks_month() -> Result<()> {
        let db = setup_test_db().await?;
        let mut rates = [0; 12];
        rates[Month::October.index()] = 900;
        set_dues_schedule(&db, 2026, rates).await?;
        create_test_resident(&db, 1).await?;

        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let summary = dues_summary_for_date(&db, date).await?;
        assert_eq!(summary.year, 2026);
        assert_eq!(summary.month, Month::October);
        assert_eq!(summary.outstanding, 900);
        Ok(())
    }

    #[tokio::test]
    async fn test_record_payment_validation() -> Result<()> {
        let db = setup_test_db().await?;
        let resident = create_test_resident(&db, 1).await?;

        let result = record_payment(&db, payment_input(resident.id, 2024, Month::May, 0)).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidAmount { amount: 0 }
        ));

        let result = record_payment(
            &db,
            payment_input(resident.id, 2024, Month::May, i64::MAX / 2),
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidAmount { .. }
        ));

        let result = record_payment(&db, payment_input(999, 2024, Month::May, 100)).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::NotFound {
                entity: "Resident",
                id: 999
            }
        ));
        assert!(DuesPayment::find().all(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_update_and_delete_payment() -> Result<()> {
        let db = setup_test_db().await?;
        let resident = create_test_resident(&db, 1).await?;
        let payment = create_test_payment(&db, resident.id, 2024, Month::May, 100).await?;

        let updated = update_payment(
            &db,
            payment.id,
            PaymentInput {
                note: "corrected".to_string(),
                ..payment_input(resident.id, 2024, Month::June, 450)
            },
        )
        .await?;
        assert_eq!(updated.id, payment.id);
        assert_eq!(updated.month, Month::June);
        assert_eq!(updated.amount, 450);
        assert_eq!(updated.note, "corrected");

        delete_payment(&db, payment.id).await?;
        assert!(get_payment(&db, payment.id).await?.is_none());
        assert!(matches!(
            delete_payment(&db, payment.id).await.unwrap_err(),
            Error::NotFound { .. }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_resident_statement() -> Result<()> {
        let db = setup_test_db().await?;
        set_dues_schedule(&db, 2024, FLAT_RATES).await?;
        let resident = create_test_resident(&db, 1).await?;
        let neighbour = create_test_resident(&db, 2).await?;

        create_test_payment(&db, resident.id, 2024, Month::January, 500).await?;
        create_test_payment(&db, resident.id, 2024, Month::February, 200).await?;
        create_test_payment(&db, resident.id, 2024, Month::February, 100).await?;
        create_test_payment(&db, neighbour.id, 2024, Month::January, 500).await?;

        let statement = resident_statement(&db, resident.id, 2024).await?;
        assert_eq!(statement.lines.len(), 12);
        assert_eq!(statement.lines[0].balance, 0);
        assert_eq!(statement.lines[1].paid, 300);
        assert_eq!(statement.lines[1].balance, 200);
        assert_eq!(statement.total_due, 6000);
        assert_eq!(statement.total_paid, 800);
        assert_eq!(statement.balance, 5200);

        let no_schedule = resident_statement(&db, resident.id, 2023).await?;
        assert_eq!(no_schedule.total_due, 0);
        assert_eq!(no_schedule.balance, 0);
        Ok(())
    }
}
