//! CSV export of whole tables.
//!
//! Only the tables named by [`ExportTable`] can be exported; user accounts are
//! never among them. The header row lists the table's columns in declaration
//! order, so an empty table still produces a header. Rows follow in primary key
//! order, comma separated.

use crate::{
    entities::{BankAccount, BankTransaction, DuesPayment, DuesSchedule, Expense, Resident},
    errors::{Error, Result},
};
use sea_orm::{
    DatabaseConnection, EntityTrait, IdenStatic, Iterable, PrimaryKeyToColumn, QueryOrder,
};
use serde::Serialize;
use std::{fmt, io::Write, path::Path, str::FromStr};
use tracing::{info, instrument};

/// Tables that may be written to a CSV file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportTable {
    /// Resident roster
    Residents,
    /// Dues payments
    DuesPayments,
    /// Yearly dues schedules
    DuesSchedules,
    /// Expenses
    Expenses,
    /// Bank accounts
    BankAccounts,
    /// Movements on the bank accounts
    BankTransactions,
}

impl ExportTable {
    /// Every exportable table.
    pub const ALL: [Self; 6] = [
        Self::Residents,
        Self::DuesPayments,
        Self::DuesSchedules,
        Self::Expenses,
        Self::BankAccounts,
        Self::BankTransactions,
    ];

    /// Name accepted on the command line, also the suggested file stem.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Residents => "residents",
            Self::DuesPayments => "dues_payments",
            Self::DuesSchedules => "dues_schedules",
            Self::Expenses => "expenses",
            Self::BankAccounts => "bank_accounts",
            Self::BankTransactions => "bank_transactions",
        }
    }
}

impl fmt::Display for ExportTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExportTable {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|table| table.name() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|t| t.name()).collect();
                Error::validation("table", format!("'{s}' is not one of {}", known.join(", ")))
            })
    }
}

async fn write_entity<E, W>(db: &DatabaseConnection, writer: &mut csv::Writer<W>) -> Result<u64>
where
    E: EntityTrait,
    E::Model: Serialize,
    W: Write,
{
    let header: Vec<String> = E::Column::iter()
        .map(|column| column.as_str().to_owned())
        .collect();
    writer.write_record(&header)?;

    let mut query = E::find();
    for key in E::PrimaryKey::iter() {
        query = query.order_by_asc(key.into_column());
    }

    let mut rows = 0;
    for row in query.all(db).await? {
        writer.serialize(&row)?;
        rows += 1;
    }
    writer.flush()?;
    Ok(rows)
}

/// Writes `table` as CSV to `writer` and returns the number of data rows.
#[instrument(skip(db, writer))]
pub async fn export_table<W: Write>(
    db: &DatabaseConnection,
    table: ExportTable,
    writer: W,
) -> Result<u64> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    let rows = match table {
        ExportTable::Residents => write_entity::<Resident, _>(db, &mut csv_writer).await?,
        ExportTable::DuesPayments => write_entity::<DuesPayment, _>(db, &mut csv_writer).await?,
        ExportTable::DuesSchedules => write_entity::<DuesSchedule, _>(db, &mut csv_writer).await?,
        ExportTable::Expenses => write_entity::<Expense, _>(db, &mut csv_writer).await?,
        ExportTable::BankAccounts => write_entity::<BankAccount, _>(db, &mut csv_writer).await?,
        ExportTable::BankTransactions => {
            write_entity::<BankTransaction, _>(db, &mut csv_writer).await?
        }
    };
    Ok(rows)
}

/// Writes `table` to a CSV file at `path`, replacing any existing file.
pub async fn export_table_to_path(
    db: &DatabaseConnection,
    table: ExportTable,
    path: &Path,
) -> Result<u64> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    let rows = export_table(db, table, file).await?;
    info!("Exported {} rows of {} to {}", rows, table, path.display());
    Ok(rows)
}
