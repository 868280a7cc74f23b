use aidat_buddy::{
    config::{self, database},
    core::{
        building,
        dues::{self, DuesSummary},
        export::{self, ExportTable},
        report::{self, format_currency},
    },
    errors::{Error, Result},
};
use chrono::Datelike;
use dotenvy::dotenv;
use sea_orm::DatabaseConnection;
use std::{env, path::PathBuf};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: aidat-buddy [summary | report <year> | export <table> [path]]";

fn print_summary(summary: &DuesSummary) {
    println!(
        "{:?} {}: {} units x {} = {}, collected {}, outstanding {}",
        summary.month,
        summary.year,
        summary.resident_count,
        format_currency(summary.monthly_rate),
        format_currency(summary.assessed),
        format_currency(summary.collected),
        format_currency(summary.outstanding),
    );
}

async fn print_report(db: &DatabaseConnection, year: i32) -> Result<()> {
    let report = report::general_report(db, year).await?;
    println!("General report {}", report.year);
    for summary in &report.months {
        print_summary(summary);
    }
    println!("Expected:    {}", format_currency(report.expected_total));
    println!("Collected:   {}", format_currency(report.collected_total));
    println!("Outstanding: {}", format_currency(report.outstanding_total()));
    println!("Expenses:    {}", format_currency(report.expense_total));
    for account in &report.bank_balances {
        println!("{}: {}", account.bank_name, format_currency(account.balance));
    }
    Ok(())
}

async fn run(
    db: &DatabaseConnection,
    app_config: &config::AppConfig,
    args: &[String],
) -> Result<()> {
    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        [] | ["summary"] => print_summary(&dues::current_dues_summary(db).await?),
        ["report"] => print_report(db, chrono::Local::now().year()).await?,
        ["report", year] => {
            let year = year
                .parse()
                .map_err(|_| Error::Validation {
                    field: "year",
                    message: "must be a number".to_string(),
                })?;
            print_report(db, year).await?;
        }
        ["export", table, rest @ ..] if rest.len() <= 1 => {
            let table: ExportTable = table.parse()?;
            let path = rest.first().map_or_else(
                || app_config.export_dir().join(format!("{table}.csv")),
                PathBuf::from,
            );
            let rows = export::export_table_to_path(db, table, &path).await?;
            println!("{rows} rows written to {}", path.display());
        }
        _ => {
            return Err(Error::Validation {
                field: "command",
                message: USAGE.to_string(),
            });
        }
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; variables may also come from the environment
    dotenv().ok();

    // 3. Load the application configuration
    let app_config = config::load_app_configuration()?;

    // 4. Open the store, create tables, bootstrap the administrator
    let db = database::create_connection(&app_config.database_url())
        .await
        .inspect_err(|e| error!("Failed to open database: {}", e))?;
    database::init_database(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    // 5. Seed the building profile on first run
    building::seed_building(&db, app_config.building.as_ref()).await?;

    let args: Vec<String> = env::args().skip(1).collect();
    if let Err(e) = run(&db, &app_config, &args).await {
        error!("Command failed: {}", e);
        eprintln!("{}", e.user_message());
        return Err(e);
    }
    Ok(())
}
