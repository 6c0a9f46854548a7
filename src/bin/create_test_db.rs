use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Date, Duration, OffsetDateTime};

use jexpense::{
    calendar::{YearMonth, months_between},
    store::{NewTransaction, create_tag, create_transaction, initialize},
    transaction::TransactionKind,
};

/// A utility for creating a demo database for the jexpense reporting API.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// How many months of transactions to create, ending with the current month.
    #[arg(long, short, default_value_t = 12)]
    months: u32,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        Some(extension) if !extension.is_empty() => {}
        _ => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let mut conn = Connection::open(output_path)?;

    initialize(&conn)?;

    let today = OffsetDateTime::now_utc().date();
    let months = recent_months(today, args.months);

    println!("Creating transactions for {} months...", months.len());

    let tx = conn.transaction()?;
    let holiday = create_tag("Holiday", &tx)?;
    let groceries = create_tag("Groceries", &tx)?;
    let bills = create_tag("Bills", &tx)?;

    let mut count = 0;
    for (i, month) in months.iter().enumerate() {
        let bounds = month.bounds();
        let on_day = |day: i64| {
            let date = bounds.start + Duration::days(day - 1);
            date.min(bounds.end).min(today)
        };
        let drift = i as f64 * 3.5;

        let mut transactions = vec![
            NewTransaction::build(5400.0, TransactionKind::Income, "Salary", on_day(1))
                .description("Monthly pay"),
            NewTransaction::build(2000.0, TransactionKind::Expense, "Rent", on_day(2))
                .tag_id(Some(bills)),
            NewTransaction::build(180.0 + drift, TransactionKind::Expense, "Power", on_day(12))
                .tag_id(Some(bills)),
            NewTransaction::build(60.0, TransactionKind::Expense, "Internet", on_day(15))
                .tag_id(Some(bills)),
        ];

        for week in 0..4 {
            transactions.push(
                NewTransaction::build(
                    140.0 + f64::from(week) * 12.25,
                    TransactionKind::Expense,
                    "Food",
                    on_day(3 + 7 * i64::from(week)),
                )
                .tag_id(Some(groceries)),
            );
        }

        if i % 4 == 3 {
            transactions.push(
                NewTransaction::build(1250.0, TransactionKind::Expense, "Travel", on_day(20))
                    .tag_id(Some(holiday))
                    .description("Flights"),
            );
            transactions.push(
                NewTransaction::build(300.0, TransactionKind::Income, "Gift", on_day(21)),
            );
        }

        for transaction in transactions {
            create_transaction(transaction, &tx)?;
            count += 1;
        }
    }

    tx.commit()?;

    println!("Created {count} transactions.");
    println!("Success!");

    Ok(())
}

/// The last `count` months up to and including the month of `today`.
fn recent_months(today: Date, count: u32) -> Vec<YearMonth> {
    let last = YearMonth::of(today);
    let first = (1..count).fold(last, |month, _| month.previous());

    months_between(first, last)
}
