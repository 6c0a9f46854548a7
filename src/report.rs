//! The income vs. expense report: one category breakdown per calendar month,
//! from the month of the first transaction up to the current month.

use serde::Serialize;
use time::Date;

use crate::{
    Error,
    calendar::{YearMonth, months_between},
    category::{CategoryBucket, aggregate_by_category},
    store::{DataStore, SortDirection, TableQuery, select},
    transaction::{CategoryAmount, TRANSACTION_TABLE, TransactionDate, TransactionKind},
};

/// The income and expenses of one month, broken down by category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyReportEntry {
    /// Position in the report, starting at 1.
    pub id: usize,
    /// The month as "MM-YYYY".
    pub period_key: String,
    /// The short month name, e.g. "Jan".
    pub month_label: String,
    pub year: String,
    pub total_income: f64,
    pub total_expense: f64,
    pub income_buckets: Vec<CategoryBucket>,
    pub expense_buckets: Vec<CategoryBucket>,
}

/// Build the report for every month from the first transaction to `today`.
///
/// The entries are in chronological order. Each month is fetched with its own
/// query, one after the other.
///
/// # Errors
/// Returns the error of the first query that fails. No partial report is
/// returned.
pub fn build_income_vs_expense_report(
    store: &dyn DataStore,
    today: Date,
) -> Result<Vec<MonthlyReportEntry>, Error> {
    let Some(first_date) = get_first_transaction_date(store)? else {
        return Ok(Vec::new());
    };

    let months = months_between(YearMonth::of(first_date), YearMonth::of(today));
    tracing::debug!(
        "building income vs. expense report for {} months from {first_date}",
        months.len()
    );

    months
        .into_iter()
        .enumerate()
        .map(|(i, month)| build_month_entry(store, i + 1, month))
        .collect()
}

/// The date of the earliest transaction, or `None` if there are none.
fn get_first_transaction_date(store: &dyn DataStore) -> Result<Option<Date>, Error> {
    let query = TableQuery::new(TRANSACTION_TABLE)
        .select(&["date"])
        .order_by("date", SortDirection::Ascending)
        .range(0..=0);

    let rows: Vec<TransactionDate> = select(store, &query)
        .inspect_err(|error| tracing::error!("could not get first transaction date: {error}"))?;

    Ok(rows.first().map(|row| row.date))
}

fn build_month_entry(
    store: &dyn DataStore,
    id: usize,
    month: YearMonth,
) -> Result<MonthlyReportEntry, Error> {
    let bounds = month.bounds();
    let query = TableQuery::new(TRANSACTION_TABLE)
        .select(&["category", "amount", "type"])
        .gte("date", bounds.start)
        .lte("date", bounds.end);

    let rows: Vec<CategoryAmount> = select(store, &query).inspect_err(|error| {
        tracing::error!(
            "could not get transactions for {}: {error}",
            month.period_key()
        )
    })?;

    let of_kind = |kind: TransactionKind| {
        rows.iter()
            .filter(move |row| row.kind == kind)
            .map(|row| (row.category.as_str(), row.amount))
    };
    let income = aggregate_by_category(of_kind(TransactionKind::Income));
    let expenses = aggregate_by_category(of_kind(TransactionKind::Expense));

    Ok(MonthlyReportEntry {
        id,
        period_key: month.period_key(),
        month_label: month.label().to_owned(),
        year: month.year.to_string(),
        total_income: income.total_amount,
        total_expense: expenses.total_amount,
        income_buckets: income.categories,
        expense_buckets: expenses.categories,
    })
}
