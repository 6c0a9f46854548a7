//! The dashboard summary: totals for every period and the top expense
//! categories of the current month and year.

use serde::Serialize;
use time::Date;

use crate::{
    Error,
    category::{CategoryBucket, categories_in_range},
    period::{MonthlyTotals, Period, PeriodTotals, compute_month, compute_period},
    store::DataStore,
    transaction::TransactionKind,
};

/// Everything shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub total_data: PeriodTotals,
    pub today_data: PeriodTotals,
    pub week_data: PeriodTotals,
    pub month_data: MonthlyTotals,
    pub year_data: PeriodTotals,
    pub top_categories_month: Vec<CategoryBucket>,
    pub top_categories_year: Vec<CategoryBucket>,
}

/// Gather the dashboard data as of `today`, one store call after another.
///
/// # Errors
/// Returns the first error encountered. No partial dashboard is returned.
pub fn build_dashboard(store: &dyn DataStore, today: Date) -> Result<Dashboard, Error> {
    let total_data = compute_period(store, Period::AllTime)?;
    let today_data = compute_period(store, Period::Today)?;
    let week_data = compute_period(store, Period::Week)?;
    let month_data = compute_month(store, today)?;
    let year_data = compute_period(store, Period::Year)?;

    let top_categories_month = top_expense_categories(store, Period::Month, today)?;
    let top_categories_year = top_expense_categories(store, Period::Year, today)?;

    Ok(Dashboard {
        total_data,
        today_data,
        week_data,
        month_data,
        year_data,
        top_categories_month,
        top_categories_year,
    })
}

fn top_expense_categories(
    store: &dyn DataStore,
    period: Period,
    today: Date,
) -> Result<Vec<CategoryBucket>, Error> {
    match period.date_range(today) {
        Some(range) => Ok(categories_in_range(store, TransactionKind::Expense, range)?.categories),
        None => Ok(Vec::new()),
    }
}
