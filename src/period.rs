//! Income, expense and balance totals for fixed calendar periods.
//!
//! The totals themselves are summed by the data store; this module calls the
//! right procedures in order and derives the balance and the daily spending
//! limit for the current month.

use std::str::FromStr;

use serde::Serialize;
use time::Date;

use crate::{
    Error,
    calendar::{DateRange, YearMonth, days_in_month, week_bounds, year_bounds},
    store::{DataStore, ProcedureArgs, call_scalar, total_procedure},
    transaction::TransactionKind,
};

/// A calendar window that totals are computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    Today,
    /// Monday to Sunday.
    Week,
    Month,
    Year,
    AllTime,
}

impl Period {
    pub const ALL: [Period; 5] = [
        Period::Today,
        Period::Week,
        Period::Month,
        Period::Year,
        Period::AllTime,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Period::Today => "today",
            Period::Week => "week",
            Period::Month => "month",
            Period::Year => "year",
            Period::AllTime => "all_time",
        }
    }

    /// The dates covered by the period containing `today`.
    ///
    /// Returns `None` for [Period::AllTime], which is unbounded.
    pub fn date_range(self, today: Date) -> Option<DateRange> {
        match self {
            Period::Today => Some(DateRange {
                start: today,
                end: today,
            }),
            Period::Week => Some(week_bounds(today)),
            Period::Month => Some(YearMonth::of(today).bounds()),
            Period::Year => Some(year_bounds(today.year())),
            Period::AllTime => None,
        }
    }
}

impl FromStr for Period {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Period::ALL
            .into_iter()
            .find(|period| period.as_str() == s)
            .ok_or_else(|| Error::UnknownPeriod(s.to_owned()))
    }
}

/// Income, expenses and their difference over a period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodTotals {
    pub total_income: f64,
    pub total_expenses: f64,
    pub total_balance: f64,
}

impl PeriodTotals {
    /// Create totals, deriving the balance.
    pub fn new(total_income: f64, total_expenses: f64) -> Self {
        Self {
            total_income,
            total_expenses,
            total_balance: total_income - total_expenses,
        }
    }
}

/// The totals for the current month together with how much can be spent per
/// day for the rest of the month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTotals {
    #[serde(flatten)]
    pub totals: PeriodTotals,
    /// The balance spread evenly over the remaining days, today included.
    pub daily_limit: f64,
    /// Always at least one.
    pub remaining_days: u8,
}

impl MonthlyTotals {
    /// Derive the daily limit from the month's `totals` as seen on `today`.
    pub fn new(totals: PeriodTotals, today: Date) -> Self {
        let remaining_days = remaining_days_in_month(today);

        Self {
            totals,
            daily_limit: totals.total_balance / f64::from(remaining_days),
            remaining_days,
        }
    }
}

/// The days left in the month of `today`, counting today. Never less than one.
pub fn remaining_days_in_month(today: Date) -> u8 {
    let days_in_month = days_in_month(today.year(), today.month());

    (days_in_month - today.day() + 1).max(1)
}

/// Fetch the income total and then the expense total for `period`.
///
/// # Errors
/// Returns the error of the first procedure that fails, no partial totals.
pub fn compute_period(store: &dyn DataStore, period: Period) -> Result<PeriodTotals, Error> {
    let args = ProcedureArgs::new();
    let income_procedure = total_procedure(TransactionKind::Income, period);
    let expense_procedure = total_procedure(TransactionKind::Expense, period);

    let total_income = call_scalar(store, &income_procedure, &args)
        .inspect_err(|error| tracing::error!("could not get income for {period:?}: {error}"))?;
    let total_expenses = call_scalar(store, &expense_procedure, &args)
        .inspect_err(|error| tracing::error!("could not get expenses for {period:?}: {error}"))?;

    Ok(PeriodTotals::new(total_income, total_expenses))
}

/// Fetch the totals for the current month and derive the daily limit.
pub fn compute_month(store: &dyn DataStore, today: Date) -> Result<MonthlyTotals, Error> {
    let totals = compute_period(store, Period::Month)?;

    Ok(MonthlyTotals::new(totals, today))
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::{
        MonthlyTotals, Period, PeriodTotals, compute_month, compute_period,
        remaining_days_in_month,
    };
    use crate::{
        Error,
        calendar::DateRange,
        store::{NewTransaction, create_transaction},
        test_utils::{FailingStore, RecordingStore, get_test_store},
        transaction::TransactionKind,
    };

    #[test]
    fn balance_is_income_minus_expenses() {
        let totals = PeriodTotals::new(1000.0, 2000.0);

        assert_eq!(totals.total_balance, -1000.0);
    }

    #[test]
    fn daily_limit_example_from_thirty_day_month() {
        // June has 30 days, so on the 25th there are 6 days left including today.
        let monthly = MonthlyTotals::new(PeriodTotals::new(5400.0, 3000.0), date!(2024 - 06 - 25));

        assert_eq!(monthly.remaining_days, 6);
        assert_eq!(monthly.totals.total_balance, 2400.0);
        assert_eq!(monthly.daily_limit, 400.0);
    }

    #[test]
    fn remaining_days_is_one_on_last_day_of_month() {
        assert_eq!(remaining_days_in_month(date!(2024 - 02 - 29)), 1);
        assert_eq!(remaining_days_in_month(date!(2024 - 01 - 01)), 31);
    }

    #[test]
    fn daily_limit_times_remaining_days_is_balance() {
        for day in 1..=31 {
            let today = time::Date::from_calendar_date(2024, time::Month::March, day).unwrap();
            let monthly = MonthlyTotals::new(PeriodTotals::new(1234.56, 789.01), today);

            assert!(monthly.remaining_days >= 1);
            let reconstructed = monthly.daily_limit * f64::from(monthly.remaining_days);
            assert!(
                (reconstructed - monthly.totals.total_balance).abs() < 1e-9,
                "day {day}: {reconstructed} != {}",
                monthly.totals.total_balance
            );
        }
    }

    #[test]
    fn period_parses_from_its_name() {
        assert_eq!("all_time".parse(), Ok(Period::AllTime));
        assert_eq!(
            "fortnight".parse::<Period>(),
            Err(Error::UnknownPeriod("fortnight".to_owned()))
        );
    }

    #[test]
    fn period_date_ranges() {
        let today = date!(2024 - 06 - 13);

        assert_eq!(
            Period::Today.date_range(today),
            DateRange::new(today, today)
        );
        assert_eq!(
            Period::Month.date_range(today),
            DateRange::new(date!(2024 - 06 - 01), date!(2024 - 06 - 30))
        );
        assert_eq!(Period::AllTime.date_range(today), None);
    }

    #[test]
    fn compute_period_sums_only_the_period() {
        let store = get_test_store(date!(2024 - 06 - 25));
        store
            .with_connection(|connection| {
                create_transaction(
                    NewTransaction::build(5400.0, TransactionKind::Income, "Salary", date!(2024 - 06 - 01)),
                    connection,
                )?;
                create_transaction(
                    NewTransaction::build(3000.0, TransactionKind::Expense, "Rent", date!(2024 - 06 - 02)),
                    connection,
                )?;
                create_transaction(
                    NewTransaction::build(999.0, TransactionKind::Expense, "Rent", date!(2024 - 05 - 31)),
                    connection,
                )?;
                Ok(())
            })
            .unwrap();

        let month = compute_month(&store, date!(2024 - 06 - 25)).unwrap();
        let all_time = compute_period(&store, Period::AllTime).unwrap();

        assert_eq!(month.totals, PeriodTotals::new(5400.0, 3000.0));
        assert_eq!(month.daily_limit, 400.0);
        assert_eq!(all_time, PeriodTotals::new(5400.0, 3999.0));
    }

    #[test]
    fn compute_period_calls_income_before_expenses() {
        let store = RecordingStore::new(get_test_store(date!(2024 - 06 - 25)));

        compute_period(&store, Period::Week).unwrap();

        assert_eq!(
            store.procedure_calls(),
            vec!["total_income_week", "total_expenses_week"]
        );
    }

    #[test]
    fn compute_period_fails_when_either_procedure_fails() {
        let store = FailingStore::new(
            get_test_store(date!(2024 - 06 - 25)),
            "total_expenses_year",
        );

        let result = compute_period(&store, Period::Year);

        assert!(
            matches!(result, Err(Error::RemoteCall { ref name, .. }) if name == "total_expenses_year"),
            "got {result:?}"
        );
    }
}
