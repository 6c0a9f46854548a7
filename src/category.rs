//! Category breakdowns: per-category totals and their share of the whole.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
    Error,
    calendar::DateRange,
    store::{DataStore, TableQuery, select},
    transaction::{CategoryAmount, TRANSACTION_TABLE, TransactionKind},
};

/// The total for one category and its percentage of the grouping total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBucket {
    pub category: String,
    pub total: f64,
    pub percentage: f64,
}

/// All the category buckets of one grouping, largest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    pub total_amount: f64,
    pub categories: Vec<CategoryBucket>,
}

/// Group `(category, amount)` pairs into buckets.
///
/// Buckets are sorted by total, largest first, and equal totals are ordered by
/// category name. The breakdown total is the sum of the bucket totals, and a
/// zero total gives every bucket a percentage of zero.
pub fn aggregate_by_category<'a>(
    rows: impl IntoIterator<Item = (&'a str, f64)>,
) -> CategoryBreakdown {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();

    for (category, amount) in rows {
        *totals.entry(category).or_insert(0.0) += amount;
    }

    let mut buckets: Vec<(&str, f64)> = totals.into_iter().collect();
    // Stable, so ties keep the alphabetical order of the map.
    buckets.sort_by(|(_, a), (_, b)| b.total_cmp(a));

    let total_amount: f64 = buckets.iter().map(|(_, total)| total).sum();

    let categories = buckets
        .into_iter()
        .map(|(category, total)| CategoryBucket {
            category: category.to_owned(),
            total,
            percentage: percentage_of(total, total_amount),
        })
        .collect();

    CategoryBreakdown {
        total_amount,
        categories,
    }
}

fn percentage_of(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        part / whole * 100.0
    }
}

/// Fetch the transactions of `kind` dated inside `range` and group them by
/// category.
///
/// # Errors
/// Returns an error if the query fails or a row is malformed.
pub fn categories_in_range(
    store: &dyn DataStore,
    kind: TransactionKind,
    range: DateRange,
) -> Result<CategoryBreakdown, Error> {
    let query = TableQuery::new(TRANSACTION_TABLE)
        .select(&["category", "amount", "type"])
        .eq("type", kind.as_str())
        .gte("date", range.start)
        .lte("date", range.end);

    let rows: Vec<CategoryAmount> = select(store, &query).inspect_err(|error| {
        tracing::error!(
            "could not get {kind} transactions from {} to {}: {error}",
            range.start,
            range.end
        )
    })?;

    Ok(aggregate_by_category(
        rows.iter().map(|row| (row.category.as_str(), row.amount)),
    ))
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::{CategoryBreakdown, aggregate_by_category, categories_in_range};
    use crate::{
        Error,
        calendar::DateRange,
        store::{NewTransaction, create_transaction},
        test_utils::{FailingStore, get_test_store},
        transaction::{TRANSACTION_TABLE, TransactionKind},
    };

    fn assert_close(got: f64, want: f64) {
        assert!((got - want).abs() < 1e-9, "got {got}, want {want}");
    }

    #[test]
    fn groups_and_sorts_descending() {
        let rows = [("Food", 100.0), ("Rent", 400.0), ("Food", 50.0)];

        let breakdown = aggregate_by_category(rows);

        assert_eq!(breakdown.total_amount, 550.0);
        assert_eq!(breakdown.categories.len(), 2);
        assert_eq!(breakdown.categories[0].category, "Rent");
        assert_eq!(breakdown.categories[0].total, 400.0);
        assert_close(breakdown.categories[0].percentage, 72.727_272_727_272_73);
        assert_eq!(breakdown.categories[1].category, "Food");
        assert_eq!(breakdown.categories[1].total, 150.0);
        assert_close(breakdown.categories[1].percentage, 27.272_727_272_727_27);
    }

    #[test]
    fn empty_input_gives_empty_breakdown() {
        let breakdown = aggregate_by_category(std::iter::empty());

        assert_eq!(
            breakdown,
            CategoryBreakdown {
                total_amount: 0.0,
                categories: vec![],
            }
        );
    }

    #[test]
    fn zero_total_gives_zero_percentages() {
        let breakdown = aggregate_by_category([("Gift", 0.0), ("Refund", 0.0)]);

        assert_eq!(breakdown.total_amount, 0.0);
        assert!(
            breakdown
                .categories
                .iter()
                .all(|bucket| bucket.percentage == 0.0 && !bucket.percentage.is_nan())
        );
    }

    #[test]
    fn ties_are_ordered_by_category_name() {
        let breakdown =
            aggregate_by_category([("Travel", 20.0), ("Books", 20.0), ("Coffee", 20.0)]);

        let names: Vec<&str> = breakdown
            .categories
            .iter()
            .map(|bucket| bucket.category.as_str())
            .collect();
        assert_eq!(names, vec!["Books", "Coffee", "Travel"]);
    }

    #[test]
    fn bucket_totals_and_percentages_add_up() {
        let rows: Vec<(String, f64)> = (0..200)
            .map(|i| (format!("Category {}", i % 7), f64::from(i * 13 % 97) + 0.25))
            .collect();

        let breakdown = aggregate_by_category(rows.iter().map(|(c, a)| (c.as_str(), *a)));

        let row_sum: f64 = rows.iter().map(|(_, amount)| amount).sum();
        let bucket_sum: f64 = breakdown.categories.iter().map(|b| b.total).sum();
        let percentage_sum: f64 = breakdown.categories.iter().map(|b| b.percentage).sum();
        assert_eq!(bucket_sum, breakdown.total_amount);
        assert_close(bucket_sum, row_sum);
        assert_close(percentage_sum, 100.0);
        assert!(
            breakdown
                .categories
                .windows(2)
                .all(|pair| pair[0].total >= pair[1].total)
        );
    }

    #[test]
    fn categories_in_range_filters_by_type_and_date() {
        let store = get_test_store(date!(2024 - 03 - 31));
        store
            .with_connection(|connection| {
                for (amount, kind, category, date) in [
                    (100.0, TransactionKind::Expense, "Food", date!(2024 - 03 - 01)),
                    (400.0, TransactionKind::Expense, "Rent", date!(2024 - 03 - 31)),
                    (50.0, TransactionKind::Expense, "Food", date!(2024 - 03 - 15)),
                    (75.0, TransactionKind::Expense, "Food", date!(2024 - 04 - 01)),
                    (900.0, TransactionKind::Income, "Salary", date!(2024 - 03 - 15)),
                ] {
                    create_transaction(
                        NewTransaction::build(amount, kind, category, date),
                        connection,
                    )?;
                }
                Ok(())
            })
            .unwrap();
        let march = DateRange::new(date!(2024 - 03 - 01), date!(2024 - 03 - 31)).unwrap();

        let expenses = categories_in_range(&store, TransactionKind::Expense, march).unwrap();
        let income = categories_in_range(&store, TransactionKind::Income, march).unwrap();

        assert_eq!(expenses.total_amount, 550.0);
        let names: Vec<&str> = expenses
            .categories
            .iter()
            .map(|bucket| bucket.category.as_str())
            .collect();
        assert_eq!(names, vec!["Rent", "Food"]);
        assert_eq!(income.total_amount, 900.0);
        assert_eq!(income.categories[0].percentage, 100.0);
    }

    #[test]
    fn categories_in_range_propagates_query_failure() {
        let store = FailingStore::new(get_test_store(date!(2024 - 03 - 31)), TRANSACTION_TABLE);
        let march = DateRange::new(date!(2024 - 03 - 01), date!(2024 - 03 - 31)).unwrap();

        let result = categories_in_range(&store, TransactionKind::Expense, march);

        assert_eq!(
            result,
            Err(Error::remote_call(TRANSACTION_TABLE, "simulated failure"))
        );
    }
}
