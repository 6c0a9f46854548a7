//! Names of the procedures the reporting code calls.

use crate::{period::Period, transaction::TransactionKind};

/// Returns one row per tag with the total spent under that tag.
pub const REPORTS_BY_TAGS: &str = "reports_by_tags";

/// Returns the transactions carrying the tag given by the `tag_id` argument.
pub const TRANSACTIONS_BY_TAG_ID: &str = "transactions_by_tag_id";

const INCOME_PREFIX: &str = "total_income_";
const EXPENSES_PREFIX: &str = "total_expenses_";

/// The procedure that sums the amounts of one kind of transaction over `period`,
/// e.g. "total_income_month" or "total_expenses_all_time".
pub fn total_procedure(kind: TransactionKind, period: Period) -> String {
    let prefix = match kind {
        TransactionKind::Income => INCOME_PREFIX,
        TransactionKind::Expense => EXPENSES_PREFIX,
    };

    format!("{prefix}{}", period.as_str())
}

/// The inverse of [total_procedure].
pub(super) fn parse_total_procedure(name: &str) -> Option<(TransactionKind, Period)> {
    if let Some(period) = name.strip_prefix(INCOME_PREFIX) {
        Some((TransactionKind::Income, period.parse().ok()?))
    } else if let Some(period) = name.strip_prefix(EXPENSES_PREFIX) {
        Some((TransactionKind::Expense, period.parse().ok()?))
    } else {
        None
    }
}
