//! The API endpoint URIs.
//!
//! Every route is served both at the root and under [PREFIX].

/// The prefix the whole API is also mounted under.
pub const PREFIX: &str = "/jexpense";
/// Totals for every period and the top expense categories.
pub const DASHBOARD: &str = "/dashboard";
/// Totals for a single period, e.g. `/totals/week`.
pub const PERIOD_TOTALS: &str = "/totals/{period}";
/// The category breakdown of one transaction type over a date range.
pub const CATEGORIES: &str = "/categories";
/// The month by month income vs. expense report.
pub const INCOME_VS_EXPENSE_REPORT: &str = "/reports/income-vs-expense";
/// The expense totals per tag.
pub const TAG_REPORTS: &str = "/reports/tags";
/// The transactions carrying a tag.
pub const TAG_TRANSACTIONS: &str = "/reports/tags/transactions";

/// Replace the first `{parameter}` in `endpoint_path` with `value`.
///
/// ```
/// use jexpense::endpoints::{PERIOD_TOTALS, format_endpoint};
///
/// assert_eq!(format_endpoint(PERIOD_TOTALS, "week"), "/totals/week");
/// ```
pub fn format_endpoint(endpoint_path: &str, value: impl std::fmt::Display) -> String {
    match (endpoint_path.find('{'), endpoint_path.find('}')) {
        (Some(start), Some(end)) if start < end => format!(
            "{}{value}{}",
            &endpoint_path[..start],
            &endpoint_path[end + 1..]
        ),
        _ => endpoint_path.to_owned(),
    }
}
