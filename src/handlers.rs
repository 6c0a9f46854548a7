//! Route handlers that turn requests into report calls and reports into JSON.

use axum::{
    Json,
    extract::{Path, RawQuery, State},
    response::{IntoResponse, Response},
};

use crate::{
    AppState, Error,
    category::{CategoryBreakdown, categories_in_range},
    dashboard::{Dashboard, build_dashboard},
    period::{Period, compute_month, compute_period},
    query_params::QueryParams,
    report::{MonthlyReportEntry, build_income_vs_expense_report},
    tag_report::{TagReport, reports_by_tags, transactions_by_tag_id},
    transaction::Transaction,
};

/// Totals for every period and the top expense categories.
pub async fn get_dashboard(State(state): State<AppState>) -> Result<Json<Dashboard>, Error> {
    build_dashboard(state.store.as_ref(), state.clock.today()).map(Json)
}

/// The totals for one named period. The month also includes the daily limit.
pub async fn get_period_totals(
    State(state): State<AppState>,
    Path(period): Path<String>,
) -> Result<Response, Error> {
    let period: Period = period.parse()?;
    let store = state.store.as_ref();

    let response = match period {
        Period::Month => Json(compute_month(store, state.clock.today())?).into_response(),
        period => Json(compute_period(store, period)?).into_response(),
    };

    Ok(response)
}

/// The category breakdown for `type` between `startDate` and `endDate`.
pub async fn get_categories(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Json<CategoryBreakdown>, Error> {
    let params = QueryParams::parse(query.as_deref())?;
    let kind = params.kind()?;
    let range = params.date_range()?;

    categories_in_range(state.store.as_ref(), kind, range).map(Json)
}

pub async fn get_income_vs_expense_report(
    State(state): State<AppState>,
) -> Result<Json<Vec<MonthlyReportEntry>>, Error> {
    build_income_vs_expense_report(state.store.as_ref(), state.clock.today()).map(Json)
}

pub async fn get_tag_reports(State(state): State<AppState>) -> Result<Json<Vec<TagReport>>, Error> {
    reports_by_tags(state.store.as_ref()).map(Json)
}

/// The transactions for the tag in the `tagId` parameter.
pub async fn get_tag_transactions(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Json<Vec<Transaction>>, Error> {
    let tag_id = QueryParams::parse(query.as_deref())?.tag_id()?;

    transactions_by_tag_id(state.store.as_ref(), tag_id).map(Json)
}

/// Reply to requests for routes that do not exist.
pub async fn get_invalid_endpoint() -> Error {
    Error::InvalidEndpoint
}
