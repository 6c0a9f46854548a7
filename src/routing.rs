//! Application router configuration.

use axum::{Router, routing::get};

use crate::{
    AppState, endpoints,
    handlers::{
        get_categories, get_dashboard, get_income_vs_expense_report, get_invalid_endpoint,
        get_period_totals, get_tag_reports, get_tag_transactions,
    },
};

/// Return a router with all the app's routes, served at the root and under
/// [endpoints::PREFIX].
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route(endpoints::DASHBOARD, get(get_dashboard))
        .route(endpoints::PERIOD_TOTALS, get(get_period_totals))
        .route(endpoints::CATEGORIES, get(get_categories))
        .route(
            endpoints::INCOME_VS_EXPENSE_REPORT,
            get(get_income_vs_expense_report),
        )
        .route(endpoints::TAG_REPORTS, get(get_tag_reports))
        .route(endpoints::TAG_TRANSACTIONS, get(get_tag_transactions));

    Router::new()
        .nest(endpoints::PREFIX, api_routes.clone())
        .merge(api_routes)
        .fallback(get_invalid_endpoint)
        .with_state(state)
}
