//! Reports API Handlers

use axum::{Json, extract::State};
use serde::Deserialize;
use shared::util::now_millis;

use crate::api::extract::ApiQuery;
use crate::core::ServerState;
use crate::reports::{self, DashboardStats, Report, ReportPeriod};
use crate::utils::AppResult;

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    #[serde(default)]
    pub period: ReportPeriod,
}

/// GET /api/reports?period=7d
pub async fn report(
    State(state): State<ServerState>,
    ApiQuery(query): ApiQuery<ReportQuery>,
) -> AppResult<Json<Report>> {
    let orders = state.orders.list_orders(None)?;
    let menu_count = state.catalog.count()?;
    Ok(Json(reports::build_report(
        &orders,
        menu_count,
        query.period,
        now_millis(),
        state.config.timezone,
    )))
}

/// GET /api/reports/dashboard
pub async fn dashboard(State(state): State<ServerState>) -> AppResult<Json<DashboardStats>> {
    let orders = state.orders.list_orders(None)?;
    let menu_count = state.catalog.count()?;
    Ok(Json(reports::dashboard(
        &orders,
        menu_count,
        now_millis(),
        state.config.timezone,
    )))
}
