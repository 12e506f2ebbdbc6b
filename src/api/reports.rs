//! Admin dashboard reports.

use axum::extract::State;

use super::{success, ApiResult};
use crate::models::{InventoryReport, ProfitReport};
use crate::AppState;

/// GET /api/reports/inventory - Stock level summary.
pub async fn inventory_report(State(state): State<AppState>) -> ApiResult<InventoryReport> {
    let products = state.repo.list_products().await?;
    success(InventoryReport::from_products(&products))
}

/// GET /api/reports/profit - Revenue, cost and inventory valuation.
pub async fn profit_report(State(state): State<AppState>) -> ApiResult<ProfitReport> {
    let orders = state.repo.list_orders(None).await?;
    let products = state.repo.list_products().await?;
    success(ProfitReport::compute(&orders, &products))
}
