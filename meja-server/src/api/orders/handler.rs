//! Orders API Handlers

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use shared::models::{CreateOrderRequest, Order, OrderStatus, StatusCounts, UpdateStatusRequest};

use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::core::ServerState;
use crate::utils::AppResult;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<OrderStatus>,
}

/// POST /api/orders - 顾客下单
pub async fn create(
    State(state): State<ServerState>,
    ApiJson(req): ApiJson<CreateOrderRequest>,
) -> AppResult<(StatusCode, Json<Order>)> {
    let order = state.orders.create_order(req)?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /api/orders?status=menunggu
pub async fn list(
    State(state): State<ServerState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    Ok(Json(state.orders.list_orders(query.status)?))
}

/// GET /api/orders/counts - 各状态订单数
pub async fn counts(State(state): State<ServerState>) -> AppResult<Json<StatusCounts>> {
    Ok(Json(state.orders.status_counts()?))
}

/// GET /api/orders/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<Order>> {
    Ok(Json(state.orders.get_order(id)?))
}

/// PATCH /api/orders/{id} - 更新状态
pub async fn update_status(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<UpdateStatusRequest>,
) -> AppResult<Json<Order>> {
    Ok(Json(state.orders.update_status(id, req.status)?))
}
