//! Menu API Handlers

use axum::{Json, extract::State, http::StatusCode};
use shared::models::{MenuEntry, MenuEntryCreate, MenuEntryUpdate, StockUpdate};

use crate::api::extract::{ApiJson, ApiPath};
use crate::core::ServerState;
use crate::utils::AppResult;

/// GET /api/menu - 获取全部菜单
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<MenuEntry>>> {
    Ok(Json(state.catalog.list()?))
}

/// GET /api/menu/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<MenuEntry>> {
    Ok(Json(state.catalog.get(id)?))
}

/// POST /api/menu - 新建菜单条目
pub async fn create(
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<MenuEntryCreate>,
) -> AppResult<(StatusCode, Json<MenuEntry>)> {
    let entry = state.catalog.create(payload)?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// PUT /api/menu/{id} - 部分更新
pub async fn update(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<MenuEntryUpdate>,
) -> AppResult<Json<MenuEntry>> {
    Ok(Json(state.catalog.update(id, payload)?))
}

/// PUT /api/menu/{id}/stock - 设置库存
pub async fn update_stock(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<StockUpdate>,
) -> AppResult<Json<MenuEntry>> {
    Ok(Json(state.catalog.set_stock(id, payload.stock)?))
}

/// DELETE /api/menu/{id}
pub async fn delete(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<bool>> {
    Ok(Json(state.catalog.delete(id)?))
}
