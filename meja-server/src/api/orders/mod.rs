//! Orders API 模块
//!
//! 顾客下单和查单为公共接口，其余需要 `orders:manage`。

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::permissions::ORDERS_MANAGE;
use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    let customer_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{id}", get(handler::get_by_id));

    let manage_routes = Router::new()
        .route("/", get(handler::list))
        .route("/counts", get(handler::counts))
        .route("/{id}", axum::routing::patch(handler::update_status))
        .layer(middleware::from_fn(require_permission(ORDERS_MANAGE)));

    customer_routes.merge(manage_routes)
}
