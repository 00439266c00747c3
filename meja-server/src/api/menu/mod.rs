//! Menu API 模块
//!
//! | 路径 | 方法 | 权限 |
//! |------|------|------|
//! | /api/menu | GET | 公共 |
//! | /api/menu/{id} | GET | 公共 |
//! | /api/menu | POST | menu:write |
//! | /api/menu/{id} | PUT / DELETE | menu:write |
//! | /api/menu/{id}/stock | PUT | menu:write |

mod handler;

use axum::{
    Router, middleware,
    routing::{get, put},
};

use crate::auth::permissions::MENU_WRITE;
use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/menu", routes())
}

fn routes() -> Router<ServerState> {
    // 顾客浏览菜单
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id));

    let manage_routes = Router::new()
        .route("/", axum::routing::post(handler::create))
        .route("/{id}", put(handler::update).delete(handler::delete))
        .route("/{id}/stock", put(handler::update_stock))
        .layer(middleware::from_fn(require_permission(MENU_WRITE)));

    read_routes.merge(manage_routes)
}
