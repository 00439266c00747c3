//! 健康检查路由
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /health | GET | 简单健康检查 | 无 |
//!
//! ```json
//! { "status": "ok", "version": "0.1.0", "storage": "redb" }
//! ```

use axum::{Json, Router, extract::State, routing::get};
use shared::client::HealthResponse;

use crate::core::ServerState;

/// 健康检查路由 - 公共路由 (无需认证)
pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health))
}

/// GET /health
pub async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    // 存储可读即视为健康
    let status = match state.store.menu_count() {
        Ok(_) => "ok",
        Err(e) => {
            tracing::error!(error = %e, "Health check: store unreadable");
            "error"
        }
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        storage: state.store.backend_name().to_string(),
    })
}
