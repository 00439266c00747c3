use std::net::SocketAddr;

use axum::{Router, middleware};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;

use crate::auth::require_auth;
use crate::core::ServerState;

/// HTTP 请求日志中间件
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    let status = response.status();

    tracing::info!(target: "http_access", "{} {} {}", method, uri, status);

    response
}

/// Build the Axum router (without state)
pub fn build_app() -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(crate::api::health::router())
        .merge(crate::api::auth::router())
        .merge(crate::api::menu::router())
        .merge(crate::api::orders::router())
        .merge(crate::api::reports::router())
}

/// Build the complete router bound to `state`
pub fn build_router(state: ServerState) -> Router {
    build_app()
        // JWT 认证中间件 - require_auth 内部会跳过公共路由
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state)
        // Tower HTTP 中间件
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        // HTTP 请求日志中间件
        .layer(middleware::from_fn(log_request))
}

/// Serve `app` on `addr` until `shutdown_signal` resolves
pub async fn start_server<F>(
    app: Router,
    addr: SocketAddr,
    shutdown_signal: F,
) -> std::io::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    tracing::info!("Starting HTTP server on {}", addr);

    let handle = axum_server::Handle::new();

    // Handle shutdown signal
    let handle_clone = handle.clone();
    tokio::spawn(async move {
        shutdown_signal.await;
        handle_clone.graceful_shutdown(Some(std::time::Duration::from_secs(10)));
    });

    axum_server::bind(addr)
        .handle(handle)
        .serve(app.into_make_service())
        .await
}
