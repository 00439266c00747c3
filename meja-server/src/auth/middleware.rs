//! 认证中间件
//!
//! 为 JWT 认证和授权提供 Axum 中间件

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::AppError;
use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::security_log;

/// 公共 API 路由 (无需令牌)
///
/// 顾客侧接口: 浏览菜单、下单、查询单个订单
fn is_public_api_route(method: &http::Method, path: &str) -> bool {
    if path == "/api/auth/login" {
        return true;
    }
    match *method {
        http::Method::GET => {
            path == "/api/menu"
                || is_single_segment_under(path, "/api/menu/")
                || (is_single_segment_under(path, "/api/orders/") && path != "/api/orders/counts")
        }
        http::Method::POST => path == "/api/orders",
        _ => false,
    }
}

/// `/api/menu/{id}` 形式 (只有一级子路径)
fn is_single_segment_under(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| !rest.is_empty() && !rest.contains('/'))
}

/// 校验令牌并构造 CurrentUser
///
/// 签名、过期、吊销列表依次检查
pub fn authenticate(state: &ServerState, token: &str, uri: &http::Uri) -> Result<CurrentUser, AppError> {
    let claims = match state.get_jwt_service().validate_token(token) {
        Ok(claims) => claims,
        Err(e) => {
            security_log!(WARN, "auth_failed", error = %e, uri = %uri);
            return Err(match e {
                JwtError::ExpiredToken => AppError::token_expired(),
                _ => AppError::invalid_token("Invalid token"),
            });
        }
    };

    if state.sessions.is_revoked(&claims.jti) {
        security_log!(WARN, "auth_revoked", jti = %claims.jti, uri = %uri);
        return Err(AppError::session_revoked());
    }

    CurrentUser::try_from(claims)
        .map_err(|e| AppError::invalid_token(format!("Malformed JWT claims: {}", e)))
}

/// 认证中间件 - 要求用户登录
///
/// 从 `Authorization: Bearer <token>` 头提取并验证 JWT。
/// 验证成功后将 [`CurrentUser`] 注入请求扩展 (`req.extensions_mut().insert(user)`)。
///
/// # 跳过认证的路径
///
/// - `OPTIONS *` (CORS 预检)
/// - 非 `/api/` 路径
/// - `POST /api/auth/login`
/// - 顾客接口: `GET /api/menu`, `GET /api/menu/{id}`, `POST /api/orders`, `GET /api/orders/{id}`
///
/// # 错误处理
///
/// | 错误 | HTTP 状态码 |
/// |------|------------|
/// | 无 Authorization 头 | 401 NotAuthenticated |
/// | 令牌过期 | 401 TokenExpired |
/// | 无效令牌 | 401 TokenInvalid |
/// | 已登出的令牌 | 401 SessionRevoked |
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // 允许 CORS 预检的 OPTIONS 请求 (跳过认证)
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let path = req.uri().path();

    // 非 API 路由跳过认证 (让它们正常返回 404)
    if !path.starts_with("/api/") || is_public_api_route(req.method(), path) {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            security_log!(WARN, "auth_missing", uri = %req.uri());
            return Err(AppError::unauthorized());
        }
    };

    let user = authenticate(&state, token, req.uri())?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// 权限检查中间件 - 要求特定权限
///
/// # 参数
///
/// - `permission`: 所需权限，如 `"menu:write"`, `"orders:manage"`
///
/// # 用法
///
/// ```ignore
/// use axum::middleware;
/// Router::new()
///     .route("/", post(handler::create))
///     .layer(middleware::from_fn(require_permission("menu:write")));
/// ```
///
/// # 错误
///
/// 无权限返回 403 Forbidden
pub fn require_permission(
    permission: &'static str,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AppError>> + Send>>
+ Clone {
    move |req: Request, next: Next| {
        Box::pin(async move {
            let user = req
                .extensions()
                .get::<CurrentUser>()
                .ok_or(AppError::unauthorized())?;

            if !user.has_permission(permission) {
                security_log!(
                    WARN,
                    "permission_denied",
                    user_id = user.id,
                    username = %user.username,
                    required_permission = permission
                );
                return Err(AppError::forbidden(format!(
                    "Permission denied: {}",
                    permission
                )));
            }

            Ok(next.run(req).await)
        })
    }
}
