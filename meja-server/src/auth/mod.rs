//! 认证授权模块
//!
//! 提供 JWT 认证、权限管理和中间件：
//! - [`JwtService`] - JWT 令牌服务
//! - [`CurrentUser`] - 当前用户上下文
//! - [`AccountDirectory`] - 管理员账户 (argon2)
//! - [`SessionRegistry`] - 登出令牌吊销列表
//! - [`require_auth`] - 认证中间件
//! - [`require_permission`] - 权限检查中间件

pub mod account;
pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod permissions;
pub mod session;

pub use account::{AccountDirectory, AdminAccount};
pub use jwt::{Claims, CurrentUser, IssuedToken, JwtConfig, JwtError, JwtService};
pub use middleware::{require_auth, require_permission};
pub use session::SessionRegistry;
