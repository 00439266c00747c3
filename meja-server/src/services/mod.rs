//! 服务层
//!
//! - [`CatalogService`] - 菜单管理
//! - [`https`] - HTTP 服务器组装 (路由、中间件、优雅关闭)

pub mod catalog;
pub mod https;

pub use catalog::CatalogService;
