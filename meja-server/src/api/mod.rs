//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 登录、登出、当前用户
//! - [`menu`] - 菜单浏览与管理
//! - [`orders`] - 下单、查单、状态流转
//! - [`reports`] - 报表与仪表盘
//! - [`extract`] - 统一错误体的 JSON / 查询 / 路径提取器

pub mod auth;
pub mod extract;
pub mod health;
pub mod menu;
pub mod orders;
pub mod reports;

// Re-export common types for handlers
pub use crate::utils::{ApiResponse, AppResult};
