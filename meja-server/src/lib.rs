//! Meja Server - 餐桌扫码点餐服务
//!
//! # 架构概述
//!
//! 顾客扫描桌上二维码浏览菜单、下单；店员在后台处理订单、维护菜单、查看报表。
//!
//! - **数据库** (`db`): redb 嵌入式存储 / 内存存储
//! - **认证** (`auth`): JWT + Argon2 认证体系
//! - **订单** (`orders`): 下单校验、库存预留、状态流转
//! - **报表** (`reports`): 日营收、菜品排行、仪表盘
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! meja-server/src/
//! ├── core/          # 配置、状态、错误、服务器
//! ├── auth/          # JWT 认证、权限、会话吊销
//! ├── services/      # 菜单服务、HTTP 组装
//! ├── api/           # HTTP 路由和处理器
//! ├── utils/         # 日志、时区、校验
//! ├── db/            # 存储层
//! ├── orders/        # 订单服务
//! └── reports/       # 报表统计
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod orders;
pub mod reports;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerError, ServerState};
pub use db::{MemoryStore, RedbStore, Store};
pub use orders::OrderService;
pub use services::https::build_router;
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{cleanup_old_logs, init_logger_with_file};

/// 设置运行环境: 加载 .env、读取并校验配置、创建工作目录、初始化日志
///
/// 必须在 tokio runtime 中调用 (日志清理任务)。
pub fn setup_environment() -> Result<Config, ServerError> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    config.validate().map_err(ServerError::Config)?;
    config.ensure_work_dir_structure()?;

    let log_dir = config.log_dir();
    init_logger_with_file(&config.log_level, config.log_json, Some(&log_dir))?;

    tracing::info!(
        work_dir = %config.work_dir,
        environment = %config.environment,
        storage = config.storage.as_str(),
        "Environment ready"
    );
    Ok(config)
}

pub fn print_banner() {
    println!(
        r#"
    __  ___       _
   /  |/  /__    (_)___ _
  / /|_/ / _ \  / / __ `/
 / /  / /  __/ / / /_/ /
/_/  /_/\___/_/ /\__,_/
           /___/
    "#
    );
}
