use std::sync::Arc;
use std::time::Duration;

use shared::util::now_millis;

use crate::auth::{AccountDirectory, AdminAccount, JwtService, SessionRegistry};
use crate::core::{Config, Result, ServerError};
use crate::db::{self, Store, seed};
use crate::orders::OrderService;
use crate::services::CatalogService;

/// Interval of the revoked-token purge task
const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(600);

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝，每个请求克隆一次。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | store | Arc<dyn Store> | 存储后端 (redb / memory) |
/// | catalog | CatalogService | 菜单管理 |
/// | orders | OrderService | 订单与状态流转 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
/// | accounts | Arc<AccountDirectory> | 管理员账户 |
/// | sessions | Arc<SessionRegistry> | 已登出令牌 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 存储后端
    pub store: Arc<dyn Store>,
    /// 菜单管理
    pub catalog: CatalogService,
    /// 订单服务
    pub orders: OrderService,
    /// JWT 认证服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
    /// 管理员账户
    pub accounts: Arc<AccountDirectory>,
    /// 令牌吊销列表
    pub sessions: Arc<SessionRegistry>,
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("config", &self.config)
            .field("store", &self.store.backend_name())
            .field("revoked_sessions", &self.sessions.len())
            .finish()
    }
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按配置打开存储后端，然后调用 [`Self::with_store`]。
    pub fn initialize(config: &Config) -> Result<Self> {
        let store = db::open_store(config)?;
        Self::with_store(config.clone(), store)
    }

    /// 使用已有存储构造状态 (测试中直接传入 MemoryStore)
    ///
    /// 菜单为空且 `seed_menu` 开启时写入默认菜单。
    pub fn with_store(config: Config, store: Arc<dyn Store>) -> Result<Self> {
        if config.seed_menu {
            seed::seed_if_empty(store.as_ref(), now_millis())?;
        }

        let password = config.effective_admin_password().ok_or_else(|| {
            ServerError::Config("ADMIN_PASSWORD must be set in production".into())
        })?;
        let admin = AdminAccount::new(1, config.admin_username.clone(), &password)
            .map_err(|e| ServerError::Internal(anyhow::anyhow!("Failed to hash admin password: {}", e)))?;
        if config.admin_password.is_none() {
            tracing::warn!(
                username = %config.admin_username,
                "ADMIN_PASSWORD not set, using development default"
            );
        }

        let accounts = AccountDirectory::new(vec![admin]).map_err(|e| {
            ServerError::Internal(anyhow::anyhow!("Failed to hash placeholder password: {}", e))
        })?;

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        Ok(Self {
            catalog: CatalogService::new(store.clone()),
            orders: OrderService::new(store.clone()),
            store,
            jwt_service,
            accounts: Arc::new(accounts),
            sessions: Arc::new(SessionRegistry::new()),
            config,
        })
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    /// 启动后台任务
    ///
    /// 目前只有一个: 定期清理已过期的吊销令牌。
    pub fn start_background_tasks(&self) {
        let sessions = self.sessions.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(SESSION_PURGE_INTERVAL);
            loop {
                interval.tick().await;
                let purged = sessions.purge_expired(now_millis());
                if purged > 0 {
                    tracing::debug!(purged, "Purged expired revoked sessions");
                }
            }
        });
    }
}
