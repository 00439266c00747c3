use std::path::PathBuf;

use chrono_tz::Tz;

use crate::auth::JwtConfig;
use crate::utils::time::parse_timezone;

/// 存储后端
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// redb 文件 (work_dir/database/meja.redb)，重启后数据保留
    Redb,
    /// 进程内存，仅用于原型和测试
    Memory,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Redb => "redb",
            StorageBackend::Memory => "memory",
        }
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "redb" => Ok(StorageBackend::Redb),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(format!("unknown storage backend: {}", other)),
        }
    }
}

/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 (数据库、日志) |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | STORAGE_BACKEND | redb | redb / memory |
/// | TIMEZONE | Asia/Jakarta | 报表按日统计的时区 |
/// | ADMIN_USERNAME | admin | 管理员用户名 |
/// | ADMIN_PASSWORD | password123 (仅开发环境) | 管理员密码 |
/// | AUTH_DELAY_MS | 500 | 登录固定延迟 (毫秒) |
/// | SEED_MENU | true | 菜单为空时写入默认菜单 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_JSON | false | JSON 日志 |
///
/// JWT 相关变量见 [`JwtConfig`]。
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/srv/meja HTTP_PORT=8080 cargo run -p meja-server
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志等文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | production
    pub environment: String,
    /// 存储后端
    pub storage: StorageBackend,
    /// 业务时区
    pub timezone: Tz,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 管理员用户名
    pub admin_username: String,
    /// 管理员密码 (明文，只在启动时用于生成 argon2 哈希)
    pub admin_password: Option<String>,
    /// 登录固定延迟 (毫秒)
    pub auth_delay_ms: u64,
    /// 菜单为空时写入默认菜单
    pub seed_menu: bool,
    /// 日志级别
    pub log_level: String,
    /// JSON 格式日志
    pub log_json: bool,
}

/// Development-only admin password
pub const DEV_ADMIN_PASSWORD: &str = "password123";

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        let timezone = std::env::var("TIMEZONE")
            .ok()
            .and_then(|name| {
                let tz = parse_timezone(&name);
                if tz.is_none() {
                    tracing::warn!(timezone = %name, "Unknown TIMEZONE, falling back to Asia/Jakarta");
                }
                tz
            })
            .unwrap_or(chrono_tz::Asia::Jakarta);

        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: env_parse("HTTP_PORT").unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            storage: env_parse("STORAGE_BACKEND").unwrap_or(StorageBackend::Redb),
            timezone,
            jwt: JwtConfig::from_env(),
            admin_username: std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".into()),
            admin_password: std::env::var("ADMIN_PASSWORD").ok().filter(|p| !p.is_empty()),
            auth_delay_ms: env_parse("AUTH_DELAY_MS").unwrap_or(500),
            seed_menu: env_parse("SEED_MENU").unwrap_or(true),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: env_parse("LOG_JSON").unwrap_or(false),
        }
    }

    /// 测试配置: 内存存储、零登录延迟、固定 JWT 密钥
    ///
    /// 不读取环境变量
    pub fn for_tests() -> Self {
        Self {
            work_dir: std::env::temp_dir().join("meja-test").to_string_lossy().into_owned(),
            http_port: 0,
            environment: "test".into(),
            storage: StorageBackend::Memory,
            timezone: chrono_tz::Asia::Jakarta,
            jwt: JwtConfig {
                secret: "meja-test-secret-key-with-at-least-32-chars".into(),
                expiration_minutes: 60,
                issuer: "meja-server".into(),
                audience: "meja-admin".into(),
            },
            admin_username: "admin".into(),
            admin_password: Some(DEV_ADMIN_PASSWORD.into()),
            auth_delay_ms: 0,
            seed_menu: true,
            log_level: "debug".into(),
            log_json: false,
        }
    }

    /// 检查生产环境必需的配置
    pub fn validate(&self) -> Result<(), String> {
        if self.is_production() {
            if std::env::var("JWT_SECRET").is_err() {
                return Err("JWT_SECRET must be set in production".into());
            }
            if self.admin_password.is_none() {
                return Err("ADMIN_PASSWORD must be set in production".into());
            }
        }
        if self.jwt.secret.len() < 32 {
            return Err("JWT secret must be at least 32 characters long".into());
        }
        Ok(())
    }

    /// 管理员密码，开发环境下回退到默认密码
    pub fn effective_admin_password(&self) -> Option<String> {
        match &self.admin_password {
            Some(p) => Some(p.clone()),
            None if !self.is_production() => Some(DEV_ADMIN_PASSWORD.to_string()),
            None => None,
        }
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// 数据库目录: work_dir/database
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// redb 数据库文件路径
    pub fn database_path(&self) -> PathBuf {
        self.database_dir().join("meja.redb")
    }

    /// 日志目录: work_dir/logs
    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// 确保工作目录结构存在
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.log_dir())?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
