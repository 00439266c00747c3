//! JWT 令牌服务
//!
//! 处理 JWT 令牌的生成、验证和解析。

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JWT 配置
///
/// | 环境变量 | 默认值 |
/// |----------|--------|
/// | JWT_SECRET | 开发环境随机生成 |
/// | JWT_EXPIRATION_MINUTES | 720 |
/// | JWT_ISSUER | meja-server |
/// | JWT_AUDIENCE | meja-admin |
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// JWT 密钥 (应至少 32 字节)
    pub secret: String,
    /// 令牌过期时间 (分钟)
    pub expiration_minutes: i64,
    /// 令牌签发者
    pub issuer: String,
    /// 令牌受众
    pub audience: String,
}

impl JwtConfig {
    /// 从环境变量加载
    pub fn from_env() -> Self {
        let secret = match std::env::var("JWT_SECRET") {
            Ok(secret) => secret,
            Err(_) => {
                tracing::warn!(
                    "⚠️  JWT_SECRET not set! Generating secure temporary key for development."
                );
                generate_secure_printable_jwt_secret()
            }
        };

        Self {
            secret,
            expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(720), // 默认 12 小时
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "meja-server".to_string()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "meja-admin".to_string()),
        }
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// 存储在令牌中的 JWT Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// 用户 ID (Subject)
    pub sub: String,
    /// 用户名
    pub username: String,
    /// 角色名称
    pub role: String,
    /// 权限列表 (逗号分隔)
    pub permissions: String,
    /// 令牌 ID，登出时加入吊销列表
    pub jti: String,
    /// 过期时间戳 (秒)
    pub exp: i64,
    /// 签发时间戳 (秒)
    pub iat: i64,
    /// 签发者
    pub iss: String,
    /// 受众
    pub aud: String,
}

/// 新签发的令牌
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub jti: String,
    /// 过期时间 (Unix millis)
    pub expires_at: i64,
}

/// JWT 错误
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("无效令牌: {0}")]
    InvalidToken(String),

    #[error("令牌已过期")]
    ExpiredToken,

    #[error("无效签名")]
    InvalidSignature,

    #[error("令牌生成失败: {0}")]
    GenerationFailed(String),

    #[error("密钥生成失败: {0}")]
    KeyGenerationFailed(String),
}

/// 生成安全的 JWT 密钥 (原始字节)
pub fn generate_secure_jwt_secret() -> Result<Vec<u8>, JwtError> {
    let rng = SystemRandom::new();
    let mut key = vec![0u8; 32]; // 256-bit key

    rng.fill(&mut key).map_err(|_| {
        JwtError::KeyGenerationFailed("Failed to generate secure random key".to_string())
    })?;

    Ok(key)
}

/// 生成可打印的安全 JWT 密钥 (用于开发环境)
pub fn generate_secure_printable_jwt_secret() -> String {
    const ALLOWED: &[u8] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()-_=+[]{}|;:,.<>?";

    let rng = SystemRandom::new();
    let mut bytes = [0u8; 64];
    if rng.fill(&mut bytes).is_err() {
        // 如果随机数生成失败，使用固定的开发密钥
        return "MejaServerDevelopmentSecureKey2024!MejaServer".to_string();
    }

    bytes
        .iter()
        .map(|b| ALLOWED[(*b as usize) % ALLOWED.len()] as char)
        .collect()
}

/// JWT 令牌服务
#[derive(Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("issuer", &self.config.issuer)
            .field("audience", &self.config.audience)
            .field("expiration_minutes", &self.config.expiration_minutes)
            .finish()
    }
}

impl JwtService {
    /// 使用指定配置创建新的 JWT 服务
    pub fn with_config(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// 为用户生成新令牌
    pub fn generate_token(
        &self,
        user_id: i64,
        username: &str,
        role: &str,
        permissions: &[String],
    ) -> Result<IssuedToken, JwtError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.config.expiration_minutes);
        let jti = uuid::Uuid::new_v4().to_string();

        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            role: role.to_string(),
            permissions: permissions.join(","),
            jti: jti.clone(),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))?;

        Ok(IssuedToken {
            token,
            jti,
            expires_at: expiration.timestamp_millis(),
        })
    }

    /// 验证并解码令牌
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::InvalidToken => JwtError::InvalidToken(e.to_string()),
                _ => JwtError::InvalidToken(format!("Token validation failed: {}", e)),
            }
        })?;

        Ok(token_data.claims)
    }

    /// 从 Authorization 头提取令牌
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ").map(str::trim).filter(|t| !t.is_empty())
    }
}

/// 当前用户上下文 (从 JWT Claims 解析)
///
/// 由认证中间件创建，注入到请求扩展
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// 用户 ID
    pub id: i64,
    /// 用户名
    pub username: String,
    /// 角色名称
    pub role: String,
    /// 权限列表
    pub permissions: Vec<String>,
    /// 令牌 ID
    pub jti: String,
    /// 令牌过期时间 (Unix millis)
    pub expires_at: i64,
}

impl TryFrom<Claims> for CurrentUser {
    type Error = std::num::ParseIntError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let permissions = if claims.permissions.is_empty() {
            vec![]
        } else {
            claims
                .permissions
                .split(',')
                .map(|s| s.to_string())
                .collect()
        };

        Ok(Self {
            id: claims.sub.parse()?,
            username: claims.username,
            role: claims.role,
            permissions,
            jti: claims.jti,
            expires_at: claims.exp * 1000,
        })
    }
}

impl CurrentUser {
    /// 是否管理员
    ///
    /// 管理员角色 (`role == "admin"`) 拥有所有权限
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }

    /// 检查是否拥有指定权限
    ///
    /// # 规则
    ///
    /// 1. 管理员拥有所有权限
    /// 2. 权限列表包含 `"all"` 则拥有所有权限
    /// 3. 精确匹配或前缀匹配 (`:*` 通配符)
    pub fn has_permission(&self, permission: &str) -> bool {
        if self.is_admin() {
            return true;
        }

        self.permissions.iter().any(|p| {
            if p == "all" || p == permission {
                return true;
            }
            // "orders:*" 匹配 "orders:manage"
            match p.strip_suffix(":*") {
                Some(prefix) => permission
                    .strip_prefix(prefix)
                    .is_some_and(|rest| rest.starts_with(':')),
                None => false,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::with_config(JwtConfig {
            secret: "unit-test-secret-that-is-long-enough-1234".to_string(),
            expiration_minutes: 60,
            issuer: "meja-server".to_string(),
            audience: "meja-admin".to_string(),
        })
    }

    #[test]
    fn test_jwt_generation_and_validation() {
        let service = service();
        let permissions = vec!["menu:write".to_string(), "orders:manage".to_string()];

        let issued = service
            .generate_token(1, "admin", "admin", &permissions)
            .expect("Failed to generate test token");

        let claims = service
            .validate_token(&issued.token)
            .expect("Failed to validate test token");

        assert_eq!(claims.sub, "1");
        assert_eq!(claims.username, "admin");
        assert_eq!(claims.permissions, "menu:write,orders:manage");
        assert_eq!(claims.jti, issued.jti);
        assert_eq!(claims.exp * 1000, issued.expires_at);
    }

    #[test]
    fn test_tokens_have_distinct_ids() {
        let service = service();
        let a = service.generate_token(1, "admin", "admin", &[]).unwrap();
        let b = service.generate_token(1, "admin", "admin", &[]).unwrap();
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn test_rejects_foreign_secret() {
        let issued = service().generate_token(1, "admin", "admin", &[]).unwrap();
        let other = JwtService::with_config(JwtConfig {
            secret: "a-completely-different-secret-0123456789".to_string(),
            ..service().config
        });
        assert!(matches!(
            other.validate_token(&issued.token),
            Err(JwtError::InvalidSignature)
        ));
    }

    #[test]
    fn test_rejects_wrong_audience() {
        let issued = service().generate_token(1, "admin", "admin", &[]).unwrap();
        let other = JwtService::with_config(JwtConfig {
            audience: "someone-else".to_string(),
            ..service().config
        });
        assert!(other.validate_token(&issued.token).is_err());
    }

    #[test]
    fn test_expired_token() {
        let service = JwtService::with_config(JwtConfig {
            expiration_minutes: -10,
            ..service().config
        });
        let issued = service.generate_token(1, "admin", "admin", &[]).unwrap();
        assert!(matches!(
            service.validate_token(&issued.token),
            Err(JwtError::ExpiredToken)
        ));
    }

    #[test]
    fn test_extract_from_header() {
        assert_eq!(JwtService::extract_from_header("Bearer abc"), Some("abc"));
        assert_eq!(JwtService::extract_from_header("Basic abc"), None);
        assert_eq!(JwtService::extract_from_header("Bearer "), None);
    }

    #[test]
    fn test_current_user_permissions() {
        let user = CurrentUser {
            id: 2,
            username: "kasir".to_string(),
            role: "staff".to_string(),
            permissions: vec!["orders:*".to_string()],
            jti: "j".to_string(),
            expires_at: 0,
        };

        assert!(user.has_permission("orders:manage"));
        assert!(!user.has_permission("ordersx:manage"));
        assert!(!user.has_permission("menu:write"));
    }

    #[test]
    fn test_admin_has_all_permissions() {
        let admin = CurrentUser {
            id: 1,
            username: "admin".to_string(),
            role: "admin".to_string(),
            permissions: vec![],
            jti: "j".to_string(),
            expires_at: 0,
        };

        assert!(admin.has_permission("menu:write"));
        assert!(admin.has_permission("reports:view"));
        assert!(admin.is_admin());
    }

    #[test]
    fn test_secure_key_generation() {
        let key1 = generate_secure_jwt_secret().expect("Failed to generate first secure key");
        let key2 = generate_secure_jwt_secret().expect("Failed to generate second secure key");
        assert_ne!(key1, key2);
        assert_eq!(key1.len(), 32);

        let printable = generate_secure_printable_jwt_secret();
        assert_eq!(printable.len(), 64);
    }
}
