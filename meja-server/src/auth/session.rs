//! 令牌吊销列表
//!
//! 登出时记录令牌的 `jti`，直到令牌自然过期。

use dashmap::DashMap;

/// 已吊销令牌注册表 (jti → 过期时间 millis)
#[derive(Debug, Default)]
pub struct SessionRegistry {
    revoked: DashMap<String, i64>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 吊销令牌，保留到 `expires_at`
    pub fn revoke(&self, jti: &str, expires_at: i64) {
        self.revoked.insert(jti.to_string(), expires_at);
    }

    /// 令牌是否已吊销
    pub fn is_revoked(&self, jti: &str) -> bool {
        self.revoked.contains_key(jti)
    }

    /// 清理已过期的记录，返回清理数量
    pub fn purge_expired(&self, now: i64) -> usize {
        let before = self.revoked.len();
        self.revoked.retain(|_, expires_at| *expires_at > now);
        before - self.revoked.len()
    }

    pub fn len(&self) -> usize {
        self.revoked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.revoked.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revoke_and_purge() {
        let registry = SessionRegistry::new();
        assert!(!registry.is_revoked("a"));

        registry.revoke("a", 1_000);
        registry.revoke("b", 5_000);
        assert!(registry.is_revoked("a"));
        assert_eq!(registry.len(), 2);

        assert_eq!(registry.purge_expired(2_000), 1);
        assert!(!registry.is_revoked("a"));
        assert!(registry.is_revoked("b"));
    }
}
