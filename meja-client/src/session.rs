//! Admin session
//!
//! Only a cache of the server-issued token; the server decides every
//! permission. State lives in the `admin-storage` slot and survives restarts.

use serde::{Deserialize, Serialize};
use shared::client::UserInfo;
use shared::util::now_millis;

use crate::storage::{ADMIN_SLOT, LocalStorage};
use crate::{ClientConfig, ClientResult, HttpClient};

/// Persisted session fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub is_authenticated: bool,
    pub user: Option<UserInfo>,
    pub token: Option<String>,
    /// Token expiry (Unix millis)
    pub expires_at: Option<i64>,
}

impl SessionState {
    /// Flag set, token present and not yet expired at `now`
    pub fn is_valid_at(&self, now: i64) -> bool {
        self.is_authenticated
            && self.token.is_some()
            && self.expires_at.is_some_and(|expires_at| expires_at > now)
    }
}

/// Admin session bound to one server
#[derive(Debug)]
pub struct AdminSession {
    http: HttpClient,
    storage: LocalStorage,
    state: SessionState,
}

impl AdminSession {
    /// Build the HTTP client and storage from `config`, then restore
    pub fn open(config: &ClientConfig) -> ClientResult<Self> {
        Ok(Self::new(config.build_http_client()?, config.open_storage()?))
    }

    /// Restore from `admin-storage`; an unreadable slot means logged out
    pub fn new(mut http: HttpClient, storage: LocalStorage) -> Self {
        let state = match storage.load::<SessionState>(ADMIN_SLOT) {
            Ok(state) => state.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable admin session");
                SessionState::default()
            }
        };
        http.set_token(state.token.clone());
        Self {
            http,
            storage,
            state,
        }
    }

    /// Log in against the server.
    ///
    /// Returns `false` on wrong credentials or network failure; the session
    /// is then unauthenticated.
    pub async fn login(&mut self, username: &str, password: &str) -> bool {
        let mut anonymous = self.http.clone();
        anonymous.set_token(None);

        match anonymous.login(username, password).await {
            Ok(response) => {
                self.http.set_token(Some(response.token.clone()));
                self.state = SessionState {
                    is_authenticated: true,
                    user: Some(response.user),
                    token: Some(response.token),
                    expires_at: Some(response.expires_at),
                };
                self.persist();
                tracing::info!(username = %username, "Admin logged in");
                true
            }
            Err(e) => {
                tracing::warn!(username = %username, error = %e, "Admin login failed");
                self.clear();
                false
            }
        }
    }

    /// Clear local state and revoke the token server-side when reachable
    pub async fn logout(&mut self) {
        if self.state.token.is_some()
            && let Err(e) = self.http.logout().await
        {
            tracing::debug!(error = %e, "Server-side logout failed");
        }
        self.clear();
    }

    /// Local flag set and token not yet expired
    pub fn is_authenticated(&self) -> bool {
        self.state.is_valid_at(now_millis())
    }

    /// Revalidate the cached session against the server.
    ///
    /// A rejected token clears the session. Network failures keep the cache
    /// but report `false`.
    pub async fn verify(&mut self) -> bool {
        if !self.is_authenticated() {
            if self.state != SessionState::default() {
                self.clear();
            }
            return false;
        }

        match self.http.me().await {
            Ok(user) => {
                self.state.user = Some(user);
                self.persist();
                true
            }
            Err(e) if e.is_unauthorized() => {
                tracing::info!(error = %e, "Cached admin session rejected by server");
                self.clear();
                false
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not verify admin session");
                false
            }
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn user(&self) -> Option<&UserInfo> {
        self.state.user.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.state.token.as_deref()
    }

    /// HTTP client carrying the session token
    pub fn client(&self) -> &HttpClient {
        &self.http
    }

    fn persist(&self) {
        if let Err(e) = self.storage.save(ADMIN_SLOT, &self.state) {
            tracing::warn!(error = %e, "Failed to persist admin session");
        }
    }

    fn clear(&mut self) {
        self.state = SessionState::default();
        self.http.set_token(None);
        if let Err(e) = self.storage.delete(ADMIN_SLOT) {
            tracing::warn!(error = %e, "Failed to remove admin session");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn unreachable_config(dir: &TempDir) -> ClientConfig {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        ClientConfig::new(format!("http://127.0.0.1:{}", port))
            .with_timeout(2)
            .with_storage_dir(dir.path())
    }

    fn cached_state(expires_at: i64) -> SessionState {
        SessionState {
            is_authenticated: true,
            user: Some(UserInfo {
                id: 1,
                username: "admin".into(),
                role: "admin".into(),
                permissions: vec![],
            }),
            token: Some("cached-token".into()),
            expires_at: Some(expires_at),
        }
    }

    #[test]
    fn test_state_validity() {
        let state = cached_state(2_000);
        assert!(state.is_valid_at(1_000));
        assert!(!state.is_valid_at(2_000));
        assert!(!SessionState::default().is_valid_at(0));

        let mut no_token = cached_state(2_000);
        no_token.token = None;
        assert!(!no_token.is_valid_at(1_000));
    }

    #[test]
    fn test_restores_cached_session() {
        let dir = TempDir::new().unwrap();
        let config = unreachable_config(&dir);
        config
            .open_storage()
            .unwrap()
            .save(ADMIN_SLOT, &cached_state(now_millis() + 60_000))
            .unwrap();

        let session = AdminSession::open(&config).unwrap();
        assert!(session.is_authenticated());
        assert_eq!(session.user().unwrap().username, "admin");
        assert_eq!(session.client().token(), Some("cached-token"));
    }

    #[test]
    fn test_expired_cache_is_not_authenticated() {
        let dir = TempDir::new().unwrap();
        let config = unreachable_config(&dir);
        config
            .open_storage()
            .unwrap()
            .save(ADMIN_SLOT, &cached_state(now_millis() - 1))
            .unwrap();

        let session = AdminSession::open(&config).unwrap();
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_login_network_failure_returns_false() {
        let dir = TempDir::new().unwrap();
        let mut session = AdminSession::open(&unreachable_config(&dir)).unwrap();

        assert!(!session.login("admin", "password123").await);
        assert!(!session.is_authenticated());
        assert!(!dir.path().join("admin-storage.json").exists());
    }

    #[tokio::test]
    async fn test_logout_clears_slot_even_when_offline() {
        let dir = TempDir::new().unwrap();
        let config = unreachable_config(&dir);
        let storage = config.open_storage().unwrap();
        storage
            .save(ADMIN_SLOT, &cached_state(now_millis() + 60_000))
            .unwrap();

        let mut session = AdminSession::open(&config).unwrap();
        session.logout().await;
        assert!(!session.is_authenticated());
        assert!(session.token().is_none());
        assert!(!storage.exists(ADMIN_SLOT));
    }

    #[tokio::test]
    async fn test_verify_offline_keeps_cache() {
        let dir = TempDir::new().unwrap();
        let config = unreachable_config(&dir);
        config
            .open_storage()
            .unwrap()
            .save(ADMIN_SLOT, &cached_state(now_millis() + 60_000))
            .unwrap();

        let mut session = AdminSession::open(&config).unwrap();
        assert!(!session.verify().await);
        assert!(session.is_authenticated());
    }
}
