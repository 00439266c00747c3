//! Client configuration

use std::path::PathBuf;

/// Client configuration for connecting to the Meja server
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:3000")
    pub base_url: String,

    /// JWT token for authentication
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Directory holding the local storage slots
    pub storage_dir: PathBuf,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: 30,
            storage_dir: PathBuf::from("./meja-client-data"),
        }
    }

    /// Set the JWT token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the local storage directory
    pub fn with_storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = dir.into();
        self
    }

    /// Create an HTTP client from this configuration
    pub fn build_http_client(&self) -> crate::ClientResult<crate::HttpClient> {
        crate::HttpClient::new(self)
    }

    /// Open the local storage directory
    pub fn open_storage(&self) -> crate::ClientResult<crate::LocalStorage> {
        crate::LocalStorage::open(&self.storage_dir)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:3000")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = ClientConfig::new("http://meja.local")
            .with_token("abc")
            .with_timeout(5)
            .with_storage_dir("/tmp/meja");
        assert_eq!(config.token.as_deref(), Some("abc"));
        assert_eq!(config.timeout, 5);
        assert_eq!(config.storage_dir, PathBuf::from("/tmp/meja"));
        assert_eq!(ClientConfig::default().base_url, "http://localhost:3000");
    }
}
