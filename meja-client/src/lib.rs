//! Meja Client - HTTP client and local state for the Meja server
//!
//! - [`HttpClient`]: typed calls to the REST API
//! - [`CartStore`]: customer cart, persisted to the `cart-storage` slot
//! - [`AdminSession`]: cached admin login, persisted to the `admin-storage` slot

pub mod cart;
pub mod config;
pub mod error;
pub mod http;
pub mod session;
pub mod storage;

pub use cart::CartStore;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;
pub use session::{AdminSession, SessionState};
pub use storage::LocalStorage;

// Re-export shared types for convenience
pub use shared::client::{HealthResponse, LoginResponse, UserInfo};
pub use shared::error::ApiResponse;
