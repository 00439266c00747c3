//! Shared types for the Meja table-ordering services
//!
//! Common types used by meja-server and meja-client: domain models,
//! the unified error system, auth DTOs and time helpers.

pub mod client;
pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use http;
pub use serde::{Deserialize, Serialize};
