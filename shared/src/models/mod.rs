//! Data models
//!
//! Shared between meja-server and meja-client (via API).
//! All IDs are `i64` assigned by monotonic store counters, all timestamps
//! are Unix milliseconds, all money amounts are whole rupiah.

pub mod menu;
pub mod order;
pub mod report;

// Re-exports
pub use menu::*;
pub use order::*;
pub use report::*;
