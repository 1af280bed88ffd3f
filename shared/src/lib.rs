//! Shared types for the Büfé portal
//!
//! Error codes and the error body, domain models, the dashboard
//! WebSocket protocol and time helpers used by the server and its clients.

pub mod dashboard;
pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};
