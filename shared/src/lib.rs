//! Shared types for the zones dashboard
//!
//! Common types used by both the REST backend and the dashboard client:
//! wire models, error codes and response structures.

pub mod error;
pub mod models;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
