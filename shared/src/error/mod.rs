//! Error system shared by the backend and the client
//!
//! Handlers fail with [`AppError`]; it renders as an [`ApiResponse`] body
//! whose numeric `code` is an [`ErrorCode`] and whose HTTP status follows
//! from it. The client parses the same body back.
//!
//! ```
//! use shared::error::{ApiResponse, AppError, ErrorCode};
//!
//! let err = AppError::validation("name must not be empty").with_detail("field", "name");
//! let body = ApiResponse::from(&err);
//! assert_eq!(body.error_code(), Some(ErrorCode::ValidationFailed));
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
