//! Unified error system for the admin console
//!
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Member errors
//! - 4xxx: Unit errors
//! - 5xxx: Post errors
//! - 6xxx: Suggestion errors
//! - 7xxx: Survey errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode};
//!
//! let err = AppError::new(ErrorCode::MemberNotFound);
//! assert_eq!(err.message, "Member not found");
//!
//! let err = AppError::with_message(ErrorCode::ValidationFailed, "Email không hợp lệ")
//!     .with_detail("field", "email");
//! assert_eq!(err.detail("field").and_then(|v| v.as_str()), Some("email"));
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult};
