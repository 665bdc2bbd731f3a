//! Shared types for the Đoàn admin console
//!
//! Domain models, error codes, response envelopes and the pure list logic
//! (filtering, sorting, pagination, validation, reports) used by both the
//! API client and the console screens. Nothing in this crate performs I/O.

pub mod client;
pub mod error;
pub mod listing;
pub mod models;
pub mod qr;
pub mod report;
pub mod request;
pub mod response;
pub mod types;
pub mod validation;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult, ErrorCode};
pub use listing::{Choice, ListFilter, Page};
pub use request::ListQuery;
pub use response::{ApiResult, ListPage, Pagination};
pub use validation::ValidationErrors;
