//! Data models
//!
//! Wire types returned by the Đoàn backend. Field names follow the
//! backend's camelCase JSON, with aliases for the snake_case variants some
//! endpoints still emit. All IDs are `i64`.

pub mod member;
pub mod post;
pub mod serde_helpers;
pub mod suggestion;
pub mod survey;
pub mod unit;
pub mod user;

// Re-exports
pub use member::*;
pub use post::*;
pub use suggestion::*;
pub use survey::*;
pub use unit::*;
pub use user::*;
