//! Đoàn Client - HTTP client for the Đoàn backend
//!
//! Provides the typed API client, the session context and store, the
//! sequence-tagged remote list state and the client-side configuration and
//! logging setup used by the admin console.

pub mod api;
pub mod collection;
pub mod config;
pub mod error;
pub mod http;
pub mod logger;
pub mod session;

pub use api::ApiClient;
pub use collection::{FetchTicket, RemoteCollection, Resolution};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::{HttpClient, NetworkHttpClient};
pub use session::{Session, SessionContext, SessionError, SessionStore};

// Re-export shared types for convenience
pub use shared::client::{ApiResponse, LoginResponse};
