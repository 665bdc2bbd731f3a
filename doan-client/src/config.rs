//! Client configuration
//!
//! # Environment variables
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | API_BASE_URL | http://localhost:5000 | Backend base URL |
//! | REQUEST_TIMEOUT_SECS | 30 | Per-request timeout |
//! | SESSION_DIR | ./.doan | Directory holding `session.json` |
//! | PAGE_SIZE | 10 | Rows per list page |
//! | LOG_LEVEL | info | Default log filter (`RUST_LOG` wins) |
//! | LOG_DIR | unset | Write logs to a daily file here |
//!
//! A `.env` file in the working directory is loaded first.

use std::path::PathBuf;

use shared::request::MAX_PAGE_SIZE;

use crate::{ClientError, ClientResult};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_SESSION_DIR: &str = "./.doan";
pub const DEFAULT_PAGE_SIZE: u32 = shared::request::DEFAULT_PAGE_SIZE;

/// Client configuration for connecting to the Đoàn backend
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:5000"), without trailing slash
    pub base_url: String,

    /// Bearer token for authentication
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Directory of the session store
    pub session_dir: PathBuf,

    /// Rows per list page
    pub page_size: u32,

    pub log_level: String,

    pub log_dir: Option<PathBuf>,
}

impl ClientConfig {
    /// Create a configuration with defaults for everything but the URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            timeout: DEFAULT_TIMEOUT_SECS,
            session_dir: PathBuf::from(DEFAULT_SESSION_DIR),
            page_size: DEFAULT_PAGE_SIZE,
            log_level: "info".into(),
            log_dir: None,
        }
    }

    /// Load `.env`, then read the process environment
    pub fn from_env() -> ClientResult<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> ClientResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let base_url = get("API_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into());
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::Config(format!(
                "API_BASE_URL must start with http:// or https://, got {base_url}"
            )));
        }

        let mut config = Self::new(base_url);
        if let Some(v) = get("REQUEST_TIMEOUT_SECS") {
            config.timeout = parse_number("REQUEST_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = get("SESSION_DIR") {
            config.session_dir = PathBuf::from(v);
        }
        if let Some(v) = get("PAGE_SIZE") {
            config.page_size = parse_number("PAGE_SIZE", &v)?;
        }
        if let Some(v) = get("LOG_LEVEL") {
            config.log_level = v;
        }
        config.log_dir = get("LOG_DIR").map(PathBuf::from);
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> ClientResult<()> {
        if self.timeout == 0 {
            return Err(ClientError::Config("REQUEST_TIMEOUT_SECS must be > 0".into()));
        }
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(ClientError::Config(format!(
                "PAGE_SIZE must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        Ok(())
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the session store directory
    pub fn with_session_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.session_dir = dir.into();
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> ClientResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ClientError::Config(format!("{key} must be a number, got {value:?}")))
}
