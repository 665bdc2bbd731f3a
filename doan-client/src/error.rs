//! Client error types

use shared::error::{AppError, ErrorCategory, ErrorCode};
use shared::validation::ValidationErrors;
use thiserror::Error;

use crate::session::SessionError;

/// Text shown for operations the backend does not provide
pub const NOT_WIRED_MESSAGE: &str = "Chức năng chưa được hỗ trợ";

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Authentication required or rejected
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error, local or from the server
    #[error("Validation error: {0}")]
    Validation(String),

    /// Server error carrying a known code
    #[error("API error {code}: {message}")]
    Api { code: ErrorCode, message: String },

    /// Mutation the backend does not provide
    #[error("Not wired: {0}")]
    NotWired(String),

    /// Session store failure
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Invalid configuration
    #[error("Config error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Error code for logs and the notice line
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Http(e) if e.is_timeout() => ErrorCode::TimeoutError,
            Self::Http(_) => ErrorCode::NetworkError,
            Self::InvalidResponse(_) | Self::Serialization(_) => ErrorCode::InvalidFormat,
            Self::Unauthorized(_) => ErrorCode::NotAuthenticated,
            Self::Forbidden(_) => ErrorCode::PermissionDenied,
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::Validation(_) => ErrorCode::ValidationFailed,
            Self::Api { code, .. } => *code,
            Self::NotWired(_) => ErrorCode::NotWired,
            Self::Session(_) | Self::Io(_) => ErrorCode::StorageError,
            Self::Config(_) => ErrorCode::ConfigError,
            Self::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// Whether this error invalidates the current session
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    /// Text shown to the user. Server messages are passed through verbatim.
    pub fn user_message(&self) -> String {
        match self {
            Self::Http(e) if e.is_timeout() => "Máy chủ phản hồi quá lâu, vui lòng thử lại".into(),
            Self::Http(_) => "Không thể kết nối tới máy chủ".into(),
            Self::InvalidResponse(_) | Self::Serialization(_) => {
                "Dữ liệu máy chủ trả về không hợp lệ".into()
            }
            Self::Unauthorized(msg) => {
                non_empty(msg).unwrap_or("Phiên đăng nhập đã hết hạn, vui lòng đăng nhập lại").into()
            }
            Self::Forbidden(msg) => {
                non_empty(msg).unwrap_or("Bạn không có quyền thực hiện thao tác này").into()
            }
            Self::NotFound(msg) => non_empty(msg).unwrap_or("Không tìm thấy dữ liệu").into(),
            Self::Validation(msg) | Self::Api { message: msg, .. } | Self::Internal(msg) => {
                msg.clone()
            }
            Self::NotWired(_) => NOT_WIRED_MESSAGE.into(),
            Self::Session(e) => format!("Lỗi lưu phiên đăng nhập: {e}"),
            Self::Config(msg) => format!("Cấu hình không hợp lệ: {msg}"),
            Self::Io(e) => format!("Lỗi đọc/ghi tệp: {e}"),
        }
    }
}

fn non_empty(s: &str) -> Option<&str> {
    let s = s.trim();
    (!s.is_empty()).then_some(s)
}

impl From<AppError> for ClientError {
    fn from(err: AppError) -> Self {
        let AppError {
            code,
            message,
            details,
        } = err;
        match code.category() {
            ErrorCategory::Auth => Self::Unauthorized(message),
            ErrorCategory::Permission => Self::Forbidden(message),
            _ => match code {
                ErrorCode::NotWired => Self::NotWired(
                    details
                        .and_then(|d| d.get("operation").and_then(|v| v.as_str()).map(str::to_string))
                        .unwrap_or(message),
                ),
                ErrorCode::NotFound
                | ErrorCode::MemberNotFound
                | ErrorCode::UnitNotFound
                | ErrorCode::PostNotFound
                | ErrorCode::SuggestionNotFound
                | ErrorCode::SurveyNotFound => Self::NotFound(message),
                ErrorCode::ValidationFailed
                | ErrorCode::RequiredField
                | ErrorCode::InvalidRequest
                | ErrorCode::ValueOutOfRange => Self::Validation(message),
                ErrorCode::InvalidFormat => Self::InvalidResponse(message),
                _ => Self::Api { code, message },
            },
        }
    }
}

impl From<ValidationErrors> for ClientError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
