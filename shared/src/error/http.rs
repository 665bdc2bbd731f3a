//! Error codes for bare HTTP statuses
//!
//! Used when a failed response carries no code in its body.

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Best-effort code for a bare HTTP status with no code in the body
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            s if s.is_success() => Self::Success,
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => Self::ValidationFailed,
            StatusCode::UNAUTHORIZED => Self::NotAuthenticated,
            StatusCode::FORBIDDEN => Self::PermissionDenied,
            StatusCode::NOT_FOUND => Self::NotFound,
            StatusCode::CONFLICT => Self::AlreadyExists,
            StatusCode::NOT_IMPLEMENTED | StatusCode::METHOD_NOT_ALLOWED => Self::NotWired,
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => Self::TimeoutError,
            StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE => Self::NetworkError,
            _ => Self::InternalError,
        }
    }
}
