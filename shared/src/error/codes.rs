//! Unified error codes for the Đoàn admin console
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Member errors
//! - 4xxx: Unit errors
//! - 5xxx: Post errors
//! - 6xxx: Suggestion errors
//! - 7xxx: Survey errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so they can travel inside
/// the backend's JSON envelope and be matched on by the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,
    /// Operation exists in the console but the backend does not provide it
    NotWired = 9,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Session has expired
    SessionExpired = 1005,
    /// Account is disabled
    AccountDisabled = 1006,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2002,
    /// Leader (or admin) role required
    LeaderRequired = 2003,

    // ==================== 3xxx: Member ====================
    /// Member not found
    MemberNotFound = 3001,
    /// Email already used by another member
    MemberEmailExists = 3002,
    /// New password too short
    PasswordTooShort = 3003,
    /// Password confirmation does not match
    PasswordMismatch = 3004,
    /// Current password is wrong
    CurrentPasswordIncorrect = 3005,

    // ==================== 4xxx: Unit ====================
    /// Unit not found
    UnitNotFound = 4001,
    /// Unit name already exists
    UnitNameExists = 4002,
    /// Unit still has members
    UnitHasMembers = 4003,

    // ==================== 5xxx: Post ====================
    /// Post not found
    PostNotFound = 5001,
    /// Status transition not allowed for this post
    PostInvalidTransition = 5002,

    // ==================== 6xxx: Suggestion ====================
    /// Suggestion not found
    SuggestionNotFound = 6001,
    /// Status transition not allowed for this suggestion
    SuggestionInvalidTransition = 6002,
    /// Response text is empty
    SuggestionResponseEmpty = 6003,

    // ==================== 7xxx: Survey ====================
    /// Survey not found
    SurveyNotFound = 7001,
    /// Survey is closed
    SurveyClosed = 7002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Network error
    NetworkError = 9002,
    /// Operation timeout
    TimeoutError = 9003,
    /// Configuration error
    ConfigError = 9004,
    /// Local storage (session file) error
    StorageError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Default English message for this code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",
            ErrorCode::NotWired => "Operation is not supported by the backend yet",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid username or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::SessionExpired => "Session has expired",
            ErrorCode::AccountDisabled => "Account is disabled",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AdminRequired => "Administrator role is required",
            ErrorCode::LeaderRequired => "Leader role is required",

            // Member
            ErrorCode::MemberNotFound => "Member not found",
            ErrorCode::MemberEmailExists => "Email is already in use",
            ErrorCode::PasswordTooShort => "Password must be at least 6 characters",
            ErrorCode::PasswordMismatch => "Password confirmation does not match",
            ErrorCode::CurrentPasswordIncorrect => "Current password is incorrect",

            // Unit
            ErrorCode::UnitNotFound => "Unit not found",
            ErrorCode::UnitNameExists => "Unit name already exists",
            ErrorCode::UnitHasMembers => "Unit still has members",

            // Post
            ErrorCode::PostNotFound => "Post not found",
            ErrorCode::PostInvalidTransition => "Post status change is not allowed",

            // Suggestion
            ErrorCode::SuggestionNotFound => "Suggestion not found",
            ErrorCode::SuggestionInvalidTransition => "Suggestion status change is not allowed",
            ErrorCode::SuggestionResponseEmpty => "Response must not be empty",

            // Survey
            ErrorCode::SurveyNotFound => "Survey not found",
            ErrorCode::SurveyClosed => "Survey is closed",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::StorageError => "Local storage error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),
            9 => Ok(ErrorCode::NotWired),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::SessionExpired),
            1006 => Ok(ErrorCode::AccountDisabled),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::AdminRequired),
            2003 => Ok(ErrorCode::LeaderRequired),

            // Member
            3001 => Ok(ErrorCode::MemberNotFound),
            3002 => Ok(ErrorCode::MemberEmailExists),
            3003 => Ok(ErrorCode::PasswordTooShort),
            3004 => Ok(ErrorCode::PasswordMismatch),
            3005 => Ok(ErrorCode::CurrentPasswordIncorrect),

            // Unit
            4001 => Ok(ErrorCode::UnitNotFound),
            4002 => Ok(ErrorCode::UnitNameExists),
            4003 => Ok(ErrorCode::UnitHasMembers),

            // Post
            5001 => Ok(ErrorCode::PostNotFound),
            5002 => Ok(ErrorCode::PostInvalidTransition),

            // Suggestion
            6001 => Ok(ErrorCode::SuggestionNotFound),
            6002 => Ok(ErrorCode::SuggestionInvalidTransition),
            6003 => Ok(ErrorCode::SuggestionResponseEmpty),

            // Survey
            7001 => Ok(ErrorCode::SurveyNotFound),
            7002 => Ok(ErrorCode::SurveyClosed),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::NetworkError),
            9003 => Ok(ErrorCode::TimeoutError),
            9004 => Ok(ErrorCode::ConfigError),
            9005 => Ok(ErrorCode::StorageError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
