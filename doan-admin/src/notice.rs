//! One-line status notice shown under every screen

use std::fmt;

use doan_client::ClientError;
use shared::ValidationErrors;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

impl From<&ClientError> for Notice {
    fn from(err: &ClientError) -> Self {
        Self::error(err.user_message())
    }
}

impl From<&ValidationErrors> for Notice {
    fn from(errors: &ValidationErrors) -> Self {
        Self::error(errors.to_string())
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.level {
            NoticeLevel::Info => "[i]",
            NoticeLevel::Success => "[✓]",
            NoticeLevel::Error => "[!]",
        };
        write!(f, "{tag} {}", self.message)
    }
}
