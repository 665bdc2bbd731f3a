//! QR code payloads
//!
//! A QR code carries a short text payload:
//!
//! ```text
//! DOAN:<kind>:<id>:<issued_at>:<checksum>
//! ```
//!
//! `issued_at` is a unix timestamp in seconds and `checksum` is the first 8
//! hex chars of SHA-256 over everything before the last colon. Rendering the
//! payload into an image is left to the printer.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::error::{AppError, ErrorCode};
use crate::types::{Id, Labeled};

/// Payload prefix
pub const QR_PREFIX: &str = "DOAN";

const CHECKSUM_LEN: usize = 8;

/// What a QR code points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QrKind {
    MemberCard,
    Activity,
    Survey,
}

impl Labeled for QrKind {
    const ALL: &'static [Self] = &[Self::MemberCard, Self::Activity, Self::Survey];

    fn code(&self) -> &'static str {
        match self {
            Self::MemberCard => "member",
            Self::Activity => "activity",
            Self::Survey => "survey",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::MemberCard => "Thẻ đoàn viên",
            Self::Activity => "Điểm danh hoạt động",
            Self::Survey => "Khảo sát",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QrError {
    #[error("QR payload is malformed")]
    Malformed,
    #[error("unknown QR kind: {0}")]
    UnknownKind(String),
    #[error("invalid id: {0}")]
    InvalidId(String),
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
    #[error("checksum mismatch")]
    ChecksumMismatch,
}

impl From<QrError> for AppError {
    fn from(err: QrError) -> Self {
        AppError::with_message(ErrorCode::InvalidFormat, format!("Mã QR không hợp lệ: {err}"))
    }
}

/// Decoded QR payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QrPayload {
    pub kind: QrKind,
    pub id: Id,
    /// Truncated to whole seconds
    pub issued_at: DateTime<Utc>,
}

impl QrPayload {
    pub fn new(kind: QrKind, id: Id, issued_at: DateTime<Utc>) -> Self {
        let issued_at = DateTime::from_timestamp(issued_at.timestamp(), 0).unwrap_or(issued_at);
        Self {
            kind,
            id,
            issued_at,
        }
    }

    fn prefix(&self) -> String {
        format!(
            "{QR_PREFIX}:{}:{}:{}",
            self.kind.code(),
            self.id,
            self.issued_at.timestamp()
        )
    }

    pub fn encode(&self) -> String {
        let prefix = self.prefix();
        let checksum = checksum(&prefix);
        format!("{prefix}:{checksum}")
    }

    pub fn decode(text: &str) -> Result<Self, QrError> {
        let text = text.trim();
        let (prefix, sum) = text.rsplit_once(':').ok_or(QrError::Malformed)?;
        let parts: Vec<&str> = prefix.split(':').collect();
        let [tag, kind, id, ts] = parts.as_slice() else {
            return Err(QrError::Malformed);
        };
        if *tag != QR_PREFIX || sum.len() != CHECKSUM_LEN {
            return Err(QrError::Malformed);
        }
        if !sum.eq_ignore_ascii_case(&checksum(prefix)) {
            return Err(QrError::ChecksumMismatch);
        }
        let kind = QrKind::from_code(kind).ok_or_else(|| QrError::UnknownKind(kind.to_string()))?;
        let id: Id = id.parse().map_err(|_| QrError::InvalidId(id.to_string()))?;
        let issued_at = ts
            .parse::<i64>()
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .ok_or_else(|| QrError::InvalidTimestamp(ts.to_string()))?;
        Ok(Self {
            kind,
            id,
            issued_at,
        })
    }
}

impl fmt::Display for QrPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for QrPayload {
    type Err = QrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

fn checksum(prefix: &str) -> String {
    let digest = Sha256::digest(prefix.as_bytes());
    let mut hex = hex::encode(digest);
    hex.truncate(CHECKSUM_LEN);
    hex
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issued() -> DateTime<Utc> {
        DateTime::from_timestamp(1_710_000_000, 0).unwrap()
    }

    #[test]
    fn test_encode_shape() {
        let payload = QrPayload::new(QrKind::MemberCard, 42, issued());
        let text = payload.encode();
        assert!(text.starts_with("DOAN:member:42:1710000000:"));
        assert_eq!(text.rsplit(':').next().unwrap().len(), 8);
        assert_eq!(QrPayload::decode(&text).unwrap(), payload);
        assert_eq!(text.parse::<QrPayload>().unwrap(), payload);
    }

    #[test]
    fn test_new_truncates_subseconds() {
        let at = DateTime::from_timestamp(1_710_000_000, 500_000_000).unwrap();
        let payload = QrPayload::new(QrKind::Survey, 7, at);
        assert_eq!(QrPayload::decode(&payload.encode()).unwrap(), payload);
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let text = QrPayload::new(QrKind::Activity, 5, issued()).encode();
        let tampered = text.replacen(":5:", ":6:", 1);
        assert_eq!(QrPayload::decode(&tampered), Err(QrError::ChecksumMismatch));
    }

    #[test]
    fn test_malformed_payloads() {
        assert_eq!(QrPayload::decode(""), Err(QrError::Malformed));
        assert_eq!(QrPayload::decode("DOAN:member:1"), Err(QrError::Malformed));
        assert_eq!(
            QrPayload::decode("XXXX:member:1:1710000000:deadbeef"),
            Err(QrError::Malformed)
        );

        let prefix = "DOAN:badge:1:1710000000";
        let text = format!("{prefix}:{}", checksum(prefix));
        assert_eq!(
            QrPayload::decode(&text),
            Err(QrError::UnknownKind("badge".into()))
        );
    }
}
