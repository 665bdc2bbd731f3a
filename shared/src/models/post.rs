//! Post Model

use crate::error::{AppError, AppResult, ErrorCode};
use crate::models::serde_helpers;
use crate::types::{Id, Labeled};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Post lifecycle status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[serde(alias = "DRAFT")]
    Draft,
    #[default]
    #[serde(alias = "PENDING")]
    Pending,
    #[serde(alias = "APPROVED")]
    Approved,
    #[serde(alias = "REJECTED")]
    Rejected,
}

impl PostStatus {
    /// Moderation transitions the console allows
    pub fn can_transition_to(&self, next: PostStatus) -> bool {
        use PostStatus::*;
        matches!(
            (self, next),
            (Draft, Pending) | (Pending, Approved) | (Pending, Rejected) | (Rejected, Pending)
        )
    }

    /// Validate a moderation transition
    pub fn transition(&self, next: PostStatus) -> AppResult<PostStatus> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(AppError::with_message(
                ErrorCode::PostInvalidTransition,
                format!("Không thể chuyển từ \"{}\" sang \"{}\"", self.label(), next.label()),
            ))
        }
    }
}

impl Labeled for PostStatus {
    const ALL: &'static [Self] = &[Self::Draft, Self::Pending, Self::Approved, Self::Rejected];

    fn code(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Draft => "Bản nháp",
            Self::Pending => "Chờ duyệt",
            Self::Approved => "Đã duyệt",
            Self::Rejected => "Từ chối",
        }
    }
}

impl FromStr for PostStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| format!("unknown post status: {s}"))
    }
}

/// Post type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostType {
    #[serde(alias = "ANNOUNCEMENT")]
    Announcement,
    #[default]
    #[serde(alias = "NEWS")]
    News,
    #[serde(alias = "SUGGESTION")]
    Suggestion,
}

impl Labeled for PostType {
    const ALL: &'static [Self] = &[Self::Announcement, Self::News, Self::Suggestion];

    fn code(&self) -> &'static str {
        match self {
            Self::Announcement => "announcement",
            Self::News => "news",
            Self::Suggestion => "suggestion",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Announcement => "Thông báo",
            Self::News => "Tin tức",
            Self::Suggestion => "Góp ý",
        }
    }
}

impl FromStr for PostType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| format!("unknown post type: {s}"))
    }
}

/// Post entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Id,
    pub title: String,
    #[serde(default, alias = "body", deserialize_with = "serde_helpers::null_default")]
    pub content: String,
    #[serde(default, alias = "author_id")]
    pub author_id: Option<Id>,
    #[serde(
        default,
        alias = "author",
        alias = "author_name",
        deserialize_with = "serde_helpers::null_default"
    )]
    pub author_name: String,
    #[serde(default, deserialize_with = "serde_helpers::null_default")]
    pub status: PostStatus,
    #[serde(
        default,
        rename = "type",
        alias = "postType",
        alias = "post_type",
        deserialize_with = "serde_helpers::null_default"
    )]
    pub post_type: PostType,
    #[serde(default, alias = "created_at")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "updated_at")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        alias = "views",
        alias = "view_count",
        deserialize_with = "serde_helpers::null_default"
    )]
    pub view_count: u32,
}

/// Update / moderate post payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PostStatus>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub post_type: Option<PostType>,
}

impl PostUpdate {
    /// Status-only payload used by approve/reject
    pub fn status(status: PostStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}
