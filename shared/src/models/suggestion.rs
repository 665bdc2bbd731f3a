//! Suggestion Model (góp ý, kiến nghị)

use crate::error::{AppError, AppResult, ErrorCode};
use crate::models::serde_helpers;
use crate::types::{Id, Labeled};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Label shown in place of the submitter of an anonymous suggestion
pub const ANONYMOUS_LABEL: &str = "Ẩn danh";

/// Suggestion category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionCategory {
    Facility,
    Activity,
    Study,
    Policy,
    #[default]
    #[serde(other)]
    Other,
}

impl Labeled for SuggestionCategory {
    const ALL: &'static [Self] = &[
        Self::Facility,
        Self::Activity,
        Self::Study,
        Self::Policy,
        Self::Other,
    ];

    fn code(&self) -> &'static str {
        match self {
            Self::Facility => "facility",
            Self::Activity => "activity",
            Self::Study => "study",
            Self::Policy => "policy",
            Self::Other => "other",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Facility => "Cơ sở vật chất",
            Self::Activity => "Hoạt động",
            Self::Study => "Học tập",
            Self::Policy => "Chính sách",
            Self::Other => "Khác",
        }
    }
}

impl FromStr for SuggestionCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| format!("unknown category: {s}"))
    }
}

/// Suggestion priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl Labeled for Priority {
    const ALL: &'static [Self] = &[Self::Low, Self::Medium, Self::High, Self::Urgent];

    fn code(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Low => "Thấp",
            Self::Medium => "Trung bình",
            Self::High => "Cao",
            Self::Urgent => "Khẩn cấp",
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| format!("unknown priority: {s}"))
    }
}

/// Five-state review lifecycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionStatus {
    #[default]
    Submitted,
    UnderReview,
    InProgress,
    Resolved,
    Rejected,
}

impl SuggestionStatus {
    /// Review transitions the console allows; a rejected item may be reopened
    pub fn can_transition_to(&self, next: SuggestionStatus) -> bool {
        use SuggestionStatus::*;
        matches!(
            (self, next),
            (Submitted, UnderReview)
                | (Submitted, Rejected)
                | (UnderReview, InProgress)
                | (UnderReview, Resolved)
                | (UnderReview, Rejected)
                | (InProgress, Resolved)
                | (InProgress, Rejected)
                | (Rejected, UnderReview)
        )
    }

    pub fn transition(&self, next: SuggestionStatus) -> AppResult<SuggestionStatus> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(AppError::with_message(
                ErrorCode::SuggestionInvalidTransition,
                format!("Không thể chuyển từ \"{}\" sang \"{}\"", self.label(), next.label()),
            ))
        }
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Resolved | Self::Rejected)
    }
}

impl Labeled for SuggestionStatus {
    const ALL: &'static [Self] = &[
        Self::Submitted,
        Self::UnderReview,
        Self::InProgress,
        Self::Resolved,
        Self::Rejected,
    ];

    fn code(&self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::UnderReview => "under_review",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
            Self::Rejected => "rejected",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Submitted => "Đã gửi",
            Self::UnderReview => "Đang xem xét",
            Self::InProgress => "Đang xử lý",
            Self::Resolved => "Đã giải quyết",
            Self::Rejected => "Từ chối",
        }
    }
}

impl FromStr for SuggestionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| format!("unknown suggestion status: {s}"))
    }
}

/// Reference to the member who submitted a suggestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitterRef {
    pub id: Id,
    #[serde(alias = "fullName", alias = "full_name")]
    pub name: String,
    #[serde(default, alias = "unit_name")]
    pub unit_name: Option<String>,
}

/// One response in a suggestion's thread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionResponse {
    #[serde(default)]
    pub id: Option<Id>,
    pub content: String,
    #[serde(
        default,
        alias = "responder",
        alias = "responder_name",
        deserialize_with = "serde_helpers::null_default"
    )]
    pub responder_name: String,
    #[serde(default, alias = "created_at")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Suggestion entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub id: Id,
    pub title: String,
    #[serde(default, deserialize_with = "serde_helpers::null_default")]
    pub content: String,
    #[serde(default, deserialize_with = "serde_helpers::null_default")]
    pub category: SuggestionCategory,
    #[serde(default, deserialize_with = "serde_helpers::null_default")]
    pub priority: Priority,
    #[serde(default, deserialize_with = "serde_helpers::null_default")]
    pub status: SuggestionStatus,
    #[serde(
        default,
        alias = "is_anonymous",
        alias = "anonymous",
        deserialize_with = "serde_helpers::null_default"
    )]
    pub is_anonymous: bool,
    #[serde(default, alias = "submittedBy", alias = "submitted_by")]
    pub submitter: Option<SubmitterRef>,
    #[serde(default, deserialize_with = "serde_helpers::null_default")]
    pub responses: Vec<SuggestionResponse>,
    #[serde(
        default,
        alias = "views",
        alias = "view_count",
        deserialize_with = "serde_helpers::null_default"
    )]
    pub view_count: u32,
    #[serde(default, alias = "created_at")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Suggestion {
    /// Submitter name for display; anonymous items never reveal one
    pub fn display_submitter(&self) -> &str {
        if self.is_anonymous {
            return ANONYMOUS_LABEL;
        }
        self.submitter
            .as_ref()
            .map(|s| s.name.as_str())
            .unwrap_or(ANONYMOUS_LABEL)
    }
}

/// Add-response payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RespondRequest {
    pub content: String,
}

impl RespondRequest {
    pub fn new(content: impl Into<String>) -> AppResult<Self> {
        let content = content.into().trim().to_string();
        if content.is_empty() {
            return Err(AppError::new(ErrorCode::SuggestionResponseEmpty));
        }
        Ok(Self { content })
    }
}

/// Status update payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: SuggestionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Counts per priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityCounts {
    #[serde(default, deserialize_with = "serde_helpers::null_default")]
    pub low: u64,
    #[serde(default, deserialize_with = "serde_helpers::null_default")]
    pub medium: u64,
    #[serde(default, deserialize_with = "serde_helpers::null_default")]
    pub high: u64,
    #[serde(default, deserialize_with = "serde_helpers::null_default")]
    pub urgent: u64,
}

/// Suggestion statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionStats {
    #[serde(default, deserialize_with = "serde_helpers::null_default")]
    pub total: u64,
    #[serde(default, deserialize_with = "serde_helpers::null_default")]
    pub submitted: u64,
    #[serde(default, alias = "under_review", deserialize_with = "serde_helpers::null_default")]
    pub under_review: u64,
    #[serde(default, alias = "in_progress", deserialize_with = "serde_helpers::null_default")]
    pub in_progress: u64,
    #[serde(default, deserialize_with = "serde_helpers::null_default")]
    pub resolved: u64,
    #[serde(default, deserialize_with = "serde_helpers::null_default")]
    pub rejected: u64,
    #[serde(default, alias = "by_priority", deserialize_with = "serde_helpers::null_default")]
    pub by_priority: PriorityCounts,
}

impl SuggestionStats {
    /// Compute stats locally from loaded items
    pub fn from_items(items: &[Suggestion]) -> Self {
        let mut stats = Self::default();
        for s in items {
            stats.total += 1;
            match s.status {
                SuggestionStatus::Submitted => stats.submitted += 1,
                SuggestionStatus::UnderReview => stats.under_review += 1,
                SuggestionStatus::InProgress => stats.in_progress += 1,
                SuggestionStatus::Resolved => stats.resolved += 1,
                SuggestionStatus::Rejected => stats.rejected += 1,
            }
            match s.priority {
                Priority::Low => stats.by_priority.low += 1,
                Priority::Medium => stats.by_priority.medium += 1,
                Priority::High => stats.by_priority.high += 1,
                Priority::Urgent => stats.by_priority.urgent += 1,
            }
        }
        stats
    }

    pub fn count(&self, status: SuggestionStatus) -> u64 {
        match status {
            SuggestionStatus::Submitted => self.submitted,
            SuggestionStatus::UnderReview => self.under_review,
            SuggestionStatus::InProgress => self.in_progress,
            SuggestionStatus::Resolved => self.resolved,
            SuggestionStatus::Rejected => self.rejected,
        }
    }

    /// Share of suggestions resolved, in percent
    pub fn resolution_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.resolved as f64 * 100.0 / self.total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suggestion(status: SuggestionStatus, priority: Priority, anonymous: bool) -> Suggestion {
        Suggestion {
            id: 1,
            title: "Sửa đèn phòng sinh hoạt".into(),
            content: "Đèn hỏng đã hai tuần".into(),
            category: SuggestionCategory::Facility,
            priority,
            status,
            is_anonymous: anonymous,
            submitter: Some(SubmitterRef {
                id: 9,
                name: "Trần Thị Bình".into(),
                unit_name: None,
            }),
            responses: Vec::new(),
            view_count: 0,
            created_at: None,
        }
    }

    #[test]
    fn test_anonymous_hides_submitter() {
        let s = suggestion(SuggestionStatus::Submitted, Priority::Low, true);
        assert_eq!(s.display_submitter(), ANONYMOUS_LABEL);
        let s = suggestion(SuggestionStatus::Submitted, Priority::Low, false);
        assert_eq!(s.display_submitter(), "Trần Thị Bình");
    }

    #[test]
    fn test_status_wire_codes() {
        let status: SuggestionStatus = serde_json::from_str("\"under_review\"").unwrap();
        assert_eq!(status, SuggestionStatus::UnderReview);
        assert_eq!(
            serde_json::to_string(&SuggestionStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        let category: SuggestionCategory = serde_json::from_str("\"canteen\"").unwrap();
        assert_eq!(category, SuggestionCategory::Other);
    }

    #[test]
    fn test_review_transitions() {
        assert!(SuggestionStatus::Submitted.can_transition_to(SuggestionStatus::UnderReview));
        assert!(SuggestionStatus::Rejected.can_transition_to(SuggestionStatus::UnderReview));
        assert!(!SuggestionStatus::Resolved.can_transition_to(SuggestionStatus::Submitted));
        assert!(SuggestionStatus::Resolved.transition(SuggestionStatus::InProgress).is_err());
        assert!(!SuggestionStatus::Resolved.is_open());
    }

    #[test]
    fn test_respond_request_rejects_blank() {
        assert_eq!(
            RespondRequest::new("   ").unwrap_err().code,
            ErrorCode::SuggestionResponseEmpty
        );
        assert_eq!(RespondRequest::new(" Đã ghi nhận ").unwrap().content, "Đã ghi nhận");
    }

    #[test]
    fn test_stats_from_items() {
        let items = vec![
            suggestion(SuggestionStatus::Submitted, Priority::Urgent, false),
            suggestion(SuggestionStatus::Resolved, Priority::High, false),
            suggestion(SuggestionStatus::Resolved, Priority::Low, true),
            suggestion(SuggestionStatus::Rejected, Priority::Low, false),
        ];
        let stats = SuggestionStats::from_items(&items);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.count(SuggestionStatus::Resolved), 2);
        assert_eq!(stats.by_priority.low, 2);
        assert_eq!(stats.by_priority.urgent, 1);
        assert_eq!(stats.resolution_rate(), 50.0);
    }
}
