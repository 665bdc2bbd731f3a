//! Survey Model

use crate::models::serde_helpers;
use crate::types::{Id, Labeled};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Survey status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurveyStatus {
    #[default]
    #[serde(alias = "DRAFT")]
    Draft,
    #[serde(alias = "ACTIVE", alias = "open")]
    Active,
    #[serde(alias = "CLOSED")]
    Closed,
}

impl Labeled for SurveyStatus {
    const ALL: &'static [Self] = &[Self::Draft, Self::Active, Self::Closed];

    fn code(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Closed => "closed",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Draft => "Bản nháp",
            Self::Active => "Đang mở",
            Self::Closed => "Đã đóng",
        }
    }
}

impl FromStr for SurveyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| format!("unknown survey status: {s}"))
    }
}

/// Survey entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Survey {
    pub id: Id,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "serde_helpers::null_default")]
    pub status: SurveyStatus,
    #[serde(
        default,
        alias = "questionCount",
        alias = "question_count",
        deserialize_with = "serde_helpers::null_default"
    )]
    pub question_count: u32,
    #[serde(
        default,
        alias = "responses",
        alias = "response_count",
        deserialize_with = "serde_helpers::null_default"
    )]
    pub response_count: u32,
    #[serde(
        default,
        alias = "targetCount",
        alias = "target_count",
        deserialize_with = "serde_helpers::null_default"
    )]
    pub target_count: u32,
    #[serde(default, alias = "start_date", alias = "startDate")]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "end_date", alias = "endDate")]
    pub ends_at: Option<DateTime<Utc>>,
}

impl Survey {
    /// Responses over target, in percent; 0 when no target is set
    pub fn response_rate(&self) -> f64 {
        if self.target_count == 0 {
            return 0.0;
        }
        f64::from(self.response_count) * 100.0 / f64::from(self.target_count)
    }

    pub fn is_open(&self) -> bool {
        self.status == SurveyStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_survey_response_rate() {
        let survey: Survey = serde_json::from_str(
            r#"{"id": 4, "title": "Khảo sát sinh hoạt chi đoàn", "status": "open", "responses": 30, "targetCount": 40}"#,
        )
        .unwrap();
        assert!(survey.is_open());
        assert_eq!(survey.response_rate(), 75.0);

        let draft: Survey = serde_json::from_str(r#"{"id": 5, "title": "Nháp"}"#).unwrap();
        assert_eq!(draft.status, SurveyStatus::Draft);
        assert_eq!(draft.response_rate(), 0.0);
    }
}
