//! Unit Model (chi đoàn)

use crate::models::serde_helpers;
use crate::types::{Id, Labeled};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Unit status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitStatus {
    #[default]
    #[serde(alias = "ACTIVE")]
    Active,
    #[serde(alias = "INACTIVE")]
    Inactive,
}

impl Labeled for UnitStatus {
    const ALL: &'static [Self] = &[Self::Active, Self::Inactive];

    fn code(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Active => "Đang hoạt động",
            Self::Inactive => "Tạm ngưng",
        }
    }
}

impl FromStr for UnitStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| format!("unknown unit status: {s}"))
    }
}

/// Unit entity; `id` 0 marks a unit not yet created
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub id: Id,
    pub name: String,
    #[serde(
        default,
        alias = "leader",
        alias = "leader_name",
        deserialize_with = "serde_helpers::null_default"
    )]
    pub leader_name: String,
    #[serde(default, alias = "leader_id")]
    pub leader_id: Option<Id>,
    #[serde(
        default,
        alias = "memberCount",
        alias = "total_members",
        deserialize_with = "serde_helpers::null_default"
    )]
    pub total_members: u32,
    #[serde(default, alias = "active_members", deserialize_with = "serde_helpers::null_default")]
    pub active_members: u32,
    #[serde(
        default,
        alias = "avgPoints",
        alias = "average_points",
        deserialize_with = "serde_helpers::null_default"
    )]
    pub average_points: f64,
    #[serde(
        default,
        alias = "activities",
        alias = "activity_count",
        deserialize_with = "serde_helpers::null_default"
    )]
    pub activity_count: u32,
    #[serde(default, alias = "established_date", alias = "establishedAt")]
    pub established_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "serde_helpers::null_default")]
    pub status: UnitStatus,
    #[serde(default)]
    pub description: Option<String>,
}

impl Unit {
    /// Share of members that are active, in `[0, 1]`
    pub fn activity_rate(&self) -> f64 {
        if self.total_members == 0 {
            return 0.0;
        }
        f64::from(self.active_members.min(self.total_members)) / f64::from(self.total_members)
    }
}

/// Update unit payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitUpdate {
    pub name: String,
    pub leader_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: UnitStatus,
}

impl UnitUpdate {
    pub fn from_unit(unit: &Unit) -> Self {
        Self {
            name: unit.name.clone(),
            leader_name: unit.leader_name.clone(),
            description: unit.description.clone(),
            status: unit.status,
        }
    }

    pub fn apply_to(&self, unit: &mut Unit) {
        unit.name = self.name.clone();
        unit.leader_name = self.leader_name.clone();
        unit.description = self.description.clone();
        unit.status = self.status;
    }
}
