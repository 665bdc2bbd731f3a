//! Member Model

use crate::models::{Role, serde_helpers};
use crate::types::{Id, Labeled};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Four-level qualitative grade (xếp loại)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rank {
    #[serde(rename = "XUAT_SAC", alias = "excellent")]
    Excellent,
    #[serde(rename = "KHA", alias = "good")]
    Good,
    #[serde(rename = "TRUNG_BINH", alias = "average")]
    Average,
    #[serde(rename = "YEU", alias = "poor")]
    Poor,
}

impl Rank {
    /// Grade implied by an accumulated point total
    pub fn from_points(points: i64) -> Self {
        match points {
            p if p >= 90 => Self::Excellent,
            p if p >= 70 => Self::Good,
            p if p >= 50 => Self::Average,
            _ => Self::Poor,
        }
    }
}

impl Labeled for Rank {
    const ALL: &'static [Self] = &[Self::Excellent, Self::Good, Self::Average, Self::Poor];

    fn code(&self) -> &'static str {
        match self {
            Self::Excellent => "XUAT_SAC",
            Self::Good => "KHA",
            Self::Average => "TRUNG_BINH",
            Self::Poor => "YEU",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "Xuất sắc",
            Self::Good => "Khá",
            Self::Average => "Trung bình",
            Self::Poor => "Yếu",
        }
    }

    fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.code().eq_ignore_ascii_case(code))
            .or(match code.to_ascii_lowercase().as_str() {
                "excellent" => Some(Self::Excellent),
                "good" => Some(Self::Good),
                "average" => Some(Self::Average),
                "poor" => Some(Self::Poor),
                _ => None,
            })
    }
}

impl FromStr for Rank {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| format!("unknown rank: {s}"))
    }
}

/// Membership status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    #[default]
    #[serde(alias = "ACTIVE")]
    Active,
    #[serde(alias = "INACTIVE")]
    Inactive,
}

impl Labeled for MemberStatus {
    const ALL: &'static [Self] = &[Self::Active, Self::Inactive];

    fn code(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Active => "Hoạt động",
            Self::Inactive => "Không hoạt động",
        }
    }
}

impl FromStr for MemberStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| format!("unknown member status: {s}"))
    }
}

/// Member entity (đoàn viên)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: Id,
    #[serde(alias = "fullName", alias = "full_name")]
    pub name: String,
    #[serde(default, deserialize_with = "serde_helpers::null_default")]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, alias = "unit_id")]
    pub unit_id: Option<Id>,
    #[serde(default, alias = "unit_name", alias = "unit")]
    pub unit_name: Option<String>,
    /// `None` for members not graded yet
    #[serde(default)]
    pub rank: Option<Rank>,
    #[serde(default, deserialize_with = "serde_helpers::null_default")]
    pub status: MemberStatus,
    #[serde(default, deserialize_with = "serde_helpers::null_default")]
    pub points: i64,
    #[serde(default, alias = "join_date")]
    pub join_date: Option<NaiveDate>,
    #[serde(default, alias = "birth_date", alias = "dateOfBirth")]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub education: Option<String>,
    #[serde(default)]
    pub workplace: Option<String>,
    #[serde(default, deserialize_with = "serde_helpers::null_default")]
    pub role: Role,
}

impl Member {
    /// Unit name for display, "—" when unassigned
    pub fn unit_display(&self) -> &str {
        self.unit_name.as_deref().unwrap_or("—")
    }

    pub fn is_active(&self) -> bool {
        self.status == MemberStatus::Active
    }
}

/// Update member payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<Rank>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<MemberStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub education: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workplace: Option<String>,
}

impl MemberUpdate {
    /// Payload carrying only the fields that differ between `before` and `after`
    pub fn diff(before: &Member, after: &Member) -> Self {
        fn changed<T: PartialEq + Clone>(a: &T, b: &T) -> Option<T> {
            (a != b).then(|| b.clone())
        }
        Self {
            name: changed(&before.name, &after.name),
            email: changed(&before.email, &after.email),
            phone: changed(&before.phone, &after.phone).flatten(),
            unit_id: changed(&before.unit_id, &after.unit_id).flatten(),
            rank: changed(&before.rank, &after.rank).flatten(),
            status: changed(&before.status, &after.status),
            points: changed(&before.points, &after.points),
            education: changed(&before.education, &after.education).flatten(),
            workplace: changed(&before.workplace, &after.workplace).flatten(),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
