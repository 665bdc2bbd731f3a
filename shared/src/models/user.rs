//! User / Profile Model

use crate::models::serde_helpers;
use crate::types::{Id, Labeled};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Account role
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[serde(alias = "ADMIN")]
    Admin,
    #[serde(alias = "LEADER")]
    Leader,
    #[default]
    #[serde(alias = "MEMBER")]
    Member,
}

impl Role {
    /// Whether this role may sign in to the admin console at all
    pub fn can_access_console(&self) -> bool {
        matches!(self, Self::Admin | Self::Leader)
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl Labeled for Role {
    const ALL: &'static [Self] = &[Self::Admin, Self::Leader, Self::Member];

    fn code(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Leader => "leader",
            Self::Member => "member",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Admin => "Quản trị viên",
            Self::Leader => "Bí thư chi đoàn",
            Self::Member => "Đoàn viên",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| format!("unknown role: {s}"))
    }
}

/// Account profile of a signed-in user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Id,
    #[serde(default, deserialize_with = "serde_helpers::null_default")]
    pub username: String,
    #[serde(alias = "full_name", alias = "name")]
    pub full_name: String,
    #[serde(default, deserialize_with = "serde_helpers::null_default")]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "serde_helpers::null_default")]
    pub role: Role,
    #[serde(default, alias = "unit_id")]
    pub unit_id: Option<Id>,
    #[serde(default, alias = "birth_date", alias = "dateOfBirth")]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default, alias = "avatar", alias = "avatar_url")]
    pub avatar_url: Option<String>,
    #[serde(default, alias = "created_at")]
    pub created_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    /// Name shown in the shell header
    pub fn display_name(&self) -> &str {
        if self.full_name.trim().is_empty() {
            &self.username
        } else {
            &self.full_name
        }
    }
}

/// Update own profile payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

impl ProfileUpdate {
    /// Form seeded from the current profile
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            full_name: profile.full_name.clone(),
            email: profile.email.clone(),
            phone: profile.phone.clone(),
            birth_date: profile.birth_date,
            address: profile.address.clone(),
            bio: profile.bio.clone(),
        }
    }

    /// Apply the update locally, as the server will after a successful save
    pub fn apply_to(&self, profile: &mut UserProfile) {
        profile.full_name = self.full_name.clone();
        profile.email = self.email.clone();
        profile.phone = self.phone.clone();
        profile.birth_date = self.birth_date;
        profile.address = self.address.clone();
        profile.bio = self.bio.clone();
    }
}
