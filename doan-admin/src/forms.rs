//! Field setters for the edit modals
//!
//! The draft of an edit modal is the entity itself; `set <field> <value>`
//! lands here. Values are parsed but not validated: validation runs once,
//! on save.

use shared::models::{Member, Survey, Unit};
use shared::types::Id;

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn parse<T: std::str::FromStr>(value: &str, label: &str) -> Result<T, String> {
    value
        .trim()
        .parse()
        .map_err(|_| format!("{label} không hợp lệ: {value}"))
}

pub const MEMBER_FIELDS: &[&str] = &[
    "name", "email", "phone", "unit", "rank", "status", "points", "education", "workplace",
];

pub fn set_member_field(member: &mut Member, field: &str, value: &str) -> Result<(), String> {
    match field {
        "name" => member.name = value.trim().to_string(),
        "email" => member.email = value.trim().to_string(),
        "phone" => member.phone = optional(value),
        "unit" => {
            member.unit_id = match value.trim() {
                "" => None,
                v => Some(parse::<Id>(v, "Mã chi đoàn")?),
            }
        }
        "rank" => {
            member.rank = match value.trim() {
                "" => None,
                v => Some(parse(v, "Xếp loại")?),
            }
        }
        "status" => member.status = parse(value, "Trạng thái")?,
        "points" => member.points = parse(value, "Điểm rèn luyện")?,
        "education" => member.education = optional(value),
        "workplace" => member.workplace = optional(value),
        _ => {
            return Err(format!(
                "Không có trường '{field}' (có: {})",
                MEMBER_FIELDS.join(", ")
            ));
        }
    }
    Ok(())
}

pub const UNIT_FIELDS: &[&str] = &["name", "leader", "status", "description"];

pub fn set_unit_field(unit: &mut Unit, field: &str, value: &str) -> Result<(), String> {
    match field {
        "name" => unit.name = value.trim().to_string(),
        "leader" => unit.leader_name = value.trim().to_string(),
        "status" => unit.status = parse(value, "Trạng thái")?,
        "description" => unit.description = optional(value),
        _ => {
            return Err(format!(
                "Không có trường '{field}' (có: {})",
                UNIT_FIELDS.join(", ")
            ));
        }
    }
    Ok(())
}

pub const SURVEY_FIELDS: &[&str] = &["title", "description", "status", "target"];

pub fn set_survey_field(survey: &mut Survey, field: &str, value: &str) -> Result<(), String> {
    match field {
        "title" => survey.title = value.trim().to_string(),
        "description" => survey.description = optional(value),
        "status" => survey.status = parse(value, "Trạng thái")?,
        "target" => survey.target_count = parse(value, "Số người cần khảo sát")?,
        _ => {
            return Err(format!(
                "Không có trường '{field}' (có: {})",
                SURVEY_FIELDS.join(", ")
            ));
        }
    }
    Ok(())
}
