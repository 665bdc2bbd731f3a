//! Text-command editing of the filter records

use std::fmt::Display;
use std::str::FromStr;

use shared::listing::{Choice, MemberFilter, PostFilter, SuggestionFilter, SurveyFilter, UnitFilter};
use shared::types::Labeled;

/// A filter record that can be edited by field name
pub trait FilterForm {
    /// Names accepted by [`set_field`](Self::set_field)
    const FIELDS: &'static [&'static str];

    fn set_search(&mut self, text: &str);

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), String>;

    /// One-line summary of the active filters
    fn describe(&self) -> String;
}

fn parse_choice<T>(value: &str) -> Result<Choice<T>, String>
where
    T: FromStr,
    T::Err: Display,
{
    value.parse().map_err(|e: T::Err| e.to_string())
}

fn unknown_field(field: &str, known: &[&str]) -> String {
    format!("Không có bộ lọc '{field}' (có: {})", known.join(", "))
}

fn summary(search: &str, choices: &[(&str, &str)]) -> String {
    let mut parts = Vec::new();
    if !search.trim().is_empty() {
        parts.push(format!("Tìm kiếm: \"{}\"", search.trim()));
    }
    for (name, label) in choices {
        parts.push(format!("{name}: {label}"));
    }
    parts.join(" · ")
}

impl FilterForm for MemberFilter {
    const FIELDS: &'static [&'static str] = &["unit", "rank", "status"];

    fn set_search(&mut self, text: &str) {
        self.search = text.to_string();
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), String> {
        match field {
            "unit" => self.unit = parse_choice(value)?,
            "rank" => self.rank = parse_choice(value)?,
            "status" => self.status = parse_choice(value)?,
            _ => return Err(unknown_field(field, Self::FIELDS)),
        }
        Ok(())
    }

    fn describe(&self) -> String {
        let unit = match self.unit {
            Choice::All => "Tất cả".to_string(),
            Choice::Only(id) => format!("#{id}"),
        };
        summary(
            &self.search,
            &[
                ("Chi đoàn", unit.as_str()),
                ("Xếp loại", self.rank.label()),
                ("Trạng thái", self.status.label()),
            ],
        )
    }
}

impl FilterForm for UnitFilter {
    const FIELDS: &'static [&'static str] = &["status"];

    fn set_search(&mut self, text: &str) {
        self.search = text.to_string();
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), String> {
        match field {
            "status" => self.status = parse_choice(value)?,
            _ => return Err(unknown_field(field, Self::FIELDS)),
        }
        Ok(())
    }

    fn describe(&self) -> String {
        summary(&self.search, &[("Trạng thái", self.status.label())])
    }
}

impl FilterForm for PostFilter {
    const FIELDS: &'static [&'static str] = &["status", "type"];

    fn set_search(&mut self, text: &str) {
        self.search = text.to_string();
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), String> {
        match field {
            "status" => self.status = parse_choice(value)?,
            "type" => self.post_type = parse_choice(value)?,
            _ => return Err(unknown_field(field, Self::FIELDS)),
        }
        Ok(())
    }

    fn describe(&self) -> String {
        summary(
            &self.search,
            &[
                ("Trạng thái", self.status.label()),
                ("Loại", self.post_type.label()),
            ],
        )
    }
}

impl FilterForm for SuggestionFilter {
    const FIELDS: &'static [&'static str] = &["status", "priority", "category"];

    fn set_search(&mut self, text: &str) {
        self.search = text.to_string();
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), String> {
        match field {
            "status" => self.status = parse_choice(value)?,
            "priority" => self.priority = parse_choice(value)?,
            "category" => self.category = parse_choice(value)?,
            _ => return Err(unknown_field(field, Self::FIELDS)),
        }
        Ok(())
    }

    fn describe(&self) -> String {
        summary(
            &self.search,
            &[
                ("Trạng thái", self.status.label()),
                ("Ưu tiên", self.priority.label()),
                ("Danh mục", self.category.label()),
            ],
        )
    }
}

impl FilterForm for SurveyFilter {
    const FIELDS: &'static [&'static str] = &["status"];

    fn set_search(&mut self, text: &str) {
        self.search = text.to_string();
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), String> {
        match field {
            "status" => self.status = parse_choice(value)?,
            _ => return Err(unknown_field(field, Self::FIELDS)),
        }
        Ok(())
    }

    fn describe(&self) -> String {
        summary(&self.search, &[("Trạng thái", self.status.label())])
    }
}

/// `code = label` pairs for the help text of one enum
pub fn choice_help<T: Labeled>() -> String {
    T::ALL
        .iter()
        .map(|v| format!("{}={}", v.code(), v.label()))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{Priority, SuggestionStatus};

    #[test]
    fn test_suggestion_filter_fields() {
        let mut filter = SuggestionFilter::default();
        filter.set_field("status", "under_review").unwrap();
        filter.set_field("priority", "urgent").unwrap();
        assert_eq!(filter.status, Choice::Only(SuggestionStatus::UnderReview));
        assert_eq!(filter.priority, Choice::Only(Priority::Urgent));

        filter.set_field("priority", "all").unwrap();
        assert!(filter.priority.is_all());
        assert!(filter.set_field("rank", "KHA").is_err());
    }

    #[test]
    fn test_member_unit_filter_takes_id() {
        let mut filter = MemberFilter::default();
        filter.set_field("unit", "12").unwrap();
        assert_eq!(filter.unit, Choice::Only(12));
        assert!(filter.set_field("unit", "mười hai").is_err());
        filter.set_search(" an ");
        assert!(filter.describe().starts_with("Tìm kiếm: \"an\""));
        assert!(filter.describe().contains("Chi đoàn: #12"));
    }

    #[test]
    fn test_choice_help_lists_codes() {
        assert_eq!(
            choice_help::<shared::models::Rank>(),
            "XUAT_SAC=Xuất sắc, KHA=Khá, TRUNG_BINH=Trung bình, YEU=Yếu"
        );
    }
}
