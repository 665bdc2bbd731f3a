//! Form validation
//!
//! Text length limits and the validators run before any mutation leaves the
//! console. A form that fails here never reaches the network.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use crate::error::{AppError, ErrorCode};
use crate::models::{Member, ProfileUpdate, Survey, Unit};

// ── Text length limits ──────────────────────────────────────────────

/// Person and unit names
pub const MAX_NAME_LEN: usize = 200;

/// Descriptions, bios, responses
pub const MAX_NOTE_LEN: usize = 2000;

/// Phone numbers and other short identifiers
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Addresses
pub const MAX_ADDRESS_LEN: usize = 500;

/// Minimum new password length, in characters
pub const MIN_PASSWORD_LEN: usize = 6;

/// Passwords
pub const MAX_PASSWORD_LEN: usize = 128;

/// Field name → messages, in field order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Record the error of a failed check, if any
    pub fn check(&mut self, field: &str, result: Result<(), String>) {
        if let Err(message) = result {
            self.add(field, message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.values().map(Vec::len).sum()
    }

    pub fn has(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn messages(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .flat_map(|(f, ms)| ms.iter().map(move |m| (f.as_str(), m.as_str())))
    }

    /// First message overall, for single-line notices
    pub fn first(&self) -> Option<&str> {
        self.iter().next().map(|(_, m)| m)
    }

    /// `Ok(())` when nothing was recorded
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.iter().map(|(_, m)| m).collect();
        f.write_str(&joined.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut err = AppError::with_message(ErrorCode::ValidationFailed, errors.to_string());
        for (field, messages) in errors.fields {
            err = err.with_detail(field, Value::from(messages));
        }
        err
    }
}

// ── Field checks ────────────────────────────────────────────────────

/// Non-empty after trimming and within `max_len` characters
pub fn validate_required_text(value: &str, label: &str, max_len: usize) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{label} không được để trống"));
    }
    validate_max_len(value, label, max_len)
}

/// Within `max_len` characters when present
pub fn validate_optional_text(
    value: Option<&str>,
    label: &str,
    max_len: usize,
) -> Result<(), String> {
    match value {
        Some(v) => validate_max_len(v, label, max_len),
        None => Ok(()),
    }
}

fn validate_max_len(value: &str, label: &str, max_len: usize) -> Result<(), String> {
    let len = value.chars().count();
    if len > max_len {
        return Err(format!("{label} quá dài ({len} ký tự, tối đa {max_len})"));
    }
    Ok(())
}

/// `local@domain.tld` shape, no whitespace
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.is_empty() || email.len() > MAX_EMAIL_LEN || email.contains(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        }
        None => false,
    }
}

pub fn validate_email(email: &str) -> Result<(), String> {
    if email.trim().is_empty() {
        return Err("Email không được để trống".to_string());
    }
    if !is_valid_email(email) {
        return Err("Email không hợp lệ".to_string());
    }
    Ok(())
}

// ── Form validators ─────────────────────────────────────────────────

/// Member edit form
pub fn validate_member(member: &Member) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    errors.check("name", validate_required_text(&member.name, "Họ tên", MAX_NAME_LEN));
    errors.check("email", validate_email(&member.email));
    errors.check(
        "phone",
        validate_optional_text(member.phone.as_deref(), "Số điện thoại", MAX_SHORT_TEXT_LEN),
    );
    if member.points < 0 {
        errors.add("points", "Điểm rèn luyện không được âm");
    }
    errors.into_result()
}

/// Unit edit form; an empty name is rejected
pub fn validate_unit(unit: &Unit) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    errors.check(
        "name",
        validate_required_text(&unit.name, "Tên chi đoàn", MAX_NAME_LEN),
    );
    errors.check(
        "leader_name",
        validate_optional_text(Some(&unit.leader_name), "Bí thư", MAX_NAME_LEN),
    );
    errors.check(
        "description",
        validate_optional_text(unit.description.as_deref(), "Mô tả", MAX_NOTE_LEN),
    );
    errors.into_result()
}

/// Survey edit form
pub fn validate_survey(survey: &Survey) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    errors.check(
        "title",
        validate_required_text(&survey.title, "Tiêu đề", MAX_NAME_LEN),
    );
    errors.check(
        "description",
        validate_optional_text(survey.description.as_deref(), "Mô tả", MAX_NOTE_LEN),
    );
    if let (Some(start), Some(end)) = (survey.starts_at, survey.ends_at) {
        if end < start {
            errors.add("ends_at", "Ngày kết thúc phải sau ngày bắt đầu");
        }
    }
    errors.into_result()
}

/// Own-profile form
pub fn validate_profile(form: &ProfileUpdate) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    errors.check(
        "full_name",
        validate_required_text(&form.full_name, "Họ tên", MAX_NAME_LEN),
    );
    errors.check("email", validate_email(&form.email));
    errors.check(
        "phone",
        validate_optional_text(form.phone.as_deref(), "Số điện thoại", MAX_SHORT_TEXT_LEN),
    );
    errors.check(
        "address",
        validate_optional_text(form.address.as_deref(), "Địa chỉ", MAX_ADDRESS_LEN),
    );
    errors.check(
        "bio",
        validate_optional_text(form.bio.as_deref(), "Giới thiệu", MAX_NOTE_LEN),
    );
    errors.into_result()
}

/// Password change form
pub fn validate_password_change(
    current: &str,
    new: &str,
    confirm: &str,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if current.is_empty() {
        errors.add("current", "Vui lòng nhập mật khẩu hiện tại");
    }
    let len = new.chars().count();
    if len < MIN_PASSWORD_LEN {
        errors.add(
            "new",
            format!("Mật khẩu mới phải có ít nhất {MIN_PASSWORD_LEN} ký tự"),
        );
    } else if len > MAX_PASSWORD_LEN {
        errors.add(
            "new",
            format!("Mật khẩu mới tối đa {MAX_PASSWORD_LEN} ký tự"),
        );
    }
    if confirm != new {
        errors.add("confirm", "Mật khẩu xác nhận không khớp");
    }
    errors.into_result()
}
