//! Profile and password forms

use shared::ValidationErrors;
use shared::models::{ProfileUpdate, UserProfile};
use shared::validation::validate_password_change;

/// Change-password form; cleared after a successful change
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasswordForm {
    pub current: String,
    pub new: String,
    pub confirm: String,
}

impl PasswordForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: &str, value: impl Into<String>) -> bool {
        let slot = match field {
            "current" => &mut self.current,
            "new" => &mut self.new,
            "confirm" => &mut self.confirm,
            _ => return false,
        };
        *slot = value.into();
        true
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        validate_password_change(&self.current, &self.new, &self.confirm)
    }

    pub fn is_blank(&self) -> bool {
        self.current.is_empty() && self.new.is_empty() && self.confirm.is_empty()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Masked summary for the screen
    pub fn render(&self) -> String {
        let mask = |s: &str| "•".repeat(s.chars().count());
        format!(
            "  Mật khẩu hiện tại : {}\n  Mật khẩu mới      : {}\n  Xác nhận          : {}\n",
            mask(&self.current),
            mask(&self.new),
            mask(&self.confirm)
        )
    }
}

/// Apply one `set <field> <value>` to the profile form
pub fn set_profile_field(form: &mut ProfileUpdate, field: &str, value: &str) -> bool {
    let optional = |v: &str| {
        let v = v.trim();
        (!v.is_empty()).then(|| v.to_string())
    };
    match field {
        "name" | "full_name" => form.full_name = value.trim().to_string(),
        "email" => form.email = value.trim().to_string(),
        "phone" => form.phone = optional(value),
        "address" => form.address = optional(value),
        "bio" => form.bio = optional(value),
        "birth_date" => match value.trim() {
            "" => form.birth_date = None,
            v => match chrono::NaiveDate::parse_from_str(v, "%Y-%m-%d") {
                Ok(date) => form.birth_date = Some(date),
                Err(_) => return false,
            },
        },
        _ => return false,
    }
    true
}

pub fn render_profile(profile: &UserProfile) -> String {
    let or_dash = |v: Option<&str>| v.unwrap_or("—").to_string();
    format!(
        "  Tên đăng nhập : {}\n  Họ tên        : {}\n  Email         : {}\n  Điện thoại    : {}\n  Ngày sinh     : {}\n  Địa chỉ       : {}\n  Giới thiệu    : {}\n",
        profile.username,
        profile.display_name(),
        profile.email,
        or_dash(profile.phone.as_deref()),
        profile
            .birth_date
            .map(|d| d.format("%d/%m/%Y").to_string())
            .unwrap_or_else(|| "—".into()),
        or_dash(profile.address.as_deref()),
        or_dash(profile.bio.as_deref()),
    )
}

pub fn render_profile_form(form: &ProfileUpdate) -> String {
    format!(
        "  name       : {}\n  email      : {}\n  phone      : {}\n  birth_date : {}\n  address    : {}\n  bio        : {}\n",
        form.full_name,
        form.email,
        form.phone.as_deref().unwrap_or(""),
        form.birth_date.map(|d| d.to_string()).unwrap_or_default(),
        form.address.as_deref().unwrap_or(""),
        form.bio.as_deref().unwrap_or(""),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(current: &str, new: &str, confirm: &str) -> PasswordForm {
        PasswordForm {
            current: current.into(),
            new: new.into(),
            confirm: confirm.into(),
        }
    }

    #[test]
    fn test_short_password_rejected() {
        let errors = form("old-secret", "abc12", "abc12").validate().unwrap_err();
        assert!(errors.has("new"));
    }

    #[test]
    fn test_mismatched_confirm_rejected() {
        let errors = form("old-secret", "abcdef", "abcdeg").validate().unwrap_err();
        assert_eq!(errors.messages("confirm"), ["Mật khẩu xác nhận không khớp"]);
    }

    #[test]
    fn test_valid_form_accepted_then_cleared() {
        let mut f = form("old-secret", "mậtkhẩu", "mậtkhẩu");
        assert!(f.validate().is_ok());
        f.clear();
        assert!(f.is_blank());
    }

    #[test]
    fn test_render_masks_values() {
        let mut f = PasswordForm::new();
        assert!(f.set("new", "abcdef"));
        assert!(!f.set("other", "x"));
        assert!(f.render().contains("••••••"));
        assert!(!f.render().contains("abcdef"));
    }

    #[test]
    fn test_set_profile_field() {
        let mut update = ProfileUpdate::default();
        assert!(set_profile_field(&mut update, "phone", "0912 345 678"));
        assert_eq!(update.phone.as_deref(), Some("0912 345 678"));
        assert!(set_profile_field(&mut update, "phone", " "));
        assert_eq!(update.phone, None);
        assert!(set_profile_field(&mut update, "birth_date", "2001-09-02"));
        assert!(!set_profile_field(&mut update, "birth_date", "02/09/2001"));
        assert!(!set_profile_field(&mut update, "role", "admin"));
    }
}
