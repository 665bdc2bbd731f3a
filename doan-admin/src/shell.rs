//! Shell: navigation menu and the signed-in identity
//!
//! The shell owns the [`SessionContext`]; every screen reads the identity
//! from here instead of from disk.

use doan_client::{ClientError, ClientResult, Session, SessionContext};
use shared::models::{Role, UserProfile};

/// Console screens in menu order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Dashboard,
    Members,
    Units,
    Posts,
    Suggestions,
    Surveys,
    Reports,
    QrCodes,
    Profile,
    ChangePassword,
}

impl Screen {
    pub const ALL: &'static [Screen] = &[
        Screen::Dashboard,
        Screen::Members,
        Screen::Units,
        Screen::Posts,
        Screen::Suggestions,
        Screen::Surveys,
        Screen::Reports,
        Screen::QrCodes,
        Screen::Profile,
        Screen::ChangePassword,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Dashboard => "Tổng quan",
            Self::Members => "Quản lý đoàn viên",
            Self::Units => "Quản lý chi đoàn",
            Self::Posts => "Quản lý bài viết",
            Self::Suggestions => "Kiến nghị",
            Self::Surveys => "Khảo sát",
            Self::Reports => "Báo cáo thống kê",
            Self::QrCodes => "Mã QR",
            Self::Profile => "Thông tin cá nhân",
            Self::ChangePassword => "Đổi mật khẩu",
        }
    }

    /// Menu key typed at the prompt
    pub fn key(&self) -> &'static str {
        match self {
            Self::Dashboard => "1",
            Self::Members => "2",
            Self::Units => "3",
            Self::Posts => "4",
            Self::Suggestions => "5",
            Self::Surveys => "6",
            Self::Reports => "7",
            Self::QrCodes => "8",
            Self::Profile => "9",
            Self::ChangePassword => "0",
        }
    }

    /// Name accepted by `go <name>`
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Members => "members",
            Self::Units => "units",
            Self::Posts => "posts",
            Self::Suggestions => "suggestions",
            Self::Surveys => "surveys",
            Self::Reports => "reports",
            Self::QrCodes => "qr",
            Self::Profile => "profile",
            Self::ChangePassword => "password",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|s| s.key() == input || s.slug().eq_ignore_ascii_case(input))
    }

    pub fn allowed_for(&self, role: Role) -> bool {
        match role {
            Role::Admin => true,
            Role::Leader => !matches!(self, Self::Reports),
            Role::Member => false,
        }
    }
}

#[derive(Debug)]
pub struct Shell {
    session: SessionContext,
    screen: Screen,
}

impl Shell {
    pub fn new(session: SessionContext) -> Self {
        Self {
            session,
            screen: Screen::Dashboard,
        }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionContext {
        &mut self.session
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.is_signed_in()
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.session.profile()
    }

    pub fn role(&self) -> Option<Role> {
        self.session.current().map(Session::role)
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Screens the signed-in role may open
    pub fn menu(&self) -> Vec<Screen> {
        match self.role() {
            Some(role) => Screen::ALL
                .iter()
                .copied()
                .filter(|s| s.allowed_for(role))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Start a session; plain members never get past this point
    pub fn sign_in(&mut self, session: Session) -> ClientResult<()> {
        if !session.role().can_access_console() {
            return Err(ClientError::Forbidden(
                doan_client::api::CONSOLE_ACCESS_DENIED.into(),
            ));
        }
        self.session.establish(session)?;
        self.screen = Screen::Dashboard;
        Ok(())
    }

    pub fn navigate(&mut self, screen: Screen) -> ClientResult<()> {
        let role = self.role().ok_or_else(|| {
            ClientError::Unauthorized("Vui lòng đăng nhập".into())
        })?;
        if !screen.allowed_for(role) {
            tracing::warn!(screen = ?screen, role = ?role, "Navigation refused");
            return Err(ClientError::Forbidden(String::new()));
        }
        tracing::debug!(screen = ?screen, "Navigate");
        self.screen = screen;
        Ok(())
    }

    /// Header line: screen title and who is signed in
    pub fn header(&self) -> String {
        match self.profile() {
            Some(profile) => format!(
                "== {} ==  {} ({})",
                self.screen.label(),
                profile.display_name(),
                shared::types::Labeled::label(&profile.role)
            ),
            None => format!("== {} ==", self.screen.label()),
        }
    }

    pub fn logout(&mut self) {
        self.session.logout();
        self.screen = Screen::Dashboard;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doan_client::SessionStore;
    use tempfile::TempDir;

    fn session(role: &str) -> Session {
        let profile: UserProfile = serde_json::from_value(serde_json::json!({
            "id": 1, "username": "u", "fullName": "Người dùng", "role": role
        }))
        .unwrap();
        Session::new("opaque".into(), profile, 0)
    }

    #[test]
    fn test_screen_parse() {
        assert_eq!(Screen::parse("2"), Some(Screen::Members));
        assert_eq!(Screen::parse("QR"), Some(Screen::QrCodes));
        assert_eq!(Screen::parse("x"), None);
    }

    #[test]
    fn test_leader_has_no_reports() {
        let dir = TempDir::new().unwrap();
        let mut shell = Shell::new(SessionContext::empty(SessionStore::new(dir.path())));
        shell.sign_in(session("leader")).unwrap();

        assert!(!shell.menu().contains(&Screen::Reports));
        assert!(shell.navigate(Screen::Reports).is_err());
        assert_eq!(shell.screen(), Screen::Dashboard);
        shell.navigate(Screen::Members).unwrap();
        assert_eq!(shell.screen(), Screen::Members);
    }

    #[test]
    fn test_member_cannot_sign_in() {
        let dir = TempDir::new().unwrap();
        let mut shell = Shell::new(SessionContext::empty(SessionStore::new(dir.path())));
        let err = shell.sign_in(session("member")).unwrap_err();
        assert!(matches!(err, ClientError::Forbidden(_)));
        assert!(!shell.is_signed_in());
        assert!(shell.menu().is_empty());
    }

    #[test]
    fn test_logout_clears_store() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path());
        let mut shell = Shell::new(SessionContext::empty(store.clone()));
        shell.sign_in(session("admin")).unwrap();
        assert_eq!(shell.menu().len(), Screen::ALL.len());
        assert!(store.exists());

        shell.logout();
        assert!(!store.exists());
        assert!(shell.navigate(Screen::Members).is_err());
    }
}
