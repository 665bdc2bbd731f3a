use http::Method;
use shared::client::{LoginRequest, LoginResponse};

use super::ApiClient;
use crate::http::HttpClient;
use crate::{ClientError, ClientResult};

/// Message shown when a non-console role signs in
pub const CONSOLE_ACCESS_DENIED: &str = "Tài khoản không có quyền truy cập trang quản trị";

impl<H: HttpClient> ApiClient<H> {
    /// Sign in and keep the token for later requests.
    ///
    /// Plain members are refused here, before any screen is shown.
    pub async fn login(&mut self, username: &str, password: &str) -> ClientResult<LoginResponse> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(ClientError::Validation(
                "Vui lòng nhập tên đăng nhập và mật khẩu".into(),
            ));
        }
        let req = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let resp: LoginResponse = self
            .send(Method::POST, "/api/auth/login", &req)
            .await?
            .ok_or_else(|| ClientError::InvalidResponse("Missing login data".into()))?;

        if !resp.user.role.can_access_console() {
            tracing::warn!(username, role = ?resp.user.role, "Console access refused");
            return Err(ClientError::Forbidden(CONSOLE_ACCESS_DENIED.into()));
        }
        self.set_token(Some(resp.token.clone()));
        tracing::info!(username, "Login succeeded");
        Ok(resp)
    }

    /// Forget the token. The backend keeps no server-side session.
    pub fn logout(&mut self) {
        self.set_token(None);
    }
}
