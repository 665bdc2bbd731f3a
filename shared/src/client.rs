//! Client-related types shared between the API client and the console
//!
//! Auth and account DTOs used in API communication.

use serde::{Deserialize, Serialize};

use crate::models::UserProfile;

// Re-export ApiResponse from response module
pub use crate::response::ApiResponse;

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Username or email
    pub username: String,
    pub password: String,
}

/// Login response data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(alias = "accessToken", alias = "access_token")]
    pub token: String,
    #[serde(alias = "profile")]
    pub user: UserProfile,
}

// =============================================================================
// Account API DTOs
// =============================================================================

/// Change password request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_password_wire_names() {
        let req = ChangePasswordRequest {
            current_password: "old".into(),
            new_password: "secret1".into(),
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            serde_json::json!({"currentPassword": "old", "newPassword": "secret1"})
        );
    }

    #[test]
    fn test_login_response_token_alias() {
        let resp: LoginResponse = serde_json::from_str(
            r#"{"accessToken": "abc", "user": {"id": 1, "fullName": "Admin", "role": "admin"}}"#,
        )
        .unwrap();
        assert_eq!(resp.token, "abc");
        assert!(resp.user.role.is_admin());
    }
}
