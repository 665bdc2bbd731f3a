use http::Method;
use shared::client::ChangePasswordRequest;
use shared::models::{ProfileUpdate, UserProfile};
use shared::validation::{validate_password_change, validate_profile};

use super::ApiClient;
use crate::ClientResult;
use crate::http::HttpClient;

impl<H: HttpClient> ApiClient<H> {
    pub async fn get_profile(&self) -> ClientResult<UserProfile> {
        self.get("/api/users/profile").await
    }

    /// Save the profile form and return the profile as it now stands
    pub async fn update_profile(
        &self,
        current: &UserProfile,
        form: &ProfileUpdate,
    ) -> ClientResult<UserProfile> {
        validate_profile(form)?;
        let saved: Option<UserProfile> = self.send(Method::PUT, "/api/users/profile", form).await?;
        Ok(saved.unwrap_or_else(|| {
            let mut profile = current.clone();
            form.apply_to(&mut profile);
            profile
        }))
    }

    pub async fn change_password(
        &self,
        current: &str,
        new: &str,
        confirm: &str,
    ) -> ClientResult<()> {
        validate_password_change(current, new, confirm)?;
        let req = ChangePasswordRequest {
            current_password: current.to_string(),
            new_password: new.to_string(),
        };
        self.send::<serde_json::Value, _>(Method::PUT, "/api/users/change-password", &req)
            .await?;
        tracing::info!("Password changed");
        Ok(())
    }
}
