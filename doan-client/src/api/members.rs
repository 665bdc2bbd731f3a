use http::Method;
use shared::models::{Member, MemberUpdate};
use shared::request::ListQuery;
use shared::response::ListPage;
use shared::types::Id;
use shared::validation::validate_member;

use super::{ApiClient, not_wired};
use crate::ClientResult;
use crate::http::HttpClient;

impl<H: HttpClient> ApiClient<H> {
    /// Members are user accounts; the query carries `role=member`
    pub async fn list_members(&self, query: &ListQuery) -> ClientResult<ListPage<Member>> {
        self.get_list("/api/users", query, "users").await
    }

    pub async fn get_member(&self, id: Id) -> ClientResult<Member> {
        self.get(&format!("/api/users/{id}")).await
    }

    /// Save an edited member and return the record as it now stands.
    /// Only changed fields are sent.
    pub async fn update_member(&self, before: &Member, after: &Member) -> ClientResult<Member> {
        validate_member(after)?;
        let update = MemberUpdate::diff(before, after);
        if update.is_empty() {
            return Ok(after.clone());
        }
        let saved: Option<Member> = self
            .send(Method::PUT, &format!("/api/users/{}", before.id), &update)
            .await?;
        tracing::info!(member_id = before.id, "Member updated");
        Ok(saved.unwrap_or_else(|| after.clone()))
    }

    pub async fn delete_member(&self, _id: Id) -> ClientResult<()> {
        not_wired("members.delete")
    }
}
