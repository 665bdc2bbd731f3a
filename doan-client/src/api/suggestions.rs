use http::Method;
use shared::models::{
    RespondRequest, StatusUpdateRequest, Suggestion, SuggestionResponse, SuggestionStats,
    SuggestionStatus,
};
use shared::request::ListQuery;
use shared::response::ListPage;

use super::ApiClient;
use crate::ClientResult;
use crate::http::HttpClient;

impl<H: HttpClient> ApiClient<H> {
    pub async fn list_suggestions(&self, query: &ListQuery) -> ClientResult<ListPage<Suggestion>> {
        self.get_list("/api/suggestions", query, "suggestions").await
    }

    pub async fn suggestion_stats(&self) -> ClientResult<SuggestionStats> {
        self.get("/api/suggestions/stats").await
    }

    /// Append a response; returns the stored response when the server echoes it
    pub async fn respond_to_suggestion(
        &self,
        suggestion: &Suggestion,
        content: &str,
    ) -> ClientResult<Option<SuggestionResponse>> {
        let req = RespondRequest::new(content)?;
        let saved = self
            .send(
                Method::POST,
                &format!("/api/suggestions/{}/respond", suggestion.id),
                &req,
            )
            .await?;
        tracing::info!(suggestion_id = suggestion.id, "Suggestion response added");
        Ok(saved)
    }

    /// Move a suggestion through review; illegal transitions never reach the server
    pub async fn update_suggestion_status(
        &self,
        suggestion: &Suggestion,
        next: SuggestionStatus,
        note: Option<String>,
    ) -> ClientResult<SuggestionStatus> {
        let status = suggestion.status.transition(next)?;
        let req = StatusUpdateRequest { status, note };
        self.send::<serde_json::Value, _>(
            Method::PUT,
            &format!("/api/suggestions/{}/status", suggestion.id),
            &req,
        )
        .await?;
        tracing::info!(suggestion_id = suggestion.id, status = ?status, "Suggestion status updated");
        Ok(status)
    }
}
