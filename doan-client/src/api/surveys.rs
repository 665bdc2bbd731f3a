use shared::models::Survey;
use shared::request::ListQuery;
use shared::response::ListPage;
use shared::types::Id;

use super::{ApiClient, not_wired};
use crate::ClientResult;
use crate::http::HttpClient;

impl<H: HttpClient> ApiClient<H> {
    pub async fn list_surveys(&self, query: &ListQuery) -> ClientResult<ListPage<Survey>> {
        self.get_list("/api/surveys", query, "surveys").await
    }

    pub async fn update_survey(&self, _survey: &Survey) -> ClientResult<Survey> {
        not_wired("surveys.update")
    }

    pub async fn delete_survey(&self, _id: Id) -> ClientResult<()> {
        not_wired("surveys.delete")
    }
}
