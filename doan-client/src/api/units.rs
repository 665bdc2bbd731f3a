use shared::models::{Unit, UnitUpdate};
use shared::request::ListQuery;
use shared::response::ListPage;
use shared::types::Id;

use super::{ApiClient, not_wired};
use crate::ClientResult;
use crate::http::HttpClient;

impl<H: HttpClient> ApiClient<H> {
    pub async fn list_units(&self, query: &ListQuery) -> ClientResult<ListPage<Unit>> {
        self.get_list("/api/units", query, "units").await
    }

    pub async fn create_unit(&self, _unit: &UnitUpdate) -> ClientResult<Unit> {
        not_wired("units.create")
    }

    pub async fn update_unit(&self, _id: Id, _unit: &UnitUpdate) -> ClientResult<Unit> {
        not_wired("units.update")
    }

    pub async fn delete_unit(&self, _id: Id) -> ClientResult<()> {
        not_wired("units.delete")
    }
}
