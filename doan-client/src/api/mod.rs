//! Typed backend API
//!
//! [`ApiClient`] wraps an [`HttpClient`] and normalizes every response
//! envelope into [`ApiResult`] before handing typed data back. Resource
//! methods live in one submodule per backend area.

mod auth;
mod members;
mod posts;
mod profile;
mod suggestions;
mod surveys;
mod units;

pub use auth::CONSOLE_ACCESS_DENIED;

use http::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::request::ListQuery;
use shared::response::{ApiResult, ListPage};

use crate::http::{HttpClient, NetworkHttpClient};
use crate::{ClientConfig, ClientError, ClientResult};

/// Typed client for the Đoàn backend
#[derive(Debug, Clone)]
pub struct ApiClient<H = NetworkHttpClient> {
    http: H,
}

impl ApiClient<NetworkHttpClient> {
    /// Network client built from configuration
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        Ok(Self::new(NetworkHttpClient::new(config)?))
    }
}

impl<H: HttpClient> ApiClient<H> {
    pub fn new(http: H) -> Self {
        Self { http }
    }

    pub fn transport(&self) -> &H {
        &self.http
    }

    pub fn token(&self) -> Option<&str> {
        self.http.token()
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.http.set_token(token);
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let value = self.http.request(Method::GET, path, &[], None).await?;
        unwrap_data(value)
    }

    async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &ListQuery,
        resource_key: &str,
    ) -> ClientResult<ListPage<T>> {
        let value = self
            .http
            .request(Method::GET, path, &query.to_pairs(), None)
            .await?;
        unwrap_list(value, resource_key)
    }

    /// Send a JSON body; the payload is optional because some endpoints
    /// answer a mutation with a bare `{success: true}`
    async fn send<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> ClientResult<Option<T>> {
        let body = serde_json::to_value(body)?;
        let value = self.http.request(method, path, &[], Some(body)).await?;
        Ok(ApiResult::<T>::from_value(value)?.into_optional()?)
    }
}

/// Report an operation the backend does not provide
fn not_wired<T>(operation: &str) -> ClientResult<T> {
    tracing::warn!(operation, "Backend operation not wired");
    Err(ClientError::NotWired(operation.to_string()))
}

fn unwrap_data<T: DeserializeOwned>(value: Value) -> ClientResult<T> {
    Ok(ApiResult::<T>::from_value(value)?.into_result()?)
}

/// Normalize a list payload: raw array, `{data: [...]}`,
/// `{success, data: {users: [...], pagination}}`, `{code, message, data}`
fn unwrap_list<T: DeserializeOwned>(value: Value, resource_key: &str) -> ClientResult<ListPage<T>> {
    // Surface error envelopes first
    let status = ApiResult::<Value>::from_value(value.clone())?;
    if !status.success {
        status.into_unit()?;
    }
    let payload = match value {
        Value::Object(mut obj) if !obj.contains_key("pagination") => match obj.remove("data") {
            Some(inner @ Value::Object(_)) => inner,
            Some(other) => {
                obj.insert("data".into(), other);
                Value::Object(obj)
            }
            None => Value::Object(obj),
        },
        other => other,
    };
    Ok(ListPage::from_value(payload, Some(resource_key))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_envelopes_decode_to_same_items() {
        let shapes = [
            json!([{"id": 1}, {"id": 2}]),
            json!({"data": [{"id": 1}, {"id": 2}]}),
            json!({"success": true, "data": [{"id": 1}, {"id": 2}], "error": null}),
            json!({"code": 0, "message": "OK", "data": [{"id": 1}, {"id": 2}]}),
            json!({"success": true, "data": {"users": [{"id": 1}, {"id": 2}], "pagination": {"page": 1, "limit": 10, "total": 2, "totalPages": 1}}}),
            json!({"data": [{"id": 1}, {"id": 2}], "pagination": {"page": 1, "limit": 10, "total": 2, "totalPages": 1}}),
        ];
        for shape in shapes {
            let page: ListPage<Value> = unwrap_list(shape.clone(), "users").unwrap();
            let ids: Vec<i64> = page.items.iter().filter_map(|v| v["id"].as_i64()).collect();
            assert_eq!(ids, vec![1, 2], "shape {shape}");
            assert_eq!(page.total(), 2);
        }
    }

    #[test]
    fn test_list_pagination_survives_nesting() {
        let page: ListPage<Value> = unwrap_list(
            json!({"success": true, "data": {"posts": [{"id": 1}], "pagination": {"page": 3, "limit": 1, "total": 7, "totalPages": 7}}}),
            "posts",
        )
        .unwrap();
        assert_eq!(page.total(), 7);
        assert_eq!(page.pagination.map(|p| p.page), Some(3));
    }

    #[test]
    fn test_list_error_envelope() {
        let err = unwrap_list::<Value>(json!({"success": false, "error": "Lỗi máy chủ"}), "users")
            .unwrap_err();
        assert_eq!(err.user_message(), "Lỗi máy chủ");
    }

    #[test]
    fn test_unwrap_data_requires_payload() {
        let err = unwrap_data::<Value>(json!({"success": true})).unwrap_err();
        assert!(matches!(err, ClientError::InvalidResponse(_)));
    }
}
