//! API Response types
//!
//! The backend does not agree with itself on a response envelope. Depending
//! on the endpoint a payload arrives as:
//!
//! ```json
//! { "success": true, "data": { ... }, "error": null }
//! { "code": 0, "message": "OK", "data": { ... } }
//! { "data": [ ... ], "pagination": { ... } }
//! [ ... ]
//! ```
//!
//! Every shape is normalized here into one [`ApiResult`] so that call sites
//! never branch on envelope shapes.

use crate::error::{AppError, AppResult, ErrorCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Envelope keys that never belong to the payload itself
const META_KEYS: &[&str] = &["success", "code", "message", "error", "details", "trace_id"];

/// Structured envelope `{code, message, data, details}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Error code (0 for success, non-zero for errors)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
    /// Human-readable message
    #[serde(default)]
    pub message: String,
    /// Response data (present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Create a success response with data
    pub fn success(data: T) -> Self {
        Self {
            code: Some(0),
            message: "OK".to_string(),
            data: Some(data),
        }
    }

    /// Create an error response from an AppError
    pub fn error(err: &AppError) -> Self {
        Self {
            code: Some(err.code.code()),
            message: err.message.clone(),
            data: None,
        }
    }
}

/// Normalized result at the API-client boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResult<T> {
    /// Whether the backend reported success
    pub success: bool,
    /// Payload, when there is one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Server error text, verbatim
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Error code when the backend supplied a known one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
}

impl<T> ApiResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            code: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            code: None,
        }
    }

    /// Convert into an [`AppResult`], requiring a payload on success
    pub fn into_result(self) -> AppResult<T> {
        if !self.success {
            let code = self.code.unwrap_or(ErrorCode::Unknown);
            return Err(match self.error {
                Some(message) => AppError::with_message(code, message),
                None => AppError::new(code),
            });
        }
        self.data
            .ok_or_else(|| AppError::invalid_format("Response is missing data"))
    }

    /// Convert into an [`AppResult`] whose payload may be absent
    pub fn into_optional(self) -> AppResult<Option<T>> {
        if self.success {
            return Ok(self.data);
        }
        self.into_unit().map(|_| None)
    }

    /// Convert into an [`AppResult`], ignoring any payload
    pub fn into_unit(self) -> AppResult<()> {
        if self.success {
            return Ok(());
        }
        let code = self.code.unwrap_or(ErrorCode::Unknown);
        Err(match self.error {
            Some(message) => AppError::with_message(code, message),
            None => AppError::new(code),
        })
    }
}

impl<T: DeserializeOwned> ApiResult<T> {
    /// Normalize any of the known envelope shapes
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        let Value::Object(mut obj) = value else {
            // Raw array or scalar payload
            return Ok(Self::ok(serde_json::from_value(value)?));
        };

        let has_success = obj.get("success").is_some_and(Value::is_boolean);
        let has_code = obj.contains_key("code") && obj.contains_key("message");
        let has_data = obj.contains_key("data");

        if !has_success && !has_code && !has_data {
            return Ok(Self::ok(serde_json::from_value(Value::Object(obj))?));
        }

        let (success, code) = if has_success {
            let success = obj.get("success").and_then(Value::as_bool).unwrap_or(false);
            (success, obj.get("code").and_then(parse_code))
        } else if has_code {
            let code = obj.get("code").and_then(parse_code);
            let success = obj.get("code").is_some_and(is_success_code);
            (success, code)
        } else {
            (true, None)
        };

        if !success {
            let error = obj
                .get("error")
                .and_then(error_text)
                .or_else(|| obj.get("message").and_then(Value::as_str).map(str::to_string));
            return Ok(Self {
                success: false,
                data: None,
                error,
                code: code.filter(|c| !c.is_success()),
            });
        }

        let data = match obj.remove("data") {
            Some(Value::Null) => None,
            Some(inner) => Some(serde_json::from_value(inner)?),
            None => {
                // `{ "success": true, "token": ..., "user": ... }`
                for key in META_KEYS {
                    obj.remove(*key);
                }
                if obj.is_empty() {
                    None
                } else {
                    Some(serde_json::from_value(Value::Object(obj))?)
                }
            }
        };

        Ok(Self {
            success: true,
            data,
            error: None,
            code: None,
        })
    }
}

fn parse_code(value: &Value) -> Option<ErrorCode> {
    let raw = match value {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => s.trim_start_matches('E').parse().ok()?,
        _ => return None,
    };
    u16::try_from(raw).ok().and_then(|c| ErrorCode::try_from(c).ok())
}

fn is_success_code(value: &Value) -> bool {
    match value {
        Value::Number(n) => matches!(n.as_u64(), Some(0) | Some(200)),
        Value::String(s) => s == "E0000" || s == "0" || s.eq_ignore_ascii_case("ok"),
        _ => false,
    }
}

fn error_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(o) => o.get("message").and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}

/// Pagination metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Current page number (1-based)
    #[serde(default = "first_page")]
    pub page: u32,
    /// Items per page
    #[serde(alias = "limit", alias = "per_page", default)]
    pub per_page: u32,
    /// Total number of items
    #[serde(alias = "totalItems", default)]
    pub total: u64,
    /// Total number of pages
    #[serde(alias = "total_pages", alias = "pages", default)]
    pub total_pages: u32,
}

fn first_page() -> u32 {
    1
}

impl Pagination {
    /// Create a new pagination
    pub fn new(page: u32, per_page: u32, total: u64) -> Self {
        let total_pages = if per_page == 0 {
            0
        } else {
            total.div_ceil(per_page as u64) as u32
        };
        Self {
            page,
            per_page,
            total,
            total_pages,
        }
    }

    /// Derive `total_pages` when the server sent only `total` and a page size
    pub fn with_derived_pages(mut self) -> Self {
        if self.total_pages == 0 && self.per_page > 0 {
            self.total_pages = self.total.div_ceil(u64::from(self.per_page)) as u32;
        }
        self
    }
}

/// One page of a remote list, whatever shape the server used
#[derive(Debug, Clone, PartialEq)]
pub struct ListPage<T> {
    pub items: Vec<T>,
    /// Absent when the server returned a bare array
    pub pagination: Option<Pagination>,
}

impl<T> ListPage<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            pagination: None,
        }
    }

    /// Total count, falling back to the number of items returned
    pub fn total(&self) -> u64 {
        self.pagination
            .map(|p| p.total)
            .unwrap_or(self.items.len() as u64)
    }
}

impl<T> Default for ListPage<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T: DeserializeOwned> ListPage<T> {
    /// Extract list items from an already-unwrapped payload.
    ///
    /// `resource_key` names the per-endpoint array key (`"users"`, `"posts"`)
    /// tried after the generic `items` / `data` / `results` keys.
    pub fn from_value(value: Value, resource_key: Option<&str>) -> Result<Self, serde_json::Error> {
        match value {
            Value::Array(_) => Ok(Self::new(serde_json::from_value(value)?)),
            Value::Object(mut obj) => {
                let items = ["items", "data", "results"]
                    .into_iter()
                    .chain(resource_key)
                    .find_map(|key| match obj.remove(key) {
                        Some(v @ Value::Array(_)) => Some(v),
                        Some(Value::Object(inner)) => take_array(inner, resource_key),
                        _ => None,
                    })
                    .unwrap_or(Value::Array(Vec::new()));
                let items: Vec<T> = serde_json::from_value(items)?;
                let pagination = read_pagination(&mut obj);
                Ok(Self { items, pagination })
            }
            Value::Null => Ok(Self::default()),
            other => Ok(Self::new(vec![serde_json::from_value(other)?])),
        }
    }
}

fn take_array(mut inner: Map<String, Value>, resource_key: Option<&str>) -> Option<Value> {
    ["items", "results"]
        .into_iter()
        .chain(resource_key)
        .find_map(|key| match inner.remove(key) {
            Some(v @ Value::Array(_)) => Some(v),
            _ => None,
        })
}

fn read_pagination(obj: &mut Map<String, Value>) -> Option<Pagination> {
    let raw = match obj.remove("pagination") {
        Some(p) => p,
        None if obj.contains_key("total") => Value::Object(obj.clone()),
        None => return None,
    };
    serde_json::from_value::<Pagination>(raw)
        .ok()
        .map(Pagination::with_derived_pages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    struct Row {
        id: i64,
        name: String,
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { id: 1, name: "An".into() },
            Row { id: 2, name: "Bình".into() },
        ]
    }

    #[test]
    fn test_normalizes_every_envelope_shape() {
        let shapes = [
            json!([{"id": 1, "name": "An"}, {"id": 2, "name": "Bình"}]),
            json!({"data": [{"id": 1, "name": "An"}, {"id": 2, "name": "Bình"}]}),
            json!({"success": true, "data": [{"id": 1, "name": "An"}, {"id": 2, "name": "Bình"}], "error": null}),
            json!({"code": 0, "message": "OK", "data": [{"id": 1, "name": "An"}, {"id": 2, "name": "Bình"}]}),
            json!({"code": "E0000", "message": "Success", "data": [{"id": 1, "name": "An"}, {"id": 2, "name": "Bình"}]}),
        ];
        for shape in shapes {
            let result: ApiResult<Vec<Row>> = ApiResult::from_value(shape).unwrap();
            assert!(result.success);
            assert_eq!(result.into_result().unwrap(), rows());
        }
    }

    #[test]
    fn test_failure_keeps_server_message() {
        let result: ApiResult<Row> = ApiResult::from_value(json!({
            "success": false,
            "error": "Mật khẩu hiện tại không đúng"
        }))
        .unwrap();
        assert!(!result.success);
        let err = result.into_result().unwrap_err();
        assert_eq!(err.message, "Mật khẩu hiện tại không đúng");

        let result: ApiResult<Row> = ApiResult::from_value(json!({
            "code": 3001,
            "message": "Member not found"
        }))
        .unwrap();
        let err = result.into_result().unwrap_err();
        assert_eq!(err.code, ErrorCode::MemberNotFound);
        assert_eq!(err.message, "Member not found");
    }

    #[test]
    fn test_success_without_data_key_uses_remaining_fields() {
        #[derive(Debug, Deserialize)]
        struct Login {
            token: String,
        }
        let result: ApiResult<Login> = ApiResult::from_value(json!({
            "success": true,
            "message": "Login successful",
            "token": "abc"
        }))
        .unwrap();
        assert_eq!(result.into_result().unwrap().token, "abc");
    }

    #[test]
    fn test_page_count_derived_from_total() {
        let page: ListPage<Row> = ListPage::from_value(
            json!({
                "data": [{"id": 1, "name": "An"}, {"id": 2, "name": "Bình"}],
                "pagination": {"page": 1, "limit": 2, "total": 50}
            }),
            None,
        )
        .unwrap();
        let p = page.pagination.unwrap();
        assert_eq!((p.page, p.per_page, p.total, p.total_pages), (1, 2, 50, 25));

        let page: ListPage<Row> =
            ListPage::from_value(json!({"users": [], "total": 7, "limit": 3}), Some("users"))
                .unwrap();
        assert_eq!(page.pagination.unwrap().total_pages, 3);

        let page: ListPage<Row> =
            ListPage::from_value(json!({"data": [], "pagination": {"total": 7, "totalPages": 4}}), None)
                .unwrap();
        assert_eq!(page.pagination.unwrap().total_pages, 4);
    }

    #[test]
    fn test_raw_object_is_payload() {
        let result: ApiResult<Row> =
            ApiResult::from_value(json!({"id": 7, "name": "Chi đoàn A"})).unwrap();
        assert_eq!(
            result.into_result().unwrap(),
            Row { id: 7, name: "Chi đoàn A".into() }
        );
    }

    #[test]
    fn test_success_without_data_is_unit_ok() {
        let result: ApiResult<Value> =
            ApiResult::from_value(json!({"success": true, "message": "Updated"})).unwrap();
        assert!(result.into_unit().is_ok());
    }

    #[test]
    fn test_list_page_shapes() {
        let page: ListPage<Row> =
            ListPage::from_value(json!([{"id": 1, "name": "An"}]), None).unwrap();
        assert_eq!(page.items.len(), 1);
        assert!(page.pagination.is_none());
        assert_eq!(page.total(), 1);

        let page: ListPage<Row> = ListPage::from_value(
            json!({
                "users": [{"id": 1, "name": "An"}, {"id": 2, "name": "Bình"}],
                "pagination": {"page": 2, "limit": 2, "total": 12, "totalPages": 6}
            }),
            Some("users"),
        )
        .unwrap();
        assert_eq!(page.items, rows());
        assert_eq!(
            page.pagination,
            Some(Pagination { page: 2, per_page: 2, total: 12, total_pages: 6 })
        );

        let page: ListPage<Row> = ListPage::from_value(
            json!({"data": {"items": [{"id": 1, "name": "An"}]}, "total": 40, "page": 1, "limit": 10}),
            None,
        )
        .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.total(), 40);
    }

    #[test]
    fn test_pagination_new() {
        let p = Pagination::new(1, 10, 95);
        assert_eq!(p.total_pages, 10);
        let p = Pagination::new(1, 0, 95);
        assert_eq!(p.total_pages, 0);
    }
}
