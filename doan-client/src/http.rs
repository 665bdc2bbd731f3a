//! HTTP transport
//!
//! [`HttpClient`] moves JSON between the console and the backend and turns
//! non-2xx statuses into [`ClientError`]s. Envelope normalization happens one
//! layer up, in [`crate::api::ApiClient`].

use std::time::Duration;

use async_trait::async_trait;
use http::{Method, StatusCode};
use reqwest::Client;
use serde_json::Value;
use shared::error::{AppError, ErrorCode};
use shared::response::ApiResult;

use crate::{ClientConfig, ClientError, ClientResult};

/// HTTP client trait
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Send one request and return the decoded JSON body (`Null` when empty)
    async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<Value>,
    ) -> ClientResult<Value>;

    fn token(&self) -> Option<&str>;

    fn set_token(&mut self, token: Option<String>);
}

/// Network HTTP client
#[derive(Debug, Clone)]
pub struct NetworkHttpClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl NetworkHttpClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {}", t))
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn handle_response(response: reqwest::Response) -> ClientResult<Value> {
        let status = response.status();
        let text = response.text().await?;
        let body: Option<Value> = if text.trim().is_empty() {
            Some(Value::Null)
        } else {
            serde_json::from_str(&text).ok()
        };

        if status.is_success() {
            return body.ok_or_else(|| ClientError::InvalidResponse(snippet(&text)));
        }

        let (code, message) = body.as_ref().map(error_parts).unwrap_or((None, None));
        let message = message.unwrap_or_else(|| {
            if text.trim().is_empty() || body.is_some() {
                status.canonical_reason().unwrap_or("Request failed").to_string()
            } else {
                snippet(&text)
            }
        });
        Err(status_error(status, code, message))
    }
}

#[async_trait]
impl HttpClient for NetworkHttpClient {
    async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<Value>,
    ) -> ClientResult<Value> {
        let url = self.url(path);
        let mut req = self.client.request(method.clone(), &url);
        if !query.is_empty() {
            req = req.query(query);
        }
        if let Some(body) = &body {
            req = req.json(body);
        }
        if let Some(auth) = self.auth_header() {
            req = req.header(reqwest::header::AUTHORIZATION, auth);
        }
        tracing::debug!(%method, path, "Sending request");
        let response = req.send().await?;
        Self::handle_response(response).await
    }

    fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }
}

/// Map a failed status to a client error. A 401 always means the session is
/// unusable, whatever code the body carries.
pub(crate) fn status_error(status: StatusCode, code: Option<ErrorCode>, message: String) -> ClientError {
    let code = match (status, code) {
        (StatusCode::UNAUTHORIZED, _) => ErrorCode::NotAuthenticated,
        (_, Some(code)) => code,
        (status, None) => ErrorCode::from_status(status),
    };
    AppError::with_message(code, message).into()
}

/// Code and message from an error body, whichever envelope it uses
fn error_parts(body: &Value) -> (Option<ErrorCode>, Option<String>) {
    let code = ApiResult::<Value>::from_value(body.clone())
        .ok()
        .and_then(|r| r.code);
    let message = match body.get("error") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Object(o)) => o.get("message").and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
    .or_else(|| body.get("message").and_then(Value::as_str).map(str::to_string))
    .filter(|m| !m.trim().is_empty());
    (code, message)
}

fn snippet(text: &str) -> String {
    const MAX: usize = 200;
    match text.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}
