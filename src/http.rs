//! Ad-hoc GET/POST against the configured base URL.
//!
//! Fire-and-fail: no retries, no back-off, no client timeout. Anything other
//! than a 2xx answer becomes [`VoxaError::RequestFailed`] carrying the upstream
//! status and body.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::RequestBuilder;
use serde_json::Value;

use crate::config::{ClientConfig, DEFAULT_BASE_URL};
use crate::error::{Result, VoxaError};

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Value,
}

/// Pick the base URL: explicit flag, then stored config, then the built-in default.
pub fn resolve_base_url<'a>(flag: Option<&'a str>, stored: Option<&'a str>) -> &'a str {
    [flag, stored]
        .into_iter()
        .flatten()
        .find(|url| !url.trim().is_empty())
        .unwrap_or(DEFAULT_BASE_URL)
}

/// Route is appended verbatim; callers supply their own leading slash.
pub fn target_url(base_url: &str, route: &str) -> String {
    format!("{base_url}{route}")
}

/// Turn stored `key:value` strings into a header map, keeping duplicates.
pub fn parse_headers(raw: &[String]) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    for entry in raw {
        let (key, value) = entry
            .split_once(':')
            .ok_or_else(|| VoxaError::validation(format!("header '{entry}' is not key:value")))?;

        let name = HeaderName::from_bytes(key.trim().as_bytes())
            .map_err(|e| VoxaError::validation(format!("header name '{}': {e}", key.trim())))?;
        let value = HeaderValue::from_str(value.trim())
            .map_err(|e| VoxaError::validation(format!("header value for '{name}': {e}")))?;

        headers.append(name, value);
    }
    Ok(headers)
}

/// Stored headers plus the API key as a bearer token. The key replaces any
/// stored `Authorization` header.
pub fn request_headers(config: &ClientConfig) -> Result<HeaderMap> {
    let mut headers = parse_headers(&config.headers)?;
    if let Some(key) = &config.api_key {
        let mut value = HeaderValue::from_str(&format!("Bearer {key}"))
            .map_err(|e| VoxaError::validation(format!("api key: {e}")))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }
    Ok(headers)
}

#[derive(Debug, Clone, Default)]
pub struct HttpExecutor {
    client: reqwest::Client,
}

impl HttpExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(
        &self,
        config: &ClientConfig,
        route: &str,
        base_url: Option<&str>,
    ) -> Result<HttpResponse> {
        let base = resolve_base_url(base_url, Some(&config.base_url));
        let url = target_url(base, route);
        tracing::debug!(%url, "GET");

        let request = self.prepare(self.client.get(&url), config)?;
        self.send(request).await
    }

    pub async fn post(
        &self,
        config: &ClientConfig,
        route: &str,
        payload: &Value,
    ) -> Result<HttpResponse> {
        let base = resolve_base_url(None, Some(&config.base_url));
        let url = target_url(base, route);
        tracing::debug!(%url, "POST");

        let request = self.prepare(self.client.post(&url), config)?.json(payload);
        self.send(request).await
    }

    fn prepare(&self, request: RequestBuilder, config: &ClientConfig) -> Result<RequestBuilder> {
        Ok(request.headers(request_headers(config)?))
    }

    async fn send(&self, request: RequestBuilder) -> Result<HttpResponse> {
        let response = request.send().await.map_err(|e| VoxaError::RequestFailed {
            message: e.to_string(),
            status: e.status().map(|s| s.as_u16()),
            body: None,
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| VoxaError::RequestFailed {
            message: format!("failed to read response body: {e}"),
            status: Some(status.as_u16()),
            body: None,
        })?;
        let body = parse_body(text);

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "request returned an error status");
            return Err(VoxaError::RequestFailed {
                message: format!("server responded with {status}"),
                status: Some(status.as_u16()),
                body: Some(body),
            });
        }

        Ok(HttpResponse {
            status: status.as_u16(),
            body,
        })
    }
}

/// JSON when it parses, the raw text otherwise.
fn parse_body(text: String) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(&text).unwrap_or(Value::String(text))
}
