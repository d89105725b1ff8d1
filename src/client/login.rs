//! Identity service login client
//!
//! Posts form-encoded login bodies to `<domain><path>` with the configured
//! default headers and extracts the access token from the JSON response.

use reqwest::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use std::time::Duration;

use crate::errors::{BrokerError, Result};
use crate::models::{HeaderMap, LoginResponse};

pub const USER_AGENT_STRING: &str = concat!("infisical-auth/", env!("CARGO_PKG_VERSION"));
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
pub const DEFAULT_LOGIN_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client bound to one identity service domain
#[derive(Debug, Clone)]
pub struct HttpLoginClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpLoginClient {
    /// Build a client for `domain`, attaching `default_headers` to every request.
    pub fn new(domain: &str, default_headers: &HeaderMap, timeout: Duration) -> Result<Self> {
        let parsed = url::Url::parse(domain)?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(BrokerError::Configuration(format!(
                "Domain must be an http(s) URL, got scheme '{}'",
                parsed.scheme()
            )));
        }

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT_STRING)
            .default_headers(to_header_map(default_headers)?)
            .timeout(timeout)
            .build()
            .map_err(|e| BrokerError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: domain.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST an already form-encoded body to `path` and parse the login response.
    pub async fn post_form(&self, path: &str, body: String) -> Result<LoginResponse> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE.as_str().to_string(), FORM_CONTENT_TYPE.to_string());
        self.post(path, &headers, body).await
    }

    /// POST `body` to `path` with `headers` layered over the defaults.
    pub async fn post(&self, path: &str, headers: &HeaderMap, body: String) -> Result<LoginResponse> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(path = %path, "Sending login request");

        let response = self
            .client
            .post(&url)
            .headers(to_header_map(headers)?)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                let err = BrokerError::from(e);
                tracing::error!(error = %err, "Login request failed");
                err
            })?;

        let status = response.status();
        let text = response.text().await.map_err(BrokerError::from)?;

        if !status.is_success() {
            return Err(request_error(status, &text));
        }

        parse_login_response(&text)
    }
}

/// Turn a non-2xx response into a `NetworkError`, logging the body first.
///
/// The message is the body's `message` field when the body is a JSON object,
/// otherwise a generic status message.
fn request_error(status: reqwest::StatusCode, body: &str) -> BrokerError {
    let structured = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .filter(|v| v.is_object());

    let message = structured
        .as_ref()
        .and_then(|v| v.get("message"))
        .and_then(|m| m.as_str())
        .map(str::to_string);

    if let Some(ref message) = message {
        tracing::error!("{}", message);
    }
    if let Some(ref value) = structured {
        tracing::error!(
            "{}",
            serde_json::to_string_pretty(value).unwrap_or_else(|_| body.to_string())
        );
    }

    BrokerError::Network {
        status: Some(status.as_u16()),
        message: message.unwrap_or_else(|| format!("Request failed with status code {}", status.as_u16())),
    }
}

fn parse_login_response(body: &str) -> Result<LoginResponse> {
    let response: LoginResponse = serde_json::from_str(body)?;
    if response.access_token.is_empty() {
        return Err(BrokerError::Protocol(
            "Login response did not contain an access token".to_string(),
        ));
    }
    tracing::debug!(
        expires_in = ?response.expires_in,
        token_type = ?response.token_type,
        "Received access token"
    );
    Ok(response)
}

fn to_header_map(headers: &HeaderMap) -> Result<reqwest::header::HeaderMap> {
    let mut map = reqwest::header::HeaderMap::new();
    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| BrokerError::Configuration(format!("Invalid header name: {}", name)))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|_| BrokerError::Configuration(format!("Invalid value for header '{}'", name)))?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}
