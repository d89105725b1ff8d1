//! OIDC identity tokens issued by the CI runner

use async_trait::async_trait;
use serde::Deserialize;

use crate::errors::{BrokerError, Result};
use crate::models::SecretString;

/// Returns a signed JWT asserting the caller's identity
#[async_trait]
pub trait IdTokenProvider: Send + Sync {
    async fn id_token(&self, audience: Option<&str>) -> Result<SecretString>;
}

#[derive(Debug, Deserialize)]
struct IdTokenResponse {
    value: Option<SecretString>,
}

/// GitHub Actions OIDC token endpoint
///
/// Requires the `id-token: write` workflow permission, which makes the runner
/// set `ACTIONS_ID_TOKEN_REQUEST_URL` and `ACTIONS_ID_TOKEN_REQUEST_TOKEN`.
#[derive(Debug, Clone)]
pub struct GithubIdTokenProvider {
    request_url: Option<String>,
    request_token: Option<SecretString>,
    client: reqwest::Client,
}

impl GithubIdTokenProvider {
    pub fn new(request_url: Option<String>, request_token: Option<SecretString>) -> Self {
        Self {
            request_url,
            request_token,
            client: reqwest::Client::new(),
        }
    }

    fn token_url(&self, audience: Option<&str>) -> Result<url::Url> {
        let base = self.request_url.as_deref().filter(|u| !u.is_empty()).ok_or_else(|| {
            BrokerError::Configuration(
                "Unable to get ACTIONS_ID_TOKEN_REQUEST_URL env variable; is the id-token: write permission set?"
                    .to_string(),
            )
        })?;
        let mut url = url::Url::parse(base)?;
        if let Some(audience) = audience.filter(|a| !a.is_empty()) {
            url.query_pairs_mut().append_pair("audience", audience);
        }
        Ok(url)
    }
}

#[async_trait]
impl IdTokenProvider for GithubIdTokenProvider {
    async fn id_token(&self, audience: Option<&str>) -> Result<SecretString> {
        let url = self.token_url(audience)?;
        let request_token = self.request_token.as_ref().filter(|t| !t.is_empty()).ok_or_else(|| {
            BrokerError::Configuration(
                "Unable to get ACTIONS_ID_TOKEN_REQUEST_TOKEN env variable; is the id-token: write permission set?"
                    .to_string(),
            )
        })?;

        tracing::debug!(audience = ?audience, "Requesting OIDC ID token");

        let response = self
            .client
            .get(url)
            .header(reqwest::header::AUTHORIZATION, format!("Bearer {}", request_token.expose()))
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), body = %body, "OIDC token request failed");
            return Err(BrokerError::Network {
                status: Some(status.as_u16()),
                message: "Failed to get ID token".to_string(),
            });
        }

        let body: IdTokenResponse = response.json().await?;
        body.value
            .filter(|v| !v.is_empty())
            .ok_or_else(|| BrokerError::Protocol("ID token response has no value".to_string()))
    }
}
