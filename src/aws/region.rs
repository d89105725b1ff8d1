//! AWS region discovery
//!
//! Resolution order:
//! 1. An explicit region override (normally `AWS_REGION`, captured at startup)
//! 2. IMDSv2: `PUT /latest/api/token`, then `GET /latest/dynamic/instance-identity/document`
//!    with the session token, reading its `region` field
//!
//! There is no fallback beyond these two sources and no retry.

use serde::Deserialize;
use std::time::Duration;

use crate::errors::{BrokerError, Result};

pub const DEFAULT_IMDS_ENDPOINT: &str = "http://169.254.169.254";
pub const TOKEN_PATH: &str = "/latest/api/token";
pub const IDENTITY_DOCUMENT_PATH: &str = "/latest/dynamic/instance-identity/document";
pub const TOKEN_TTL_HEADER: &str = "X-aws-ec2-metadata-token-ttl-seconds";
pub const TOKEN_HEADER: &str = "X-aws-ec2-metadata-token";
pub const TOKEN_TTL_SECONDS: &str = "21600";
pub const IMDS_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize)]
struct IdentityDocument {
    region: Option<String>,
}

/// Resolves the AWS region for the AWS-IAM login path
#[derive(Debug, Clone)]
pub struct RegionResolver {
    region_override: Option<String>,
    endpoint: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl RegionResolver {
    pub fn new(region_override: Option<String>) -> Self {
        Self {
            region_override: region_override.filter(|r| !r.is_empty()),
            endpoint: DEFAULT_IMDS_ENDPOINT.to_string(),
            timeout: IMDS_TIMEOUT,
            client: reqwest::Client::new(),
        }
    }

    /// Point metadata lookups at a different base URL
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn resolve(&self) -> Result<String> {
        if let Some(region) = &self.region_override {
            tracing::debug!(region = %region, "Using AWS region from environment");
            return Ok(region.clone());
        }

        let region = self.discover().await.map_err(|e| {
            tracing::error!(error = %e, "AWS region discovery via instance metadata failed");
            e
        })?;
        tracing::debug!(region = %region, "Discovered AWS region from instance metadata");
        Ok(region)
    }

    async fn discover(&self) -> Result<String> {
        let token = self.fetch_metadata_token().await?;

        let response = self
            .client
            .get(format!("{}{}", self.endpoint, IDENTITY_DOCUMENT_PATH))
            .header(TOKEN_HEADER, token)
            .header(reqwest::header::ACCEPT, "application/json")
            .timeout(self.timeout)
            .send()
            .await
            .map_err(discovery_error)?
            .error_for_status()
            .map_err(discovery_error)?;

        let document: IdentityDocument = response.json().await.map_err(discovery_error)?;

        document.region.filter(|r| !r.is_empty()).ok_or_else(|| {
            BrokerError::CredentialDiscovery(
                "Instance identity document has no region".to_string(),
            )
        })
    }

    async fn fetch_metadata_token(&self) -> Result<String> {
        let response = self
            .client
            .put(format!("{}{}", self.endpoint, TOKEN_PATH))
            .header(TOKEN_TTL_HEADER, TOKEN_TTL_SECONDS)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(discovery_error)?
            .error_for_status()
            .map_err(discovery_error)?;

        response.text().await.map_err(discovery_error)
    }
}

fn discovery_error(err: reqwest::Error) -> BrokerError {
    BrokerError::CredentialDiscovery(format!(
        "Failed to query instance metadata: {}",
        err.without_url()
    ))
}
