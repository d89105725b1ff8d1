//! AWS credential resolution
//!
//! Credentials come from the standard AWS provider chain (environment variables,
//! shared config/credentials files, container and instance metadata). The chain
//! itself is provided by `aws-config`; this module only adapts it and enforces
//! that both key halves are present.

use async_trait::async_trait;
use aws_credential_types::provider::ProvideCredentials;
use aws_credential_types::Credentials;

use crate::errors::{BrokerError, Result};
use crate::models::SecretString;

/// Resolved AWS credentials, valid for a single invocation
#[derive(Debug, Clone)]
pub struct AwsCredentials {
    pub access_key_id: String,
    pub secret_access_key: SecretString,
    pub session_token: Option<SecretString>,
}

impl AwsCredentials {
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        session_token: Option<String>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: SecretString::new(secret_access_key),
            session_token: session_token.map(SecretString::from),
        }
    }

    /// Fail unless both the access key id and the secret access key are non-empty.
    pub fn ensure_complete(self) -> Result<Self> {
        if self.access_key_id.is_empty() || self.secret_access_key.is_empty() {
            return Err(BrokerError::CredentialDiscovery(
                "AWS credentials not found".to_string(),
            ));
        }
        Ok(self)
    }
}

impl From<Credentials> for AwsCredentials {
    fn from(credentials: Credentials) -> Self {
        AwsCredentials::new(
            credentials.access_key_id(),
            credentials.secret_access_key(),
            credentials.session_token().map(str::to_string),
        )
    }
}

/// Source of AWS credentials
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn provide(&self, region: &str) -> Result<AwsCredentials>;
}

/// The default AWS provider chain from `aws-config`
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultChainProvider;

#[async_trait]
impl CredentialProvider for DefaultChainProvider {
    async fn provide(&self, region: &str) -> Result<AwsCredentials> {
        use aws_config::default_provider::credentials::DefaultCredentialsChain;

        let chain = DefaultCredentialsChain::builder()
            .region(aws_config::Region::new(region.to_string()))
            .build()
            .await;

        let credentials = chain.provide_credentials().await.map_err(|e| {
            tracing::error!(error = %e, "AWS credential provider chain failed");
            BrokerError::CredentialDiscovery(format!("Failed to load AWS credentials: {}", e))
        })?;

        Ok(AwsCredentials::from(credentials))
    }
}

/// Fixed credentials, used when the caller already holds the keys
#[derive(Debug, Clone)]
pub struct StaticCredentialProvider {
    credentials: AwsCredentials,
}

impl StaticCredentialProvider {
    pub fn new(credentials: AwsCredentials) -> Self {
        Self { credentials }
    }
}

#[async_trait]
impl CredentialProvider for StaticCredentialProvider {
    async fn provide(&self, _region: &str) -> Result<AwsCredentials> {
        Ok(self.credentials.clone())
    }
}
