//! Authentication handling
//!
//! Provides support for the identity service's machine-identity login methods:
//! - Universal Auth (client id + client secret)
//! - OIDC Auth (JWT issued by the CI runner)
//! - AWS IAM Auth (signed STS GetCallerIdentity request)
//!
//! [`AuthBroker`] dispatches an [`AuthRequest`] to the matching strategy and
//! posts the resulting form body through [`HttpLoginClient`].

pub mod aws_iam;
pub mod oidc;
pub mod universal;

use std::fmt;
use std::sync::Arc;

use chrono::Utc;

use crate::aws::{CredentialProvider, DefaultChainProvider, RegionResolver};
use crate::client::HttpLoginClient;
use crate::errors::{BrokerError, Result};
use crate::models::{AuthRequest, SecretString};
use crate::runner::{GithubIdTokenProvider, IdTokenProvider, WorkflowCommands};

/// A login request to the identity service: path plus form fields in order
#[derive(Clone)]
pub struct LoginCall {
    path: &'static str,
    fields: Vec<(&'static str, String)>,
}

impl LoginCall {
    pub fn new(path: &'static str) -> Self {
        Self { path, fields: Vec::new() }
    }

    pub fn field(mut self, name: &'static str, value: &str) -> Self {
        self.fields.push((name, value.to_string()));
        self
    }

    pub fn path(&self) -> &'static str {
        self.path
    }

    #[cfg(test)]
    pub(crate) fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// `application/x-www-form-urlencoded` body
    pub fn encode(&self) -> Result<String> {
        serde_urlencoded::to_string(&self.fields)
            .map_err(|e| BrokerError::Configuration(format!("Failed to encode form body: {}", e)))
    }
}

// Field values include secrets; only names are printed.
impl fmt::Debug for LoginCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCall")
            .field("path", &self.path)
            .field("fields", &self.fields.iter().map(|(k, _)| *k).collect::<Vec<_>>())
            .finish()
    }
}

/// Dispatches a login over the three auth methods
pub struct AuthBroker {
    client: HttpLoginClient,
    regions: RegionResolver,
    credentials: Arc<dyn CredentialProvider>,
    id_tokens: Arc<dyn IdTokenProvider>,
    commands: Option<Arc<dyn WorkflowCommands>>,
}

impl fmt::Debug for AuthBroker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthBroker")
            .field("base_url", &self.client.base_url())
            .field("regions", &self.regions)
            .finish()
    }
}

impl AuthBroker {
    /// Broker with the default AWS chain, no region override and no OIDC source
    pub fn new(client: HttpLoginClient) -> Self {
        Self {
            client,
            regions: RegionResolver::new(None),
            credentials: Arc::new(DefaultChainProvider),
            id_tokens: Arc::new(GithubIdTokenProvider::new(None, None)),
            commands: None,
        }
    }

    pub fn with_region_resolver(mut self, regions: RegionResolver) -> Self {
        self.regions = regions;
        self
    }

    pub fn with_credential_provider(mut self, credentials: Arc<dyn CredentialProvider>) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn with_id_token_provider(mut self, id_tokens: Arc<dyn IdTokenProvider>) -> Self {
        self.id_tokens = id_tokens;
        self
    }

    /// Mask intermediate secrets (the OIDC JWT) through `commands`
    pub fn with_commands(mut self, commands: Arc<dyn WorkflowCommands>) -> Self {
        self.commands = Some(commands);
        self
    }

    /// Log in and return the access token.
    ///
    /// Each step runs once, in order; the first failure aborts the login.
    pub async fn login(&self, request: &AuthRequest) -> Result<SecretString> {
        tracing::info!(method = %request.method(), "Authenticating with Infisical");

        let call = match request {
            AuthRequest::Universal { client_id, client_secret } => {
                universal::login_call(client_id, client_secret)
            }
            AuthRequest::Oidc { identity_id, audience } => {
                let jwt = self.id_tokens.id_token(audience.as_deref()).await?;
                if let Some(commands) = &self.commands {
                    commands.mask(jwt.expose())?;
                }
                oidc::login_call(identity_id, &jwt)
            }
            AuthRequest::AwsIam { identity_id } => {
                let region = self.regions.resolve().await?;
                let credentials = self.credentials.provide(&region).await?.ensure_complete()?;
                let signed = aws_iam::sign_get_caller_identity(&credentials, &region, Utc::now());
                aws_iam::login_call(identity_id, &signed)?
            }
        };

        let response = self.client.post_form(call.path(), call.encode()?).await?;

        tracing::info!(method = %request.method(), "Authenticated successfully");
        Ok(response.access_token)
    }
}
