//! Core data types and type aliases
//!
//! This module defines the values threaded through a single login:
//! the auth request, the export configuration and the response shape.

use indexmap::IndexMap;
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::secret::SecretString;
use crate::errors::BrokerError;

// =============================================================================
// TYPE ALIASES
// =============================================================================

/// Header name to value, in insertion order.
///
/// Insertion order matters for the AWS-IAM path: the signed STS headers are
/// serialized to JSON and the verifier sees them in the order they were added.
pub type HeaderMap = IndexMap<String, String>;

// =============================================================================
// AUTH METHOD
// =============================================================================

/// Supported authentication methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMethod {
    Universal,
    Oidc,
    AwsIam,
}

impl AuthMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthMethod::Universal => "universal",
            AuthMethod::Oidc => "oidc",
            AuthMethod::AwsIam => "aws-iam",
        }
    }
}

impl fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthMethod {
    type Err = BrokerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "universal" => Ok(AuthMethod::Universal),
            "oidc" => Ok(AuthMethod::Oidc),
            "aws-iam" => Ok(AuthMethod::AwsIam),
            other => Err(BrokerError::AuthMethod(other.to_string())),
        }
    }
}

// =============================================================================
// AUTH REQUEST
// =============================================================================

/// A single login request; each variant carries only the fields its method needs
#[derive(Debug, Clone)]
pub enum AuthRequest {
    Universal {
        client_id: String,
        client_secret: SecretString,
    },
    Oidc {
        identity_id: String,
        audience: Option<String>,
    },
    AwsIam {
        identity_id: String,
    },
}

impl AuthRequest {
    pub fn method(&self) -> AuthMethod {
        match self {
            AuthRequest::Universal { .. } => AuthMethod::Universal,
            AuthRequest::Oidc { .. } => AuthMethod::Oidc,
            AuthRequest::AwsIam { .. } => AuthMethod::AwsIam,
        }
    }

    /// Check the per-method required fields.
    ///
    /// Input adapters call this before handing the request to the broker, so a
    /// missing credential never reaches the network.
    pub fn validate(&self) -> Result<(), BrokerError> {
        match self {
            AuthRequest::Universal { client_id, client_secret } => {
                if client_id.is_empty() || client_secret.is_empty() {
                    return Err(BrokerError::Configuration(
                        "Missing Universal Auth credentials".to_string(),
                    ));
                }
            }
            AuthRequest::Oidc { identity_id, .. } => {
                if identity_id.is_empty() {
                    return Err(BrokerError::Configuration(
                        "Missing identity ID for OIDC auth".to_string(),
                    ));
                }
            }
            AuthRequest::AwsIam { identity_id } => {
                if identity_id.is_empty() {
                    return Err(BrokerError::Configuration(
                        "Missing identity ID for AWS IAM auth".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}

// =============================================================================
// EXPORT CONFIG
// =============================================================================

/// Where the access token goes after a successful login
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportMode {
    /// Export as the `INFISICAL_TOKEN` environment variable
    Env,
    /// Write the raw token to this path, relative to the workspace root
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    pub mode: ExportMode,
    /// Also publish the token through the `access-token` output
    pub emit_as_output: bool,
}

impl ExportConfig {
    pub fn env() -> Self {
        Self { mode: ExportMode::Env, emit_as_output: false }
    }

    pub fn file(path: impl Into<PathBuf>) -> Result<Self, BrokerError> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Err(BrokerError::Configuration(
                "File export requires a non-empty file path".to_string(),
            ));
        }
        Ok(Self { mode: ExportMode::File(path), emit_as_output: false })
    }

    pub fn with_output(mut self, emit_as_output: bool) -> Self {
        self.emit_as_output = emit_as_output;
        self
    }
}

// =============================================================================
// LOGIN RESPONSE
// =============================================================================

/// Identity service login response body
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(default)]
    pub access_token: SecretString,
    pub expires_in: Option<u64>,
    #[serde(rename = "accessTokenMaxTTL")]
    pub access_token_max_ttl: Option<u64>,
    pub token_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_method_parse() {
        assert_eq!("universal".parse::<AuthMethod>().unwrap(), AuthMethod::Universal);
        assert_eq!("oidc".parse::<AuthMethod>().unwrap(), AuthMethod::Oidc);
        assert_eq!("aws-iam".parse::<AuthMethod>().unwrap(), AuthMethod::AwsIam);
    }

    #[test]
    fn test_auth_method_parse_unknown() {
        let err = "kerberos".parse::<AuthMethod>().unwrap_err();
        assert!(matches!(err, BrokerError::AuthMethod(ref m) if m == "kerberos"));
    }

    #[test]
    fn test_universal_empty_secret_is_configuration_error() {
        let request = AuthRequest::Universal {
            client_id: "abc".to_string(),
            client_secret: SecretString::default(),
        };
        assert!(matches!(request.validate(), Err(BrokerError::Configuration(_))));
    }

    #[test]
    fn test_export_file_requires_path() {
        assert!(ExportConfig::file("").is_err());
        let config = ExportConfig::file("out/token").unwrap().with_output(true);
        assert_eq!(config.mode, ExportMode::File(PathBuf::from("out/token")));
        assert!(config.emit_as_output);
    }

    #[test]
    fn test_login_response_camel_case() {
        let body = r#"{"accessToken":"tok-1","expiresIn":7200,"accessTokenMaxTTL":86400,"tokenType":"Bearer"}"#;
        let response: LoginResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.access_token.expose(), "tok-1");
        assert_eq!(response.expires_in, Some(7200));
        assert_eq!(response.access_token_max_ttl, Some(86400));
    }

    #[test]
    fn test_login_response_missing_token_defaults_empty() {
        let response: LoginResponse = serde_json::from_str("{}").unwrap();
        assert!(response.access_token.is_empty());
    }
}
