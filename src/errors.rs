//! Error types for infisical-auth

use thiserror::Error;

/// Main error type for the authentication broker
///
/// Messages never carry secret material (tokens, client secrets, JWTs or AWS keys).
#[derive(Error, Debug)]
pub enum BrokerError {
    #[error("Invalid authentication method: {0}")]
    AuthMethod(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Credential discovery error: {0}")]
    CredentialDiscovery(String),

    #[error("Network error{}: {message}", fmt_status(.status))]
    Network {
        status: Option<u16>,
        message: String,
    },

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Export error: {0}")]
    Export(String),
}

fn fmt_status(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" (HTTP {})", code),
        None => String::new(),
    }
}

impl From<reqwest::Error> for BrokerError {
    fn from(err: reqwest::Error) -> Self {
        BrokerError::Network {
            status: err.status().map(|s| s.as_u16()),
            message: err.without_url().to_string(),
        }
    }
}

impl From<serde_json::Error> for BrokerError {
    fn from(err: serde_json::Error) -> Self {
        BrokerError::Protocol(format!("Malformed JSON: {}", err))
    }
}

impl From<url::ParseError> for BrokerError {
    fn from(err: url::ParseError) -> Self {
        BrokerError::Configuration(format!("Invalid URL: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, BrokerError>;
