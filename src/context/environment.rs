//! Process environment captured once at startup
//!
//! Core components receive these values explicitly instead of reading
//! the process environment themselves.

use std::path::PathBuf;

use crate::models::SecretString;

/// Execution environment
#[derive(Debug, Clone, Default)]
pub struct Environment {
    pub program_name: String,
    /// `AWS_REGION`
    pub aws_region: Option<String>,
    /// `GITHUB_WORKSPACE`, or the current directory
    pub workspace: PathBuf,
    /// `GITHUB_ENV`
    pub env_file: Option<PathBuf>,
    /// `GITHUB_OUTPUT`
    pub output_file: Option<PathBuf>,
    /// `ACTIONS_ID_TOKEN_REQUEST_URL`
    pub id_token_request_url: Option<String>,
    /// `ACTIONS_ID_TOKEN_REQUEST_TOKEN`
    pub id_token_request_token: Option<SecretString>,
}

impl Environment {
    /// Capture the environment of the current process
    pub fn init() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.is_empty());

        let workspace = var("GITHUB_WORKSPACE")
            .map(PathBuf::from)
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."));

        Self {
            program_name: "infisical-auth".to_string(),
            aws_region: var("AWS_REGION"),
            workspace,
            env_file: var("GITHUB_ENV").map(PathBuf::from),
            output_file: var("GITHUB_OUTPUT").map(PathBuf::from),
            id_token_request_url: var("ACTIONS_ID_TOKEN_REQUEST_URL"),
            id_token_request_token: var("ACTIONS_ID_TOKEN_REQUEST_TOKEN").map(SecretString::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("AWS_REGION", "us-east-1"),
            ("GITHUB_WORKSPACE", "/work"),
            ("GITHUB_ENV", "/tmp/env"),
            ("GITHUB_OUTPUT", ""),
        ]
        .into_iter()
        .collect();

        let env = Environment::from_lookup(|name| vars.get(name).map(|v| v.to_string()));
        assert_eq!(env.aws_region.as_deref(), Some("us-east-1"));
        assert_eq!(env.workspace, PathBuf::from("/work"));
        assert_eq!(env.env_file, Some(PathBuf::from("/tmp/env")));
        assert_eq!(env.output_file, None);
        assert!(env.id_token_request_token.is_none());
    }
}
