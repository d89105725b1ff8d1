//! CLI argument definitions using clap
//!
//! Every input may also come from the environment, so the action wrapper can
//! pass its `with:` inputs either way.

use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

use crate::models::SecretString;

/// infisical-auth - Log in to Infisical and export the access token
#[derive(Parser, Debug, Clone)]
#[command(name = "infisical-auth", version, about, long_about = None)]
pub struct Args {
    // =========================================================================
    // AUTHENTICATION
    // =========================================================================

    /// Authentication method: universal, oidc or aws-iam
    #[arg(long = "method", value_name = "METHOD", env = "INFISICAL_AUTH_METHOD", default_value = "universal")]
    pub method: String,

    /// Infisical instance URL
    #[arg(long = "domain", value_name = "URL", env = "INFISICAL_DOMAIN")]
    pub domain: Option<String>,

    /// Universal Auth client ID
    #[arg(long = "client-id", value_name = "ID", env = "INFISICAL_UNIVERSAL_AUTH_CLIENT_ID", hide_env_values = true)]
    pub client_id: Option<String>,

    /// Universal Auth client secret
    #[arg(long = "client-secret", value_name = "SECRET", env = "INFISICAL_UNIVERSAL_AUTH_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<SecretString>,

    /// Machine identity ID (OIDC and AWS IAM auth)
    #[arg(long = "identity-id", value_name = "ID", env = "INFISICAL_MACHINE_IDENTITY_ID")]
    pub identity_id: Option<String>,

    /// Audience requested for the OIDC ID token
    #[arg(long = "oidc-audience", value_name = "AUDIENCE", env = "INFISICAL_OIDC_AUDIENCE")]
    pub oidc_audience: Option<String>,

    /// Extra headers for every request, one `key: value` per line
    #[arg(long = "extra-headers", value_name = "HEADERS", env = "INFISICAL_EXTRA_HEADERS")]
    pub extra_headers: Option<String>,

    /// Login request timeout in seconds
    #[arg(long = "timeout", value_name = "SECONDS", env = "INFISICAL_TIMEOUT")]
    pub timeout: Option<f64>,

    // =========================================================================
    // EXPORT
    // =========================================================================

    /// How to export the access token
    #[arg(long = "export-type", value_enum, value_name = "TYPE", env = "INFISICAL_EXPORT_TYPE", default_value = "env")]
    pub export_type: ExportType,

    /// Token file path for --export-type file, relative to the workspace
    #[arg(long = "file-output-path", value_name = "PATH", env = "INFISICAL_FILE_OUTPUT_PATH")]
    pub file_output_path: Option<PathBuf>,

    /// Also publish the token as the `access-token` step output
    #[arg(long = "output-credential", action = ArgAction::SetTrue, env = "INFISICAL_OUTPUT_CREDENTIAL")]
    pub output_credential: bool,

    // =========================================================================
    // MISC
    // =========================================================================

    /// Config file (default: <config dir>/infisical-auth/config.toml)
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Diagnostic log format on stderr
    #[arg(long = "log-format", value_enum, value_name = "FORMAT", default_value = "text")]
    pub log_format: LogFormat,
}

/// Token export destination
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ExportType {
    /// `INFISICAL_TOKEN` environment variable
    #[default]
    Env,
    /// Raw token written to a file
    File,
}

/// Log output format
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Plain text output (default)
    #[default]
    Text,
    /// JSON Lines format for parsing
    Json,
}
