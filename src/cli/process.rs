//! Post-processing argument logic
//!
//! Turns parsed [`Args`] plus the config file into the normalized inputs the
//! broker and exporter consume. All validation happens here, before any
//! network activity.

use std::time::Duration;

use crate::cli::args::{Args, ExportType};
use crate::cli::headers::parse_extra_headers;
use crate::client::DEFAULT_LOGIN_TIMEOUT;
use crate::config::Config;
use crate::errors::{BrokerError, Result};
use crate::models::{AuthMethod, AuthRequest, ExportConfig, HeaderMap};

pub const DEFAULT_DOMAIN: &str = "https://app.infisical.com";

/// Normalized inputs for one run
#[derive(Debug, Clone)]
pub struct Inputs {
    pub request: AuthRequest,
    pub export: ExportConfig,
    pub domain: String,
    pub headers: HeaderMap,
    pub timeout: Duration,
}

/// Build [`Inputs`] from CLI arguments, with `config` supplying defaults.
pub fn process_args(args: &Args, config: &Config) -> Result<Inputs> {
    let method: AuthMethod = args.method.trim().parse()?;
    let request = build_request(method, args);
    request.validate()?;

    let export = match args.export_type {
        ExportType::Env => ExportConfig::env(),
        ExportType::File => {
            let path = args.file_output_path.clone().ok_or_else(|| {
                BrokerError::Configuration("File export requires --file-output-path".to_string())
            })?;
            ExportConfig::file(path)?
        }
    }
    .with_output(args.output_credential);

    let domain = non_empty(args.domain.as_deref())
        .or(non_empty(config.domain.as_deref()))
        .unwrap_or(DEFAULT_DOMAIN)
        .to_string();
    validate_domain(&domain)?;

    let headers = match &args.extra_headers {
        Some(raw) => parse_extra_headers(raw, config.headers.clone())?,
        None => config.headers.clone(),
    };

    let timeout = match args.timeout.or(config.timeout) {
        Some(secs) => login_timeout(secs)?,
        None => DEFAULT_LOGIN_TIMEOUT,
    };

    Ok(Inputs {
        request,
        export,
        domain,
        headers,
        timeout,
    })
}

fn build_request(method: AuthMethod, args: &Args) -> AuthRequest {
    let identity_id = || args.identity_id.clone().unwrap_or_default().trim().to_string();

    match method {
        AuthMethod::Universal => AuthRequest::Universal {
            client_id: args.client_id.clone().unwrap_or_default().trim().to_string(),
            client_secret: args.client_secret.clone().unwrap_or_default(),
        },
        AuthMethod::Oidc => AuthRequest::Oidc {
            identity_id: identity_id(),
            audience: non_empty(args.oidc_audience.as_deref()).map(String::from),
        },
        AuthMethod::AwsIam => AuthRequest::AwsIam {
            identity_id: identity_id(),
        },
    }
}

/// Positive seconds that fit in a `Duration`
fn login_timeout(secs: f64) -> Result<Duration> {
    if secs <= 0.0 {
        return Err(BrokerError::Configuration(format!(
            "Timeout must be a positive number of seconds, got {}",
            secs
        )));
    }
    Duration::try_from_secs_f64(secs).map_err(|e| {
        BrokerError::Configuration(format!("Invalid timeout {} seconds: {}", secs, e))
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn validate_domain(domain: &str) -> Result<()> {
    let url = url::Url::parse(domain)?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(BrokerError::Configuration(format!(
            "Domain must be an http(s) URL, got scheme '{}'",
            other
        ))),
    }
}
