//! Common test utilities for infisical-auth integration tests
//!
//! - Login client and broker setup against a wiremock server
//! - A recording [`WorkflowCommands`] implementation
//! - Form body decoding for request assertions
//! - CLI invocation with an isolated environment

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use base64::Engine;
use wiremock::{MockServer, Request, ResponseTemplate};

use infisical_auth::client::HttpLoginClient;
use infisical_auth::errors::Result;
use infisical_auth::models::HeaderMap;
use infisical_auth::runner::WorkflowCommands;

/// Variables the binary reads that must not leak in from the host
pub const ISOLATED_VARS: &[&str] = &[
    "INFISICAL_AUTH_METHOD",
    "INFISICAL_DOMAIN",
    "INFISICAL_UNIVERSAL_AUTH_CLIENT_ID",
    "INFISICAL_UNIVERSAL_AUTH_CLIENT_SECRET",
    "INFISICAL_MACHINE_IDENTITY_ID",
    "INFISICAL_OIDC_AUDIENCE",
    "INFISICAL_EXTRA_HEADERS",
    "INFISICAL_TIMEOUT",
    "INFISICAL_EXPORT_TYPE",
    "INFISICAL_FILE_OUTPUT_PATH",
    "INFISICAL_OUTPUT_CREDENTIAL",
    "INFISICAL_AUTH_LOG",
    "AWS_REGION",
    "GITHUB_ENV",
    "GITHUB_OUTPUT",
    "GITHUB_WORKSPACE",
    "ACTIONS_ID_TOKEN_REQUEST_URL",
    "ACTIONS_ID_TOKEN_REQUEST_TOKEN",
];

/// Something that happened through [`WorkflowCommands`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Mask(String),
    Export(String, String),
    Output(String, String),
    Error(String),
}

/// Records workflow commands in call order
#[derive(Debug, Default)]
pub struct Recorder(Mutex<Vec<Event>>);

impl Recorder {
    pub fn events(&self) -> Vec<Event> {
        self.0.lock().unwrap().clone()
    }

    fn push(&self, event: Event) {
        self.0.lock().unwrap().push(event);
    }
}

impl WorkflowCommands for Recorder {
    fn mask(&self, value: &str) -> Result<()> {
        self.push(Event::Mask(value.to_string()));
        Ok(())
    }

    fn export_variable(&self, name: &str, value: &str) -> Result<()> {
        self.push(Event::Export(name.to_string(), value.to_string()));
        Ok(())
    }

    fn set_output(&self, name: &str, value: &str) -> Result<()> {
        self.push(Event::Output(name.to_string(), value.to_string()));
        Ok(())
    }

    fn error(&self, message: &str) {
        self.push(Event::Error(message.to_string()));
    }
}

/// Login client bound to the mock server, no default headers
pub fn login_client(server: &MockServer) -> HttpLoginClient {
    login_client_with_headers(server, &HeaderMap::new())
}

pub fn login_client_with_headers(server: &MockServer, headers: &HeaderMap) -> HttpLoginClient {
    HttpLoginClient::new(&server.uri(), headers, Duration::from_secs(5)).expect("valid mock server URL")
}

/// `200 {"accessToken": token, ...}`
pub fn token_response(token: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "accessToken": token,
        "expiresIn": 7200,
        "accessTokenMaxTTL": 43200,
        "tokenType": "Bearer"
    }))
}

/// Decode an `application/x-www-form-urlencoded` request body
pub fn form_fields(request: &Request) -> HashMap<String, String> {
    serde_urlencoded::from_bytes::<Vec<(String, String)>>(&request.body)
        .expect("form-encoded body")
        .into_iter()
        .collect()
}

/// Decode a base64 form field
pub fn decode_b64(value: &str) -> Vec<u8> {
    base64::engine::general_purpose::STANDARD
        .decode(value)
        .expect("base64 field")
}

/// The single request the server received on `path`
pub async fn single_request(server: &MockServer, path: &str) -> Request {
    let mut matching: Vec<Request> = server
        .received_requests()
        .await
        .expect("request recording enabled")
        .into_iter()
        .filter(|r| r.url.path() == path)
        .collect();
    assert_eq!(matching.len(), 1, "expected exactly one request to {}", path);
    matching.remove(0)
}

/// The binary with host configuration stripped from its environment
pub fn cli(config_home: &Path) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(env!("CARGO_BIN_EXE_infisical-auth"));
    for var in ISOLATED_VARS {
        cmd.env_remove(var);
    }
    cmd.env("XDG_CONFIG_HOME", config_home);
    cmd.env("HOME", config_home);
    cmd.timeout(Duration::from_secs(30));
    cmd
}
