//! infisical-auth library interface
//!
//! Logs a CI job in to Infisical with a machine identity and hands the access
//! token to later steps.
//!
//! # Module Organization
//!
//! - [`auth`] - Login strategies and the [`auth::AuthBroker`] dispatcher
//! - [`aws`] - SigV4 signing, credential discovery, region resolution
//! - [`client`] - Identity service HTTP client
//! - [`runner`] - CI runner capabilities (masking, env/output files, OIDC tokens)
//! - [`export`] - Token export
//! - [`errors`] - Error types (BrokerError, Result)
//! - [`status`] - Exit status codes (ExitStatus)
//! - [`core`] - Main execution logic

pub mod auth;
pub mod aws;
pub mod cli;
pub mod client;
pub mod config;
pub mod context;
pub mod core;
pub mod errors;
pub mod export;
pub mod logging;
pub mod models;
pub mod runner;
pub mod status;
