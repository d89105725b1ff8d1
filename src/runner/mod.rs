//! Capabilities provided by the CI runner the broker executes in

pub mod commands;
pub mod oidc;

pub use commands::{GithubRunner, WorkflowCommands};
pub use oidc::{GithubIdTokenProvider, IdTokenProvider};
