//! HTTP client functionality

pub mod login;

// Re-exports
pub use login::{HttpLoginClient, DEFAULT_LOGIN_TIMEOUT, USER_AGENT_STRING};
