//! Data model shared by the broker, its strategies and the exporter

pub mod secret;
pub mod types;

pub use secret::SecretString;
pub use types::{AuthMethod, AuthRequest, ExportConfig, ExportMode, HeaderMap, LoginResponse};
