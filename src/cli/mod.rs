//! CLI argument parsing and processing

pub mod args;
pub mod headers;
pub mod process;

// Re-exports
pub use args::{Args, ExportType, LogFormat};
pub use headers::parse_extra_headers;
pub use process::{process_args, Inputs, DEFAULT_DOMAIN};
