//! Process outcome of one login run
//!
//! A run either exports a token or stops at its first error. Which error it was
//! shows up in the `::error::` annotation; the exit code only says that it failed.

use std::process::{ExitCode, Termination};

/// How the process ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitStatus {
    /// The token was obtained and exported
    Success = 0,
    /// Bad input, credential discovery, login or export failed
    Error = 1,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status as u8)
    }
}

impl Termination for ExitStatus {
    fn report(self) -> ExitCode {
        ExitCode::from(self as u8)
    }
}
