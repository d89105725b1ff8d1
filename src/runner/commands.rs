//! Workflow commands for the GitHub Actions runner
//!
//! Masking and annotations are written to stdout as `::command::` lines.
//! Environment variables and outputs go to the files named by `GITHUB_ENV`
//! and `GITHUB_OUTPUT`; without those files the legacy commands are emitted.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::errors::{BrokerError, Result};

/// Capabilities of the environment the token is exported into
pub trait WorkflowCommands: Send + Sync {
    /// Register a value to be masked in all subsequent log output
    fn mask(&self, value: &str) -> Result<()>;

    /// Make an environment variable visible to later steps
    fn export_variable(&self, name: &str, value: &str) -> Result<()>;

    /// Publish a named step output
    fn set_output(&self, name: &str, value: &str) -> Result<()>;

    /// Report the single failure message for this run
    fn error(&self, message: &str);
}

/// GitHub Actions runner protocol
pub struct GithubRunner {
    env_file: Option<PathBuf>,
    output_file: Option<PathBuf>,
    out: Mutex<Box<dyn Write + Send>>,
}

impl std::fmt::Debug for GithubRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubRunner")
            .field("env_file", &self.env_file)
            .field("output_file", &self.output_file)
            .finish()
    }
}

impl GithubRunner {
    pub fn new(env_file: Option<PathBuf>, output_file: Option<PathBuf>) -> Self {
        Self::with_writer(env_file, output_file, Box::new(std::io::stdout()))
    }

    /// Send command lines to `out` instead of stdout
    pub fn with_writer(
        env_file: Option<PathBuf>,
        output_file: Option<PathBuf>,
        out: Box<dyn Write + Send>,
    ) -> Self {
        Self {
            env_file,
            output_file,
            out: Mutex::new(out),
        }
    }

    fn issue(&self, line: &str) -> Result<()> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| BrokerError::Export("Workflow command writer poisoned".to_string()))?;
        writeln!(out, "{}", line)
            .and_then(|_| out.flush())
            .map_err(|e| BrokerError::Export(format!("Failed to write workflow command: {}", e)))
    }

    fn append_file_command(&self, path: &Path, name: &str, value: &str) -> Result<()> {
        let message = prepare_key_value_message(name, value)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| BrokerError::Export(format!("Failed to open {}: {}", path.display(), e)))?;
        file.write_all(message.as_bytes())
            .map_err(|e| BrokerError::Export(format!("Failed to write {}: {}", path.display(), e)))
    }
}

impl WorkflowCommands for GithubRunner {
    fn mask(&self, value: &str) -> Result<()> {
        if value.is_empty() {
            return Ok(());
        }
        self.issue(&format!("::add-mask::{}", escape_data(value)))
    }

    fn export_variable(&self, name: &str, value: &str) -> Result<()> {
        match &self.env_file {
            Some(path) => self.append_file_command(path, name, value),
            None => self.issue(&format!(
                "::set-env name={}::{}",
                escape_property(name),
                escape_data(value)
            )),
        }
    }

    fn set_output(&self, name: &str, value: &str) -> Result<()> {
        match &self.output_file {
            Some(path) => self.append_file_command(path, name, value),
            None => self.issue(&format!(
                "::set-output name={}::{}",
                escape_property(name),
                escape_data(value)
            )),
        }
    }

    fn error(&self, message: &str) {
        if let Err(e) = self.issue(&format!("::error::{}", escape_data(message))) {
            eprintln!("Error: {} ({})", message, e);
        }
    }
}

/// `NAME<<DELIM\nVALUE\nDELIM\n` with a random delimiter
fn prepare_key_value_message(name: &str, value: &str) -> Result<String> {
    let delimiter = format!("ghadelimiter_{}", uuid::Uuid::new_v4());
    if name.contains(&delimiter) {
        return Err(BrokerError::Export(format!(
            "Unexpected input: name should not contain the delimiter \"{}\"",
            delimiter
        )));
    }
    if value.contains(&delimiter) {
        return Err(BrokerError::Export(
            "Unexpected input: value should not contain the delimiter".to_string(),
        ));
    }
    Ok(format!("{}<<{}\n{}\n{}\n", name, delimiter, value, delimiter))
}

pub fn escape_data(value: &str) -> String {
    value.replace('%', "%25").replace('\r', "%0D").replace('\n', "%0A")
}

pub fn escape_property(value: &str) -> String {
    escape_data(value).replace(':', "%3A").replace(',', "%2C")
}
