//! Access token export
//!
//! The token is masked before anything else happens, then written to the
//! destinations selected by [`ExportConfig`]. The token value is never logged.

use std::path::{Component, Path, PathBuf};

use crate::errors::{BrokerError, Result};
use crate::models::{ExportConfig, ExportMode, SecretString};
use crate::runner::WorkflowCommands;

pub const TOKEN_ENV_VAR: &str = "INFISICAL_TOKEN";
pub const TOKEN_OUTPUT: &str = "access-token";

/// Makes the access token available to later steps
pub struct TokenExporter<'a> {
    commands: &'a dyn WorkflowCommands,
    workspace: &'a Path,
}

impl<'a> TokenExporter<'a> {
    pub fn new(commands: &'a dyn WorkflowCommands, workspace: &'a Path) -> Self {
        Self { commands, workspace }
    }

    pub fn export(&self, token: &SecretString, config: &ExportConfig) -> Result<()> {
        self.commands.mask(token.expose())?;

        match &config.mode {
            ExportMode::Env => {
                self.commands.export_variable(TOKEN_ENV_VAR, token.expose())?;
                tracing::info!(
                    "Injected Infisical token as environment variable [{}]",
                    TOKEN_ENV_VAR
                );
            }
            ExportMode::File(path) => {
                let target = resolve_in_workspace(self.workspace, path);
                write_token_file(&target, token).map_err(|e| {
                    tracing::error!(path = %target.display(), error = %e, "Failed to write token file");
                    e
                })?;
                tracing::info!("Wrote Infisical token to file [{}]", target.display());
            }
        }

        if config.emit_as_output {
            self.commands.set_output(TOKEN_OUTPUT, token.expose())?;
            tracing::info!("Set Infisical token as action output [{}]", TOKEN_OUTPUT);
        }

        Ok(())
    }
}

/// Join `path` under `root`, re-rooting absolute paths.
pub fn resolve_in_workspace(root: &Path, path: &Path) -> PathBuf {
    let relative: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::RootDir | Component::Prefix(_)))
        .collect();
    root.join(relative)
}

fn write_token_file(target: &Path, token: &SecretString) -> Result<()> {
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            BrokerError::Export(format!("Failed to create {}: {}", parent.display(), e))
        })?;
    }
    std::fs::write(target, token.expose().as_bytes())
        .map_err(|e| BrokerError::Export(format!("Failed to write {}: {}", target.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Event {
        Mask(String),
        Export(String, String),
        Output(String, String),
    }

    #[derive(Default)]
    struct Recorder(Mutex<Vec<Event>>);

    impl Recorder {
        fn events(&self) -> Vec<Event> {
            self.0.lock().unwrap().clone()
        }
    }

    impl WorkflowCommands for Recorder {
        fn mask(&self, value: &str) -> Result<()> {
            self.0.lock().unwrap().push(Event::Mask(value.to_string()));
            Ok(())
        }
        fn export_variable(&self, name: &str, value: &str) -> Result<()> {
            self.0.lock().unwrap().push(Event::Export(name.to_string(), value.to_string()));
            Ok(())
        }
        fn set_output(&self, name: &str, value: &str) -> Result<()> {
            self.0.lock().unwrap().push(Event::Output(name.to_string(), value.to_string()));
            Ok(())
        }
        fn error(&self, _message: &str) {}
    }

    #[test]
    fn test_resolve_in_workspace() {
        assert_eq!(
            resolve_in_workspace(Path::new("/work"), Path::new("/out/token")),
            PathBuf::from("/work/out/token")
        );
        assert_eq!(
            resolve_in_workspace(Path::new("/work"), Path::new("out/token")),
            PathBuf::from("/work/out/token")
        );
    }

    #[test]
    fn test_env_export_masks_first() {
        let recorder = Recorder::default();
        let token = SecretString::new("tok-1");
        TokenExporter::new(&recorder, Path::new("/unused"))
            .export(&token, &ExportConfig::env())
            .unwrap();

        assert_eq!(
            recorder.events(),
            vec![
                Event::Mask("tok-1".to_string()),
                Event::Export("INFISICAL_TOKEN".to_string(), "tok-1".to_string()),
            ]
        );
    }

    #[test]
    fn test_emit_as_output() {
        let recorder = Recorder::default();
        let token = SecretString::new("tok-1");
        TokenExporter::new(&recorder, Path::new("/unused"))
            .export(&token, &ExportConfig::env().with_output(true))
            .unwrap();

        let events = recorder.events();
        assert_eq!(events[0], Event::Mask("tok-1".to_string()));
        assert_eq!(events[2], Event::Output("access-token".to_string(), "tok-1".to_string()));
    }

    #[test]
    fn test_file_export_under_workspace() {
        let workspace = tempfile::tempdir().unwrap();
        let recorder = Recorder::default();
        let token = SecretString::new("tok-1");
        TokenExporter::new(&recorder, workspace.path())
            .export(&token, &ExportConfig::file("/out/token").unwrap())
            .unwrap();

        let written = std::fs::read(workspace.path().join("out/token")).unwrap();
        assert_eq!(written, b"tok-1");
        assert_eq!(recorder.events(), vec![Event::Mask("tok-1".to_string())]);
    }

    #[test]
    fn test_file_export_failure() {
        let workspace = tempfile::tempdir().unwrap();
        // A regular file where a directory is expected
        std::fs::write(workspace.path().join("out"), b"").unwrap();
        let recorder = Recorder::default();
        let err = TokenExporter::new(&recorder, workspace.path())
            .export(&SecretString::new("tok-1"), &ExportConfig::file("out/token").unwrap())
            .unwrap_err();
        assert!(matches!(err, BrokerError::Export(_)));
        assert!(!err.to_string().contains("tok-1"));
    }
}
