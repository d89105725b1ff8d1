use std::sync::Arc;

use clap::Parser;

use crate::auth::AuthBroker;
use crate::aws::{DefaultChainProvider, RegionResolver};
use crate::cli::{process_args, Args};
use crate::client::HttpLoginClient;
use crate::config::Config;
use crate::context::Environment;
use crate::errors::BrokerError;
use crate::export::TokenExporter;
use crate::logging;
use crate::models::AuthRequest;
use crate::runner::{GithubIdTokenProvider, GithubRunner, WorkflowCommands};
use crate::status::ExitStatus;

/// Main entry point for the CLI.
///
/// Parses arguments, loads the config file, runs one login and exports the
/// token. Any failure is reported once through the runner.
pub fn run(args: Vec<String>, mut env: Environment) -> ExitStatus {
    if let Some(name) = args.first() {
        if let Some(basename) = std::path::Path::new(name).file_stem() {
            env.program_name = basename.to_string_lossy().to_string();
        }
    }

    let parsed = match Args::try_parse_from(&args) {
        Ok(args) => args,
        Err(e) => {
            e.print().ok();
            return if e.kind() == clap::error::ErrorKind::DisplayHelp
                || e.kind() == clap::error::ErrorKind::DisplayVersion {
                ExitStatus::Success
            } else {
                ExitStatus::Error
            };
        }
    };

    logging::init(parsed.log_format);

    let runner = Arc::new(GithubRunner::new(env.env_file.clone(), env.output_file.clone()));

    let config = match Config::load(parsed.config.as_deref()) {
        Ok(config) => config,
        Err(e) => return handle_error(runner.as_ref(), e),
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            return handle_error(
                runner.as_ref(),
                BrokerError::Configuration(format!("Failed to create tokio runtime: {}", e)),
            )
        }
    };

    match runtime.block_on(program(&parsed, &config, &env, runner.clone())) {
        Ok(status) => status,
        Err(e) => handle_error(runner.as_ref(), e),
    }
}

pub async fn program(
    args: &Args,
    config: &Config,
    env: &Environment,
    runner: Arc<GithubRunner>,
) -> Result<ExitStatus, BrokerError> {
    let inputs = process_args(args, config)?;
    tracing::debug!(program = %env.program_name, domain = %inputs.domain, "Inputs processed");

    if let AuthRequest::Universal { client_secret, .. } = &inputs.request {
        runner.mask(client_secret.expose())?;
    }

    let client = HttpLoginClient::new(&inputs.domain, &inputs.headers, inputs.timeout)?;
    let broker = AuthBroker::new(client)
        .with_region_resolver(RegionResolver::new(env.aws_region.clone()))
        .with_credential_provider(Arc::new(DefaultChainProvider))
        .with_id_token_provider(Arc::new(GithubIdTokenProvider::new(
            env.id_token_request_url.clone(),
            env.id_token_request_token.clone(),
        )))
        .with_commands(runner.clone());

    let token = broker.login(&inputs.request).await?;

    TokenExporter::new(runner.as_ref(), &env.workspace).export(&token, &inputs.export)?;

    Ok(ExitStatus::Success)
}

fn handle_error(commands: &dyn WorkflowCommands, e: BrokerError) -> ExitStatus {
    tracing::debug!(error = ?e, "Run failed");
    commands.error(&e.to_string());
    ExitStatus::Error
}
