use infisical_auth::context::Environment;
use infisical_auth::core;
use infisical_auth::status::ExitStatus;

/// Entry point - captures the environment once and calls core::run()
///
/// Returns ExitStatus directly, which implements std::process::Termination.
fn main() -> ExitStatus {
    let args: Vec<String> = std::env::args().collect();
    let env = Environment::init();

    core::run(args, env)
}
