//! Binary entrypoint for the `stale-audit` CLI.

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "STALE_AUDIT_LOG";

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    // Recording is handled in commands::audit via STALE_AUDIT_RECORD=<path>.
    match stale_audit::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let verbose = std::env::args().any(|arg| is_verbose_flag(&arg));
    let fallback = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_env(LOG_ENV);
    let filter = filter.unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn is_verbose_flag(arg: &str) -> bool {
    arg == "--verbose" || arg == "-v"
}
