//! Command dispatch and handlers.

pub mod audit;
pub mod links;

use std::path::Path;

use crate::cli::{Cli, Command};
use crate::config::AuditConfig;

/// Dispatch a parsed command to its handler.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(cli: &Cli) -> Result<(), String> {
    match &cli.command {
        Command::Audit(args) => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(|e| format!("failed to start async runtime: {e}"))?;
            runtime.block_on(audit::run(cli.config.as_deref(), args))
        }
        Command::Links { readme } => links::run(cli.config.as_deref(), readme.as_deref()),
    }
}

/// Loads the configuration file (if any) and applies `STALE_AUDIT_*` variables.
fn load_config(path: Option<&Path>) -> Result<AuditConfig, String> {
    let mut config = AuditConfig::load(path).map_err(|e| e.to_string())?;
    let env = |key: &str| std::env::var(key).ok();
    config.apply_env(env).map_err(|e| e.to_string())?;
    Ok(config)
}
