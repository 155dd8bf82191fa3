//! CLI command implementations

pub mod calc;
pub mod config;
pub mod login;
pub mod logout;
pub mod logs;
pub mod purities;
pub mod rate;
pub mod register;
pub mod whoami;

use std::future::Future;
use std::path::PathBuf;

use anyhow::{Context, Result};
use goldcalc_core::{GoldCalcContext, LogEvent, LoggingService};

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "GOLDCALC_DIR";

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Option<LoggingService> {
    let data_dir = get_data_dir().ok()?;
    std::fs::create_dir_all(&data_dir).ok()?;
    LoggingService::new(&data_dir, env!("CARGO_PKG_VERSION"))
        .map_err(|e| tracing::debug!(error = %e, "event log unavailable"))
        .ok()
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Get the data directory from environment or default
pub fn get_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }
    let home = dirs::home_dir().context("Could not find home directory")?;
    Ok(home.join(".goldcalc"))
}

/// Build the calculator context over the data directory
pub fn get_context() -> Result<GoldCalcContext> {
    let data_dir = get_data_dir()?;

    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory: {:?}", data_dir))?;

    GoldCalcContext::new(&data_dir).context("Failed to initialize goldcalc context")
}

/// Drive an async core operation to completion
pub fn block_on<F: Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    Ok(runtime.block_on(future))
}
