//! # Logging Setup
//!
//! Installs the global `tracing` subscriber: a session log file under the configured data
//! directory (cleared on every start) plus the console.

use crate::domain::config::SystemConfig;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const SESSION_LOG: &str = "session.log";
const DEFAULT_DIRECTIVES: &str =
    "matrix_sdk=warn,matrix_sdk_base=warn,matrix_sdk_crypto=error,ruma=warn,hyper=warn";

/// Keep the returned guard alive for as long as file logging should keep flushing.
pub fn init(system: &SystemConfig, level_override: Option<&str>) -> Result<WorkerGuard> {
    let dir = Path::new(&system.log_dir);
    if !dir.exists() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    }

    // Clear previous session log
    let log_path = dir.join(SESSION_LOG);
    if log_path.exists() {
        let _ = fs::remove_file(&log_path);
    }

    let file_appender = tracing_appender::rolling::never(dir, SESSION_LOG);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(env_filter(system, level_override))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}

/// CLI override beats `RUST_LOG`, which beats the configured level.
fn env_filter(system: &SystemConfig, level_override: Option<&str>) -> EnvFilter {
    if let Some(level) = level_override {
        return EnvFilter::new(directives(level));
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(directives(system.log_level.as_deref().unwrap_or("info")))
    })
}

fn directives(level: &str) -> String {
    format!("{level},{DEFAULT_DIRECTIVES}")
}
