//! Logging configuration using tracing

use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::Result;

const LOG_ENV: &str = "INSTANCER_LOG";
const DEFAULT_FILTER: &str =
    "instancer=info,instancer_app=info,instancer_api=info,instancer_tui=info,warn";

/// Initialize the logging subsystem
///
/// Logs are written to `~/.local/share/instancer/logs/`. Stdout is never used:
/// it belongs to the terminal UI or to headless JSON output.
/// Log level is controlled by `INSTANCER_LOG` environment variable.
///
/// # Examples
/// ```bash
/// INSTANCER_LOG=debug instancer
/// INSTANCER_LOG=instancer_app=trace instancer --chall baby-sqli
/// ```
pub fn init() -> Result<()> {
    let log_dir = get_log_directory()?;
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "instancer.log");

    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true)
                .with_timer(fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                )),
        )
        .init();

    tracing::info!("═══════════════════════════════════════════════════════");
    tracing::info!("instancer client starting");
    tracing::info!("Log directory: {}", log_dir.display());
    tracing::info!("═══════════════════════════════════════════════════════");

    Ok(())
}

/// Directives from `INSTANCER_LOG`, or info for our crates when unset or unparsable
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Get the log directory path
fn get_log_directory() -> Result<PathBuf> {
    let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    Ok(base.join("instancer").join("logs"))
}

/// Get the log file path for the current day
pub fn get_current_log_file() -> Result<PathBuf> {
    let dir = get_log_directory()?;
    Ok(dir.join("instancer.log"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_env_filter_defaults_without_variable() {
        std::env::remove_var(LOG_ENV);
        let filter = env_filter().to_string();
        assert!(filter.contains("instancer_app=info"));
        assert!(filter.contains("warn"));
    }

    #[test]
    #[serial]
    fn test_env_filter_from_variable() {
        std::env::set_var(LOG_ENV, "debug");
        let filter = env_filter().to_string();
        std::env::remove_var(LOG_ENV);
        assert_eq!(filter, "debug");
    }

    #[test]
    fn test_log_file_under_instancer_dir() {
        let path = get_current_log_file().unwrap();
        assert!(path.ends_with("instancer/logs/instancer.log"));
    }
}
