use anyhow::{Error, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::PanelConfig;

/// Where diagnostics go. The terminal UI owns stdout/stderr, so it logs to a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File,
}

/// Installs the global subscriber. Keep the returned guard alive until exit so
/// buffered file output is flushed.
pub fn init(config: &PanelConfig, target: LogTarget) -> Result<Option<WorkerGuard>> {
    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.log_level))?;

    match (target, config.log_directory.as_deref()) {
        (LogTarget::Stderr, _) => {
            fmt::Subscriber::builder()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(Error::msg)?;
            Ok(None)
        }
        (LogTarget::File, Some(dir)) => {
            let appender = tracing_appender::rolling::daily(dir, format!("{}.log", config.panel_name));
            let (writer, guard) = tracing_appender::non_blocking(appender);
            fmt::Subscriber::builder()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .try_init()
                .map_err(Error::msg)?;
            Ok(Some(guard))
        }
        (LogTarget::File, None) => Ok(None),
    }
}
