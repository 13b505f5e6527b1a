//! Logging init: stderr by default, or a log file through a non-blocking appender.

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

/// Logging options chosen on the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogConfig {
    /// Log at debug level regardless of `RUST_LOG`
    pub debug: bool,
    /// Write to this file instead of stderr
    pub file: Option<PathBuf>,
    /// Emit JSON lines instead of human readable text
    pub json: bool,
}

/// Installs the global subscriber described by `config`.
///
/// The returned guard flushes the file appender on drop and has to live until exit.
pub fn init(config: &LogConfig) -> Result<Option<WorkerGuard>> {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let env_filter = EnvFilter::try_new(filter_directive(config.debug, env.as_deref()))
        .context("invalid log filter")?;

    let (writer, guard) = match &config.file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            let file_name = path
                .file_name()
                .ok_or_else(|| anyhow!("log file path has no file name: {}", path.display()))?;

            std::fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
            let appender = tracing_appender::rolling::never(&dir, file_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            (BoxMakeWriter::new(non_blocking), Some(guard))
        }
        None => (BoxMakeWriter::new(std::io::stderr), None),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(writer)
        .with_ansi(config.file.is_none());

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| anyhow!("failed to install logger: {e}"))?;

    tracing::debug!("Logging initialized: {:?}", config);
    Ok(guard)
}

/// `--debug` wins, then `RUST_LOG`, then `info`
fn filter_directive(debug: bool, env: Option<&str>) -> String {
    if debug {
        return "debug".to_string();
    }
    match env {
        Some(directive) if !directive.trim().is_empty() => directive.to_string(),
        _ => "info".to_string(),
    }
}
