use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Default log directory: `~/.burrow/logs`.
pub fn default_log_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".burrow")
        .join("logs")
}

/// Installs the global subscriber. Keep the returned guard alive for as long
/// as logs should be flushed to the file.
///
/// A second call in the same process leaves the first subscriber in place.
pub fn init_logging(component: &str, log_dir: Option<&Path>, to_stderr: bool) -> WorkerGuard {
    let log_dir = log_dir.map(Path::to_path_buf).unwrap_or_else(default_log_dir);
    let _ = std::fs::create_dir_all(&log_dir);

    // Roll daily, with the component name as the prefix
    // This will create files like engine.log.2024-01-21
    let file_appender = tracing_appender::rolling::daily(&log_dir, component);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // File layer: no ANSI colors, output to file
    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);

    let registry = tracing_subscriber::registry().with(filter).with(file_layer);

    if to_stderr {
        let stderr_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(false);
        let _ = registry.with(stderr_layer).try_init();
    } else {
        let _ = registry.try_init();
    }

    guard
}
