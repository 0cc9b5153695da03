use std::env;
use std::path::Path;
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_LOG_FILE: &str = "./logs/emailmover.log";

/// Console gets `TRACING_LEVEL` (default info). The log file is the audit
/// trail for a run, so it keeps per-file classification lines at
/// `FILE_LOG_LEVEL` (default debug) and is truncated on every start.
pub fn init_logger() -> impl Drop {
    let stdout_filter = env::var("TRACING_LEVEL").unwrap_or_else(|_| "info".to_string());
    let file_filter = env::var("FILE_LOG_LEVEL").unwrap_or_else(|_| "debug".to_string());
    let log_file_path = env::var("LOG_FILE_PATH").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());

    let log_path = Path::new(&log_file_path);
    let log_dir = log_path.parent().unwrap_or_else(|| Path::new("."));
    let log_name = log_path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| "emailmover.log".into());
    // rolling::never appends; start each run with an empty audit log
    let _ = std::fs::remove_file(log_path);

    let file_appender = tracing_appender::rolling::never(log_dir, log_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stdout)
                .pretty()
                .with_file(false)
                .without_time()
                .with_ansi(true)
                .with_filter(EnvFilter::new(stdout_filter)),
        )
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(EnvFilter::new(file_filter)),
        )
        .init();

    info!("Logging to {}", log_path.display());

    guard
}
