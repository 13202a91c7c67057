use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Directory of the debug log file
fn log_directory() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("medicure")
}

/// Install the global subscriber.
///
/// Logs go to stderr. With `MEDICURE_DEBUG` set they go to a daily rolling
/// file at debug level instead; keep the returned guard alive until exit so
/// buffered lines are flushed.
pub fn init_logging(verbose: bool) -> Option<WorkerGuard> {
    let default_directive = if verbose {
        "medicure=debug"
    } else {
        "medicure=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    if std::env::var_os("MEDICURE_DEBUG").is_none() {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_env_filter(filter)
            .init();
        return None;
    }

    let directory = log_directory();
    let _ = std::fs::create_dir_all(&directory);
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(&directory, "medicure.log"));

    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_env_filter(filter.add_directive(tracing::Level::DEBUG.into()))
        .init();

    tracing::debug!("Logging to {}", directory.display());
    Some(guard)
}
