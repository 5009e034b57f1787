use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, time::ChronoUtc},
    prelude::*,
    EnvFilter,
};

fn filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
}

fn console_layer<S>() -> impl tracing_subscriber::Layer<S>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_timer(ChronoUtc::rfc_3339())
        .with_writer(std::io::stderr)
}

/// Console logging plus a daily-rolling file under `log_dir`.
///
/// `RUST_LOG` wins over `default_filter` when set.
pub fn init_logging(
    log_dir: impl AsRef<Path>,
    log_prefix: &str,
    default_filter: &str,
) -> anyhow::Result<()> {
    let log_dir_path = log_dir.as_ref();
    std::fs::create_dir_all(log_dir_path)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(log_prefix)
        .build(log_dir_path)?;
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_timer(ChronoUtc::rfc_3339())
        .with_ansi(false)
        .with_writer(file_writer);

    tracing_subscriber::registry()
        .with(filter(default_filter))
        .with(console_layer())
        .with(file_layer)
        .try_init()?;

    // The writer flushes on its own thread for as long as the guard lives.
    std::mem::forget(guard);

    tracing::info!("Logging initialized with file output to {:?}", log_dir_path);
    Ok(())
}

/// Console-only logging.
pub fn init_console_logging(default_filter: &str) -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(filter(default_filter))
        .with(console_layer())
        .try_init()?;
    Ok(())
}

/// Initialize simple console-only logging for tests; safe to call repeatedly.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter("hostbridge=trace,debug"))
        .with_test_writer()
        .try_init();
}
