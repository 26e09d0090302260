//! Tracing setup: stderr plus a daily-rolling file under `<data_dir>/logs/`.

use std::path::PathBuf;

use annadata_core::{config, shellexpand};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Directory that receives rolling log files.
pub fn log_dir(cfg: &config::AppConfig) -> PathBuf {
    PathBuf::from(shellexpand(&cfg.data_dir)).join("logs")
}

/// `RUST_LOG` wins; otherwise the configured level.
fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Install the global subscriber. Keep the returned guard alive for the
/// lifetime of the process so buffered file output is flushed.
pub fn init(cfg: &config::AppConfig) -> anyhow::Result<WorkerGuard> {
    let dir = log_dir(cfg);
    std::fs::create_dir_all(&dir)?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("annadata")
        .filename_suffix("log")
        .build(&dir)?;
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(env_filter(&cfg.log_level))
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .try_init()?;

    Ok(guard)
}
