use anyhow::Context;
use tracing_appender::non_blocking::{NonBlocking, NonBlockingBuilder, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::infra::config::AppConfig;

/// Keeps the non-blocking writers flushing until dropped at shutdown.
pub struct LogGuards {
    _error: WorkerGuard,
    _app: WorkerGuard,
}

fn create_file_appender(log_path: &str, prefix: &str) -> anyhow::Result<RollingFileAppender> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .filename_suffix("jsonl")
        .build(log_path)
        .with_context(|| format!("cannot create log appender in {log_path}"))
}

fn create_non_blocking_writer(appender: RollingFileAppender) -> (NonBlocking, WorkerGuard) {
    NonBlockingBuilder::default().lossy(false).finish(appender)
}

fn create_error_layer<S>(writer: NonBlocking) -> impl Layer<S>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fmt::layer()
        .json()
        .with_writer(writer)
        .with_filter(filter_fn(|metadata| metadata.level() == &tracing::Level::ERROR))
}

fn create_app_layer<S>(writer: NonBlocking) -> impl Layer<S>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fmt::layer()
        .json()
        .with_writer(writer)
        .with_filter(filter_fn(|metadata| {
            let level = metadata.level();
            level == &tracing::Level::INFO || level == &tracing::Level::WARN
        }))
}

// RUST_LOG wins over the default console level.
fn create_console_layer<S>() -> impl Layer<S>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));
    fmt::layer().with_filter(filter)
}

pub fn init_tracing(config: &AppConfig) -> anyhow::Result<LogGuards> {
    let log_path = &config.logger.log_path;

    let (error_writer, error_guard) = create_non_blocking_writer(create_file_appender(log_path, "err_logs")?);
    let (app_writer, app_guard) = create_non_blocking_writer(create_file_appender(log_path, "app_logs")?);

    tracing_subscriber::registry()
        .with(create_error_layer(error_writer))
        .with(create_app_layer(app_writer))
        .with(create_console_layer())
        .try_init()
        .context("tracing subscriber already installed")?;

    Ok(LogGuards {
        _error: error_guard,
        _app: app_guard,
    })
}
