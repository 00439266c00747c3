//! Logging Infrastructure
//!
//! Structured logging setup with support for both development and production environments
//! Features:
//! - Daily rotating application logs (deleted after 14 days)
//! - Permanent security logs (never deleted)

use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, prelude::*};

/// Application logs older than this are removed
pub const APP_LOG_RETENTION_DAYS: i64 = 14;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Clean up old application log files (older than 14 days)
///
/// Returns the number of deleted files.
pub fn cleanup_old_logs(log_dir: &Path) -> anyhow::Result<usize> {
    let cutoff = chrono::Local::now().date_naive() - chrono::Duration::days(APP_LOG_RETENTION_DAYS);

    let app_log_dir = log_dir.join("app");
    if !app_log_dir.exists() {
        return Ok(0);
    }

    let mut deleted = 0;
    for entry in fs::read_dir(app_log_dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        // app.YYYY-MM-DD.log
        if let Some(date_part) = name
            .strip_prefix("app.")
            .and_then(|d| d.strip_suffix(".log"))
            && let Ok(date) = chrono::NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
            && date < cutoff
        {
            fs::remove_file(&path)?;
            deleted += 1;
            tracing::info!(file = %name, "Deleted old log file");
        }
    }

    Ok(deleted)
}

fn daily_appender(dir: &Path, prefix: &str) -> anyhow::Result<RollingFileAppender> {
    fs::create_dir_all(dir)?;
    Ok(RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .build(dir)?)
}

fn console_layer(json_format: bool) -> BoxedLayer {
    if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    }
}

fn file_layer(
    json_format: bool,
    appender: RollingFileAppender,
    filter: fn(&tracing::Metadata<'_>) -> bool,
) -> BoxedLayer {
    let writer = std::sync::Mutex::new(appender);
    let filter = tracing_subscriber::filter::filter_fn(filter);
    if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_writer(writer)
            .with_filter(filter)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .with_writer(writer)
            .with_filter(filter)
            .boxed()
    }
}

/// Initialize the logging system with daily rotating logs
///
/// # Arguments
/// * `level` - Log level (e.g., "info", "debug", "warn"), `RUST_LOG` wins when set
/// * `json_format` - Whether to use JSON format (true for production, false for development)
/// * `log_dir` - Optional directory for file logging (e.g., Some("./data/logs"))
///
/// Must be called inside a tokio runtime when `log_dir` is given: the
/// hourly cleanup task is spawned on it.
pub fn init_logger_with_file(
    level: &str,
    json_format: bool,
    log_dir: Option<&Path>,
) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let mut layers: Vec<BoxedLayer> = vec![console_layer(json_format)];

    if let Some(log_dir) = log_dir {
        // Standard application logs (rotated daily, subject to 14-day cleanup)
        let app_log = daily_appender(&log_dir.join("app"), "app")?;
        layers.push(file_layer(json_format, app_log, |meta| {
            meta.target() != "security"
        }));

        // Permanent security logs (never deleted)
        let security_log = daily_appender(&log_dir.join("security"), "security")?;
        layers.push(file_layer(json_format, security_log, |meta| {
            meta.target() == "security"
        }));

        tokio::spawn(periodic_cleanup(log_dir.to_path_buf()));
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .try_init()?;

    Ok(())
}

/// Periodic cleanup task - runs every hour to clean old logs
async fn periodic_cleanup(log_dir: PathBuf) {
    use tokio::time::{Duration, sleep};

    loop {
        sleep(Duration::from_secs(3600)).await;

        if let Err(e) = cleanup_old_logs(&log_dir) {
            tracing::error!(error = %e, "Failed to cleanup old logs");
        }
    }
}

/// Security log helper - records security-related events
///
/// Security logs are permanently stored in `security/security.YYYY-MM-DD.log`.
///
/// # Examples
/// ```ignore
/// security_log!(WARN, "login_failed", username = %req.username);
/// security_log!(WARN, "permission_denied", user_id = user.id, required = "menu:write");
/// ```
#[macro_export]
macro_rules! security_log {
    (WARN, $event:expr, $($arg:tt)*) => {
        tracing::warn!(
            target: "security",
            event = $event,
            timestamp = chrono::Local::now().to_rfc3339(),
            level = "WARN",
            $($arg)*
        );
    };
    (ERROR, $event:expr, $($arg:tt)*) => {
        tracing::error!(
            target: "security",
            event = $event,
            timestamp = chrono::Local::now().to_rfc3339(),
            level = "ERROR",
            $($arg)*
        );
    };
    (INFO, $event:expr, $($arg:tt)*) => {
        tracing::info!(
            target: "security",
            event = $event,
            timestamp = chrono::Local::now().to_rfc3339(),
            level = "INFO",
            $($arg)*
        );
    };
}
