//! Logging initialization shared by every Tiffin binary.
//!
//! Logs always go to stderr unless turned off; when a log directory is
//! known they additionally go to a daily-rolled file in that directory.
//! The directory comes from the caller, from `TIFFIN_LOG_DIR`, or is
//! absent, in which case only the stderr sink is installed.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

// Keeps the non-blocking writer alive for the lifetime of the process.
static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();
// Marks logging as installed; holds the active day-file path, if any.
static LOG_SINK: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Output encoding for log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

impl Default for LogFormat {
    fn default() -> Self {
        LogFormat::Text
    }
}

/// Settings consumed by [`init_logging`].
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Prefix for the rolled log file name.
    pub app_name: &'static str,
    /// File sink directory. `None` falls back to `TIFFIN_LOG_DIR`, and
    /// if that is unset too, no file sink is installed.
    pub log_dir: Option<PathBuf>,
    /// Mirror events to stderr alongside the file sink.
    pub emit_stderr: bool,
    pub format: LogFormat,
    /// Filter applied when `RUST_LOG` is not set.
    pub default_filter: &'static str,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            app_name: "tiffin",
            log_dir: None,
            emit_stderr: true,
            format: LogFormat::Text,
            default_filter: "info",
        }
    }
}

/// Installs the global tracing subscriber.
///
/// Returns the path of today's log file when a file sink was set up.
/// Calling this more than once is a no-op that returns the sink chosen
/// by the first call.
pub fn init_logging(config: &LogConfig) -> anyhow::Result<Option<PathBuf>> {
    if let Some(existing) = LOG_SINK.get() {
        return Ok(existing.clone());
    }

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_filter));

    let sink = match resolve_log_dir(config.log_dir.as_deref()) {
        Some(dir) => {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("creating log directory {}", dir.display()))?;
            let file_name = format!("{}.log", config.app_name);
            let appender = tracing_appender::rolling::daily(&dir, &file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = LOG_GUARD.set(guard);

            match config.format {
                LogFormat::Text => {
                    let stderr_layer = config
                        .emit_stderr
                        .then(|| fmt::layer().with_writer(std::io::stderr));
                    tracing_subscriber::registry()
                        .with(env_filter)
                        .with(fmt::layer().with_writer(writer).with_ansi(false))
                        .with(stderr_layer)
                        .init();
                }
                LogFormat::Json => {
                    let stderr_layer = config
                        .emit_stderr
                        .then(|| fmt::layer().json().with_writer(std::io::stderr));
                    tracing_subscriber::registry()
                        .with(env_filter)
                        .with(fmt::layer().json().with_writer(writer))
                        .with(stderr_layer)
                        .init();
                }
            }

            // tracing-appender names daily files "<prefix>.<YYYY-MM-DD>".
            let today = chrono::Local::now().format("%Y-%m-%d");
            Some(dir.join(format!("{file_name}.{today}")))
        }
        None => {
            match config.format {
                LogFormat::Text => {
                    tracing_subscriber::registry()
                        .with(env_filter)
                        .with(fmt::layer().with_writer(std::io::stderr))
                        .init();
                }
                LogFormat::Json => {
                    tracing_subscriber::registry()
                        .with(env_filter)
                        .with(fmt::layer().json().with_writer(std::io::stderr))
                        .init();
                }
            }
            None
        }
    };

    let _ = LOG_SINK.set(sink.clone());
    Ok(sink)
}

fn resolve_log_dir(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(dir) = explicit {
        return Some(expand_home(dir));
    }
    match env::var("TIFFIN_LOG_DIR") {
        Ok(dir) if !dir.trim().is_empty() => Some(expand_home(Path::new(dir.trim()))),
        _ => None,
    }
}

fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match env::var("HOME") {
        Ok(home) if !home.is_empty() => PathBuf::from(home).join(rest),
        _ => path.to_path_buf(),
    }
}
