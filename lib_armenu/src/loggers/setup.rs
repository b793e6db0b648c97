use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Console output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Keeps the non-blocking file writer alive. Drop it last.
#[derive(Debug)]
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
    pub log_file: Option<PathBuf>,
}

/// Maps the configured level name onto a filter directive.
///
/// `RUST_LOG` takes precedence when set.
pub fn level_directive(log_level: &str) -> &'static str {
    match log_level.trim().to_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "warn" => "warn",
        "error" | "fatal" => "error",
        _ => "info",
    }
}

/// Installs the global subscriber.
///
/// Console output goes to stderr so command output on stdout stays clean.
/// When `log_dir` is given, a `{app_name}-{timestamp}.log` file is added and
/// every older log file of the same app is removed.
pub fn setup_logging(app_name: &str, log_dir: Option<&Path>, log_level: &str, format: LogFormat) -> Result<LoggingGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_directive(log_level)));

    let console_layer = match format {
        LogFormat::Text => fmt::layer().with_writer(std::io::stderr).with_target(true).boxed(),
        LogFormat::Json => fmt::layer().json().with_writer(std::io::stderr).boxed(),
    };

    let mut file_guard = None;
    let mut log_file = None;
    let file_layer = match log_dir {
        Some(dir) => {
            if !dir.exists() {
                fs::create_dir_all(dir)?;
            }

            let file_name = format!("{}-{}.log", app_name, chrono::Local::now().format(LOG_TIMESTAMP_FORMAT));
            let path = dir.join(&file_name);
            fs::OpenOptions::new().create(true).append(true).open(&path)?;
            cleanup_old_logs(app_name, dir, Some(&path))?;

            let appender = tracing_appender::rolling::never(dir, &file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            file_guard = Some(guard);
            log_file = Some(path);
            Some(fmt::layer().with_ansi(false).with_writer(writer))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .with(filter)
        .try_init()?;

    Ok(LoggingGuard {
        _file_guard: file_guard,
        log_file,
    })
}

const LOG_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// True for `{app_name}-YYYYMMDD_HHMMSS.log` and nothing else.
fn is_app_log(app_name: &str, file_name: &str) -> bool {
    file_name
        .strip_prefix(app_name)
        .and_then(|rest| rest.strip_prefix('-'))
        .and_then(|rest| rest.strip_suffix(".log"))
        .is_some_and(|stamp| chrono::NaiveDateTime::parse_from_str(stamp, LOG_TIMESTAMP_FORMAT).is_ok())
}

/// Prunes the log files of `app_name` in `log_dir` down to one.
///
/// With `keep` set, that file survives and every other log of the app is
/// removed; otherwise the most recently modified one survives.
pub fn cleanup_old_logs(app_name: &str, log_dir: &Path, keep: Option<&Path>) -> Result<()> {
    let mut entries: Vec<(PathBuf, std::time::SystemTime)> = fs::read_dir(log_dir)?
        .filter_map(|res| res.ok())
        .filter(|e| is_app_log(app_name, &e.file_name().to_string_lossy()))
        .filter_map(|e| {
            let modified = e.metadata().and_then(|m| m.modified()).ok()?;
            Some((e.path(), modified))
        })
        .collect();

    // newest first
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| b.0.cmp(&a.0)));

    let stale: Vec<&PathBuf> = match keep {
        Some(current) => entries.iter().map(|(p, _)| p).filter(|p| p.as_path() != current).collect(),
        None => entries.iter().skip(1).map(|(p, _)| p).collect(),
    };

    for path in stale {
        if let Err(e) = fs::remove_file(path) {
            eprintln!("Failed to delete old log file {:?}: {}", path, e);
        }
    }

    Ok(())
}
