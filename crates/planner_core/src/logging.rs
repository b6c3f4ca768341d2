//! Rolling file logs for the planner core.
//!
//! # Responsibility
//! - Start the process-wide file logger once.
//! - Name every planner event in one catalogue so log lines stay greppable.
//! - Keep planner events metadata-only: ids and counts, never titles or
//!   reflection text.
//!
//! # Invariants
//! - Init is idempotent for an identical level and directory.
//! - Init never panics; switching level or directory afterwards is refused.
//! - Every line starts with `event=<name> module=<layer> status=<status>`.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Event names written as `event=<name>`.
pub mod events {
    pub const LOGGING_INIT: &str = "logging_init";
    pub const PANIC_CAPTURED: &str = "panic_captured";
    pub const DB_OPEN: &str = "db_open";
    pub const SNAPSHOT_LOAD: &str = "snapshot_load";
    pub const SNAPSHOT_MERGE: &str = "snapshot_merge";
    pub const SNAPSHOT_WRITE: &str = "snapshot_write";
    pub const SNAPSHOT_RESTORE: &str = "snapshot_restore";
    pub const BACKUP_EXPORT: &str = "backup_export";
    pub const REWARD_REDEEM: &str = "reward_redeem";
    pub const SCHEDULE_CLEAR: &str = "schedule_clear";
    pub const HABIT_TOGGLE: &str = "habit_toggle";
    pub const FOCUS_FINISH: &str = "focus_finish";
    pub const FFI_CALL: &str = "ffi_call";
}

const LOG_FILE_BASENAME: &str = "planner";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const MAX_LOG_FILES: usize = 5;
const MAX_PANIC_PAYLOAD_CHARS: usize = 160;

/// Longest error text copied into a log line.
pub const MAX_LOGGED_ERROR_CHARS: usize = 200;

static ACTIVE_LOGGER: OnceCell<ActiveLogger> = OnceCell::new();
static PANIC_HOOK_INSTALLED: OnceCell<()> = OnceCell::new();

/// Verbosity accepted by `init_logging`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Parses a case-insensitive level name; `warning` is an alias of `warn`.
    pub fn parse(raw: &str) -> Result<Self, String> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(format!(
                "unsupported log level `{other}`; expected trace|debug|info|warn|error"
            )),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

struct ActiveLogger {
    level: LogLevel,
    log_dir: PathBuf,
    _handle: LoggerHandle,
}

impl ActiveLogger {
    fn accepts(&self, level: LogLevel, log_dir: &Path) -> Result<(), String> {
        if self.log_dir != log_dir {
            return Err(format!(
                "planner logging already writes to `{}`; refusing to switch to `{}`",
                self.log_dir.display(),
                log_dir.display()
            ));
        }
        if self.level != level {
            return Err(format!(
                "planner logging already runs at `{}`; refusing to switch to `{}`",
                self.level, level
            ));
        }
        Ok(())
    }
}

/// Starts planner logging at `level` into the absolute directory `log_dir`.
///
/// # Errors
/// - Unsupported `level`, or an empty, relative or uncreatable `log_dir`.
/// - Logger backend failure.
/// - A different level or directory than the active logger.
pub fn init_logging(level: &str, log_dir: &str) -> Result<(), String> {
    let level = LogLevel::parse(level)?;
    let log_dir = absolute_log_dir(log_dir)?;

    if let Some(active) = ACTIVE_LOGGER.get() {
        return active.accepts(level, &log_dir);
    }

    let active = ACTIVE_LOGGER.get_or_try_init(|| start_logger(level, log_dir.clone()))?;
    active.accepts(level, &log_dir)
}

/// Returns `(level, log_dir)` of the active logger, if any.
pub fn logging_status() -> Option<(&'static str, PathBuf)> {
    ACTIVE_LOGGER
        .get()
        .map(|active| (active.level.as_str(), active.log_dir.clone()))
}

/// `debug` in debug builds, `info` in release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        LogLevel::Debug.as_str()
    } else {
        LogLevel::Info.as_str()
    }
}

/// Flattens `value` onto one line and caps it at `max_chars`.
///
/// Used for error texts and panic payloads that may echo user content.
pub fn redact(value: &str, max_chars: usize) -> String {
    let flattened = value.replace(['\n', '\r'], " ");
    let mut capped = flattened.chars().take(max_chars).collect::<String>();
    if flattened.chars().count() > max_chars {
        capped.push_str("...");
    }
    capped
}

fn start_logger(level: LogLevel, log_dir: PathBuf) -> Result<ActiveLogger, String> {
    std::fs::create_dir_all(&log_dir).map_err(|err| {
        format!(
            "failed to create log directory `{}`: {err}",
            log_dir.display()
        )
    })?;

    let handle = Logger::try_with_str(level.as_str())
        .map_err(|err| format!("invalid log level `{level}`: {err}"))?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir.as_path())
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| format!("failed to start logger: {err}"))?;

    install_panic_hook_once();
    info!(
        "event={} module=logging status=ok level={} log_dir={} version={}",
        events::LOGGING_INIT,
        level,
        log_dir.display(),
        env!("CARGO_PKG_VERSION")
    );

    Ok(ActiveLogger {
        level,
        log_dir,
        _handle: handle,
    })
}

fn absolute_log_dir(log_dir: &str) -> Result<PathBuf, String> {
    let trimmed = log_dir.trim();
    if trimmed.is_empty() {
        return Err("log_dir cannot be empty".to_string());
    }
    let path = Path::new(trimmed);
    if !path.is_absolute() {
        return Err(format!("log_dir must be an absolute path, got `{trimmed}`"));
    }
    Ok(path.to_path_buf())
}

fn install_panic_hook_once() {
    if PANIC_HOOK_INSTALLED.set(()).is_err() {
        return;
    }

    let previous_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());
        let payload = panic_info
            .payload()
            .downcast_ref::<&str>()
            .map(|message| (*message).to_string())
            .or_else(|| panic_info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        error!(
            "event={} module=logging status=error location={} payload={}",
            events::PANIC_CAPTURED,
            location,
            redact(&payload, MAX_PANIC_PAYLOAD_CHARS)
        );
        previous_hook(panic_info);
    }));
}

#[cfg(test)]
mod tests {
    use super::{absolute_log_dir, init_logging, logging_status, redact, LogLevel};

    #[test]
    fn level_names_parse_case_insensitively() {
        assert_eq!(LogLevel::parse("INFO").unwrap(), LogLevel::Info);
        assert_eq!(LogLevel::parse(" warning ").unwrap(), LogLevel::Warn);
        assert!(LogLevel::parse("verbose").is_err());
    }

    #[test]
    fn relative_log_dir_is_rejected() {
        assert!(absolute_log_dir("logs/dev").unwrap_err().contains("absolute"));
        assert!(absolute_log_dir("   ").is_err());
    }

    #[test]
    fn redact_flattens_and_caps_reflection_text() {
        let redacted = redact("felt great\ntoday\rreally", 8);
        assert_eq!(redacted, "felt gre...");
        assert_eq!(redact("short", 8), "short");
    }

    #[test]
    fn second_init_must_match_the_active_logger() {
        let log_dir = tempfile::tempdir().unwrap().into_path();
        let other_dir = tempfile::tempdir().unwrap().into_path();
        let log_dir_str = log_dir.to_str().unwrap().to_string();

        init_logging("info", &log_dir_str).unwrap();
        init_logging("INFO", &log_dir_str).unwrap();

        assert!(init_logging("debug", &log_dir_str)
            .unwrap_err()
            .contains("refusing to switch"));
        assert!(init_logging("info", other_dir.to_str().unwrap())
            .unwrap_err()
            .contains("refusing to switch"));

        let (active_level, active_dir) = logging_status().unwrap();
        assert_eq!(active_level, "info");
        assert_eq!(active_dir, log_dir);
    }
}
