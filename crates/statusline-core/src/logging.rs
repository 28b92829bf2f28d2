//! Logging infrastructure for cc-statusline.
//!
//! Structured logging through the `tracing` ecosystem:
//!
//! - JSON lines written to `~/.claude/cc-statusline/logs/cc-statusline.log`
//! - Compact human-readable output on stderr
//! - `-v` raises the default level to DEBUG; `RUST_LOG` overrides both
//!
//! ## Example
//!
//! ```no_run
//! use statusline_core::logging;
//!
//! let _guard = logging::init_logging(None, false).expect("logging init");
//! tracing::info!("wizard started");
//! ```

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    filter::LevelFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::error::{Result, StatuslineError};

/// Guard that must be held to ensure log flushing on shutdown.
///
/// Keep this guard alive for the lifetime of the application.
pub struct LogGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Initialize the logging system.
///
/// # Arguments
///
/// * `log_dir` - Optional custom log directory. Defaults to `~/.claude/cc-statusline/logs/`
/// * `verbose` - If true, sets log level to DEBUG. Otherwise uses INFO.
pub fn init_logging(log_dir: Option<PathBuf>, verbose: bool) -> Result<LogGuard> {
    let log_dir = match log_dir {
        Some(dir) => dir,
        None => default_log_dir()?,
    };

    std::fs::create_dir_all(&log_dir).map_err(|e| StatuslineError::DirectoryCreation {
        path: log_dir.clone(),
        source: e,
    })?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "cc-statusline.log");
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let default_level = if verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "cc_statusline={default_level},statusline_core={default_level},statusline_init={default_level},statusline_perf={default_level}"
        ))
    });

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .json()
        .with_span_events(FmtSpan::CLOSE)
        .with_current_span(true)
        .with_span_list(true);

    // Console stays quiet unless asked: the wizard owns the terminal.
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(verbose)
        .with_file(verbose)
        .with_line_number(verbose)
        .compact()
        .with_filter(if verbose { LevelFilter::DEBUG } else { LevelFilter::WARN });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    tracing::debug!(log_dir = %log_dir.display(), verbose, "logging initialized");

    Ok(LogGuard {
        _file_guard: Some(file_guard),
    })
}

/// Initialize minimal console-only logging for testing.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

/// The user's home directory.
pub fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or(StatuslineError::HomeNotFound)
}

/// Claude Code's per-user directory, `~/.claude`.
pub fn claude_home() -> Result<PathBuf> {
    Ok(home_dir()?.join(".claude"))
}

/// Get the default log directory path.
///
/// Returns `~/.claude/cc-statusline/logs/`
pub fn default_log_dir() -> Result<PathBuf> {
    Ok(claude_home()?.join("cc-statusline").join("logs"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_default_log_dir() {
        // SAFETY: serialised with the other HOME-mutating tests
        unsafe { std::env::set_var("HOME", "/tmp/test-home") };
        let dir = default_log_dir().unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/test-home/.claude/cc-statusline/logs"));
    }

    #[test]
    #[serial]
    fn test_claude_home() {
        // SAFETY: serialised with the other HOME-mutating tests
        unsafe { std::env::set_var("HOME", "/tmp/test-home") };
        assert_eq!(claude_home().unwrap(), PathBuf::from("/tmp/test-home/.claude"));
    }

    #[test]
    fn test_init_test_logging() {
        init_test_logging();
    }
}
