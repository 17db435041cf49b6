//! # Logging Setup
//!
//! slog-based logging pipeline. The active drain is selected by cargo
//! features: `termlog` writes to the terminal, `syslog` to the system log
//! and `journald` (Linux only) to the systemd journal. Without any of these
//! features log records are discarded. The `log` crate facade is bridged
//! into slog so `log::info!` and friends end up in the same pipeline.

use slog::{Drain, Logger, o};
use slog_scope::GlobalLoggerGuard;

use super::app_config::AppConfig;
use super::error::{Error, Result};
use super::types::LogLevel;

/// Installs the global logger and the `log` facade bridge.
///
/// The returned guard must be kept alive for the duration of the program;
/// dropping it tears the global logger down.
pub fn setup_logging() -> Result<GlobalLoggerGuard> {
    let logger = default_root_logger()?;
    let guard = slog_scope::set_global_logger(logger);

    slog_stdlog::init().map_err(|e| Error::new(&format!("failed to set log backend: {}", e)))?;

    Ok(guard)
}

/// Builds the root logger for the enabled drain feature.
#[allow(unreachable_code)]
pub fn default_root_logger() -> Result<Logger> {
    let level = AppConfig::get::<LogLevel>("log_level").unwrap_or_default();

    #[cfg(feature = "termlog")]
    {
        let decorator = slog_term::TermDecorator::new().build();
        let drain = slog_term::FullFormat::new(decorator).build().fuse();
        let drain = slog_async::Async::new(drain).build().fuse();
        let drain = slog::LevelFilter::new(drain, level.into()).fuse();
        return Ok(Logger::root(drain, o!()));
    }

    #[cfg(all(feature = "journald", target_os = "linux"))]
    {
        let drain = slog_journald::JournaldDrain.ignore_res();
        let drain = slog_async::Async::new(drain).build().fuse();
        let drain = slog::LevelFilter::new(drain, level.into()).fuse();
        return Ok(Logger::root(drain, o!()));
    }

    #[cfg(feature = "syslog")]
    {
        let drain = slog_syslog::unix_3164(slog_syslog::Facility::LOG_USER)
            .map_err(|e| Error::new(&format!("failed to connect to syslog: {}", e)))?
            .ignore_res();
        let drain = slog_async::Async::new(drain).build().fuse();
        let drain = slog::LevelFilter::new(drain, level.into()).fuse();
        return Ok(Logger::root(drain, o!()));
    }

    let _ = level;
    Ok(Logger::root(slog::Discard.fuse(), o!()))
}
