//! Structured logging setup.
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the application. [`init_logging_with_config`] installs the one used
//! by the `grove` binary:
//!
//! | Variable             | Values                          | Default |
//! |----------------------|---------------------------------|---------|
//! | `GROVE_LOG_LEVEL`    | trace, debug, info, warn, error | `info`  |
//! | `GROVE_LOG_FORMAT`   | json, pretty                    | `json`  |
//! | `GROVE_LOG_TARGETS`  | extra `EnvFilter` directives, comma separated | none |
//! | `GROVE_LOG_ASYNC`    | true, false                     | `true`  |
//! | `GROVE_LOG_LOCATION` | true, false                     | `false` |
//!
//! `RUST_LOG`, when set, replaces the level filter entirely.

use std::env;

use anyhow::{Context, Result};
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    /// Anything but `pretty` selects JSON
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            _ => LogFormat::Json,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub level: Level,
    pub format: LogFormat,
    /// Additional `EnvFilter` directives, e.g. `grove::router=debug`
    pub target_filter: Option<String>,
    /// Write through a background thread
    pub async_logging: bool,
    /// Include file and line of each event
    pub include_location: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: LogFormat::Json,
            target_filter: None,
            async_logging: true,
            include_location: false,
        }
    }
}

impl LogConfig {
    /// Read the `GROVE_LOG_*` variables, falling back to defaults
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            level: env::var("GROVE_LOG_LEVEL")
                .ok()
                .map(|s| parse_level(&s))
                .unwrap_or(defaults.level),
            format: env::var("GROVE_LOG_FORMAT")
                .map(|s| LogFormat::parse(&s))
                .unwrap_or(defaults.format),
            target_filter: env::var("GROVE_LOG_TARGETS").ok(),
            async_logging: env::var("GROVE_LOG_ASYNC")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.async_logging),
            include_location: env::var("GROVE_LOG_LOCATION")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.include_location),
        }
    }

    /// Human-friendly settings for local development and tests
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: Level::DEBUG,
            format: LogFormat::Pretty,
            target_filter: None,
            async_logging: false,
            include_location: true,
        }
    }
}

/// Unknown levels fall back to `info`
#[must_use]
pub fn parse_level(s: &str) -> Level {
    match s.trim().to_ascii_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn build_filter(config: &LogConfig) -> EnvFilter {
    let mut filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));

    // Client disconnects are reported by the transport at info level.
    if let Ok(directive) = "may_minihttp=warn".parse() {
        filter = filter.add_directive(directive);
    }

    if let Some(targets) = &config.target_filter {
        for directive in targets.split(',').map(str::trim).filter(|d| !d.is_empty()) {
            match directive.parse() {
                Ok(directive) => filter = filter.add_directive(directive),
                Err(e) => eprintln!("Warning: invalid log filter directive {directive:?}: {e}"),
            }
        }
    }
    filter
}

/// Install the global subscriber described by `config`.
///
/// With async logging enabled the returned guard must be kept alive for
/// as long as logs should be flushed; dropping it stops the writer thread.
///
/// # Errors
///
/// A global subscriber is already installed.
pub fn init_logging_with_config(config: &LogConfig) -> Result<Option<WorkerGuard>> {
    let (writer, guard) = if config.async_logging {
        let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());
        (tracing_subscriber::fmt::writer::BoxMakeWriter::new(writer), Some(guard))
    } else {
        (tracing_subscriber::fmt::writer::BoxMakeWriter::new(std::io::stdout), None)
    };

    let fmt_layer = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(writer)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .pretty()
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(writer)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(build_filter(config))
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(guard)
}

/// [`init_logging_with_config`] with [`LogConfig::from_env`]
///
/// # Errors
///
/// A global subscriber is already installed.
pub fn init_logging() -> Result<Option<WorkerGuard>> {
    init_logging_with_config(&LogConfig::from_env())
}
