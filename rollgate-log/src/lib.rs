//! Rollgate Logging
//!
//! Installs a `tracing` subscriber configured from `ROLLGATE_*` environment
//! variables. Library crates only emit `tracing` events; binaries and hosts
//! call [`init`] once at startup.
//!
//! # Usage
//!
//! ```rust
//! rollgate_log::init();
//! tracing::info!(feature = "auth", "Feature table loaded");
//! ```
//!
//! # Environment Variables
//!
//! - `ROLLGATE_DEBUG=1` - Enable debug logging
//! - `ROLLGATE_LOG_LEVEL=trace|debug|info|warn|error|off` - Set log level
//! - `ROLLGATE_LOG_FORMAT=pretty|json|compact` - Set output format
//! - `ROLLGATE_LOG_COLOR=1|0` - Enable/disable colors
//! - `ROLLGATE_LOG_TIMESTAMPS=1|0` - Include timestamps
//! - `ROLLGATE_LOG_MODULE=1|0` - Include the event target
//!
//! `RUST_LOG`, when set, takes precedence over `ROLLGATE_LOG_LEVEL`.

use once_cell::sync::OnceCell;
use std::env;
use std::io::IsTerminal;
use tracing::Subscriber;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, Layer};

// ============================================================================
// Log Levels
// ============================================================================

/// Minimum level of emitted events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Off,
}

impl Level {
    /// Parse a level name (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Some(Level::Trace),
            "debug" => Some(Level::Debug),
            "info" => Some(Level::Info),
            "warn" | "warning" => Some(Level::Warn),
            "error" => Some(Level::Error),
            "off" | "none" => Some(Level::Off),
            _ => None,
        }
    }

    /// Directive understood by `EnvFilter`.
    pub fn as_filter(&self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Off => "off",
        }
    }
}

// ============================================================================
// Log Format
// ============================================================================

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Multi-line, human oriented
    Pretty,
    /// Single line
    Compact,
    /// One JSON object per line
    Json,
}

impl Format {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Some(Format::Pretty),
            "compact" => Some(Format::Compact),
            "json" => Some(Format::Json),
            _ => None,
        }
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub debug: bool,
    pub level: Level,
    pub format: Format,
    pub color: bool,
    pub timestamps: bool,
    pub module_path: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            debug: false,
            level: Level::Info,
            format: Format::Json,
            color: false,
            timestamps: true,
            module_path: true,
        }
    }
}

impl LogConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let flag = |key: &str| lookup(key).map(|v| v == "1" || v.eq_ignore_ascii_case("true"));

        let debug = flag("ROLLGATE_DEBUG").unwrap_or(false);

        let level = lookup("ROLLGATE_LOG_LEVEL")
            .and_then(|s| Level::parse(&s))
            .unwrap_or(if debug { Level::Debug } else { Level::Info });

        let format = lookup("ROLLGATE_LOG_FORMAT")
            .and_then(|s| Format::parse(&s))
            .unwrap_or(Format::Json);

        let color = flag("ROLLGATE_LOG_COLOR").unwrap_or_else(|| {
            format != Format::Json
                && lookup("NO_COLOR").is_none()
                && std::io::stderr().is_terminal()
        });

        Self {
            debug,
            level,
            format,
            color,
            timestamps: flag("ROLLGATE_LOG_TIMESTAMPS").unwrap_or(true),
            module_path: flag("ROLLGATE_LOG_MODULE").unwrap_or(true),
        }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.level.as_filter()))
    }
}

// ============================================================================
// Public API
// ============================================================================

static CONFIG: OnceCell<LogConfig> = OnceCell::new();

/// Install the global subscriber from environment configuration.
///
/// Safe to call more than once; later calls are no-ops, as is calling it
/// after another subscriber has been installed.
pub fn init() {
    let _ = try_init(LogConfig::from_env());
}

/// Install the global subscriber with an explicit configuration.
pub fn try_init(config: LogConfig) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(fmt_layer(&config))
        .with(config.filter())
        .try_init()?;

    let _ = CONFIG.set(config);
    Ok(())
}

/// Configuration of the installed subscriber, if [`init`] succeeded.
pub fn config() -> Option<&'static LogConfig> {
    CONFIG.get()
}

fn fmt_layer<S>(config: &LogConfig) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(config.color)
        .with_target(config.module_path);

    match (config.format, config.timestamps) {
        (Format::Json, true) => layer.json().boxed(),
        (Format::Json, false) => layer.json().without_time().boxed(),
        (Format::Compact, true) => layer.compact().boxed(),
        (Format::Compact, false) => layer.compact().without_time().boxed(),
        (Format::Pretty, true) => layer.pretty().boxed(),
        (Format::Pretty, false) => layer.pretty().without_time().boxed(),
    }
}

// ============================================================================
// Tests
// ============================================================================
