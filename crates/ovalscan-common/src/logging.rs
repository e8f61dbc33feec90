//! Logging configuration using tracing

use ovalscan_core::{Error, Result};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Mutex;
use tracing_subscriber::{
    fmt, fmt::writer::BoxMakeWriter, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Log format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format (default for interactive use)
    #[default]
    Pretty,
    /// JSON format (for log aggregation)
    Json,
    /// Compact single-line format
    Compact,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            other => Err(format!("unknown log format: {}", other)),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    /// Minimum log level (default: info)
    pub level: String,
    /// Log format
    pub format: LogFormat,
    /// Append logs to this file instead of stderr
    pub file: Option<PathBuf>,
}

impl LogConfig {
    pub fn new() -> Self {
        Self {
            level: String::from("info"),
            ..Default::default()
        }
    }

    /// Set the log level
    pub fn level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// Set the log format
    pub fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Write logs to a file
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }
}

/// Writer for the configured destination, and whether it takes ANSI colors
fn make_writer(config: &LogConfig) -> Result<(BoxMakeWriter, bool)> {
    match &config.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| {
                    Error::Configuration(format!(
                        "Failed to open log file {}: {}",
                        path.display(),
                        e
                    ))
                })?;
            Ok((BoxMakeWriter::new(Mutex::new(file)), false))
        }
        None => Ok((BoxMakeWriter::new(std::io::stderr), true)),
    }
}

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. Without a log file,
/// logs go to stderr so reports written to stdout stay machine-readable.
pub fn init_logging_with_config(config: LogConfig) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let (writer, ansi) = make_writer(&config)?;

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(writer).with_ansi(ansi))
            .init(),
        LogFormat::Compact => registry
            .with(fmt::layer().compact().with_writer(writer).with_ansi(ansi))
            .init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().pretty().with_writer(writer).with_ansi(ansi))
            .init(),
    }

    Ok(())
}
