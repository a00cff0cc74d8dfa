//! Logging configuration for tsbench
//!
//! Diagnostics go through the `tracing` framework, to stderr or a daily
//! rotated file, so stdout carries only the benchmark report.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::BenchConfig;
use crate::{Error, Result};

/// Log output destination
#[derive(Debug, Clone)]
pub enum LogOutput {
    /// Output to stderr
    Stderr,
    /// Output to a file with daily rotation
    File(PathBuf),
}

/// Log format style
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Multi-line human-readable format
    Pretty,
    /// Compact single-line format (default)
    Compact,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Minimum log level filter
    pub level: String,
    /// Output destination
    pub output: LogOutput,
    /// Format style
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            output: LogOutput::Stderr,
            format: LogFormat::Compact,
        }
    }
}

impl LogConfig {
    /// Logging as requested on the command line
    pub fn from_bench(config: &BenchConfig) -> Self {
        let log = Self::default()
            .with_level(config.log_level.clone())
            .with_format(config.log_format);
        match &config.log_file {
            Some(path) => log.with_file(path.clone()),
            None => log,
        }
    }

    /// Set log output to file with rotation
    pub fn with_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output = LogOutput::File(path.into());
        self
    }

    /// Set log format
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set log level filter
    pub fn with_level<S: Into<String>>(mut self, level: S) -> Self {
        self.level = level.into();
        self
    }

    /// Builds the level filter; `RUST_LOG` wins over the configured level
    fn env_filter(&self) -> Result<EnvFilter> {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .map_err(|e| Error::InvalidConfig(format!("log level {:?}: {}", self.level, e)))
    }

    /// Initialize global logging with this configuration
    ///
    /// Returns a guard that must be kept alive while logging to a file.
    /// When the guard is dropped, the logging worker thread is shutdown.
    pub fn init(self) -> Result<Option<WorkerGuard>> {
        let env_filter = self.env_filter()?;

        let guard = match self.output {
            LogOutput::Stderr => {
                let layer = fmt::layer().with_writer(std::io::stderr);
                match self.format {
                    LogFormat::Pretty => tracing_subscriber::registry()
                        .with(env_filter)
                        .with(layer.pretty())
                        .try_init(),
                    LogFormat::Compact => tracing_subscriber::registry()
                        .with(env_filter)
                        .with(layer.compact())
                        .try_init(),
                }
                .map_err(|e| Error::InvalidConfig(e.to_string()))?;
                None
            }
            LogOutput::File(path) => {
                let dir = path.parent().unwrap_or_else(|| Path::new("."));
                let file_name = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("tsbench.log");
                let file_appender = tracing_appender::rolling::daily(dir, file_name);
                let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

                let layer = fmt::layer().with_writer(non_blocking).with_ansi(false);
                match self.format {
                    LogFormat::Pretty => tracing_subscriber::registry()
                        .with(env_filter)
                        .with(layer.pretty())
                        .try_init(),
                    LogFormat::Compact => tracing_subscriber::registry()
                        .with(env_filter)
                        .with(layer.compact())
                        .try_init(),
                }
                .map_err(|e| Error::InvalidConfig(e.to_string()))?;
                Some(guard)
            }
        };
        Ok(guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_config_defaults() {
        let config = LogConfig::default();
        assert_eq!(config.level, "warn");
        assert!(matches!(config.output, LogOutput::Stderr));
    }

    #[test]
    fn test_log_config_builders() {
        let config = LogConfig::default()
            .with_level("debug")
            .with_file("/tmp/tsbench.log")
            .with_format(LogFormat::Pretty);
        assert_eq!(config.level, "debug");
        assert!(matches!(config.output, LogOutput::File(_)));
        assert!(matches!(config.format, LogFormat::Pretty));
    }

    #[test]
    fn test_from_bench_uses_cli_settings() {
        let mut bench = BenchConfig::default();
        bench.log_level = "info".to_string();
        bench.log_file = Some(PathBuf::from("/var/log/tsbench.log"));
        bench.log_format = LogFormat::Pretty;

        let config = LogConfig::from_bench(&bench);
        assert_eq!(config.level, "info");
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(matches!(config.output, LogOutput::File(ref p) if p == Path::new("/var/log/tsbench.log")));
    }
}
