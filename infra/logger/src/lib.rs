//! # Logging
//!
//! A centralized logging bootstrap for the project: console and rolling-file
//! layers over one global `tracing` subscriber, with environment-based
//! filtering and non-blocking file I/O.
//!
//! The handle returned by [`LoggingBuilder::init`] owns the background writer
//! guard; keep it alive for the lifetime of the process so buffered records
//! are flushed on shutdown.
//!
//! ## Example
//!
//! ```rust
//! # use manifold_logger::{Logging, LevelFilter};
//! let _log = Logging::builder()
//!     .name("my-app")
//!     .level(LevelFilter::DEBUG)
//!     .init()
//!     .unwrap();
//! ```

mod error;

pub use crate::error::LoggingError;
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use std::fs;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const DEFAULT_MAX_FILES: usize = 10;
const LOG_FILE_SUFFIX: &str = "log";

/// A builder for the global tracing subscriber.
#[must_use = "builders do nothing unless you call .init()"]
#[derive(Debug)]
pub struct LoggingBuilder {
    name: String,
    console: bool,
    level: LevelFilter,
    env_filter: Option<String>,
    path: Option<PathBuf>,
    rotation: Rotation,
    max_files: usize,
    json: bool,
}

impl Default for LoggingBuilder {
    fn default() -> Self {
        Self {
            name: String::new(),
            console: true,
            level: LevelFilter::INFO,
            env_filter: None,
            path: None,
            rotation: Rotation::DAILY,
            max_files: DEFAULT_MAX_FILES,
            json: false,
        }
    }
}

impl LoggingBuilder {
    /// Names the logger; rolling log files are prefixed with it.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Enables or disables the console layer.
    pub const fn console(mut self, enabled: bool) -> Self {
        self.console = enabled;
        self
    }

    /// Minimum level emitted when `RUST_LOG` says nothing else.
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    /// Programmatic default filter (e.g. `"myapp=debug,hyper=info"`);
    /// `RUST_LOG` still overrides it.
    pub fn env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Enables the rolling-file layer under the given directory.
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// File rotation strategy; daily when unset.
    pub const fn rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// How many rotated files to keep.
    pub const fn max_files(mut self, max: usize) -> Self {
        self.max_files = max;
        self
    }

    /// Emits file records as JSON lines.
    pub const fn json(mut self) -> Self {
        self.json = true;
        self
    }

    /// Installs the global subscriber and returns the guard handle.
    ///
    /// # Errors
    /// * [`LoggingError::InvalidConfiguration`] for an empty name, a zero
    ///   `max_files`, a malformed filter, or no enabled layer.
    /// * [`LoggingError::Subscriber`] when a global subscriber already exists.
    /// * [`LoggingError::Appender`] / [`LoggingError::LogDirectory`] when the
    ///   file layer cannot be set up.
    pub fn init(self) -> Result<Logging, LoggingError> {
        if self.name.trim().is_empty() {
            return Err(LoggingError::InvalidConfiguration("logger name cannot be empty".into()));
        }
        if self.max_files == 0 {
            return Err(LoggingError::InvalidConfiguration(
                "max_files must be greater than zero".into(),
            ));
        }

        let env_filter = self.build_env_filter()?;

        let mut layers = Vec::new();
        if self.console {
            layers.push(layer().compact().with_ansi(true).boxed());
        }

        let guard = match self.path {
            Some(path) => {
                fs::create_dir_all(&path).map_err(|e| LoggingError::LogDirectory {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?;

                let appender = RollingFileAppender::builder()
                    .rotation(self.rotation)
                    .filename_prefix(&self.name)
                    .filename_suffix(LOG_FILE_SUFFIX)
                    .max_log_files(self.max_files)
                    .build(path)?;
                let (writer, guard) = tracing_appender::non_blocking(appender);

                let file_layer = layer().with_writer(writer).with_ansi(false);
                layers.push(if self.json { file_layer.json().boxed() } else { file_layer.boxed() });
                Some(guard)
            },
            None => None,
        };

        if layers.is_empty() {
            return Err(LoggingError::InvalidConfiguration(
                "no logging layers enabled; enable console or file output".into(),
            ));
        }

        tracing_subscriber::registry().with(env_filter).with(layers).try_init()?;

        Ok(Logging { guard })
    }

    fn build_env_filter(&self) -> Result<EnvFilter, LoggingError> {
        let builder = EnvFilter::builder().with_default_directive(self.level.into());
        match &self.env_filter {
            None => Ok(builder.from_env_lossy()),
            Some(filter) => builder.parse(filter).map_err(|e| {
                LoggingError::InvalidConfiguration(format!("invalid env filter '{filter}': {e}"))
            }),
        }
    }
}

/// A handle to the initialized logging system.
///
/// Holds the non-blocking writer guard; drop it only on shutdown.
#[must_use = "dropping this handle stops background logging threads"]
#[derive(Debug)]
pub struct Logging {
    guard: Option<WorkerGuard>,
}

impl Logging {
    /// Returns a new [`LoggingBuilder`].
    pub fn builder() -> LoggingBuilder {
        LoggingBuilder::default()
    }

    /// Whether a file writer guard is held.
    #[must_use]
    pub const fn has_file_output(&self) -> bool {
        self.guard.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let builder = Logging::builder().name("test-app").env_filter("manifold=debug");
        assert!(builder.console);
        assert_eq!(builder.level, LevelFilter::INFO);
        assert_eq!(builder.max_files, DEFAULT_MAX_FILES);
        assert_eq!(builder.env_filter.as_deref(), Some("manifold=debug"));
        assert!(builder.path.is_none());
    }

    #[test]
    fn empty_name_is_rejected() {
        let err = Logging::builder().init().expect_err("no name");
        assert!(matches!(err, LoggingError::InvalidConfiguration(_)));
    }

    #[test]
    fn zero_max_files_is_rejected() {
        let err = Logging::builder().name("test-app").max_files(0).init().expect_err("max_files");
        assert!(matches!(err, LoggingError::InvalidConfiguration(_)));
    }

    #[test]
    fn malformed_env_filter_is_rejected() {
        let err = Logging::builder()
            .name("test-app")
            .env_filter("not a filter ===")
            .init()
            .expect_err("filter must parse");
        assert!(matches!(err, LoggingError::InvalidConfiguration(_)));
    }
}
