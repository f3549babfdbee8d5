use thiserror::Error;

/// Errors that can occur during logging initialization.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// Failure when configuring the rolling file appender (e.g., invalid path).
    #[error("rolling file appender error: {0}")]
    Appender(#[from] tracing_appender::rolling::InitError),

    /// A global tracing subscriber is already installed in this process.
    #[error("tracing subscriber error: {0}")]
    Subscriber(#[from] tracing_subscriber::util::TryInitError),

    /// Invalid settings supplied to the builder.
    #[error("invalid logging configuration: {0}")]
    InvalidConfiguration(String),

    /// Filesystem preparation for file logging failed.
    #[error("cannot prepare log directory {path}: {message}")]
    LogDirectory { path: String, message: String },
}
