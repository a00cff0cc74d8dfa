//! Error types for tsbench.

/// The main error type for tsbench operations.
///
/// Engine failures are not subdivided into retryable and permanent kinds;
/// the harness treats every error as fatal to the current run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A storage engine reported a failure (open, read, write, delete)
    #[error("{engine} error: {source}")]
    Engine {
        /// Label of the engine that failed
        engine: &'static str,
        /// Underlying native error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// I/O error outside of an engine call
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration was rejected
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Wraps a native engine error.
    pub fn engine<E>(engine: &'static str, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Error::Engine {
            engine,
            source: source.into(),
        }
    }
}

/// A specialized `Result` type for tsbench operations.
pub type Result<T> = std::result::Result<T, Error>;
