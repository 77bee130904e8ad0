//! Error types for errfix operations

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Placeholder origin for parse errors raised on in-memory sources
pub const IN_MEMORY_ORIGIN: &str = "<source>";

/// Main error type for errfix operations
#[derive(Debug, Error)]
pub enum ErrfixError {
    /// The Python source could not be parsed into a tree
    #[error("Parse error in {origin}: {message} at line {line}, column {column}")]
    ParseError {
        origin: String,
        message: String,
        line: usize,
        column: usize,
    },

    /// Configuration loading or validation errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// An input path could not be resolved to source files
    #[error("Input error for path '{path}': {message}")]
    InputError { path: PathBuf, message: String },

    /// File system I/O errors, tagged with the operation that failed
    #[error("Failed to {operation} '{path}': {source}")]
    IoError {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The run was cancelled before it finished
    #[error("Interrupted")]
    Interrupted,

    /// An error-code counter cannot advance past its last value
    #[error("Error series exhausted: no code follows {last}")]
    SeriesExhausted { last: u64 },

    /// A tree edit was attempted on a node that does not have the expected shape
    #[error("Internal error: {message}")]
    InternalError { message: String },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    Config,
    Input,
    Io,
    Internal,
    Interrupted,
    Series,
}

impl ErrfixError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ErrfixError::ParseError { .. } => ErrorKind::Parse,
            ErrfixError::ConfigError { .. } => ErrorKind::Config,
            ErrfixError::InputError { .. } => ErrorKind::Input,
            ErrfixError::IoError { .. } => ErrorKind::Io,
            ErrfixError::InternalError { .. } => ErrorKind::Internal,
            ErrfixError::Interrupted => ErrorKind::Interrupted,
            ErrfixError::SeriesExhausted { .. } => ErrorKind::Series,
        }
    }

    /// Check if this error only affects a single file, so a batch can move on
    pub fn is_recoverable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Parse | ErrorKind::Io)
    }

    /// Create a parse error for an in-memory source
    pub fn parse_error(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self::ParseError {
            origin: IN_MEMORY_ORIGIN.to_string(),
            message: message.into(),
            line,
            column,
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create an input resolution error
    pub fn input_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::InputError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an IO error with operation and path context
    pub fn io_error(
        operation: &'static str,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::IoError {
            operation,
            path: path.into(),
            source,
        }
    }

    /// Create an internal error
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }

    /// Create an error for a counter that overflowed after `last`
    pub fn series_exhausted(last: u64) -> Self {
        Self::SeriesExhausted { last }
    }

    /// Attach the file a parse error came from. Other errors are returned unchanged.
    pub fn with_origin(self, path: &Path) -> Self {
        match self {
            ErrfixError::ParseError {
                message,
                line,
                column,
                ..
            } => ErrfixError::ParseError {
                origin: path.display().to_string(),
                message,
                line,
                column,
            },
            other => other,
        }
    }
}

impl From<serde_json::Error> for ErrfixError {
    fn from(err: serde_json::Error) -> Self {
        Self::config_error(format!("JSON error: {err}"))
    }
}

impl From<toml::de::Error> for ErrfixError {
    fn from(err: toml::de::Error) -> Self {
        Self::config_error(format!("TOML error: {err}"))
    }
}
