//! Error types and context management for game operations

use std::fmt;
use std::path::{Path, PathBuf};

/// Main error type for all game operations
#[derive(Debug)]
pub enum GameError {
    /// Generator procedure returned data of the wrong shape
    Generation {
        /// Index of the offending item, when a single item is at fault
        index: Option<usize>,
        /// Description of what's wrong with the returned data
        reason: String,
    },

    /// User procedure failed to compile, could not be resolved, or raised at runtime
    ProcedureExecution {
        /// Which procedure failed (`generator` or `progression`)
        procedure: &'static str,
        /// Message reported by the script engine
        message: String,
        /// Source line of the failure when the engine reports one
        line: Option<usize>,
    },

    /// Progression procedure produced no usable noise level
    Progression {
        /// Description of the failure
        reason: String,
    },

    /// Game configuration or call argument failed range validation
    ///
    /// This is the only class that is fatal to round assembly:
    /// it signals a caller bug rather than an authoring mistake.
    Configuration {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Event is not accepted by the current stage of the session
    InvalidTransition {
        /// Stage the session was in
        stage: &'static str,
        /// Event that was rejected
        event: &'static str,
    },

    /// Configuration file could not be parsed
    ConfigParse {
        /// Path to the configuration file
        path: PathBuf,
        /// Underlying TOML error
        source: toml::de::Error,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Session event or plot set could not be serialized
    Serialization {
        /// Underlying JSON error
        source: serde_json::Error,
    },
}

impl GameError {
    /// Whether the error stems from user-authored code and is absorbed by a fallback
    pub const fn is_authoring_error(&self) -> bool {
        matches!(
            self,
            Self::Generation { .. } | Self::ProcedureExecution { .. } | Self::Progression { .. }
        )
    }
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generation {
                index: Some(index),
                reason,
            } => write!(f, "Generated data invalid at index {index}: {reason}"),
            Self::Generation {
                index: None,
                reason,
            } => write!(f, "Generated data invalid: {reason}"),
            Self::ProcedureExecution {
                procedure,
                message,
                line,
            } => match line {
                Some(line) => write!(f, "{procedure} procedure failed (line {line}): {message}"),
                None => write!(f, "{procedure} procedure failed: {message}"),
            },
            Self::Progression { reason } => {
                write!(f, "Progression procedure returned no usable level: {reason}")
            }
            Self::Configuration {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid configuration '{parameter}' = '{value}': {reason}")
            }
            Self::InvalidTransition { stage, event } => {
                write!(f, "Event '{event}' is not valid during stage '{stage}'")
            }
            Self::ConfigParse { path, source } => {
                write!(f, "Failed to parse config '{}': {source}", path.display())
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::Serialization { source } => write!(f, "Serialization failed: {source}"),
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ConfigParse { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            Self::Serialization { source } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for game results
pub type Result<T> = std::result::Result<T, GameError>;

/// Additional context to enrich error messages
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// File the failing operation touched
    pub path: Option<PathBuf>,
    /// Operation being performed
    pub operation: Option<&'static str>,
}

/// Enriches errors with the file and operation they occurred in
pub trait WithContext<T> {
    /// Add error context to a Result
    ///
    /// # Errors
    ///
    /// Propagates the original error with additional context applied
    fn with_context(self, context: ErrorContext) -> Result<T>;

    /// Attach the path and operation of a file access
    ///
    /// # Errors
    ///
    /// Propagates the original error with the path context applied
    fn with_path(self, path: &Path, operation: &'static str) -> Result<T>;
}

impl<T, E> WithContext<T> for std::result::Result<T, E>
where
    E: Into<GameError>,
{
    fn with_context(self, context: ErrorContext) -> Result<T> {
        self.map_err(|e| {
            let mut error = e.into();
            // Only file-backed errors carry a path
            match &mut error {
                GameError::FileSystem {
                    path, operation, ..
                } => {
                    if let Some(p) = context.path {
                        *path = p;
                    }
                    if let Some(op) = context.operation {
                        *operation = op;
                    }
                }
                GameError::ConfigParse { path, .. } => {
                    if let Some(p) = context.path {
                        *path = p;
                    }
                }
                _ => {}
            }
            error
        })
    }

    fn with_path(self, path: &Path, operation: &'static str) -> Result<T> {
        self.with_context(ErrorContext {
            path: Some(path.to_path_buf()),
            operation: Some(operation),
        })
    }
}

impl From<std::io::Error> for GameError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

impl From<toml::de::Error> for GameError {
    fn from(err: toml::de::Error) -> Self {
        Self::ConfigParse {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for GameError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization { source: err }
    }
}

/// Create a configuration error for an out-of-range parameter
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> GameError {
    GameError::Configuration {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a generation error, optionally pinned to an item index
pub fn generation_error(index: Option<usize>, reason: &impl ToString) -> GameError {
    GameError::Generation {
        index,
        reason: reason.to_string(),
    }
}

/// Create a procedure execution error
pub fn procedure_error(
    procedure: &'static str,
    message: &impl ToString,
    line: Option<usize>,
) -> GameError {
    GameError::ProcedureExecution {
        procedure,
        message: message.to_string(),
        line,
    }
}
