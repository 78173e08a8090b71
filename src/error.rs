//! Error Handling Infrastructure
//!
//! This module defines all error types used throughout dbprompt.
//! Every failure is fatal to the invocation: nothing is retried and nothing is
//! recovered locally, so each variant carries enough context to produce one
//! human-readable message naming the offending value before the process exits
//! non-zero.
//!
//! # Error Categories
//! - `MissingDatabaseName` / `EmptyDatabaseName` / `InvalidDatabaseName`: record validation
//! - `InvalidExecutable`: rejected `--executable` override
//! - `UnsupportedAdapter` / `EnvironmentNotFound` / `ConfigError`: configuration
//! - `ExecutableNotFound`: PATH resolution
//! - `BadFileDescriptor` / `PipeError`: pipe-mechanism invariant violations
//! - `LaunchFailed`: process replacement itself failed

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for dbprompt operations
#[derive(Error, Debug)]
pub enum DbPromptError {
    /// Connection record has no `database` key
    #[error("No database name found")]
    MissingDatabaseName,

    /// Connection record's `database` value is the empty string
    #[error("Database name is empty")]
    EmptyDatabaseName,

    /// Database name contains whitespace, which cannot be embedded in a
    /// command line without quoting logic this tool deliberately omits
    #[error("Database name {0:?} has whitespace. Not supported")]
    InvalidDatabaseName(String),

    /// The `--executable` override does not look like a command name
    #[error("Bad executable {0:?}")]
    InvalidExecutable(String),

    /// No strategy is registered for the record's adapter string
    #[error("Unknown command-line client for database {database} (adapter {adapter:?})")]
    UnsupportedAdapter { adapter: String, database: String },

    /// The requested environment is absent from the configuration file
    #[error("Could not find configuration for {environment:?} in file {}", .path.display())]
    EnvironmentNotFound { environment: String, path: PathBuf },

    /// No candidate client binary was found on PATH and no override was given
    #[error("Couldn't find database client: {}. Check your $PATH and try again.", .candidates.join(", "))]
    ExecutableNotFound { candidates: Vec<String> },

    /// The pipe read end's descriptor is not a usable integer handle
    #[error("Bad file descriptor {0}. Cannot pipe.")]
    BadFileDescriptor(i64),

    /// Pipe creation or the credential write failed on the committed pipe path
    #[error("Pipe handoff failed: {0}")]
    PipeError(#[source] std::io::Error),

    /// Configuration file error (unreadable, invalid YAML, wrong shape)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Process replacement returned, which only happens on failure
    #[error("Failed to exec {program}: {source}")]
    LaunchFailed { program: String, source: std::io::Error },
}

impl DbPromptError {
    /// Convert error to a stable code string
    ///
    /// Codes are stable and suitable for programmatic handling by wrappers.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::MissingDatabaseName => "MISSING_DATABASE_NAME",
            Self::EmptyDatabaseName => "EMPTY_DATABASE_NAME",
            Self::InvalidDatabaseName(_) => "INVALID_DATABASE_NAME",
            Self::InvalidExecutable(_) => "INVALID_EXECUTABLE",
            Self::UnsupportedAdapter { .. } => "UNSUPPORTED_ADAPTER",
            Self::EnvironmentNotFound { .. } => "ENVIRONMENT_NOT_FOUND",
            Self::ExecutableNotFound { .. } => "EXECUTABLE_NOT_FOUND",
            Self::BadFileDescriptor(_) => "BAD_FILE_DESCRIPTOR",
            Self::PipeError(_) => "PIPE_ERROR",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::LaunchFailed { .. } => "LAUNCH_FAILED",
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }
}

/// Result type alias for dbprompt operations
pub type Result<T> = std::result::Result<T, DbPromptError>;
