//! dbprompt - Credential-Safe Database Console Launcher
//!
//! dbprompt starts an interactive database client (sqlite, sqlite3, psql, or
//! mysql) configured from a per-environment connection record, without ever
//! exposing secret credentials as plain command-line arguments, where other
//! users could read them from the process listing.
//!
//! # Core Principles
//! - Secrets never appear in argv by default (environment for psql, a
//!   `/dev/fd` credential-file pipe for mysql)
//! - Convenience is opt-in (`--include-password`), secrecy is the default
//! - No shell anywhere: arguments are passed as an argv vector
//! - One-shot invocations: each run ends in process replacement or exit
//!
//! # Module Organization
//! - [`error`] - Error types and handling
//! - [`record`] - Connection records and validation
//! - [`config`] - database.yml loading and environment lookup
//! - [`mycnf`] - Credential-file rendering
//! - [`secret`] - Pipe capability probe and fd handoff
//! - [`exec`] - Process-replacement seam
//! - [`console`] - Adapter strategies and dispatch
//!
//! # Public API
//! The binary is a thin wrapper over [`console::dispatch`]; wrappers and
//! tests use [`exec::RecordingExecutor`] to observe the final command
//! instead of being replaced by it.

pub mod config;
pub mod console;
pub mod error;
pub mod exec;
pub mod mycnf;
pub mod record;
pub mod secret;

// Re-export commonly used types for convenience
pub use config::{DEFAULT_CONFIG_PATH, DEFAULT_ENVIRONMENT};
pub use console::{dispatch, find_cmd, Adapter, RunOptions};
pub use error::{DbPromptError, Result};
pub use exec::{CommandLine, Executor, RecordingExecutor, SystemExecutor};
pub use record::ConnectionRecord;
