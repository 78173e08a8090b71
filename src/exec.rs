//! Process Replacement
//!
//! The terminal action of every launch is "replace the current process image
//! with the resolved client command" — never spawn-and-wait. That makes the
//! real thing untestable, so replacement sits behind the [`Executor`] trait:
//! [`SystemExecutor`] performs the real handoff (and only ever returns on
//! failure), while [`RecordingExecutor`] captures the final command so tests
//! can assert on the exact argv and environment.
//!
//! No shell is involved at any point; arguments are passed as an argv vector
//! and are never word-split or glob-expanded.

use std::fmt;

use crate::error::{DbPromptError, Result};

/// The fully resolved command a strategy wants to become
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    /// Client binary name or path
    pub program: String,

    /// Argument vector, excluding the program itself
    pub args: Vec<String>,

    /// Environment variables set for the child (e.g. `PGUSER`)
    pub env: Vec<(String, String)>,
}

impl CommandLine {
    /// Create a command with no extra environment
    #[must_use]
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self { program: program.into(), args, env: Vec::new() }
    }

    /// Add an environment variable for the child
    pub fn env(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.env.push((key.into(), value.into()));
    }
}

impl fmt::Display for CommandLine {
    /// Space-joined rendering used for verbose traces only
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// The seam between command construction and process replacement
pub trait Executor {
    /// Replace the current process image with `command`
    ///
    /// A real executor diverges on success; an `Ok` return is only ever
    /// observed from test doubles.
    fn replace(&mut self, command: CommandLine) -> Result<()>;
}

/// Executor that really replaces the process image
#[derive(Debug, Default)]
pub struct SystemExecutor;

impl Executor for SystemExecutor {
    #[cfg(unix)]
    fn replace(&mut self, command: CommandLine) -> Result<()> {
        use std::os::unix::process::CommandExt;

        let mut child = std::process::Command::new(&command.program);
        child.args(&command.args);
        for (key, value) in &command.env {
            child.env(key, value);
        }

        // exec only returns on failure
        let source = child.exec();
        Err(DbPromptError::LaunchFailed { program: command.program, source })
    }

    /// Windows has no exec(2); the closest equivalent is spawn, wait, and
    /// exit with the child's status.
    #[cfg(not(unix))]
    fn replace(&mut self, command: CommandLine) -> Result<()> {
        let mut child = std::process::Command::new(&command.program);
        child.args(&command.args);
        for (key, value) in &command.env {
            child.env(key, value);
        }

        let status = child
            .status()
            .map_err(|source| DbPromptError::LaunchFailed { program: command.program, source })?;
        std::process::exit(status.code().unwrap_or(1));
    }
}

/// Executor that records commands instead of running them
///
/// Used by tests (and usable by wrappers) to observe the final command a
/// strategy would have become.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    /// Commands received, in order
    pub commands: Vec<CommandLine>,
}

impl RecordingExecutor {
    /// Create an empty recorder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The single recorded command, panicking if zero or several were seen
    #[must_use]
    pub fn only(&self) -> &CommandLine {
        assert_eq!(self.commands.len(), 1, "expected exactly one command, got {:?}", self.commands);
        &self.commands[0]
    }
}

impl Executor for RecordingExecutor {
    fn replace(&mut self, command: CommandLine) -> Result<()> {
        self.commands.push(command);
        Ok(())
    }
}
