//! Console Strategies and Dispatch
//!
//! One strategy per adapter, each deciding how to turn a
//! [`ConnectionRecord`] plus [`RunOptions`] into the final client command:
//! - [`sqlite`] — direct exec, database name only (plus sqlite3 display flags)
//! - [`postgres`] — direct exec, connection details via `PG*` environment
//! - [`mysql`] — credential file over a `/dev/fd` pipe, with an inline-flag
//!   fallback when the platform cannot read a descriptor by number
//!
//! [`dispatch`] maps the record's adapter tag onto a strategy through an
//! explicit registration table ([`Adapter::from_name`]); unknown tags are a
//! fatal `UnsupportedAdapter`. Record validation happens before dispatch so
//! every strategy can assume a usable database name.

use std::fmt;
use std::path::Path;

use crate::error::{DbPromptError, Result};
use crate::exec::Executor;
use crate::mycnf::parse_ignore_list;
use crate::record::ConnectionRecord;

pub mod mysql;
pub mod postgres;
pub mod sqlite;

/// Run-time options for a single launch
///
/// Built once by the flag parser and passed by reference into the core;
/// nothing here mutates after parse.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Override for the client binary (skips PATH search entirely)
    pub executable: Option<String>,

    /// Comma-separated record keys to exclude from the credential file
    pub ignore: Option<String>,

    /// Opt in to passing the password through the client's native
    /// mechanism (`PGPASSWORD` / `--password=`) instead of prompting
    pub include_password: bool,

    /// mysql only: print the credential file to stdout and exit
    pub mycnf_only: bool,

    /// sqlite3 only: display mode, passed through as `-<mode>`
    pub mode: Option<String>,

    /// sqlite3 only: turn column headers on
    pub header: bool,

    /// Emit diagnostic trace lines to stderr
    pub verbose: bool,
}

impl RunOptions {
    /// Validate option values that reach the core unparsed
    ///
    /// The executable override must look like a command name (at least one
    /// alphabetic character), so an accidental `-x ""` or `-x 123` fails
    /// before anything is handed to exec.
    pub fn validate(&self) -> Result<()> {
        if let Some(executable) = &self.executable {
            if !executable.chars().any(|c| c.is_ascii_alphabetic()) {
                return Err(DbPromptError::InvalidExecutable(executable.clone()));
            }
        }
        Ok(())
    }

    /// The `--ignore` value split into record keys
    #[must_use]
    pub fn ignore_keys(&self) -> Vec<String> {
        self.ignore.as_deref().map(parse_ignore_list).unwrap_or_default()
    }
}

/// Supported adapter strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adapter {
    /// Legacy sqlite 2 client
    Sqlite,
    /// sqlite3 client with display flags
    Sqlite3,
    /// psql, credentials via PG* environment
    Postgresql,
    /// mysql, credentials via defaults-file pipe
    Mysql,
}

impl Adapter {
    /// Registration table from adapter tag to strategy
    ///
    /// Fails with `UnsupportedAdapter` naming the tag and the database when
    /// no strategy is registered. The tag is matched exactly; no dynamic
    /// name-to-type lookup.
    pub fn from_name(name: &str, database: &str) -> Result<Self> {
        match name {
            "sqlite" => Ok(Self::Sqlite),
            "sqlite3" => Ok(Self::Sqlite3),
            "postgresql" => Ok(Self::Postgresql),
            "mysql" => Ok(Self::Mysql),
            _ => Err(DbPromptError::UnsupportedAdapter {
                adapter: name.to_string(),
                database: database.to_string(),
            }),
        }
    }

    /// The adapter tag as a string
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Sqlite3 => "sqlite3",
            Self::Postgresql => "postgresql",
            Self::Mysql => "mysql",
        }
    }
}

impl fmt::Display for Adapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Validate the record, select the strategy, and run it
///
/// The terminal action on every successful path is process replacement (or
/// the `--mycnf` dump); an `Ok` return is only observed with a recording
/// executor.
pub fn dispatch(
    record: &ConnectionRecord,
    options: &RunOptions,
    executor: &mut dyn Executor,
) -> Result<()> {
    record.validate()?;
    options.validate()?;

    let name = record.adapter().unwrap_or("");
    let adapter = Adapter::from_name(name, required_database(record)?)?;
    if options.verbose {
        eprintln!("Found adapter >>{adapter}<<");
    }

    match adapter {
        Adapter::Sqlite => sqlite::run_sqlite(record, options, executor),
        Adapter::Sqlite3 => sqlite::run_sqlite3(record, options, executor),
        Adapter::Postgresql => postgres::run(record, options, executor),
        Adapter::Mysql => mysql::run(record, options, executor),
    }
}

/// The record's database name, which validation guarantees upstream
pub(crate) fn required_database(record: &ConnectionRecord) -> Result<&str> {
    record.database().ok_or(DbPromptError::MissingDatabaseName)
}

/// Resolve the client binary: explicit override, else PATH search
///
/// Each PATH directory is checked for an executable file named after each
/// candidate (candidates gain an `.exe` variant on Windows). The search
/// returns the bare command name, leaving final resolution to exec, exactly
/// as a shell would. Fails with `ExecutableNotFound` listing every candidate
/// tried.
pub fn find_cmd(options: &RunOptions, candidates: &[&str]) -> Result<String> {
    if let Some(executable) = &options.executable {
        return Ok(executable.clone());
    }

    let mut names: Vec<String> = candidates.iter().map(|c| (*c).to_string()).collect();
    if cfg!(windows) {
        names.extend(candidates.iter().map(|c| format!("{c}.exe")));
    }

    let path = std::env::var_os("PATH").unwrap_or_default();
    let dirs: Vec<std::path::PathBuf> = std::env::split_paths(&path).collect();

    names
        .iter()
        .find(|name| dirs.iter().any(|dir| is_executable(&dir.join(name.as_str()))))
        .cloned()
        .ok_or(DbPromptError::ExecutableNotFound { candidates: names })
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;
    std::fs::metadata(path).map(|meta| meta.is_file() && meta.mode() & 0o111 != 0).unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::RecordingExecutor;
    use pretty_assertions::assert_eq;

    fn record(pairs: &[(&str, &str)]) -> ConnectionRecord {
        pairs.iter().copied().collect()
    }

    // PATH is process-global; serialize the tests that rewrite it
    static PATH_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

    fn with_path<T>(value: &std::ffi::OsStr, body: impl FnOnce() -> T) -> T {
        let _guard = PATH_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let original = std::env::var_os("PATH");
        std::env::set_var("PATH", value);
        let result = body();
        match original {
            Some(path) => std::env::set_var("PATH", path),
            None => std::env::remove_var("PATH"),
        }
        result
    }

    #[test]
    fn test_adapter_registration_table() {
        assert_eq!(Adapter::from_name("sqlite", "db").unwrap(), Adapter::Sqlite);
        assert_eq!(Adapter::from_name("sqlite3", "db").unwrap(), Adapter::Sqlite3);
        assert_eq!(Adapter::from_name("postgresql", "db").unwrap(), Adapter::Postgresql);
        assert_eq!(Adapter::from_name("mysql", "db").unwrap(), Adapter::Mysql);
    }

    #[test]
    fn test_unknown_adapter_names_tag_and_database() {
        let err = Adapter::from_name("no_such_adapter", "prod_db").unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_ADAPTER");
        let msg = err.to_string();
        assert!(msg.contains("no_such_adapter"));
        assert!(msg.contains("prod_db"));
    }

    #[test]
    fn test_dispatch_validates_before_adapter_lookup() {
        // missing database fails validation even though the adapter is bogus
        let rec = record(&[("adapter", "no_such_adapter")]);
        let mut exec = RecordingExecutor::new();
        let err = dispatch(&rec, &RunOptions::default(), &mut exec).unwrap_err();
        assert_eq!(err.error_code(), "MISSING_DATABASE_NAME");
        assert!(exec.commands.is_empty());
    }

    #[test]
    fn test_dispatch_rejects_bad_executable_override() {
        let rec = record(&[("adapter", "sqlite"), ("database", "dev.db")]);
        let options = RunOptions { executable: Some("123".into()), ..Default::default() };
        let mut exec = RecordingExecutor::new();
        let err = dispatch(&rec, &options, &mut exec).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_EXECUTABLE");
        assert!(err.to_string().contains("123"));
    }

    #[test]
    fn test_find_cmd_prefers_explicit_override() {
        let options = RunOptions { executable: Some("/opt/bin/mysql".into()), ..Default::default() };
        assert_eq!(find_cmd(&options, &["mysql", "mysql5"]).unwrap(), "/opt/bin/mysql");
    }

    #[test]
    fn test_find_cmd_reports_every_candidate() {
        // an override-free search against an empty PATH cannot succeed
        let err = with_path(std::ffi::OsStr::new(""), || {
            find_cmd(&RunOptions::default(), &["mysql", "mysql5"]).unwrap_err()
        });

        assert_eq!(err.error_code(), "EXECUTABLE_NOT_FOUND");
        let msg = err.to_string();
        assert!(msg.contains("mysql"));
        assert!(msg.contains("mysql5"));
    }

    #[test]
    #[cfg(unix)]
    fn test_find_cmd_searches_path_directories() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("temp dir");
        let client = dir.path().join("fakesql");
        std::fs::write(&client, "#!/bin/sh\n").expect("write stub");
        std::fs::set_permissions(&client, std::fs::Permissions::from_mode(0o755))
            .expect("chmod stub");

        let found =
            with_path(dir.path().as_os_str(), || find_cmd(&RunOptions::default(), &["fakesql"]));

        assert_eq!(found.unwrap(), "fakesql");
    }

    #[test]
    #[cfg(unix)]
    fn test_find_cmd_skips_non_executable_files() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("temp dir");
        let client = dir.path().join("fakesql");
        std::fs::write(&client, "data").expect("write stub");
        std::fs::set_permissions(&client, std::fs::Permissions::from_mode(0o644))
            .expect("chmod stub");

        let result =
            with_path(dir.path().as_os_str(), || find_cmd(&RunOptions::default(), &["fakesql"]));

        assert!(result.is_err());
    }

    #[test]
    fn test_ignore_keys_split() {
        let options = RunOptions { ignore: Some("password,socket".into()), ..Default::default() };
        assert_eq!(options.ignore_keys(), vec!["password", "socket"]);
        assert!(RunOptions::default().ignore_keys().is_empty());
    }
}
