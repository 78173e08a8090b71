//! SQLite Console Strategies
//!
//! The simplest strategies: sqlite databases are plain files and carry no
//! credentials, so both variants exec the client directly with the database
//! name as the only positional argument. The sqlite3 variant additionally
//! forwards the display flags (`-<mode>`, `-header`).

use crate::error::Result;
use crate::exec::{CommandLine, Executor};
use crate::record::ConnectionRecord;

use super::{find_cmd, required_database, RunOptions};

/// Launch the legacy sqlite 2 client
///
/// No record field other than `database` is consulted.
pub fn run_sqlite(
    record: &ConnectionRecord,
    options: &RunOptions,
    executor: &mut dyn Executor,
) -> Result<()> {
    let program = find_cmd(options, &["sqlite"])?;
    let command = CommandLine::new(program, vec![required_database(record)?.to_string()]);

    if options.verbose {
        eprintln!("Exec'ing command '{command}'");
    }
    executor.replace(command)
}

/// Launch the sqlite3 client
///
/// `--mode` becomes `-<mode>` without validation at this layer: the CLI
/// restricts the vocabulary, and anything else is the client's to reject.
pub fn run_sqlite3(
    record: &ConnectionRecord,
    options: &RunOptions,
    executor: &mut dyn Executor,
) -> Result<()> {
    let program = find_cmd(options, &["sqlite3"])?;

    let mut args = Vec::new();
    if let Some(mode) = &options.mode {
        args.push(format!("-{mode}"));
    }
    if options.header {
        args.push("-header".to_string());
    }
    args.push(required_database(record)?.to_string());

    let command = CommandLine::new(program, args);
    if options.verbose {
        eprintln!("Exec'ing command '{command}'");
    }
    executor.replace(command)
}
