//! PostgreSQL Console Strategy
//!
//! psql reads its connection details from `PGUSER`, `PGHOST`, `PGPORT` and
//! `PGPASSWORD`, so the strategy sets those in the child environment and
//! passes only the database name in argv. The password is exported solely
//! when `--include-password` was requested: convenience is opt-in, secrecy
//! is the default.

use crate::error::Result;
use crate::exec::{CommandLine, Executor};
use crate::record::ConnectionRecord;

use super::{find_cmd, required_database, RunOptions};

/// Launch psql with connection details in the environment
pub fn run(
    record: &ConnectionRecord,
    options: &RunOptions,
    executor: &mut dyn Executor,
) -> Result<()> {
    let program = find_cmd(options, &["psql"])?;
    let mut command = CommandLine::new(program, vec![required_database(record)?.to_string()]);

    if let Some(username) = record.get("username") {
        command.env("PGUSER", username);
    }
    if let Some(host) = record.get("host") {
        command.env("PGHOST", host);
    }
    if let Some(port) = record.get("port") {
        command.env("PGPORT", port);
    }
    if options.include_password {
        if let Some(password) = record.get("password") {
            command.env("PGPASSWORD", password);
        }
    }

    if options.verbose {
        eprintln!("Exec'ing command '{command}'");
    }
    executor.replace(command)
}
