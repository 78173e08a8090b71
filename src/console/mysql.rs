//! MySQL Console Strategy
//!
//! The mysql client will read credentials from a defaults file but not from
//! the environment, so this is the strategy the secret channel exists for.
//! Three paths, chosen in order:
//!
//! 1. `--mycnf`: print the rendered credential file to stdout and return.
//! 2. Pipe path (when [`piping_supported`] probes true): load the credential
//!    file into an anonymous pipe and exec
//!    `mysql --defaults-file=/dev/fd/<n>`. The secret never appears in argv
//!    or on disk.
//! 3. Fallback path: discrete `--<option>=<value>` flags. The password goes
//!    inline only on explicit `--include-password`; otherwise a bare `-p`
//!    makes the client prompt. This path can expose the password in argv —
//!    the documented trade-off for platforms without `/dev/fd`.

use crate::error::Result;
use crate::exec::{CommandLine, Executor};
use crate::mycnf;
use crate::record::ConnectionRecord;
use crate::secret::{piping_supported, SecretPipe};

use super::{find_cmd, required_database, RunOptions};

/// Client binaries probed on PATH, in preference order
const CLIENT_CANDIDATES: &[&str] = &["mysql", "mysql5"];

/// Record key → client flag for the fallback path
const FLAG_MAP: &[(&str, &str)] = &[
    ("host", "host"),
    ("port", "port"),
    ("socket", "socket"),
    ("username", "user"),
    ("encoding", "default-character-set"),
];

/// Launch the mysql client, choosing the credential path by capability probe
pub fn run(
    record: &ConnectionRecord,
    options: &RunOptions,
    executor: &mut dyn Executor,
) -> Result<()> {
    if options.mycnf_only {
        println!("{}", mycnf::render(record.clone(), &options.ignore_keys()));
        return Ok(());
    }

    if piping_supported(options.verbose) {
        run_with_pipe(record, options, executor)
    } else {
        run_with_flags(record, options, executor)
    }
}

/// Hand the credential file to the client over a `/dev/fd` pipe
fn run_with_pipe(
    record: &ConnectionRecord,
    options: &RunOptions,
    executor: &mut dyn Executor,
) -> Result<()> {
    let program = find_cmd(options, CLIENT_CANDIDATES)?;
    let my_cnf = mycnf::render(record.clone(), &options.ignore_keys());
    if options.verbose {
        eprintln!("Using my.cnf\n--- BEGIN my.cnf ----\n{my_cnf}\n--- END my.cnf ---");
    }

    // Write end is closed inside load; the read end must stay open until
    // the replacement image takes over, so the pipe lives past replace.
    let pipe = SecretPipe::load(&my_cnf)?;
    let command =
        CommandLine::new(program, vec![format!("--defaults-file={}", pipe.handoff_path()?)]);

    if options.verbose {
        eprintln!("Exec'ing command '{command}'");
    }
    executor.replace(command)
}

/// Degrade to discrete flags when the platform cannot pipe
fn run_with_flags(
    record: &ConnectionRecord,
    options: &RunOptions,
    executor: &mut dyn Executor,
) -> Result<()> {
    let program = find_cmd(options, CLIENT_CANDIDATES)?;

    let mut args = Vec::new();
    for (key, flag) in FLAG_MAP {
        if let Some(value) = record.get(key) {
            args.push(format!("--{flag}={value}"));
        }
    }

    match record.get("password") {
        Some(password) if options.include_password => args.push(format!("--password={password}")),
        // without the opt-in, a bare -p makes the client prompt
        Some(password) if !password.is_empty() => args.push("-p".to_string()),
        _ => {}
    }

    args.push(required_database(record)?.to_string());

    let command = CommandLine::new(program, args);
    if options.verbose {
        eprintln!("Exec'ing command '{command}'");
    }
    executor.replace(command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::RecordingExecutor;
    use pretty_assertions::assert_eq;

    fn record(pairs: &[(&str, &str)]) -> ConnectionRecord {
        pairs.iter().copied().collect()
    }

    fn options() -> RunOptions {
        RunOptions { executable: Some("mysql".into()), ..Default::default() }
    }

    fn dev_record() -> ConnectionRecord {
        record(&[
            ("adapter", "mysql"),
            ("database", "dev_db"),
            ("user", "dev_user"),
            ("password", "dev_password"),
            ("host", "localhost"),
        ])
    }

    #[test]
    #[cfg(unix)]
    fn test_pipe_path_keeps_password_out_of_argv() {
        let mut exec = RecordingExecutor::new();
        run(&dev_record(), &options(), &mut exec).unwrap();

        let cmd = exec.only();
        assert_eq!(cmd.program, "mysql");
        assert_eq!(cmd.args.len(), 1);
        assert!(cmd.args[0].starts_with("--defaults-file=/dev/fd/"));
        assert!(!cmd.args[0].contains("dev_password"));
    }

    #[test]
    #[cfg(unix)]
    fn test_pipe_path_payload_is_the_credential_file() {
        let mut exec = RecordingExecutor::new();
        run(&dev_record(), &options(), &mut exec).unwrap();

        // the handed-off descriptor is still open in this process; read it
        // back the same way the client would
        let path = exec.only().args[0]
            .strip_prefix("--defaults-file=")
            .expect("defaults-file flag")
            .to_string();
        let payload = std::fs::read_to_string(path).expect("read credential file");
        assert_eq!(
            payload,
            "[client]\ndatabase=dev_db\nhost=localhost\npassword=dev_password\nuser=dev_user"
        );
    }

    #[test]
    fn test_fallback_flag_order_and_prompt() {
        let rec = record(&[
            ("database", "dev_db"),
            ("host", "localhost"),
            ("port", "3306"),
            ("socket", "/tmp/mysql.sock"),
            ("username", "alice"),
            ("encoding", "utf8"),
            ("password", "s3cret"),
        ]);
        let mut exec = RecordingExecutor::new();
        run_with_flags(&rec, &options(), &mut exec).unwrap();

        assert_eq!(
            exec.only().args,
            vec![
                "--host=localhost",
                "--port=3306",
                "--socket=/tmp/mysql.sock",
                "--user=alice",
                "--default-character-set=utf8",
                "-p",
                "dev_db",
            ]
        );
    }

    #[test]
    fn test_fallback_inline_password_on_opt_in() {
        let rec = record(&[("database", "dev_db"), ("password", "s3cret")]);
        let opts = RunOptions { include_password: true, ..options() };
        let mut exec = RecordingExecutor::new();
        run_with_flags(&rec, &opts, &mut exec).unwrap();
        assert_eq!(exec.only().args, vec!["--password=s3cret", "dev_db"]);
    }

    #[test]
    fn test_fallback_empty_password_neither_prompts_nor_passes() {
        let rec = record(&[("database", "dev_db"), ("password", "")]);
        let mut exec = RecordingExecutor::new();
        run_with_flags(&rec, &options(), &mut exec).unwrap();
        assert_eq!(exec.only().args, vec!["dev_db"]);
    }

    #[test]
    fn test_fallback_empty_password_with_opt_in_passes_empty_value() {
        // the opt-in wins even for an empty password; the client gets
        // --password= rather than a prompt
        let rec = record(&[("database", "dev_db"), ("password", "")]);
        let opts = RunOptions { include_password: true, ..options() };
        let mut exec = RecordingExecutor::new();
        run_with_flags(&rec, &opts, &mut exec).unwrap();
        assert_eq!(exec.only().args, vec!["--password=", "dev_db"]);
    }

    #[test]
    fn test_fallback_without_password() {
        let rec = record(&[("database", "dev_db"), ("host", "localhost")]);
        let mut exec = RecordingExecutor::new();
        run_with_flags(&rec, &options(), &mut exec).unwrap();
        assert_eq!(exec.only().args, vec!["--host=localhost", "dev_db"]);
    }

    #[test]
    fn test_mycnf_only_executes_nothing() {
        let opts = RunOptions { mycnf_only: true, ..options() };
        let mut exec = RecordingExecutor::new();
        run(&dev_record(), &opts, &mut exec).unwrap();
        assert!(exec.commands.is_empty());
    }

    #[test]
    #[cfg(unix)]
    fn test_ignore_list_thins_the_credential_file() {
        let opts = RunOptions { ignore: Some("password".into()), ..options() };
        let mut exec = RecordingExecutor::new();
        run(&dev_record(), &opts, &mut exec).unwrap();

        let path = exec.only().args[0]
            .strip_prefix("--defaults-file=")
            .expect("defaults-file flag")
            .to_string();
        let payload = std::fs::read_to_string(path).expect("read credential file");
        assert_eq!(payload, "[client]\ndatabase=dev_db\nhost=localhost\nuser=dev_user");
    }
}
