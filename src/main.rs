//! dbprompt CLI Entry Point
//!
//! Parses flags and positionals, loads the environment's connection record
//! from the configuration file, and hands everything to the dispatcher. On
//! success the process is replaced by the database client; on failure a
//! single human-readable message goes to stderr and the process exits
//! non-zero. The only payload ever printed to stdout is the `--mycnf` dump.

use std::path::PathBuf;

use clap::Parser;

use dbprompt::{config, console, RunOptions, SystemExecutor};

/// dbprompt - Credential-safe launcher for interactive database consoles
#[derive(Parser)]
#[command(name = "dbprompt")]
#[command(about = "Launch an interactive database console without leaking credentials")]
#[command(version)]
struct Cli {
    /// Executable to use. Defaults are sqlite, sqlite3, psql, mysql
    #[arg(short = 'x', long)]
    executable: Option<String>,

    /// mysql only: just output the my.cnf file
    #[arg(long = "mycnf")]
    mycnf_only: bool,

    /// Comma-separated record keys to leave out of the my.cnf file
    #[arg(long)]
    ignore: Option<String>,

    /// sqlite3 only: put the database in the specified mode
    #[arg(long, value_parser = ["html", "list", "line", "column"])]
    mode: Option<String>,

    /// sqlite3 only: turn headers on
    #[arg(long)]
    header: bool,

    /// mysql/postgresql only: automatically provide the password from the
    /// configuration file
    #[arg(short = 'p', long = "include-password")]
    include_password: bool,

    /// Run verbosely
    #[arg(short, long)]
    verbose: bool,

    /// Environment to launch
    #[arg(default_value = config::DEFAULT_ENVIRONMENT)]
    environment: String,

    /// Configuration file
    #[arg(default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,
}

impl Cli {
    fn run_options(&self) -> RunOptions {
        RunOptions {
            executable: self.executable.clone(),
            ignore: self.ignore.clone(),
            include_password: self.include_password,
            mycnf_only: self.mycnf_only,
            mode: self.mode.clone(),
            header: self.header,
            verbose: self.verbose,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> dbprompt::Result<()> {
    let options = cli.run_options();
    if options.verbose {
        eprintln!("Using yaml file '{}'", cli.config.display());
        eprintln!("Using environment '{}'", cli.environment);
    }

    let record = config::record_for(&cli.config, &cli.environment)?;
    console::dispatch(&record, &options, &mut SystemExecutor)
}
